// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum Co2Error<E = ()>
where
    E: core::fmt::Debug, // Debug is all the HAL error has to offer
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The transport kept refusing bytes while a frame was being written.
    #[error("Serial write stalled")]
    WriteStalled,

    /// A request is already outstanding and its timeout has not elapsed.
    #[error("Request already in flight")]
    Busy,

    /// Frame does not fit the buffer it is being assembled in.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Frame is too short to carry what was asked of it.
    #[error("Invalid frame format")]
    InvalidFormat,

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },
}
