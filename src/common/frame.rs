// src/common/frame.rs

use arrayvec::ArrayVec;

use super::address::SensorAddr;
use super::crc::{compute_crc, encode_crc_binary};
use super::error::Co2Error;

/// Length of an encoded read request, CRC included.
pub const READ_REQUEST_LEN: usize = 8;
/// Number of response bytes consumed per parse.
pub const RESPONSE_HEADER_LEN: usize = 5;
/// Capacity of a free-form command frame.
pub const MAX_COMMAND_FRAME_LEN: usize = 16;

/// Buffer holding an encoded free-form command frame.
pub type CommandFrame = ArrayVec<u8, MAX_COMMAND_FRAME_LEN>;

/// A Modbus RTU register read request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub address: SensorAddr,
    pub function_code: u8,
    pub register_address: u16,
    pub register_count: u16,
}

impl ReadRequest {
    /// Lays out `[addr][fn][reg_hi][reg_lo][cnt_hi][cnt_lo][crc_lo][crc_hi]`.
    pub fn encode(&self) -> [u8; READ_REQUEST_LEN] {
        let mut frame = [0u8; READ_REQUEST_LEN];
        frame[0] = self.address.as_u8();
        frame[1] = self.function_code;
        frame[2..4].copy_from_slice(&self.register_address.to_be_bytes());
        frame[4..6].copy_from_slice(&self.register_count.to_be_bytes());
        let crc = compute_crc(&frame[..6]);
        frame[6..].copy_from_slice(&encode_crc_binary(crc));
        frame
    }
}

/// Builds an encoded read request. Inputs are not range-checked.
pub fn build_read_request(
    address: SensorAddr,
    function_code: u8,
    register_address: u16,
    register_count: u16,
) -> [u8; READ_REQUEST_LEN] {
    ReadRequest { address, function_code, register_address, register_count }.encode()
}

/// Builds `[addr][payload...][crc_lo][crc_hi]` for commands that are not plain reads.
pub fn build_command_frame<E>(address: SensorAddr, payload: &[u8]) -> Result<CommandFrame, Co2Error<E>>
where
    E: core::fmt::Debug,
{
    let overflow = || Co2Error::BufferOverflow { needed: payload.len() + 3, got: MAX_COMMAND_FRAME_LEN };

    let mut frame = CommandFrame::new();
    frame.try_push(address.as_u8()).map_err(|_| overflow())?;
    frame.try_extend_from_slice(payload).map_err(|_| overflow())?;
    let crc = compute_crc(&frame);
    frame.try_extend_from_slice(&encode_crc_binary(crc)).map_err(|_| overflow())?;
    Ok(frame)
}

/// Fixed five-byte head of a sensor reply.
///
/// The CRC trailer that follows it on the wire is not consumed here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub address: u8,
    pub function_code: u8,
    pub byte_count: u8,
    pub data_high: u8,
    pub data_low: u8,
}

impl ResponseHeader {
    pub fn from_bytes(bytes: [u8; RESPONSE_HEADER_LEN]) -> Self {
        ResponseHeader {
            address: bytes[0],
            function_code: bytes[1],
            byte_count: bytes[2],
            data_high: bytes[3],
            data_low: bytes[4],
        }
    }

    /// The register value, big-endian.
    #[inline]
    pub fn value(&self) -> u16 {
        u16::from_be_bytes([self.data_high, self.data_low])
    }
}

impl From<[u8; RESPONSE_HEADER_LEN]> for ResponseHeader {
    fn from(bytes: [u8; RESPONSE_HEADER_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}
