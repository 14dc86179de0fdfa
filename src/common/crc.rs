// src/common/crc.rs

use super::error::Co2Error;
use crc::{Crc, CRC_16_MODBUS};

// Create a Crc instance for the Modbus algorithm for reuse.
// Polynomial 0x8005 (0xA001 reflected), init 0xFFFF, reflected in and out, no final XOR.
const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Calculates the Modbus RTU CRC-16 for the given data buffer.
///
/// The calculation covers every byte of the frame before the CRC itself,
/// starting with the slave address.
///
/// # Arguments
///
/// * `data`: A slice of bytes for which to calculate the CRC.
///
/// # Returns
///
/// The calculated 16-bit CRC value.
#[inline]
pub fn compute_crc(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a 16-bit CRC value into two bytes (LSB first) as Modbus RTU sends it.
pub fn encode_crc_binary(crc_value: u16) -> [u8; 2] {
    crc_value.to_le_bytes()
}

/// Decodes two bytes (LSB first) from a frame trailer into a 16-bit CRC value.
///
/// # Panics
///
/// Panics if `crc_bytes` does not have a length of exactly 2.
pub fn decode_crc_binary(crc_bytes: &[u8]) -> u16 {
    assert_eq!(crc_bytes.len(), 2, "Binary CRC must be 2 bytes long");
    u16::from_le_bytes([crc_bytes[0], crc_bytes[1]])
}

/// Verifies a complete Modbus RTU frame whose last two bytes are its CRC.
///
/// The session never calls this on sensor responses; it is here for callers
/// that read whole frames and want strict integrity checking.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(Co2Error::InvalidFormat)` if the buffer is too short.
/// * `Err(Co2Error::CrcMismatch)` if the CRCs don't match.
pub fn verify_frame_crc<E>(frame_with_crc: &[u8]) -> Result<(), Co2Error<E>>
where
    E: core::fmt::Debug,
{
    if frame_with_crc.len() < 3 {
        return Err(Co2Error::InvalidFormat);
    }
    let data_len = frame_with_crc.len() - 2;
    let calculated_crc = compute_crc(&frame_with_crc[..data_len]);
    let received_crc = decode_crc_binary(&frame_with_crc[data_len..]);

    if calculated_crc == received_crc {
        Ok(())
    } else {
        Err(Co2Error::CrcMismatch { expected: received_crc, calculated: calculated_crc })
    }
}
