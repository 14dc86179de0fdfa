// src/common/address.rs

use core::fmt;

/// Modbus slave address of a T6713 sensor.
///
/// Every byte is accepted: the discovery ladder walks addresses upward from
/// zero, so there is no range to validate against.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct SensorAddr(u8);

impl SensorAddr {
    /// Factory default address of the T6713.
    pub const DEFAULT_ADDRESS: SensorAddr = SensorAddr(0x15);
    /// Modbus broadcast address, first address tried when recovering a lost sensor.
    pub const BROADCAST: SensorAddr = SensorAddr(0x00);

    #[inline]
    pub const fn new(address: u8) -> Self {
        SensorAddr(address)
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_broadcast(&self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

impl Default for SensorAddr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl From<u8> for SensorAddr {
    fn from(value: u8) -> Self {
        SensorAddr(value)
    }
}

impl From<SensorAddr> for u8 {
    fn from(addr: SensorAddr) -> Self {
        addr.0
    }
}

impl fmt::Display for SensorAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
