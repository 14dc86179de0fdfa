//! T6713 command set and Modbus register map.
//!
//! Only `GetPpm` and `GetVersion` are issued by the session's automatic path.
//! The remaining commands carry their payload constants so callers can send
//! them explicitly through [`crate::Session::send_command`].

/// Modbus "Read Input Registers" function code, the only one the sensor needs.
pub const READ_INPUT_REGISTERS: u8 = 0x04;

/// Input register holding the firmware revision.
pub const FIRMWARE_REGISTER: u16 = 0x1389;
/// Input register holding the sensor status word.
pub const STATUS_REGISTER: u16 = 0x138A;
/// Input register holding the current CO2 concentration in ppm.
pub const PPM_REGISTER: u16 = 0x138B;

/// Number of registers read per request.
pub const SINGLE_REGISTER: u16 = 1;

/// Identifies the request currently in flight (or a configuration command).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Command {
    /// No request outstanding.
    #[default]
    None,
    /// Read the CO2 concentration.
    GetPpm,
    /// Read the sensor serial number.
    GetSerial,
    /// Read the firmware version, used as the presence check during discovery.
    GetVersion,
    /// Read the configured elevation.
    GetElevation,
    /// Query automatic baseline correction.
    GetAbc,
    /// Enable automatic baseline correction.
    EnableAbc,
    /// Disable automatic baseline correction.
    DisableAbc,
    /// Write the elevation setting.
    SetElevation,
}

impl Command {
    /// Two-byte command payload as documented for the sensor.
    pub const fn payload(&self) -> Option<[u8; 2]> {
        match self {
            Command::None => None,
            Command::GetPpm => Some([0x00, 0x01]),
            Command::GetSerial => Some([0x02, 0x01]),
            Command::GetVersion => Some([0x02, 0x0D]),
            Command::GetElevation => Some([0x02, 0x0F]),
            Command::GetAbc => Some([0xB7, 0x00]),
            Command::EnableAbc => Some([0xB7, 0x01]),
            Command::DisableAbc => Some([0xB7, 0x02]),
            Command::SetElevation => Some([0x03, 0x0F]),
        }
    }

    /// Input register read by the commands the session issues on its own.
    pub const fn read_register(&self) -> Option<u16> {
        match self {
            Command::GetPpm => Some(PPM_REGISTER),
            Command::GetVersion => Some(FIRMWARE_REGISTER),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}
