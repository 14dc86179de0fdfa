// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::SensorAddr;

// From command.rs
pub use command::Command;

// From crc.rs
pub use crc::{compute_crc, decode_crc_binary, encode_crc_binary, verify_frame_crc};

// From error.rs
pub use error::Co2Error;

// From frame.rs
pub use frame::{
    build_command_frame, build_read_request, CommandFrame, ReadRequest, ResponseHeader,
};

// From hal_traits.rs
pub use hal_traits::{Co2Instant, Co2Serial, Co2Sink, Co2Timer};

// From timing.rs (constants - users can access via common::timing::*)
// No re-exports by default.
