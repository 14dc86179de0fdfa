// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless testing or std is requested

pub mod common;
pub mod session;

// Re-export key types for convenience
pub use common::Co2Error;
pub use common::SensorAddr;
pub use session::{SensorStatus, Session, SessionConfig};
