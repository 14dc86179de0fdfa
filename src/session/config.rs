// src/session/config.rs

use crate::common::{address::SensorAddr, timing};
use core::time::Duration;

/// Tunables for a [`Session`](super::Session).
///
/// `Default` matches the sensor's factory setup: address 0x15, one second
/// response timeout, rescan after 5 lost reads, give up after 255 lost firmware reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address the session talks to until discovery changes it.
    pub address: SensorAddr,
    /// How long a request may go unanswered.
    pub timeout: Duration,
    /// Consecutive lost concentration reads before rescanning.
    pub ppm_retry_limit: u8,
    /// Consecutive lost firmware reads before reporting the sensor as missing.
    pub scan_retry_limit: u8,
}

impl SessionConfig {
    pub const fn new() -> Self {
        SessionConfig {
            address: SensorAddr::DEFAULT_ADDRESS,
            timeout: timing::RESPONSE_TIMEOUT,
            ppm_retry_limit: timing::PPM_RETRY_LIMIT,
            scan_retry_limit: timing::SCAN_RETRY_LIMIT,
        }
    }

    pub const fn with_address(mut self, address: SensorAddr) -> Self {
        self.address = address;
        self
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn with_ppm_retry_limit(mut self, limit: u8) -> Self {
        self.ppm_retry_limit = limit;
        self
    }

    pub const fn with_scan_retry_limit(mut self, limit: u8) -> Self {
        self.scan_retry_limit = limit;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
