// src/common/timing.rs

use core::time::Duration;

/// How long a request may stay unanswered before it is considered lost.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Serial speed the sensor is configured for (8 data bits, no parity, 1 stop bit).
pub const BAUD_RATE: u32 = 19_200;

/// Consecutive lost concentration reads before the session falls back to discovery.
pub const PPM_RETRY_LIMIT: u8 = 5;

/// Consecutive lost firmware reads after which discovery gives up.
pub const SCAN_RETRY_LIMIT: u8 = 255;

/// Upper bound on stray bytes discarded in one drain.
///
/// Larger than any UART receive buffer the sensor can fill between polls, so a
/// drain normally ends because `available()` reached zero. The cap only
/// matters for a line that keeps producing noise.
pub const DRAIN_LIMIT: usize = 2048;

/// Attempts per byte before a write returning `WouldBlock` is abandoned.
pub const WRITE_RETRY_LIMIT: u32 = 1_000;
