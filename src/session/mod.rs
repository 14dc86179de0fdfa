// src/session/mod.rs

//! The request/response state machine driving one T6713 sensor.
//!
//! A [`Session`] owns the serial interface and never blocks. The host calls
//! [`Session::poll`] at a fast cadence to process incoming bytes and detect
//! timeouts, and [`Session::update`] at the measurement interval to start a
//! new concentration read. At most one request is outstanding at any time.
//!
//! Discovery: after [`SessionConfig::ppm_retry_limit`] lost reads the session
//! sends a firmware read to the broadcast address. Each lost firmware read moves
//! discovery to the address equal to the running failure count (0, 1, 2, ...),
//! until [`SessionConfig::scan_retry_limit`] of them went unanswered and the sensor is
//! reported missing.
//!
//! Note: the ladder visits addresses in numeric order tied to the failure count,
//! not a list of known sensor addresses. This is most likely unintended in the
//! sensor integration it mirrors; callers that know where their sensor lives
//! should call [`Session::scan`] with that address instead.
//!
//! Sensor replies are matched on their first byte only; the reply CRC is not
//! checked. Use [`crate::common::verify_frame_crc`] when reading whole frames
//! elsewhere.

mod config;
mod io_helpers;
mod protocol_helpers;

#[cfg(test)]
mod mock;

pub use config::SessionConfig;

use crate::common::{
    address::SensorAddr,
    command::Command,
    error::Co2Error,
    frame::{build_command_frame, RESPONSE_HEADER_LEN},
    hal_traits::{Co2Serial, Co2Sink, Co2Timer},
    timing,
};
use core::fmt::Debug;
use core::time::Duration;

/// Health of the link as seen by the session.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SensorStatus {
    /// Last reply was well formed, or nothing has happened yet.
    #[default]
    Ok,
    /// A reply from an unexpected address was discarded.
    Warning,
    /// Discovery ran out of addresses to try without an answer.
    NotFound,
}

/// Driver state for one sensor on one serial link.
pub struct Session<IF, S>
where
    IF: Co2Serial + Co2Timer,
    IF::Error: Debug,
    S: Co2Sink,
{
    interface: IF,
    sink: S,
    config: SessionConfig,
    pending_command: Command,
    issued_at: Option<IF::Instant>,
    fail_count: u8,
    sensor_address: SensorAddr,
    status: SensorStatus,
    last_ppm: Option<u16>,
}

impl<IF, S> Session<IF, S>
where
    IF: Co2Serial + Co2Timer,
    IF::Error: Debug,
    S: Co2Sink,
{
    pub fn new(interface: IF, sink: S) -> Self {
        Self::with_config(interface, sink, SessionConfig::default())
    }

    pub fn with_config(interface: IF, sink: S, config: SessionConfig) -> Self {
        Session {
            interface,
            sink,
            sensor_address: config.address,
            config,
            pending_command: Command::None,
            issued_at: None,
            fail_count: 0,
            status: SensorStatus::Ok,
            last_ppm: None,
        }
    }

    // --- Public Operations ---

    /// Starts a concentration read unless one is already in flight and
    /// still inside its timeout window.
    pub fn request_measurement(&mut self) -> Result<(), Co2Error<IF::Error>> {
        if !self.pending_command.is_none() && self.elapsed() < self.config.timeout {
            return Ok(());
        }
        self.send_ppm_request()
    }

    /// Switches to `address` and sends it a firmware read.
    pub fn scan(&mut self, address: SensorAddr) -> Result<(), Co2Error<IF::Error>> {
        self.sensor_address = address;
        if self.status == SensorStatus::NotFound {
            self.status = SensorStatus::Ok;
        }
        self.send_read(Command::GetVersion)?;
        log::debug!("Sent firmware request to {}", self.sensor_address);
        Ok(())
    }

    /// Processes whatever the transport has received and handles timeouts.
    ///
    /// Cheap when nothing is pending: one `available()` call and a clock read.
    /// Only hard I/O errors from the transport are returned; lost or garbled
    /// replies are recovered from here.
    pub fn poll(&mut self) -> Result<(), Co2Error<IF::Error>> {
        let available = self.interface.available().map_err(Co2Error::Io)?;
        if available < RESPONSE_HEADER_LEN {
            return self.handle_timeout();
        }

        match self.read_header()? {
            Some(header) => self.handle_response(header),
            None => self.reject_frame(None),
        }
    }

    /// Periodic tick. Same as [`Session::request_measurement`].
    pub fn update(&mut self) -> Result<(), Co2Error<IF::Error>> {
        self.request_measurement()
    }

    /// Sends one of the configuration commands as a raw payload frame.
    ///
    /// Does not arm a pending request, so any reply is handled like an
    /// unsolicited frame by the next [`Session::poll`].
    pub fn send_command(&mut self, command: Command) -> Result<(), Co2Error<IF::Error>> {
        if !self.pending_command.is_none() && self.elapsed() < self.config.timeout {
            return Err(Co2Error::Busy);
        }
        let Some(payload) = command.payload() else {
            return Err(Co2Error::InvalidFormat);
        };
        let frame = build_command_frame::<IF::Error>(self.sensor_address, &payload)?;
        self.send_frame(&frame)?;
        log::debug!("Sent {:?} command to {}", command, self.sensor_address);
        Ok(())
    }

    /// Logs the session configuration at info level.
    pub fn log_config(&self) {
        log::info!("T6713:");
        log::info!("  Address: {}", self.sensor_address);
        log::info!("  Timeout: {} ms", self.config.timeout.as_millis());
        log::info!("  Rescan after: {} lost reads", self.config.ppm_retry_limit);
        log::info!("  Give up after: {} lost firmware reads", self.config.scan_retry_limit);
        log::info!("  Expected serial settings: {} baud 8N1", timing::BAUD_RATE);
    }

    // --- Accessors ---

    pub fn pending_command(&self) -> Command {
        self.pending_command
    }

    pub fn fail_count(&self) -> u8 {
        self.fail_count
    }

    pub fn sensor_address(&self) -> SensorAddr {
        self.sensor_address
    }

    /// Last concentration read, in ppm.
    pub fn last_ppm(&self) -> Option<u16> {
        self.last_ppm
    }

    pub fn status(&self) -> SensorStatus {
        self.status
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Gives back the interface and sink.
    pub fn release(self) -> (IF, S) {
        (self.interface, self.sink)
    }

    // --- State Helpers (Private) ---

    fn send_ppm_request(&mut self) -> Result<(), Co2Error<IF::Error>> {
        self.send_read(Command::GetPpm)?;
        log::debug!("Sent PPM request to {}", self.sensor_address);
        Ok(())
    }

    /// Time since the outstanding request went out, zero if there is none.
    fn elapsed(&self) -> Duration {
        match self.issued_at {
            Some(issued_at) => self.interface.now() - issued_at,
            None => Duration::ZERO,
        }
    }

    fn timed_out(&self) -> bool {
        !self.pending_command.is_none() && self.elapsed() > self.config.timeout
    }

    fn clear_pending(&mut self) {
        self.pending_command = Command::None;
        self.issued_at = None;
    }
}
