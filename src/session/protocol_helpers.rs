// src/session/protocol_helpers.rs

use super::{SensorStatus, Session};
use crate::common::{
    address::SensorAddr,
    command::Command,
    error::Co2Error,
    frame::ResponseHeader,
    hal_traits::{Co2Serial, Co2Sink, Co2Timer},
};
use core::fmt::Debug;

impl<IF, S> Session<IF, S>
where
    IF: Co2Serial + Co2Timer,
    IF::Error: Debug,
    S: Co2Sink,
{
    /// Runs when fewer bytes than a reply header are buffered.
    ///
    /// Lost reads are retried until `ppm_retry_limit`, then discovery starts at
    /// the broadcast address. Lost firmware reads move on to the address equal to the
    /// failure count until `scan_retry_limit`, then the sensor is reported
    /// missing and the session goes idle.
    pub(super) fn handle_timeout(&mut self) -> Result<(), Co2Error<IF::Error>> {
        if !self.timed_out() {
            return Ok(());
        }

        match self.pending_command {
            Command::GetPpm => {
                self.fail_count = self.fail_count.saturating_add(1);
                let drained = self.drain_input()?;
                log::debug!(
                    "PPM request to {} timed out, {} stray bytes dropped (failure {})",
                    self.sensor_address, drained, self.fail_count
                );
                if self.fail_count >= self.config.ppm_retry_limit {
                    self.fail_count = 0;
                    log::warn!("No reply from {}, scanning for the sensor", self.sensor_address);
                    return self.scan(SensorAddr::BROADCAST);
                }
                self.send_ppm_request()
            }
            Command::GetVersion => {
                self.fail_count = self.fail_count.saturating_add(1);
                let drained = self.drain_input()?;
                log::debug!(
                    "Firmware request to {} timed out, {} stray bytes dropped (failure {})",
                    self.sensor_address, drained, self.fail_count
                );
                if self.fail_count >= self.config.scan_retry_limit {
                    self.fail_count = 0;
                    self.clear_pending();
                    self.status = SensorStatus::NotFound;
                    log::error!("No T6713 found");
                    self.sink.sensor_not_found(self.sensor_address);
                    return Ok(());
                }
                self.scan(SensorAddr::new(self.fail_count))
            }
            _ => Ok(()),
        }
    }

    /// Interprets a reply header against the pending request.
    pub(super) fn handle_response(&mut self, header: ResponseHeader) -> Result<(), Co2Error<IF::Error>> {
        if header.address != self.sensor_address.as_u8() {
            return self.reject_frame(Some(header));
        }

        self.status = SensorStatus::Ok;

        match self.pending_command {
            Command::GetPpm => {
                let ppm = header.value();
                log::debug!("Received CO2={}ppm", ppm);
                self.fail_count = 0;
                self.last_ppm = Some(ppm);
                self.sink.publish_ppm(f32::from(ppm));
                self.clear_pending();
                Ok(())
            }
            Command::GetVersion => {
                log::info!("T6713 detected at {} (firmware {:#06x})", self.sensor_address, header.value());
                self.fail_count = 0;
                // Re-arms with a PPM read instead of going idle
                self.send_ppm_request()
            }
            other => {
                log::warn!(
                    "Unexpected response (function {:#04x}) while pending {:?}",
                    header.function_code, other
                );
                self.clear_pending();
                Ok(())
            }
        }
    }

    /// Throws away a reply that cannot belong to us and asks for a fresh reading.
    ///
    /// `None` means the header itself could not be read in full.
    pub(super) fn reject_frame(&mut self, header: Option<ResponseHeader>) -> Result<(), Co2Error<IF::Error>> {
        match header {
            Some(header) => log::warn!(
                "Got bad data from T6713! Address was {:#04x} and function was {:#04x}",
                header.address, header.function_code
            ),
            None => log::warn!("Got truncated reply from T6713"),
        }
        self.status = SensorStatus::Warning;
        self.drain_input()?;
        self.send_ppm_request()
    }
}
