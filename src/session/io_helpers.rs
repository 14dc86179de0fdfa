// src/session/io_helpers.rs

use super::Session;
use crate::common::{
    command::{Command, READ_INPUT_REGISTERS, SINGLE_REGISTER},
    error::Co2Error,
    frame::{build_read_request, ResponseHeader, RESPONSE_HEADER_LEN},
    hal_traits::{Co2Serial, Co2Sink, Co2Timer},
    timing,
};
use core::fmt::Debug;
use nb::Result as NbResult;

// Implementation block for I/O related helpers
impl<IF, S> Session<IF, S>
where
    IF: Co2Serial + Co2Timer,
    IF::Error: Debug,
    S: Co2Sink,
{
    /// Retries a non-blocking I/O operation (`f`) while it returns `WouldBlock`,
    /// giving up after [`timing::WRITE_RETRY_LIMIT`] attempts.
    pub(super) fn execute_bounded_io<FN, T>(&mut self, mut f: FN) -> Result<T, Co2Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        for _ in 0..timing::WRITE_RETRY_LIMIT {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(e)) => return Err(Co2Error::Io(e)),
            }
        }
        Err(Co2Error::WriteStalled)
    }

    /// Arms `command` as the pending request and sends the matching register read.
    ///
    /// State is recorded before writing, so a failed write leaves a request
    /// that the timeout path will retry.
    pub(super) fn send_read(&mut self, command: Command) -> Result<(), Co2Error<IF::Error>> {
        let Some(register) = command.read_register() else {
            return Err(Co2Error::InvalidFormat);
        };
        self.pending_command = command;
        self.issued_at = Some(self.interface.now());

        let frame = build_read_request(self.sensor_address, READ_INPUT_REGISTERS, register, SINGLE_REGISTER);
        self.send_frame(&frame)
    }

    /// Writes a complete frame and flushes it.
    pub(super) fn send_frame(&mut self, frame: &[u8]) -> Result<(), Co2Error<IF::Error>> {
        for byte in frame {
            self.execute_bounded_io(|iface| iface.write_byte(*byte))?;
        }
        self.execute_bounded_io(|iface| iface.flush())
    }

    /// Reads the five header bytes of a reply.
    ///
    /// Returns `Ok(None)` if the transport ran dry part-way through even though
    /// it reported enough bytes available.
    pub(super) fn read_header(&mut self) -> Result<Option<ResponseHeader>, Co2Error<IF::Error>> {
        let mut buffer = [0u8; RESPONSE_HEADER_LEN];
        for slot in buffer.iter_mut() {
            match self.interface.read_byte() {
                Ok(byte) => *slot = byte,
                Err(nb::Error::WouldBlock) => return Ok(None),
                Err(nb::Error::Other(e)) => return Err(Co2Error::Io(e)),
            }
        }
        Ok(Some(ResponseHeader::from(buffer)))
    }

    /// Discards buffered input until the transport reports nothing available,
    /// returning how many bytes were thrown away. Stops early after
    /// [`timing::DRAIN_LIMIT`] bytes.
    pub(super) fn drain_input(&mut self) -> Result<usize, Co2Error<IF::Error>> {
        let mut drained = 0;
        while drained < timing::DRAIN_LIMIT && self.interface.available().map_err(Co2Error::Io)? > 0 {
            match self.interface.read_byte() {
                Ok(_) => drained += 1,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(Co2Error::Io(e)),
            }
        }
        Ok(drained)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::mock::{MockCommError, MockInterface, RecordingSink};
    use super::*;

    fn session() -> Session<MockInterface, RecordingSink> {
        Session::new(MockInterface::new(), RecordingSink::default())
    }

    #[test]
    fn test_execute_bounded_io() {
        let mut session = session();

        // Ok after a few WouldBlocks
        let mut calls = 0;
        let result: Result<u8, _> = session.execute_bounded_io(|_| {
            calls += 1;
            if calls < 4 { Err(nb::Error::WouldBlock) } else { Ok(7) }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 4);

        // Gives up after the retry limit
        let mut calls = 0;
        let result: Result<(), _> = session.execute_bounded_io(|_| {
            calls += 1;
            Err(nb::Error::WouldBlock)
        });
        assert!(matches!(result, Err(Co2Error::WriteStalled)));
        assert_eq!(calls, timing::WRITE_RETRY_LIMIT);

        // I/O errors pass straight through
        let result: Result<(), _> = session.execute_bounded_io(|_| Err(nb::Error::Other(MockCommError)));
        assert!(matches!(result, Err(Co2Error::Io(MockCommError))));
    }

    #[test]
    fn test_send_read_needs_a_register() {
        let mut session = session();
        assert!(matches!(session.send_read(Command::GetSerial), Err(Co2Error::InvalidFormat)));
        assert_eq!(session.pending_command, Command::None);
        assert!(session.interface.written().is_empty());

        session.send_read(Command::GetVersion).unwrap();
        assert_eq!(session.pending_command, Command::GetVersion);
        assert_eq!(session.interface.written(), &[0x15, 0x04, 0x13, 0x89, 0x00, 0x01, 0xE7, 0xB0]);
    }

    #[test]
    fn test_send_frame_writes_and_flushes() {
        let mut session = session();
        session.send_frame(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(session.interface.written(), &[0x01, 0x02, 0x03]);
        assert_eq!(session.interface.flushes, 1);
    }

    #[test]
    fn test_read_header() {
        let mut session = session();
        session.interface.stage_read_data(&[0x15, 0x04, 0x02, 0x02, 0x58, 0x99]);
        let header = session.read_header().unwrap().unwrap();
        assert_eq!(header.address, 0x15);
        assert_eq!(header.value(), 600);
        assert_eq!(session.interface.pending_rx(), 1);
    }

    #[test]
    fn test_read_header_runs_dry() {
        let mut session = session();
        session.interface.stage_read_data(&[0x15, 0x04]);
        assert!(session.read_header().unwrap().is_none());
    }

    #[test]
    fn test_drain_input() {
        let mut session = session();
        session.interface.stage_read_data(&[0xAA; 10]);
        assert_eq!(session.drain_input().unwrap(), 10);
        assert_eq!(session.interface.pending_rx(), 0);
        assert_eq!(session.drain_input().unwrap(), 0);
    }

    #[test]
    fn test_drain_input_empties_a_full_buffer() {
        let mut session = session();
        session.interface.stage_read_data(&[0x55; 512]);
        assert_eq!(session.drain_input().unwrap(), 512);
        assert_eq!(session.interface.pending_rx(), 0);
    }

    #[test]
    fn test_drain_input_is_bounded() {
        let mut session = session();
        session.interface.endless_noise = true;
        assert_eq!(session.drain_input().unwrap(), timing::DRAIN_LIMIT);
    }
}
