// src/session/mock.rs

//! Test doubles for the serial link, clock and measurement sink.

use crate::common::{
    address::SensorAddr,
    hal_traits::{Co2Serial, Co2Sink, Co2Timer},
};
use core::time::Duration;
use heapless::{Deque, Vec};

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(u64);

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

// --- Mock Interface ---
pub(crate) struct MockInterface {
    current_time_us: u64,
    rx: Deque<u8, 512>,
    tx: Vec<u8, 512>,
    pub flushes: u32,
    /// Extra bytes `available()` claims beyond what can be read.
    pub available_bias: usize,
    pub stall_writes: bool,
    pub fail_available: bool,
    /// Line never goes quiet: reads always yield a byte once `rx` is empty.
    pub endless_noise: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            current_time_us: 0,
            rx: Deque::new(),
            tx: Vec::new(),
            flushes: 0,
            available_bias: 0,
            stall_writes: false,
            fail_available: false,
            endless_noise: false,
        }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.current_time_us = self.current_time_us.saturating_add(ms * 1000);
    }

    /// Appends bytes to the receive queue, as if the sensor sent them.
    pub fn stage_read_data(&mut self, data: &[u8]) {
        for byte in data {
            self.rx.push_back(*byte).expect("mock rx queue full");
        }
    }

    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    pub fn clear_written(&mut self) {
        self.tx.clear();
    }
}

impl Co2Timer for MockInterface {
    type Instant = MockInstant;
    fn now(&self) -> Self::Instant {
        MockInstant(self.current_time_us)
    }
}

impl Co2Serial for MockInterface {
    type Error = MockCommError;

    fn available(&mut self) -> Result<usize, Self::Error> {
        if self.fail_available {
            return Err(MockCommError);
        }
        if self.endless_noise {
            return Ok(self.rx.len().max(1));
        }
        Ok(self.rx.len() + self.available_bias)
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        match self.rx.pop_front() {
            Some(byte) => Ok(byte),
            None if self.endless_noise => Ok(0xFF),
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.stall_writes {
            return Err(nb::Error::WouldBlock);
        }
        self.tx.push(byte).map_err(|_| nb::Error::Other(MockCommError))
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

// --- Recording Sink ---
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub published: Vec<f32, 16>,
    pub not_found: u32,
    pub last_tried: Option<SensorAddr>,
}

impl Co2Sink for RecordingSink {
    fn publish_ppm(&mut self, ppm: f32) {
        self.published.push(ppm).expect("recording sink full");
    }

    fn sensor_not_found(&mut self, last_tried: SensorAddr) {
        self.not_found += 1;
        self.last_tried = Some(last_tried);
    }
}
