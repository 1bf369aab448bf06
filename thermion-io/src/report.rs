//! Diagnostic line reports over the device layer
//!
//! The control loop and command layer print readouts and fault lines
//! through here rather than holding transport handles of their own. A
//! [`Console`] names which device carries routine output and which
//! carries exception reports (they may be the same device or different
//! ones, e.g. readouts on the UART console and faults to the bus
//! master).

use core::fmt;

use heapless::String;
use thermion_hal::spi::SpiSlaveHw;
use thermion_hal::uart::UartHw;

use crate::device::{Handle, IoError};
use crate::registry::Registry;

/// Longest report payload in bytes; anything longer is truncated
pub const REPORT_LINE_SIZE: usize = 80;

/// Fixed-capacity line assembly with truncation at capacity
struct LineBuf {
    buf: String<REPORT_LINE_SIZE>,
}

impl fmt::Write for LineBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.buf.push(c).is_err() {
                return Err(fmt::Error); // truncated, keep what fits
            }
        }
        Ok(())
    }
}

/// Default-device bindings for report output
#[derive(Debug, Clone, Copy)]
pub struct Console {
    out: Handle,
    err: Handle,
}

impl Console {
    pub fn new(out: Handle, err: Handle) -> Self {
        Self { out, err }
    }

    /// Device carrying routine readout lines
    pub fn out(&self) -> Handle {
        self.out
    }

    /// Device carrying exception reports
    pub fn err(&self) -> Handle {
        self.err
    }

    /// Announce startup on the readout device.
    pub fn initialized<U: UartHw, S: SpiSlaveHw>(
        &self,
        registry: &mut Registry<U, S>,
    ) -> Result<(), IoError> {
        registry.write_str(self.out, "\nDevice Initialized\n")
    }

    /// Format and queue one readout line (newline appended).
    pub fn line<U: UartHw, S: SpiSlaveHw>(
        &self,
        registry: &mut Registry<U, S>,
        args: fmt::Arguments,
    ) -> Result<(), IoError> {
        emit(registry, self.out, args)
    }

    /// Queue an exception report on the error device.
    ///
    /// Transport overflow is reported upward but never escalates; a
    /// dropped report must not take the controller down with it.
    pub fn exception<U: UartHw, S: SpiSlaveHw>(
        &self,
        registry: &mut Registry<U, S>,
        msg: &str,
    ) -> Result<(), IoError> {
        emit(registry, self.err, format_args!("exc: {}", msg))
    }
}

fn emit<U: UartHw, S: SpiSlaveHw>(
    registry: &mut Registry<U, S>,
    handle: Handle,
    args: fmt::Arguments,
) -> Result<(), IoError> {
    let mut line = LineBuf { buf: String::new() };
    let _ = fmt::write(&mut line, args); // over-long output truncates
    registry.write_str(handle, &line.buf)?;
    registry.putc(handle, b'\n')
}
