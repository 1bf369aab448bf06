//! Device registry - the single entry point used by higher layers
//!
//! Dispatches by [`DeviceId`] to the bound transport ports. The registry
//! owns all mainline per-device state (flags, line assembly, flow
//! control) and borrows the shared ports, whose ring buffers are the
//! only state the interrupt context touches. It is constructed by the
//! application root and passed by reference to collaborators; there is
//! no ambient global device table.

use thermion_hal::spi::{SpiSlaveConfig, SpiSlaveHw};
use thermion_hal::uart::{UartConfig, UartHw};

use crate::device::{DeviceId, FlagChanges, Flags, Handle, IoError};
use crate::line::{FeedResult, LineReader, LineStatus, Terminator, CR, LF};
use crate::spi::SpiSlavePort;
use crate::uart::{FlowState, UartPort};

/// Mainline-exclusive state for one device
struct DeviceState {
    flags: Flags,
    line: LineReader,
    flow: FlowState,
}

impl DeviceState {
    fn new(terminator: Terminator) -> Self {
        Self {
            flags: Flags::default(),
            line: LineReader::new(terminator),
            flow: FlowState::default(),
        }
    }
}

/// Fixed collection of device records, indexed by [`DeviceId`]
pub struct Registry<'a, U: UartHw, S: SpiSlaveHw> {
    uart_port: &'a UartPort<U>,
    spi_port: &'a SpiSlavePort<S>,
    uart: DeviceState,
    spi: DeviceState,
    uart_config: UartConfig,
    spi_config: SpiSlaveConfig,
}

impl<'a, U: UartHw, S: SpiSlaveHw> Registry<'a, U, S> {
    /// Bind the registry to its transport ports.
    ///
    /// Devices still need `open` before use; hardware is not touched
    /// here.
    pub fn new(uart_port: &'a UartPort<U>, spi_port: &'a SpiSlavePort<S>) -> Self {
        Self {
            uart_port,
            spi_port,
            uart: DeviceState::new(Terminator::CrOrLf),
            spi: DeviceState::new(Terminator::LfOnly),
            uart_config: UartConfig::default(),
            spi_config: SpiSlaveConfig::default(),
        }
    }

    /// Open (or re-open) a device.
    ///
    /// Resets both ring buffers and all line/flow state, applies the
    /// full flag set and runs the transport's hardware setup. Idempotent;
    /// a re-open discards unread and unsent bytes.
    pub fn open(&mut self, id: DeviceId, flags: Flags) -> Handle {
        match id {
            DeviceId::Uart0 => {
                self.uart.flags = flags;
                self.uart.line.reset();
                self.uart.flow = FlowState::default();
                self.uart_port.open(&self.uart_config);
            }
            DeviceId::Spi0 => {
                self.spi.flags = flags;
                self.spi.line.reset();
                self.spi_port.open(&self.spi_config);
            }
        }
        Handle(id)
    }

    /// Set or clear behavior flags without touching buffered data.
    pub fn ctrl(&mut self, handle: Handle, changes: &FlagChanges) {
        match handle.id() {
            DeviceId::Uart0 => self.uart.flags.apply(changes),
            DeviceId::Spi0 => self.spi.flags.apply(changes),
        }
    }

    /// Read one byte.
    ///
    /// UART: empty + blocking idles the core until the next interrupt;
    /// empty + non-blocking returns [`IoError::WouldBlock`]. A byte read
    /// with echo enabled is queued back out the same device, and in line
    /// mode CR/LF normalize to `\n`.
    ///
    /// SPI: a thin ring pop - reads are always interrupt-driven, so the
    /// blocking, echo and line-mode flags do not apply.
    pub fn getc(&mut self, handle: Handle) -> Result<u8, IoError> {
        match handle.id() {
            DeviceId::Uart0 => self.getc_uart(),
            DeviceId::Spi0 => self.spi_port.rx.read().ok_or(IoError::WouldBlock),
        }
    }

    fn getc_uart(&mut self) -> Result<u8, IoError> {
        let port = self.uart_port;
        let state = &mut self.uart;

        let byte = loop {
            match port.rx.read() {
                Some(b) => break b,
                None => {
                    if !state.flags.blocking {
                        return Err(IoError::WouldBlock);
                    }
                    port.hw().idle();
                }
            }
        };

        if state.flags.xon_xoff {
            port.flow_control(&mut state.flow);
        }
        if state.flags.echo {
            let _ = port.putc(byte);
        }
        if state.flags.line_mode && (byte == CR || byte == LF) {
            return Ok(LF);
        }
        Ok(byte)
    }

    /// Queue one byte for transmission. Always non-blocking; a full TX
    /// ring drops the byte and reports [`IoError::Overflow`].
    pub fn putc(&mut self, handle: Handle, byte: u8) -> Result<(), IoError> {
        match handle.id() {
            DeviceId::Uart0 => self.uart_port.putc(byte),
            DeviceId::Spi0 => self.spi_port.putc(byte),
        }
    }

    /// Non-blocking line reader.
    ///
    /// Drains whatever input is available into `dest`, resuming a
    /// partial line from earlier calls (pass the same `dest` until the
    /// line completes). The line-mode flag is ignored: `gets` is always
    /// line oriented. UART echoes drained bytes when echo is enabled;
    /// the SPI channel never echoes (output there is answer data, not a
    /// terminal).
    pub fn gets(&mut self, handle: Handle, dest: &mut [u8]) -> LineStatus {
        match handle.id() {
            DeviceId::Uart0 => self.gets_uart(dest),
            DeviceId::Spi0 => self.gets_spi(dest),
        }
    }

    fn gets_uart(&mut self, dest: &mut [u8]) -> LineStatus {
        let port = self.uart_port;
        let state = &mut self.uart;
        loop {
            let byte = match port.rx.read() {
                Some(b) => b,
                None => return LineStatus::Again,
            };
            if state.flags.echo {
                let _ = port.putc(byte);
            }
            match state.line.feed(byte, dest) {
                FeedResult::Pending => {}
                FeedResult::Complete(len) => return LineStatus::Complete(len),
                FeedResult::Overflow => return LineStatus::Overflow,
            }
        }
    }

    fn gets_spi(&mut self, dest: &mut [u8]) -> LineStatus {
        let port = self.spi_port;
        let state = &mut self.spi;
        loop {
            let byte = match port.rx.read() {
                Some(b) => b,
                None => return LineStatus::Again,
            };
            match state.line.feed(byte, dest) {
                FeedResult::Pending => {}
                FeedResult::Complete(len) => return LineStatus::Complete(len),
                FeedResult::Overflow => return LineStatus::Overflow,
            }
        }
    }

    /// Change the baud rate of a UART device.
    ///
    /// The new rate also survives subsequent re-opens. Transports
    /// without a baud register report [`IoError::NoSuchDevice`].
    pub fn set_baud(&mut self, handle: Handle, baud: u32) -> Result<(), IoError> {
        match handle.id() {
            DeviceId::Uart0 => {
                self.uart_config.baudrate = baud;
                self.uart_port.set_baud(baud);
                Ok(())
            }
            DeviceId::Spi0 => Err(IoError::NoSuchDevice),
        }
    }

    /// Queue a whole string, stopping at the first dropped byte.
    pub fn write_str(&mut self, handle: Handle, s: &str) -> Result<(), IoError> {
        for &byte in s.as_bytes() {
            self.putc(handle, byte)?;
        }
        Ok(())
    }
}
