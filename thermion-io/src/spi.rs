//! SPI slave transport driver
//!
//! The controller is always the SPI slave: the external master initiates
//! every byte exchange and each exchange is simultaneously bidirectional
//! (one byte in on MOSI, one byte out on MISO). The slave has no way to
//! request a transfer, so output simply piggybacks on whatever exchanges
//! the master clocks.
//!
//! Wire protocol:
//!
//! - A message is a line of text terminated by LF. CR is not a record
//!   separator here - a CR in a message is ordinary payload.
//! - NUL (0x00) is never transmitted in either direction.
//! - When the TX ring has nothing queued the slave answers [`NO_DATA`],
//!   which distinguishes an empty slave from an unresponsive one (those
//!   would shift out NULs or 0xFF).
//! - The master may send [`POLL`] bytes purely to solicit output; the
//!   slave discards them as input and returns queued output as usual.
//!   "No data available" is explicit on the wire, which is why the
//!   protocol tolerates a master that polls aggressively.

use thermion_hal::spi::{SpiSlaveConfig, SpiSlaveHw};

use crate::device::IoError;
use crate::line::NUL;
use crate::ring::RingBuffer;

/// RX ring slot count (usable capacity is one less)
pub const SPI_RX_BUFFER_SIZE: usize = 64;
/// TX ring slot count (usable capacity is one less)
pub const SPI_TX_BUFFER_SIZE: usize = 64;

/// Returned on MISO when the TX ring is empty (ASCII ETX)
pub const NO_DATA: u8 = 0x03;
/// Sent by the master to solicit output without contributing input
/// (ASCII STX)
pub const POLL: u8 = 0x02;

/// An SPI slave transport instance: hardware handle plus RX/TX rings.
///
/// Same sharing rules as the UART port: every method takes `&self`, and
/// the interrupt context is the only hardware-facing byte mover.
pub struct SpiSlavePort<H: SpiSlaveHw> {
    hw: H,
    pub(crate) rx: RingBuffer<SPI_RX_BUFFER_SIZE>,
    pub(crate) tx: RingBuffer<SPI_TX_BUFFER_SIZE>,
}

impl<H: SpiSlaveHw> SpiSlavePort<H> {
    pub fn new(hw: H) -> Self {
        Self {
            hw,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
        }
    }

    /// Hardware handle (register access for the application's ISR glue)
    pub fn hw(&self) -> &H {
        &self.hw
    }

    /// Transfer-complete interrupt handler, once per byte exchange.
    ///
    /// Stages the next TX byte (or [`NO_DATA`]) for the exchange the
    /// master clocks next, and files the received byte unless it was a
    /// [`POLL`] or a NUL. A full RX ring discards the byte silently.
    pub fn on_transfer_interrupt(&self) {
        let received = self.hw.read_data();

        let out = match self.tx.read() {
            Some(byte) => byte,
            None => NO_DATA,
        };
        self.hw.stage_output(out);

        if received != POLL && received != NUL {
            let _ = self.rx.write(received);
        }
    }

    /// Open-time reset and hardware setup.
    ///
    /// The master may clock an exchange before anything is queued, so a
    /// [`NO_DATA`] is staged immediately.
    pub(crate) fn open(&self, config: &SpiSlaveConfig) {
        self.rx.reset();
        self.tx.reset();
        self.hw.enable(config);
        self.hw.stage_output(NO_DATA);
    }

    /// Queue a byte for piggyback transmission on upcoming exchanges.
    ///
    /// Thin wrapper over the TX ring; there is no interrupt to arm
    /// because only the master can cause a transfer.
    pub(crate) fn putc(&self, byte: u8) -> Result<(), IoError> {
        self.tx.write(byte).map_err(|_| IoError::Overflow)
    }
}
