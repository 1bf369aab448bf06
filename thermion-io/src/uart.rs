//! UART transport driver
//!
//! Binds a [`UartHw`] implementation to a pair of ring buffers. The
//! interrupt handlers are the only hardware-facing byte movers: RX
//! receive-complete produces into the RX ring, TX register-empty
//! consumes from the TX ring and masks itself when the ring drains.
//! Everything the mainline does goes through the rings.

use thermion_hal::uart::{UartConfig, UartHw};

use crate::device::IoError;
use crate::ring::RingBuffer;

/// RX ring slot count (usable capacity is one less)
pub const UART_RX_BUFFER_SIZE: usize = 128;
/// TX ring slot count (usable capacity is one less)
pub const UART_TX_BUFFER_SIZE: usize = 128;

/// XON control byte (DC1) - resume transmission
pub const XON: u8 = 0x11;
/// XOFF control byte (DC3) - pause transmission
pub const XOFF: u8 = 0x13;

/// RX occupancy above which an XOFF is sent
const RX_HI_WATER_MARK: usize = (UART_RX_BUFFER_SIZE - 1) * 3 / 4;
/// RX occupancy below which a pending XOFF is lifted with an XON
const RX_LO_WATER_MARK: usize = (UART_RX_BUFFER_SIZE - 1) / 4;

/// XON/XOFF pause state, owned by the mainline consumer
#[derive(Debug, Default)]
pub struct FlowState {
    paused: bool,
}

/// A UART transport instance: hardware handle plus RX/TX rings.
///
/// All methods take `&self` so the interrupt context and the mainline
/// can share one reference; the single-writer-per-index rule of
/// [`RingBuffer`] is what keeps that sound. `UartPort` is `Sync` when
/// the hardware handle is.
pub struct UartPort<H: UartHw> {
    hw: H,
    pub(crate) rx: RingBuffer<UART_RX_BUFFER_SIZE>,
    pub(crate) tx: RingBuffer<UART_TX_BUFFER_SIZE>,
}

impl<H: UartHw> UartPort<H> {
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

    /// Receive-complete interrupt handler.
    ///
    /// Reads the data register once and files the byte. On a full RX
    /// ring the byte is discarded silently - there is no retransmit
    /// mechanism at this layer.
    pub fn on_rx_interrupt(&self) {
        let byte = self.hw.read_data();
        let _ = self.rx.write(byte);
    }

    /// Transmit-register-empty interrupt handler.
    ///
    /// Sends the next queued byte, or masks the interrupt when the TX
    /// ring is drained (the next `putc` re-arms it).
    pub fn on_tx_interrupt(&self) {
        match self.tx.read() {
            Some(byte) => self.hw.write_data(byte),
            None => self.hw.disable_tx_interrupt(),
        }
    }

    /// Open-time reset and hardware setup.
    ///
    /// Masks the TX interrupt before touching the rings so both sides
    /// are quiescent for the reset.
    pub(crate) fn open(&self, config: &UartConfig) {
        self.hw.disable_tx_interrupt();
        self.rx.reset();
        self.tx.reset();
        self.hw.enable(config);
        self.set_baud(config.baudrate);
    }

    /// Write the divisor for `baud` to the baud-rate register
    pub(crate) fn set_baud(&self, baud: u32) {
        self.hw.set_baud_divisor(baud_divisor(self.hw.clock_hz(), baud));
    }

    /// Queue a byte for interrupt-driven transmission.
    ///
    /// Never blocks; a full TX ring drops the byte and reports
    /// [`IoError::Overflow`]. Re-arms the TX interrupt in case it had
    /// masked itself after draining.
    pub(crate) fn putc(&self, byte: u8) -> Result<(), IoError> {
        self.tx.write(byte).map_err(|_| IoError::Overflow)?;
        self.hw.enable_tx_interrupt();
        Ok(())
    }

    /// XON/XOFF watermark check, run after each successful RX pop.
    ///
    /// Sends XOFF once when occupancy crosses the high watermark and
    /// lifts it with XON once drained below the low watermark. A full
    /// TX ring postpones the control byte to a later crossing check.
    pub(crate) fn flow_control(&self, state: &mut FlowState) {
        let count = self.rx.len();
        if !state.paused && count > RX_HI_WATER_MARK {
            if self.putc(XOFF).is_ok() {
                state.paused = true;
            }
        } else if state.paused && count < RX_LO_WATER_MARK {
            if self.putc(XON).is_ok() {
                state.paused = false;
            }
        }
    }
}

/// Baud-rate divisor: `clock_hz / (8 × baud) − 1`, rounding toward zero.
///
/// `baud` must be non-zero. The hardware runs with the baud-doubler bit
/// cleared, which is what the factor of 8 assumes.
pub fn baud_divisor(clock_hz: u32, baud: u32) -> u16 {
    (clock_hz / (8 * baud) - 1) as u16
}
