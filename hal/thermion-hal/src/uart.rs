//! UART hardware abstractions
//!
//! Register-level trait for interrupt-driven UART transports. The I/O
//! engine moves bytes between these registers and its ring buffers; the
//! trait deliberately exposes single-register operations rather than
//! buffered reads/writes.

/// UART hardware register access
///
/// Implemented once per chip (and once per mock in host tests). Both the
/// interrupt handlers and the mainline hold shared references to the
/// implementing value.
pub trait UartHw {
    /// Clock frequency feeding the baud-rate generator, in Hz
    fn clock_hz(&self) -> u32;

    /// Apply control-register setup for the given configuration
    ///
    /// Enables the receiver, the transmitter and the receive-complete
    /// interrupt. The transmit-empty interrupt is left masked; the I/O
    /// engine arms it when output is queued.
    fn enable(&self, config: &UartConfig);

    /// Write the baud-rate divisor register
    ///
    /// Implementations must also clear the baud-doubler bit so the
    /// divisor arithmetic in the driver holds.
    fn set_baud_divisor(&self, divisor: u16);

    /// Read the receive data register
    ///
    /// Called exactly once per receive-complete interrupt.
    fn read_data(&self) -> u8;

    /// Write the transmit data register
    fn write_data(&self, byte: u8);

    /// Arm the transmit-register-empty interrupt
    fn enable_tx_interrupt(&self);

    /// Mask the transmit-register-empty interrupt
    fn disable_tx_interrupt(&self);

    /// Idle the processor until the next interrupt
    ///
    /// Used by blocking reads. This is a low-power wait, not a spin loop;
    /// there is no other task to yield to.
    fn idle(&self);
}

/// UART configuration applied at device-open time
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
