//! Device identities, behavior flags and the I/O error taxonomy
//!
//! Transports form a closed set known at build time; everything above the
//! registry addresses them by [`DeviceId`] or the opaque [`Handle`] that
//! `open` returns.

/// Transport instances available on this controller
///
/// Count and order are compile-time constants. Adding a transport means
/// adding a variant here and a port binding in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceId {
    /// Primary UART (command console)
    Uart0,
    /// SPI slave channel to the bus master
    Spi0,
}

/// Opaque stream handle returned by `open`
///
/// All collaborator-facing calls take a handle; callers never see ring
/// buffer internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Handle(pub(crate) DeviceId);

impl Handle {
    /// Device this handle refers to
    pub fn id(&self) -> DeviceId {
        self.0
    }
}

/// Device behavior flags, applied as a full set by `open`
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags {
    /// Suspend `getc` until data arrives instead of returning `WouldBlock`
    pub blocking: bool,
    /// Echo every byte read back out the same device
    pub echo: bool,
    /// Normalize line terminators to `\n` on reads
    pub line_mode: bool,
    /// XON/XOFF software flow control (UART only)
    pub xon_xoff: bool,
}

impl Flags {
    /// Apply an incremental change set from `ctrl`
    pub fn apply(&mut self, changes: &FlagChanges) {
        if let Some(v) = changes.blocking {
            self.blocking = v;
        }
        if let Some(v) = changes.echo {
            self.echo = v;
        }
        if let Some(v) = changes.line_mode {
            self.line_mode = v;
        }
        if let Some(v) = changes.xon_xoff {
            self.xon_xoff = v;
        }
    }
}

/// Incremental flag changes consumed by `ctrl`
///
/// `None` leaves a flag untouched. This replaces the legacy paired
/// set/clear control bits with one field per flag.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlagChanges {
    pub blocking: Option<bool>,
    pub echo: Option<bool>,
    pub line_mode: Option<bool>,
    pub xon_xoff: Option<bool>,
}

/// Conditions returned by device I/O operations
///
/// None of these unwind or abort; the poll loop decides whether to retry
/// next tick, reset line state, or drop data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// No data yet - the expected steady-state condition under
    /// non-blocking polling, not a failure
    WouldBlock,
    /// Producer-side ring buffer full; the byte was dropped
    Overflow,
    /// Operation targets a device that does not provide it
    /// (e.g. setting a baud rate on the SPI slave)
    NoSuchDevice,
}
