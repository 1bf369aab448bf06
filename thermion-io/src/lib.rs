//! Extended device I/O for the Thermion controller family
//!
//! One uniform read/write/line-read interface over heterogeneous
//! transports (UART, SPI-slave), backed by lock-free ring buffers shared
//! with interrupt handlers. Higher layers (command parser, report
//! output) address devices through the [`registry::Registry`] by
//! [`device::DeviceId`] and never touch buffer internals.
//!
//! Concurrency model: a single core with no preemptive multitasking.
//! The only concurrent contexts are the mainline poll loop and the
//! per-transport interrupt handlers, and they communicate exclusively
//! through the ring buffers. Each ring index has exactly one writer
//! (RX: interrupt produces, mainline consumes; TX: the reverse), which
//! is the entire synchronization strategy.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod device;
pub mod line;
pub mod registry;
pub mod report;
#[allow(unsafe_code)] // SPSC ring storage is the one place raw slot access is required
pub mod ring;
pub mod spi;
pub mod uart;

// Re-export the collaborator-facing API at crate root
pub use device::{DeviceId, FlagChanges, Flags, Handle, IoError};
pub use line::{LineStatus, Terminator};
pub use registry::Registry;
pub use report::Console;
