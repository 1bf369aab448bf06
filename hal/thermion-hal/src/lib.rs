//! Thermion Hardware Abstraction Layer
//!
//! This crate defines the register-level traits the device I/O engine
//! drives. Chip-specific HALs implement them against real peripherals;
//! host tests implement them against mocks. This keeps the buffering,
//! line-reading and protocol logic identical across targets.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Command / report layers                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermion-io (device registry, buffers) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermion-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip HAL     │       │  test mocks   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartHw`] - UART data/baud/interrupt-mask registers
//! - [`spi::SpiSlaveHw`] - SPI slave data and output-latch registers
//!
//! All trait methods take `&self`: the same hardware handle is shared
//! between interrupt handlers and the mainline, and peripheral registers
//! are interior-mutable by nature. Implementations intended for use with
//! a concurrent interrupt context must be `Sync`.

#![no_std]
#![deny(unsafe_code)]

pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use spi::{SpiSlaveConfig, SpiSlaveHw};
pub use uart::{UartConfig, UartHw};
