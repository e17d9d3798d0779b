//! GPIO interrupt multiplexer.
//!
//! Shares one parent interrupt line among the interrupts of several GPIO pins. Pins are
//! armed into a fixed [`SlotTable`]; when the line fires, [`Multiplexer::dispatch`]
//! finds the first armed pin with a pending interrupt, acknowledges it, runs the user
//! callback and re-arms the pin.
//!
//! The GPIO block and the parent interrupt controller are provided by the platform
//! through the [`GpioPeripheral`] and [`ParentIrq`] traits. The `mext-backend` and
//! `sext-backend` features provide a [`ParentIrq`] for the RISC-V external interrupt.
#![cfg_attr(not(test), no_std)]

pub mod capability;
mod error;
pub mod export;
#[cfg(any(feature = "mext-backend", feature = "sext-backend"))]
pub mod external;
#[cfg(test)]
mod mock;
mod mux;
pub mod slots;
mod trigger;

pub use capability::{Direction, GpioPeripheral, ParentIrq};
pub use error::{Capability, Error};
pub use mux::{Config, Multiplexer};
pub use slots::SlotTable;
pub use trigger::TriggerLevel;

/// Re-export of codegen macro.
pub use gpio_irq_mux_macros::codegen;

/// Identifier of a multiplexed GPIO pin.
pub type PinId = u16;

/// Identifier of a parent interrupt line.
pub type LineId = u32;
