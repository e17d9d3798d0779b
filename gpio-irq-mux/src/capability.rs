//! Capabilities consumed by the multiplexer.
//!
//! Platform crates implement these traits for their GPIO block and for the interrupt
//! controller that owns the shared line.

use crate::{LineId, PinId, TriggerLevel};
use core::fmt::Debug;

/// Pin direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

/// GPIO block whose pin interrupts are multiplexed onto one line.
///
/// The interrupt enable, disable, status and clear primitives are plain register accesses
/// and are called from interrupt context. They must not block.
pub trait GpioPeripheral {
    /// Error reported when the peripheral rejects a configuration call.
    type Error: Debug;

    /// Brings the peripheral into a usable state.
    ///
    /// Called once by [`Multiplexer::init`](crate::Multiplexer::init) before anything else.
    #[inline]
    fn initialize(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Sets the direction of `pin`.
    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), Self::Error>;

    /// Writes the raw interrupt type code of `pin`.
    fn set_trigger_encoding(&mut self, pin: PinId, code: u8) -> Result<(), Self::Error>;

    /// Unmasks the interrupt of `pin`.
    fn enable_interrupt(&mut self, pin: PinId);

    /// Masks the interrupt of `pin`.
    fn disable_interrupt(&mut self, pin: PinId);

    /// Returns `true` if `pin` has a pending interrupt.
    fn interrupt_status(&self, pin: PinId) -> bool;

    /// Acknowledges the pending interrupt of `pin`.
    fn clear_interrupt(&mut self, pin: PinId);
}

/// Interrupt controller that delivers the shared line.
pub trait ParentIrq {
    /// Error reported when the controller rejects a call.
    type Error: Debug;

    /// Configures how the controller senses `line`.
    fn set_trigger_level(&mut self, line: LineId, level: TriggerLevel) -> Result<(), Self::Error>;

    /// Unmasks `line` at the controller.
    fn enable(&mut self, line: LineId) -> Result<(), Self::Error>;

    /// Masks `line` at the controller. The multiplexer relies on this to keep dispatch
    /// out while it edits the slot table.
    fn disable(&mut self, line: LineId) -> Result<(), Self::Error>;

    /// Installs `handler` as the routine run whenever `line` fires.
    fn register_callback(&mut self, line: LineId, handler: fn()) -> Result<(), Self::Error>;
}
