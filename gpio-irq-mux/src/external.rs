//! RISC-V external interrupt as the parent line.
//!
//! With `mext-backend` the line is the machine external interrupt (`mie.MEIE`), with
//! `sext-backend` the supervisor external interrupt (`sie.SEIE`). The hart exposes a
//! single external line, so [`LINE`] is the only valid line id.

use crate::capability::ParentIrq;
use crate::{LineId, TriggerLevel};
use core::cell::Cell;
use critical_section::Mutex;

/// Line id of the hart external interrupt.
pub const LINE: LineId = 0;

/// Handler installed by [`ParentIrq::register_callback`].
static HANDLER: Mutex<Cell<Option<fn()>>> = Mutex::new(Cell::new(None));

/// Error returned by [`ExternalLine`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineError {
    /// The hart has no such external line.
    UnknownLine(LineId),
    /// The core line only forwards active-high requests from the external controller.
    UnsupportedTrigger(TriggerLevel),
}

/// The external interrupt line of the current hart.
#[derive(Debug, Default)]
pub struct ExternalLine;

impl ExternalLine {
    fn check(line: LineId) -> Result<(), LineError> {
        match line {
            LINE => Ok(()),
            _ => Err(LineError::UnknownLine(line)),
        }
    }
}

impl ParentIrq for ExternalLine {
    type Error = LineError;

    fn set_trigger_level(&mut self, line: LineId, level: TriggerLevel) -> Result<(), LineError> {
        Self::check(line)?;
        match level {
            TriggerLevel::EdgeRising | TriggerLevel::LevelHigh => Ok(()),
            _ => Err(LineError::UnsupportedTrigger(level)),
        }
    }

    fn enable(&mut self, line: LineId) -> Result<(), LineError> {
        Self::check(line)?;
        unsafe { hart::enable() };
        Ok(())
    }

    fn disable(&mut self, line: LineId) -> Result<(), LineError> {
        Self::check(line)?;
        unsafe { hart::disable() };
        Ok(())
    }

    fn register_callback(&mut self, line: LineId, handler: fn()) -> Result<(), LineError> {
        Self::check(line)?;
        critical_section::with(|cs| HANDLER.borrow(cs).set(Some(handler)));
        Ok(())
    }
}

/// Runs the registered handler, if any.
#[inline]
fn run_handler() {
    if let Some(handler) = critical_section::with(|cs| HANDLER.borrow(cs).get()) {
        handler();
    }
}

#[cfg(feature = "mext-backend")]
mod hart {
    /// Sets `mie.MEIE`.
    #[inline]
    pub unsafe fn enable() {
        riscv::register::mie::set_mext();
    }

    /// Clears `mie.MEIE`.
    #[inline]
    pub unsafe fn disable() {
        riscv::register::mie::clear_mext();
    }

    /// Machine external interrupt handler.
    #[no_mangle]
    #[allow(non_snake_case)]
    pub unsafe extern "C" fn MachineExternal() {
        super::run_handler();
    }
}

#[cfg(feature = "sext-backend")]
mod hart {
    /// Sets `sie.SEIE`.
    #[inline]
    pub unsafe fn enable() {
        riscv::register::sie::set_sext();
    }

    /// Clears `sie.SEIE`.
    #[inline]
    pub unsafe fn disable() {
        riscv::register::sie::clear_sext();
    }

    /// Supervisor external interrupt handler.
    #[no_mangle]
    #[allow(non_snake_case)]
    pub unsafe extern "C" fn SupervisorExternal() {
        super::run_handler();
    }
}
