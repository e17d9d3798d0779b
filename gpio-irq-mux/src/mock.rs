//! Recording capabilities for unit tests.

use crate::capability::{Direction, GpioPeripheral, ParentIrq};
use crate::{LineId, PinId, TriggerLevel};
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

/// Calls observed on the capabilities. Status queries are reads and are not recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Initialize,
    SetDirection(PinId, Direction),
    SetTrigger(PinId, u8),
    EnableInterrupt(PinId),
    DisableInterrupt(PinId),
    ClearInterrupt(PinId),
    LineTrigger(LineId, TriggerLevel),
    LineEnable(LineId),
    LineDisable(LineId),
    Register(LineId),
    Callback,
}

/// Calls that fail instead of being recorded.
#[derive(Debug, Default)]
pub struct Faults {
    pub initialize: bool,
    pub direction: bool,
    pub direction_panics: bool,
    pub trigger: bool,
    pub line_trigger: bool,
    pub line_disable: bool,
    pub register: bool,
}

#[derive(Debug)]
pub struct Fault;

#[derive(Debug, Default)]
struct State {
    events: Vec<Event>,
    pending: Vec<PinId>,
    faults: Faults,
    line_enabled: bool,
    handler: Option<fn()>,
}

/// Shared view of both mock capabilities.
#[derive(Clone, Debug, Default)]
pub struct Bus(Arc<Mutex<State>>);

impl Bus {
    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    pub fn record(&self, event: Event) {
        self.state().events.push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn take_events(&self) -> Vec<Event> {
        core::mem::take(&mut self.state().events)
    }

    pub fn faults(&self, f: impl FnOnce(&mut Faults)) {
        f(&mut self.state().faults);
    }

    /// Latches an interrupt on `pin`.
    pub fn raise(&self, pin: PinId) {
        let mut state = self.state();
        if !state.pending.contains(&pin) {
            state.pending.push(pin);
        }
    }

    pub fn is_pending(&self, pin: PinId) -> bool {
        self.state().pending.contains(&pin)
    }

    pub fn line_enabled(&self) -> bool {
        self.state().line_enabled
    }

    pub fn handler(&self) -> Option<fn()> {
        self.state().handler
    }

    /// Records `event` unless `fault` selects a failure.
    fn call(&self, event: Event, fault: impl FnOnce(&Faults) -> bool) -> Result<(), Fault> {
        let mut state = self.state();
        if fault(&state.faults) {
            return Err(Fault);
        }
        state.events.push(event);
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockGpio(Bus);

impl MockGpio {
    pub fn new(bus: &Bus) -> Self {
        Self(bus.clone())
    }
}

impl GpioPeripheral for MockGpio {
    type Error = Fault;

    fn initialize(&mut self) -> Result<(), Fault> {
        self.0.call(Event::Initialize, |f| f.initialize)
    }

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), Fault> {
        if self.0.state().faults.direction_panics {
            panic!("pin {} direction register unreachable", pin);
        }
        self.0
            .call(Event::SetDirection(pin, direction), |f| f.direction)
    }

    fn set_trigger_encoding(&mut self, pin: PinId, code: u8) -> Result<(), Fault> {
        self.0.call(Event::SetTrigger(pin, code), |f| f.trigger)
    }

    fn enable_interrupt(&mut self, pin: PinId) {
        self.0.record(Event::EnableInterrupt(pin));
    }

    fn disable_interrupt(&mut self, pin: PinId) {
        self.0.record(Event::DisableInterrupt(pin));
    }

    fn interrupt_status(&self, pin: PinId) -> bool {
        self.0.is_pending(pin)
    }

    fn clear_interrupt(&mut self, pin: PinId) {
        let mut state = self.0.state();
        state.pending.retain(|&p| p != pin);
        state.events.push(Event::ClearInterrupt(pin));
    }
}

#[derive(Debug)]
pub struct MockParent(Bus);

impl MockParent {
    pub fn new(bus: &Bus) -> Self {
        Self(bus.clone())
    }

    /// Returns `true` if this parent records into `bus`.
    pub fn shares(&self, bus: &Bus) -> bool {
        Arc::ptr_eq(&self.0 .0, &bus.0)
    }
}

impl ParentIrq for MockParent {
    type Error = Fault;

    fn set_trigger_level(&mut self, line: LineId, level: TriggerLevel) -> Result<(), Fault> {
        self.0
            .call(Event::LineTrigger(line, level), |f| f.line_trigger)
    }

    fn enable(&mut self, line: LineId) -> Result<(), Fault> {
        self.0.call(Event::LineEnable(line), |_| false)?;
        self.0.state().line_enabled = true;
        Ok(())
    }

    fn disable(&mut self, line: LineId) -> Result<(), Fault> {
        self.0.call(Event::LineDisable(line), |f| f.line_disable)?;
        self.0.state().line_enabled = false;
        Ok(())
    }

    fn register_callback(&mut self, line: LineId, handler: fn()) -> Result<(), Fault> {
        self.0.call(Event::Register(line), |f| f.register)?;
        self.0.state().handler = Some(handler);
        Ok(())
    }
}
