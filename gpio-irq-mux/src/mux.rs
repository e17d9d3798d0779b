use crate::capability::{Direction, GpioPeripheral, ParentIrq};
use crate::error::{Capability, Error};
use crate::slots::SlotTable;
use crate::{LineId, PinId, TriggerLevel};
use core::fmt::{self, Debug};
use log::{debug, trace, warn};

/// Construction parameters of a [`Multiplexer`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Parent line shared by all the multiplexed pins.
    pub line: LineId,
    /// Routine registered with the parent controller. It must reach the multiplexer and
    /// call [`Multiplexer::dispatch`].
    pub dispatcher: fn(),
}

/// Logs a rejected configuration call and maps it to [`Error::CapabilityConfigFailure`].
fn rejected<E: Debug>(capability: Capability, err: E) -> Error {
    warn!("{:?} rejected configuration: {:?}", capability, err);
    Error::CapabilityConfigFailure(capability)
}

/// Shares one parent interrupt line among the interrupts of up to `N` GPIO pins.
pub struct Multiplexer<P, G, F, const N: usize>
where
    P: ParentIrq,
    G: GpioPeripheral,
    F: FnMut(),
{
    parent: P,
    gpio: G,
    line: LineId,
    slots: SlotTable<N>,
    /// Called once per serviced pin.
    callback: F,
}

impl<P, G, F, const N: usize> Multiplexer<P, G, F, N>
where
    P: ParentIrq,
    G: GpioPeripheral,
    F: FnMut(),
{
    /// Initializes the GPIO peripheral and takes over the parent line.
    ///
    /// The line is configured for rising edges, enabled, and `config.dispatcher` is
    /// registered as its handler. If the registration fails, the line is disabled again
    /// before returning.
    pub fn init(mut parent: P, mut gpio: G, config: Config, callback: F) -> Result<Self, Error> {
        let line = config.line;

        gpio.initialize().map_err(|err| rejected(Capability::Gpio, err))?;
        parent
            .set_trigger_level(line, TriggerLevel::EdgeRising)
            .map_err(|err| rejected(Capability::Parent, err))?;
        parent.enable(line).map_err(|err| rejected(Capability::Parent, err))?;
        if let Err(err) = parent.register_callback(line, config.dispatcher) {
            // an enabled line without a handler would fire into nothing
            if let Err(disable_err) = parent.disable(line) {
                warn!("line {} left enabled: {:?}", line, disable_err);
            }
            return Err(rejected(Capability::Parent, err));
        }

        debug!("multiplexer on line {} ready with {} slots", line, N);
        Ok(Self {
            parent,
            gpio,
            line,
            slots: SlotTable::new(),
            callback,
        })
    }

    /// Arms the interrupt of `pin`.
    ///
    /// A slot is reserved before the peripheral is touched: a full table leaves the pin
    /// untouched, and a rejected direction change gives the slot back. Enabling a pin that
    /// is already armed does nothing.
    pub fn enable(&mut self, pin: PinId) -> Result<(), Error> {
        self.masked(|gpio, slots| -> Result<(), Error> {
            if let Some(slot) = slots.find(pin) {
                debug!("pin {} already armed in slot {}", pin, slot);
                return Ok(());
            }
            let slot = slots.allocate(pin).map_err(|_| {
                warn!("no free slot for pin {}", pin);
                Error::SlotTableFull
            })?;
            if let Err(err) = gpio.set_direction(pin, Direction::Input) {
                slots.release(pin);
                return Err(rejected(Capability::Gpio, err));
            }
            gpio.enable_interrupt(pin);
            debug!("pin {} armed in slot {}", pin, slot);
            Ok(())
        })?
    }

    /// Disarms the interrupt of `pin` and frees its slot.
    ///
    /// Disabling a pin that is not armed only masks it at the peripheral.
    pub fn disable(&mut self, pin: PinId) {
        let disarm = |gpio: &mut G, slots: &mut SlotTable<N>| {
            gpio.disable_interrupt(pin);
            slots.release(pin)
        };
        // Unmasked fallback if the parent refuses: the pin must go quiet regardless.
        let released = match self.masked(disarm) {
            Ok(released) => released,
            Err(_) => disarm(&mut self.gpio, &mut self.slots),
        };
        match released {
            Some(slot) => debug!("pin {} disarmed, slot {} free", pin, slot),
            None => debug!("pin {} was not armed", pin),
        }
    }

    /// Sets the trigger level of `pin`. The pin does not need to be armed.
    pub fn trigger_level_set(&mut self, pin: PinId, level: TriggerLevel) -> Result<(), Error> {
        self.gpio
            .set_trigger_encoding(pin, level.hw_code())
            .map_err(|err| rejected(Capability::Gpio, err))?;
        debug!("pin {} trigger set to {:?}", pin, level);
        Ok(())
    }

    /// Services the shared line. Runs in interrupt context.
    ///
    /// The first armed pin with a pending interrupt is masked and acknowledged, the
    /// callback runs, and the pin is unmasked again. Returns the serviced pin.
    pub fn dispatch(&mut self) -> Option<PinId> {
        let pin = self.acknowledge()?;
        (self.callback)();
        self.rearm(pin);
        Some(pin)
    }

    /// First half of [`dispatch`](Self::dispatch): masks and clears the first armed pin
    /// with a pending interrupt.
    pub fn acknowledge(&mut self) -> Option<PinId> {
        let gpio = &self.gpio;
        let Some((slot, pin)) = self
            .slots
            .iter()
            .find(|&(_, pin)| gpio.interrupt_status(pin))
        else {
            // Deliberate deviation: with no pending pin there is nothing to acknowledge or
            // re-arm, so neither the callback nor any unmask runs. The scan position is
            // never reused past the end of the table.
            trace!("spurious interrupt on line {}", self.line);
            return None;
        };

        trace!("pin {} (slot {}) fired", pin, slot);
        self.gpio.disable_interrupt(pin);
        self.gpio.clear_interrupt(pin);
        Some(pin)
    }

    /// Second half of [`dispatch`](Self::dispatch): unmasks `pin` again if it is still armed.
    ///
    /// A pin disarmed while its interrupt was being serviced stays masked.
    pub fn rearm(&mut self, pin: PinId) {
        if self.slots.find(pin).is_some() {
            self.gpio.enable_interrupt(pin);
        } else {
            trace!("pin {} disarmed during dispatch", pin);
        }
    }

    /// Tears the multiplexer down, dropping the GPIO peripheral and the slot table.
    ///
    /// Armed pins are masked at the GPIO block and the parent line is disabled first, so
    /// nothing is left firing without a handler. Returns the parent controller to its owner.
    pub fn remove(mut self) -> P {
        for (_, pin) in self.slots.iter() {
            self.gpio.disable_interrupt(pin);
        }
        if let Err(err) = self.parent.disable(self.line) {
            warn!("line {} left enabled: {:?}", self.line, err);
        }
        debug!("multiplexer on line {} removed", self.line);
        self.parent
    }

    /// Parent line this multiplexer is attached to.
    #[inline]
    pub fn line(&self) -> LineId {
        self.line
    }

    #[inline]
    pub fn slots(&self) -> &SlotTable<N> {
        &self.slots
    }

    /// Returns `true` if `pin` holds a slot.
    #[inline]
    pub fn is_armed(&self, pin: PinId) -> bool {
        self.slots.find(pin).is_some()
    }

    #[inline]
    pub(crate) fn callback(&self) -> &F {
        &self.callback
    }

    /// Runs `f` with the parent line masked so dispatch never sees a half-updated table.
    fn masked<R>(&mut self, f: impl FnOnce(&mut G, &mut SlotTable<N>) -> R) -> Result<R, Error> {
        let _mask = LineMask::new(&mut self.parent, self.line)?;
        Ok(f(&mut self.gpio, &mut self.slots))
    }
}

/// Keeps the parent line disabled until dropped, also when unwinding.
struct LineMask<'a, P: ParentIrq> {
    parent: &'a mut P,
    line: LineId,
}

impl<'a, P: ParentIrq> LineMask<'a, P> {
    fn new(parent: &'a mut P, line: LineId) -> Result<Self, Error> {
        parent
            .disable(line)
            .map_err(|err| rejected(Capability::Parent, err))?;
        Ok(Self { parent, line })
    }
}

impl<P: ParentIrq> Drop for LineMask<'_, P> {
    fn drop(&mut self) {
        if let Err(err) = self.parent.enable(self.line) {
            warn!("failed to unmask line {}: {:?}", self.line, err);
        }
    }
}

impl<P, G, F, const N: usize> Debug for Multiplexer<P, G, F, N>
where
    P: ParentIrq,
    G: GpioPeripheral,
    F: FnMut(),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multiplexer")
            .field("line", &self.line)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
