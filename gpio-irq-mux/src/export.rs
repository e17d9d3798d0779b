//! Static multiplexer instance shared by control code and the dispatch routine.
//!
//! This module is mostly used through the code generated by [`codegen!`](crate::codegen),
//! which declares one [`Instance`] and the dispatcher registered with the parent line.

use crate::capability::{GpioPeripheral, ParentIrq};
use crate::mux::{Config, Multiplexer};
use crate::{Error, PinId, TriggerLevel};
use core::cell::RefCell;
use critical_section::Mutex;
use log::warn;

pub use critical_section;

/// Multiplexer whose callback is a plain function, as required for `static` storage.
pub type StaticMultiplexer<P, G, const N: usize> = Multiplexer<P, G, fn(), N>;

/// Storage for at most one multiplexer, guarded by a critical section.
///
/// Every access runs inside [`critical_section::with`].
pub struct Instance<P, G, const N: usize>
where
    P: ParentIrq,
    G: GpioPeripheral,
{
    inner: Mutex<RefCell<Option<StaticMultiplexer<P, G, N>>>>,
}

impl<P, G, const N: usize> Instance<P, G, N>
where
    P: ParentIrq,
    G: GpioPeripheral,
{
    /// Creates empty storage.
    #[inline]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Initializes the multiplexer in place.
    ///
    /// Fails with [`Error::AllocationFailure`] if the storage is already in use. The
    /// capabilities are dropped on any failure.
    pub fn init(&self, parent: P, gpio: G, config: Config, callback: fn()) -> Result<(), Error> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            if slot.is_some() {
                warn!("multiplexer on line {} already initialized", config.line);
                return Err(Error::AllocationFailure);
            }
            *slot = Some(Multiplexer::init(parent, gpio, config, callback)?);
            Ok(())
        })
    }

    /// See [`Multiplexer::enable`].
    pub fn enable(&self, pin: PinId) -> Result<(), Error> {
        self.with(|mux| mux.enable(pin))?
    }

    /// See [`Multiplexer::disable`]. Only fails if the instance does not exist.
    pub fn disable(&self, pin: PinId) -> Result<(), Error> {
        self.with(|mux| mux.disable(pin))
    }

    /// See [`Multiplexer::trigger_level_set`].
    pub fn trigger_level_set(&self, pin: PinId, level: TriggerLevel) -> Result<(), Error> {
        self.with(|mux| mux.trigger_level_set(pin, level))?
    }

    /// See [`Multiplexer::dispatch`]. Does nothing once the instance is removed.
    ///
    /// The callback runs with the instance released, so it may use the other methods of
    /// this instance. A pin it disables is not re-armed.
    pub fn dispatch(&self) -> Option<PinId> {
        let (pin, callback) = critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let mux = inner.as_mut()?;
            Some((mux.acknowledge()?, *mux.callback()))
        })?;
        callback();
        // the callback may have removed the instance
        self.with(|mux| mux.rearm(pin)).ok();
        Some(pin)
    }

    /// Removes the multiplexer and returns the parent controller.
    ///
    /// Fails with [`Error::InvalidHandle`] if there is nothing to remove.
    pub fn remove(&self) -> Result<P, Error> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
            .map(Multiplexer::remove)
            .ok_or(Error::InvalidHandle)
    }

    /// Returns `true` if the multiplexer exists.
    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Returns `true` if `pin` holds a slot.
    pub fn is_armed(&self, pin: PinId) -> Result<bool, Error> {
        self.with(|mux| mux.is_armed(pin))
    }

    /// Runs `f` on the multiplexer inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut StaticMultiplexer<P, G, N>) -> R) -> Result<R, Error> {
        critical_section::with(|cs| {
            self.inner
                .borrow_ref_mut(cs)
                .as_mut()
                .map(f)
                .ok_or(Error::InvalidHandle)
        })
    }
}

impl<P, G, const N: usize> Default for Instance<P, G, N>
where
    P: ParentIrq,
    G: GpioPeripheral,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Capability;
    use crate::mock::{Bus, Event, MockGpio, MockParent};
    use core::sync::atomic::{AtomicU32, Ordering};

    static CALLS: AtomicU32 = AtomicU32::new(0);

    fn callback() {
        CALLS.fetch_add(1, Ordering::Relaxed);
    }

    fn dispatcher() {}

    fn config() -> Config {
        Config {
            line: 7,
            dispatcher,
        }
    }

    #[test]
    fn lifecycle() {
        let bus = Bus::default();
        let mux = Instance::<MockParent, MockGpio, 2>::new();
        assert!(!mux.is_initialized());
        assert_eq!(mux.enable(1), Err(Error::InvalidHandle));

        mux.init(MockParent::new(&bus), MockGpio::new(&bus), config(), callback)
            .unwrap();
        assert!(mux.is_initialized());
        mux.enable(1).unwrap();
        mux.trigger_level_set(1, TriggerLevel::EdgeFalling).unwrap();
        assert_eq!(mux.is_armed(1), Ok(true));

        bus.raise(1);
        let before = CALLS.load(Ordering::Relaxed);
        assert_eq!(mux.dispatch(), Some(1));
        assert_eq!(CALLS.load(Ordering::Relaxed), before + 1);

        mux.disable(1).unwrap();
        assert_eq!(mux.is_armed(1), Ok(false));

        let parent = mux.remove().unwrap();
        assert!(parent.shares(&bus));
        assert!(!mux.is_initialized());
    }

    static SELF_DISARMING: Instance<MockParent, MockGpio, 2> = Instance::new();

    fn disarm_pin_one() {
        SELF_DISARMING.disable(1).unwrap();
    }

    #[test]
    fn callback_disables_its_own_pin() {
        let bus = Bus::default();
        SELF_DISARMING
            .init(MockParent::new(&bus), MockGpio::new(&bus), config(), disarm_pin_one)
            .unwrap();
        SELF_DISARMING.enable(1).unwrap();
        bus.take_events();

        bus.raise(1);
        assert_eq!(SELF_DISARMING.dispatch(), Some(1));
        assert_eq!(SELF_DISARMING.is_armed(1), Ok(false));
        assert_eq!(
            bus.take_events(),
            [
                Event::DisableInterrupt(1),
                Event::ClearInterrupt(1),
                Event::LineDisable(7),
                Event::DisableInterrupt(1),
                Event::LineEnable(7),
            ]
        );
        SELF_DISARMING.remove().unwrap();
    }

    #[test]
    fn removed_instance_is_invalid() {
        let bus = Bus::default();
        let mux = Instance::<MockParent, MockGpio, 2>::new();
        mux.init(MockParent::new(&bus), MockGpio::new(&bus), config(), callback)
            .unwrap();
        mux.enable(3).unwrap();
        mux.remove().unwrap();
        bus.take_events();

        assert_eq!(mux.remove().err(), Some(Error::InvalidHandle));
        assert_eq!(mux.enable(3), Err(Error::InvalidHandle));
        assert_eq!(mux.disable(3), Err(Error::InvalidHandle));
        assert_eq!(
            mux.trigger_level_set(3, TriggerLevel::LevelHigh),
            Err(Error::InvalidHandle)
        );

        // a late interrupt finds nothing to service
        bus.raise(3);
        assert_eq!(mux.dispatch(), None);
        assert!(bus.take_events().is_empty());
    }

    #[test]
    fn second_init_is_rejected() {
        let bus = Bus::default();
        let mux = Instance::<MockParent, MockGpio, 2>::new();
        mux.init(MockParent::new(&bus), MockGpio::new(&bus), config(), callback)
            .unwrap();
        bus.take_events();

        let other = Bus::default();
        assert_eq!(
            mux.init(
                MockParent::new(&other),
                MockGpio::new(&other),
                config(),
                callback
            ),
            Err(Error::AllocationFailure)
        );
        assert!(other.take_events().is_empty());
        assert!(bus.take_events().is_empty());
    }

    #[test]
    fn failed_init_leaves_storage_free() {
        let bus = Bus::default();
        bus.faults(|f| f.register = true);
        let mux = Instance::<MockParent, MockGpio, 2>::new();
        assert_eq!(
            mux.init(MockParent::new(&bus), MockGpio::new(&bus), config(), callback),
            Err(Error::CapabilityConfigFailure(Capability::Parent))
        );
        assert!(!mux.is_initialized());
        assert!(!bus.line_enabled());
        assert_eq!(bus.events().last(), Some(&Event::LineDisable(7)));

        bus.faults(|f| f.register = false);
        mux.init(MockParent::new(&bus), MockGpio::new(&bus), config(), callback)
            .unwrap();
        assert!(mux.is_initialized());
    }
}
