use gpio_irq_mux::{Direction, Error, GpioPeripheral, LineId, ParentIrq, PinId, TriggerLevel};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Handler registered with the fake parent controller.
static HANDLER: Mutex<Option<fn()>> = Mutex::new(None);
/// Pins with a latched interrupt.
static PENDING: Mutex<Vec<PinId>> = Mutex::new(Vec::new());
/// Pins with an unmasked interrupt.
static UNMASKED: Mutex<Vec<PinId>> = Mutex::new(Vec::new());
/// Last trigger code written per pin.
static TRIGGER: Mutex<[u8; 16]> = Mutex::new([0xFF; 16]);

static CALLS: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
pub struct Gic;

impl ParentIrq for Gic {
    type Error = ();

    fn set_trigger_level(&mut self, _line: LineId, level: TriggerLevel) -> Result<(), ()> {
        assert_eq!(level, TriggerLevel::EdgeRising);
        Ok(())
    }

    fn enable(&mut self, _line: LineId) -> Result<(), ()> {
        Ok(())
    }

    fn disable(&mut self, _line: LineId) -> Result<(), ()> {
        Ok(())
    }

    fn register_callback(&mut self, line: LineId, handler: fn()) -> Result<(), ()> {
        assert_eq!(line, 52);
        *HANDLER.lock().unwrap() = Some(handler);
        Ok(())
    }
}

/// Fires the parent line.
fn fire() {
    let handler = *HANDLER.lock().unwrap();
    if let Some(handler) = handler {
        handler();
    }
}

#[derive(Debug)]
pub struct PsGpio;

impl GpioPeripheral for PsGpio {
    type Error = ();

    fn set_direction(&mut self, _pin: PinId, direction: Direction) -> Result<(), ()> {
        assert_eq!(direction, Direction::Input);
        Ok(())
    }

    fn set_trigger_encoding(&mut self, pin: PinId, code: u8) -> Result<(), ()> {
        TRIGGER.lock().unwrap()[pin as usize] = code;
        Ok(())
    }

    fn enable_interrupt(&mut self, pin: PinId) {
        let mut unmasked = UNMASKED.lock().unwrap();
        if !unmasked.contains(&pin) {
            unmasked.push(pin);
        }
    }

    fn disable_interrupt(&mut self, pin: PinId) {
        UNMASKED.lock().unwrap().retain(|&p| p != pin);
    }

    fn interrupt_status(&self, pin: PinId) -> bool {
        PENDING.lock().unwrap().contains(&pin)
    }

    fn clear_interrupt(&mut self, pin: PinId) {
        PENDING.lock().unwrap().retain(|&p| p != pin);
    }
}

// generate the multiplexer for this example, with two pin slots
gpio_irq_mux::codegen!(parent = Gic, gpio = PsGpio, slots = 2, handler = GpioIrq);

fn on_gpio() {
    CALLS.fetch_add(1, Ordering::Relaxed);
}

fn main() {
    assert_eq!(irq_mux::SLOTS, 2);
    assert_eq!(irq_mux::enable(5), Err(Error::InvalidHandle));

    irq_mux::init(Gic, PsGpio, 52, on_gpio).unwrap();
    assert_eq!(
        irq_mux::init(Gic, PsGpio, 52, on_gpio),
        Err(Error::AllocationFailure)
    );

    irq_mux::enable(5).unwrap();
    irq_mux::enable(9).unwrap();
    assert_eq!(irq_mux::enable(7), Err(Error::SlotTableFull));
    assert!(!UNMASKED.lock().unwrap().contains(&7));
    assert_eq!(irq_mux::is_armed(9), Ok(true));

    irq_mux::trigger_level_set(9, TriggerLevel::EdgeFalling).unwrap();
    irq_mux::trigger_level_set(7, TriggerLevel::LevelLow).unwrap();
    assert_eq!(TRIGGER.lock().unwrap()[9], 1);
    assert_eq!(TRIGGER.lock().unwrap()[7], 4);

    // pin 9 fires through the registered dispatcher
    PENDING.lock().unwrap().push(9);
    fire();
    assert_eq!(CALLS.load(Ordering::Relaxed), 1);
    assert!(PENDING.lock().unwrap().is_empty());
    assert!(UNMASKED.lock().unwrap().contains(&9));

    // spurious interrupt through the exported vector
    unsafe { irq_mux::GpioIrq() };
    assert_eq!(CALLS.load(Ordering::Relaxed), 1);

    irq_mux::disable(5).unwrap();
    assert!(!UNMASKED.lock().unwrap().contains(&5));
    irq_mux::enable(7).unwrap();
    assert_eq!(irq_mux::is_armed(5), Ok(false));
    assert_eq!(irq_mux::is_armed(7), Ok(true));

    irq_mux::remove().unwrap();
    assert!(UNMASKED.lock().unwrap().is_empty());
    assert!(irq_mux::remove().is_err());
    assert_eq!(irq_mux::enable(5), Err(Error::InvalidHandle));
    assert_eq!(irq_mux::disable(5), Err(Error::InvalidHandle));

    // a late interrupt after removal is ignored
    PENDING.lock().unwrap().push(7);
    fire();
    assert_eq!(CALLS.load(Ordering::Relaxed), 1);
}
