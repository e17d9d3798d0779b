use crate::input::CodegenInput;
use proc_macro2::TokenStream;
use quote::quote;

pub fn api_mod(input: &CodegenInput) -> TokenStream {
    let parent = &input.parent;
    let gpio = &input.gpio;

    quote!(
        /// Initializes the multiplexer on `line` and registers its dispatcher with the parent.
        ///
        /// `callback` runs in interrupt context each time an armed pin fires. It may call the
        /// functions of this module; a pin it disables is not re-armed.
        #[inline]
        pub fn init(parent: #parent, gpio: #gpio, line: LineId, callback: fn()) -> Result<(), Error> {
            let config = Config {
                line,
                dispatcher: __gpio_irq_mux_dispatch,
            };
            __GPIO_IRQ_MUX.init(parent, gpio, config, callback)
        }

        /// Arms the interrupt of a pin.
        #[inline]
        pub fn enable(pin: PinId) -> Result<(), Error> {
            __GPIO_IRQ_MUX.enable(pin)
        }

        /// Disarms the interrupt of a pin.
        #[inline]
        pub fn disable(pin: PinId) -> Result<(), Error> {
            __GPIO_IRQ_MUX.disable(pin)
        }

        /// Sets the trigger level of a pin.
        #[inline]
        pub fn trigger_level_set(pin: PinId, level: TriggerLevel) -> Result<(), Error> {
            __GPIO_IRQ_MUX.trigger_level_set(pin, level)
        }

        /// Removes the multiplexer and returns the parent controller.
        #[inline]
        pub fn remove() -> Result<#parent, Error> {
            __GPIO_IRQ_MUX.remove()
        }

        /// Returns `true` if the pin is armed.
        #[inline]
        pub fn is_armed(pin: PinId) -> Result<bool, Error> {
            __GPIO_IRQ_MUX.is_armed(pin)
        }
    )
}
