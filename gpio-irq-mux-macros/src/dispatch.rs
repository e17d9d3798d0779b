use crate::input::CodegenInput;
use proc_macro2::TokenStream;
use quote::quote;

/// Exported interrupt symbol that runs the dispatcher, if requested.
fn handler_symbol(input: &CodegenInput) -> TokenStream {
    match &input.handler {
        Some(handler) => quote! {
            /// Interrupt vector of the parent line.
            #[no_mangle]
            #[allow(non_snake_case)]
            pub unsafe extern "C" fn #handler() {
                __gpio_irq_mux_dispatch();
            }
        },
        None => quote!(),
    }
}

/// Creates the static multiplexer instance and its dispatcher.
pub fn dispatch_mod(input: &CodegenInput) -> TokenStream {
    let mux = &input.mux;
    let parent = &input.parent;
    let gpio = &input.gpio;
    let slots = &input.slots;
    let handler_symbol = handler_symbol(input);

    quote!(
        /// Number of pin slots of the multiplexer.
        pub const SLOTS: usize = #slots;

        /// The static multiplexer instance
        static __GPIO_IRQ_MUX: #mux::export::Instance<#parent, #gpio, SLOTS> =
            #mux::export::Instance::new();

        /// Routine registered with the parent line.
        #[doc(hidden)]
        pub fn __gpio_irq_mux_dispatch() {
            __GPIO_IRQ_MUX.dispatch();
        }

        #handler_symbol
    )
}
