use proc_macro::TokenStream;
use quote::quote;

mod api;
mod dispatch;
mod input;

// Ex. codegen!(parent = <parent type>, gpio = <gpio type>, slots = <capacity>, handler = <optional symbol>)
#[proc_macro]
pub fn codegen(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as input::CodegenInput);
    let mux = &input.mux;

    let dispatch_code = dispatch::dispatch_mod(&input);
    let api_code = api::api_mod(&input);

    quote! {
        /// The GPIO interrupt multiplexer module
        pub mod irq_mux {
            #[allow(unused_imports)]
            use super::*;
            use #mux::{Config, Error, LineId, PinId, TriggerLevel};

            #dispatch_code
            #api_code
        }
    }
    .into()
}
