use syn::parse::Parse;
use syn::{parse::ParseStream, Error, Expr, Ident, Path, Result, Token, Type};

pub struct CodegenInput {
    pub mux: Path,
    pub parent: Type,
    pub gpio: Type,
    pub slots: Expr,
    pub handler: Option<Ident>,
}

impl Parse for CodegenInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut mux = None;
        let mut parent = None;
        let mut gpio = None;
        let mut slots = None;
        let mut handler = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "mux" => {
                    if mux.is_some() {
                        return Err(Error::new(ident.span(), "duplicate identifier"));
                    }
                    input.parse::<Token![=]>()?; // consume the '='
                    mux = Some(input.parse()?);
                }
                "parent" => {
                    if parent.is_some() {
                        return Err(Error::new(ident.span(), "duplicate identifier"));
                    }
                    input.parse::<Token![=]>()?; // consume the '='
                    parent = Some(input.parse()?);
                }
                "gpio" => {
                    if gpio.is_some() {
                        return Err(Error::new(ident.span(), "duplicate identifier"));
                    }
                    input.parse::<Token![=]>()?; // consume the '='
                    gpio = Some(input.parse()?);
                }
                "slots" => {
                    if slots.is_some() {
                        return Err(Error::new(ident.span(), "duplicate identifier"));
                    }
                    input.parse::<Token![=]>()?; // consume the '='
                    slots = Some(input.parse()?);
                }
                "handler" => {
                    if handler.is_some() {
                        return Err(Error::new(ident.span(), "duplicate identifier"));
                    }
                    input.parse::<Token![=]>()?; // consume the '='
                    handler = Some(input.parse()?);
                }
                _ => return Err(Error::new(ident.span(), "invalid identifier")),
            }
            if !input.is_empty() {
                input.parse::<Token![,]>()?; // consume the ',' between identifiers
            }
        }

        let mux = match mux {
            Some(mux) => mux,
            None => syn::parse_str("gpio_irq_mux")?,
        };

        Ok(CodegenInput {
            mux,
            parent: parent.ok_or_else(|| Error::new(input.span(), "missing `parent`"))?,
            gpio: gpio.ok_or_else(|| Error::new(input.span(), "missing `gpio`"))?,
            slots: slots.ok_or_else(|| Error::new(input.span(), "missing `slots`"))?,
            handler,
        })
    }
}
