use core::fmt;

/// Capability that rejected a configuration call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    Parent,
    Gpio,
}

/// Errors returned by the multiplexer.
///
/// Nothing is retried internally.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// No storage left for another multiplexer instance.
    AllocationFailure,
    /// The parent controller or the GPIO peripheral rejected a configuration call.
    CapabilityConfigFailure(Capability),
    /// Every slot is assigned to a pin.
    SlotTableFull,
    /// The multiplexer was removed or never initialized.
    InvalidHandle,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure => f.write_str("multiplexer storage already in use"),
            Self::CapabilityConfigFailure(Capability::Parent) => {
                f.write_str("parent interrupt controller rejected configuration")
            }
            Self::CapabilityConfigFailure(Capability::Gpio) => {
                f.write_str("GPIO peripheral rejected configuration")
            }
            Self::SlotTableFull => f.write_str("no free pin slot"),
            Self::InvalidHandle => f.write_str("multiplexer is not initialized"),
        }
    }
}
