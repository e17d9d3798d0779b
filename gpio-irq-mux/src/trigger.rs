/// Edge or level sensitivity of an interrupt source.
///
/// The discriminants index [`HW_CODES`], so the declaration order is part of the contract.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum TriggerLevel {
    LevelLow = 0,
    LevelHigh = 1,
    EdgeFalling = 2,
    EdgeRising = 3,
    EdgeBoth = 4,
}

/// Interrupt type codes understood by the GPIO block, in [`TriggerLevel`] order.
///
/// Rising edge is 0, falling edge 1, both edges 2, level high 3 and level low 4 in silicon.
const HW_CODES: [u8; 5] = [4, 3, 1, 0, 2];

impl TriggerLevel {
    /// Returns the hardware encoding of this trigger level.
    #[inline]
    pub const fn hw_code(self) -> u8 {
        HW_CODES[self as usize]
    }
}

impl TryFrom<u8> for TriggerLevel {
    type Error = u8;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::LevelLow),
            1 => Ok(Self::LevelHigh),
            2 => Ok(Self::EdgeFalling),
            3 => Ok(Self::EdgeRising),
            4 => Ok(Self::EdgeBoth),
            _ => Err(value),
        }
    }
}
