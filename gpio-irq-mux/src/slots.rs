//! Fixed-capacity table mapping slots to the pins whose interrupts are armed.
//!
//! Slots are handed out first-fit and a pin holds at most one of them.

use crate::PinId;
use heapless::Vec;

/// Returned by [`SlotTable::allocate`] when every slot is taken.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Full;

/// Fixed table of armed pins.
///
/// Slots are handed out first-fit and never grow, so every operation is a bounded
/// linear scan that can run in interrupt context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotTable<const N: usize> {
    /// `None` marks an empty slot.
    slots: [Option<PinId>; N],
}

impl<const N: usize> SlotTable<N> {
    /// Creates a table with all slots empty.
    #[inline]
    pub const fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Number of slots.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the pin held by slot `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<PinId> {
        self.slots.get(index).copied().flatten()
    }

    /// Returns the slot holding `pin`.
    #[inline]
    pub fn find(&self, pin: PinId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(pin))
    }

    /// Assigns `pin` to the first empty slot and returns its index.
    ///
    /// # Note
    ///
    /// This does not check whether `pin` already has a slot. Callers that must keep
    /// pins unique should [`find`](Self::find) first.
    pub fn allocate(&mut self, pin: PinId) -> Result<usize, Full> {
        let index = self.slots.iter().position(Option::is_none).ok_or(Full)?;
        self.slots[index] = Some(pin);
        Ok(index)
    }

    /// Empties the slot holding `pin` and returns its index.
    pub fn release(&mut self, pin: PinId) -> Option<usize> {
        let index = self.find(pin)?;
        self.slots[index] = None;
        Some(index)
    }

    /// Iterates over occupied slots as `(index, pin)` pairs, in slot order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, PinId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|pin| (i, pin)))
    }

    /// Returns a snapshot of the armed pins in slot order.
    pub fn armed(&self) -> Vec<PinId, N> {
        let mut pins = Vec::new();
        for (_, pin) in self.iter() {
            // SAFETY: at most N slots are occupied
            unsafe { pins.push_unchecked(pin) };
        }
        pins
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl<const N: usize> Default for SlotTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
