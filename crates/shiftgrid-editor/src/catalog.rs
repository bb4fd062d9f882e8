use std::collections::HashMap;

use shiftgrid_core::{ShiftSlot, ShiftSlotId, SlotValue};

/// Number of distinct slot colors; positions beyond it wrap around.
pub const PALETTE_SIZE: usize = 5;

/// Label shown for the "no slot" choice.
pub const OFF_LABEL: &str = "Off";

/// One entry of the per-cell picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub value: SlotValue,
    pub label: String,
}

/// Derived index over the configured shift slots.
///
/// Built once per slot list so name, color and digit lookups stay O(1)
/// while painting.
#[derive(Debug, Clone, Default)]
pub struct SlotCatalog {
    slots: Vec<ShiftSlot>,
    positions: HashMap<ShiftSlotId, usize>,
}

impl SlotCatalog {
    pub fn new(slots: Vec<ShiftSlot>) -> Self {
        let positions = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        Self { slots, positions }
    }

    pub fn slots(&self) -> &[ShiftSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn position(&self, id: ShiftSlotId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Display name; empty for "no slot" or a slot that no longer exists.
    pub fn name(&self, value: SlotValue) -> &str {
        match value {
            SlotValue::Off => "",
            SlotValue::Slot(id) => self
                .position(id)
                .map(|i| self.slots[i].name.as_str())
                .unwrap_or(""),
        }
    }

    /// Palette index by slot position. Unknown slots share color 0.
    pub fn color_index(&self, id: ShiftSlotId) -> usize {
        self.position(id).unwrap_or(0) % PALETTE_SIZE
    }

    /// Keyboard shortcut mapping: `0` is "no slot", `1..=N` the Nth slot.
    pub fn by_digit(&self, digit: u8) -> Option<SlotValue> {
        match digit {
            0 => Some(SlotValue::Off),
            n => self
                .slots
                .get(usize::from(n) - 1)
                .map(|s| SlotValue::Slot(s.id)),
        }
    }

    /// Contains the value: "no slot" always, a slot only when configured.
    pub fn contains(&self, value: SlotValue) -> bool {
        match value {
            SlotValue::Off => true,
            SlotValue::Slot(id) => self.positions.contains_key(&id),
        }
    }

    /// "No slot" followed by every slot, in configured order.
    pub fn picker_options(&self) -> Vec<PickerOption> {
        std::iter::once(PickerOption {
            value: SlotValue::Off,
            label: OFF_LABEL.to_string(),
        })
        .chain(self.slots.iter().map(|s| PickerOption {
            value: SlotValue::Slot(s.id),
            label: s.name.clone(),
        }))
        .collect()
    }
}
