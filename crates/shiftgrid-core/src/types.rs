use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }
    };
}

integer_id!(
    /// Server-side primary key of a schedule period.
    PeriodId
);
integer_id!(
    /// Server-side primary key of a staff member.
    StaffId
);
integer_id!(
    /// Server-side primary key of a shift-slot definition.
    ShiftSlotId
);
integer_id!(
    /// Opaque persistent id of one assignment row.
    AssignmentId
);

/// Composite identity of one grid cell: `(staff, date)`.
///
/// Unique within a period and stable for its lifetime. Ordering is
/// staff-major so iteration walks the grid row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub staff_id: StaffId,
    pub date: NaiveDate,
}

impl CellKey {
    pub fn new(staff_id: StaffId, date: NaiveDate) -> Self {
        Self { staff_id, date }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.staff_id, self.date)
    }
}

/// Value held by a cell: either "no slot" (a day off) or one shift slot.
///
/// On the wire this is the nullable `shift_slot_id` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<ShiftSlotId>", into = "Option<ShiftSlotId>")]
pub enum SlotValue {
    #[default]
    Off,
    Slot(ShiftSlotId),
}

impl SlotValue {
    pub fn slot_id(self) -> Option<ShiftSlotId> {
        match self {
            SlotValue::Off => None,
            SlotValue::Slot(id) => Some(id),
        }
    }

    pub fn is_off(self) -> bool {
        matches!(self, SlotValue::Off)
    }
}

impl From<Option<ShiftSlotId>> for SlotValue {
    fn from(v: Option<ShiftSlotId>) -> Self {
        match v {
            Some(id) => SlotValue::Slot(id),
            None => SlotValue::Off,
        }
    }
}

impl From<SlotValue> for Option<ShiftSlotId> {
    fn from(v: SlotValue) -> Self {
        v.slot_id()
    }
}

impl From<ShiftSlotId> for SlotValue {
    fn from(id: ShiftSlotId) -> Self {
        SlotValue::Slot(id)
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Off => write!(f, "off"),
            SlotValue::Slot(id) => write!(f, "slot:{id}"),
        }
    }
}

impl std::str::FromStr for SlotValue {
    type Err = String;

    /// Accepts `off` or a numeric shift-slot id.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "off" | "none" => Ok(SlotValue::Off),
            other => other
                .parse::<i64>()
                .map(|id| SlotValue::Slot(ShiftSlotId(id)))
                .map_err(|_| format!("unknown slot value: {other}")),
        }
    }
}
