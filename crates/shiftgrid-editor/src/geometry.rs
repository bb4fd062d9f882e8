//! Pure date/grid geometry. No state, no I/O.

use chrono::{Datelike, NaiveDate, Weekday};
use shiftgrid_core::{CellKey, Staff, StaffId};

/// Column headers, Sunday first. Week rows produced by [`week_rows`] line up under these.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One calendar week; `None` pads days outside the period.
pub type WeekRow = [Option<NaiveDate>; 7];

/// Every date from `start` to `end`, both inclusive.
///
/// An inverted range yields an empty vec, which callers treat as "nothing to render".
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Partition consecutive dates into Sunday-first weeks, padding the first and
/// last week so weekdays stay in their header column.
pub fn week_rows(dates: &[NaiveDate]) -> Vec<WeekRow> {
    let Some(first) = dates.first() else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut current: WeekRow = [None; 7];
    let mut col = first.weekday().num_days_from_sunday() as usize;

    for date in dates {
        current[col] = Some(*date);
        col += 1;
        if col == 7 {
            weeks.push(current);
            current = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(current);
    }
    weeks
}

/// Header label such as `3/1(Sun)`.
pub fn day_label(date: NaiveDate) -> String {
    let dow = WEEKDAY_HEADERS[date.weekday().num_days_from_sunday() as usize];
    format!("{}/{}({})", date.month(), date.day(), dow)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// What the calendar view should show for a given period and roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No staff registered; nothing to lay out.
    NoStaff,
    /// Empty or inverted range.
    NoDates,
    Ready,
}

/// Row/column layout of one period grid: staff rows by date columns.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    dates: Vec<NaiveDate>,
    staff: Vec<StaffId>,
    weeks: Vec<WeekRow>,
}

impl GridLayout {
    pub fn new(start: NaiveDate, end: NaiveDate, roster: &[Staff]) -> Self {
        let dates = dates_in_range(start, end);
        let weeks = week_rows(&dates);
        Self {
            dates,
            staff: roster.iter().map(|s| s.id).collect(),
            weeks,
        }
    }

    pub fn render_state(&self) -> RenderState {
        if self.staff.is_empty() {
            RenderState::NoStaff
        } else if self.dates.is_empty() {
            RenderState::NoDates
        } else {
            RenderState::Ready
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn staff(&self) -> &[StaffId] {
        &self.staff
    }

    pub fn weeks(&self) -> &[WeekRow] {
        &self.weeks
    }

    /// Every cell in display order: row by row, then date by date.
    pub fn cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.staff
            .iter()
            .flat_map(move |s| self.dates.iter().map(move |d| CellKey::new(*s, *d)))
    }
}
