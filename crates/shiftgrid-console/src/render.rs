use std::collections::HashMap;

use shiftgrid_core::{CellKey, Diagnostic, Period, StaffId};
use shiftgrid_editor::catalog::OFF_LABEL;
use shiftgrid_editor::geometry::{day_label, is_weekend, WEEKDAY_HEADERS};
use shiftgrid_editor::{GridEditor, RenderState, SlotCatalog};

const MIN_COLUMN: usize = 12;

pub fn period_line(period: &Period) -> String {
    format!(
        "#{:<4} {} .. {}  [{}]",
        period.id,
        period.start_date,
        period.end_date,
        period.status
    )
}

/// Week-aligned calendar, one block per week, one line per staff member.
///
/// Weekend dates are bracketed. Cell text is the slot name (`-` for a day
/// off, `.` for a cell without an assignment) followed by `*` when unsaved or
/// `+` when manually edited. A legend of digit keys and palette colors ends
/// the block.
pub fn grid(editor: &GridEditor) -> String {
    let mut out = period_line(editor.baseline().period());
    out.push('\n');

    let layout = editor.layout();
    match layout.render_state() {
        RenderState::NoStaff => {
            out.push_str("No staff registered.\n");
            return out;
        }
        RenderState::NoDates => {
            out.push_str("No dates in range.\n");
            return out;
        }
        RenderState::Ready => {}
    }

    let names: HashMap<StaffId, &str> = editor
        .roster()
        .iter()
        .map(|s| (s.id, s.name.as_str()))
        .collect();
    let name_width = names.values().map(|n| n.len()).max().unwrap_or(0).max(4);
    let column = editor
        .catalog()
        .slots()
        .iter()
        .map(|s| s.name.len() + 1)
        .max()
        .unwrap_or(0)
        .max(MIN_COLUMN);

    let mut header = format!("{:name_width$}", "");
    for day in WEEKDAY_HEADERS {
        header.push_str(&format!(" {day:<column$}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for week in layout.weeks() {
        let mut line = format!("{:name_width$}", "");
        for &date in week {
            let label = match date {
                Some(date) if is_weekend(date) => format!("[{}]", day_label(date)),
                Some(date) => day_label(date),
                None => String::new(),
            };
            line.push_str(&format!(" {label:<column$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');

        for &staff in layout.staff() {
            let name = names.get(&staff).copied().unwrap_or("?");
            let mut line = format!("{name:<name_width$}");
            for &date in week {
                let text = date
                    .map(|d| cell_text(editor, CellKey::new(staff, d)))
                    .unwrap_or_default();
                line.push_str(&format!(" {text:<column$}"));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out.push_str(&legend(editor.catalog()));
    out.push('\n');

    let pending = editor.pending_edits().len();
    if pending > 0 {
        out.push_str(&format!("{pending} unsaved change(s)\n"));
    }
    out
}

fn cell_text(editor: &GridEditor, cell: CellKey) -> String {
    let Some(view) = editor.cell_view(cell) else {
        return ".".to_string();
    };
    let name = if view.value.is_off() {
        "-"
    } else {
        match editor.catalog().name(view.value) {
            "" => "?",
            name => name,
        }
    };
    let mark = if view.pending {
        "*"
    } else if view.manual {
        "+"
    } else {
        ""
    };
    format!("{name}{mark}")
}

/// Digit shortcuts with each slot's palette color, e.g. `0=Off 1=Early/c0`.
pub fn legend(catalog: &SlotCatalog) -> String {
    let mut line = format!("keys: 0={OFF_LABEL}");
    for (i, slot) in catalog.slots().iter().enumerate() {
        line.push_str(&format!(" {}={}/c{}", i + 1, slot.name, catalog.color_index(slot.id)));
    }
    line
}

pub fn diagnostics(items: &[Diagnostic]) -> String {
    items
        .iter()
        .map(|d| {
            let mut line = format!("[{:?}] {}: {}", d.severity, d.constraint, d.message);
            for detail in d.details.iter().flatten() {
                line.push_str(&format!("\n    {detail}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
