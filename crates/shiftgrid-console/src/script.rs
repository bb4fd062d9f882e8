//! Edit scripts: whitespace-separated tokens replayed through the grid editor.
//!
//! ```text
//! key:<c>                      digit / character key on the grid
//! esc                          Escape
//! stamp:<slot|off>             toolbar stamp selection
//! down:<staff>@<date>          pointer down on a cell
//! enter:<staff>@<date>         pointer enters a cell
//! up                           pointer up
//! pick:<staff>@<date>=<slot|off>  per-cell picker choice
//! discard                      drop every pending edit
//! ```

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use shiftgrid_core::{CellKey, SlotValue, StaffId};
use shiftgrid_editor::{FocusTarget, GridEditor, InputEvent, Key, RouteOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Input(InputEvent),
    Stamp(SlotValue),
    Discard,
}

pub fn parse(script: &str) -> anyhow::Result<Vec<Step>> {
    script
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| parse_token(token).with_context(|| format!("token {} ({token})", i + 1)))
        .collect()
}

fn parse_token(token: &str) -> anyhow::Result<Step> {
    let (verb, arg) = token.split_once(':').unwrap_or((token, ""));
    let step = match (verb, arg) {
        ("esc", "") => Step::Input(InputEvent::KeyDown {
            key: Key::Escape,
            target: FocusTarget::Grid,
        }),
        ("up", "") => Step::Input(InputEvent::PointerUp),
        ("discard", "") => Step::Discard,
        ("key", arg) => {
            let mut chars = arg.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                bail!("expected a single character after key:");
            };
            Step::Input(InputEvent::KeyDown {
                key: Key::Char(c),
                target: FocusTarget::Grid,
            })
        }
        ("stamp", arg) => Step::Stamp(parse_value(arg)?),
        ("down", arg) => Step::Input(InputEvent::PointerDown {
            cell: parse_cell(arg)?,
        }),
        ("enter", arg) => Step::Input(InputEvent::PointerEnter {
            cell: parse_cell(arg)?,
        }),
        ("pick", arg) => {
            let (cell, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("expected <staff>@<date>=<slot|off>"))?;
            Step::Input(InputEvent::PickerSelect {
                cell: parse_cell(cell)?,
                value: parse_value(value)?,
            })
        }
        _ => bail!("unknown step"),
    };
    Ok(step)
}

fn parse_cell(s: &str) -> anyhow::Result<CellKey> {
    let (staff, date) = s
        .split_once('@')
        .ok_or_else(|| anyhow!("expected <staff>@<YYYY-MM-DD>"))?;
    let staff: i64 = staff.parse().context("staff id")?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").context("date")?;
    Ok(CellKey::new(StaffId(staff), date))
}

fn parse_value(s: &str) -> anyhow::Result<SlotValue> {
    s.parse::<SlotValue>().map_err(|e| anyhow!(e))
}

/// Replay `steps` in order. Returns how many steps changed a cell.
pub fn replay(editor: &mut GridEditor, steps: &[Step]) -> usize {
    let mut changed = 0;
    for step in steps {
        match *step {
            Step::Input(event) => {
                let outcome = editor.handle(event);
                tracing::debug!(?event, ?outcome, "script step");
                if let RouteOutcome::Edit { outcome, .. } = outcome {
                    if outcome.changed() {
                        changed += 1;
                    }
                }
            }
            Step::Stamp(value) => {
                editor.select_stamp(value);
            }
            Step::Discard => {
                editor.discard_all();
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftgrid_core::ShiftSlotId;

    fn c(staff: i64, day: u32) -> CellKey {
        CellKey::new(
            StaffId(staff),
            NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
        )
    }

    #[test]
    fn parses_every_step_kind() {
        let steps = parse(
            "key:1 down:1@2026-03-01 enter:1@2026-03-02 up esc \
             pick:2@2026-03-01=off pick:2@2026-03-02=3 stamp:off discard",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Input(InputEvent::KeyDown {
                    key: Key::Char('1'),
                    target: FocusTarget::Grid
                }),
                Step::Input(InputEvent::PointerDown { cell: c(1, 1) }),
                Step::Input(InputEvent::PointerEnter { cell: c(1, 2) }),
                Step::Input(InputEvent::PointerUp),
                Step::Input(InputEvent::KeyDown {
                    key: Key::Escape,
                    target: FocusTarget::Grid
                }),
                Step::Input(InputEvent::PickerSelect {
                    cell: c(2, 1),
                    value: SlotValue::Off
                }),
                Step::Input(InputEvent::PickerSelect {
                    cell: c(2, 2),
                    value: SlotValue::Slot(ShiftSlotId(3))
                }),
                Step::Stamp(SlotValue::Off),
                Step::Discard,
            ]
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in [
            "key:12",
            "down:1",
            "down:x@2026-03-01",
            "enter:1@03/01",
            "pick:1@2026-03-01",
            "pick:1@2026-03-01=late",
            "jump",
        ] {
            assert!(parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn error_names_the_offending_token() {
        let err = parse("up wiggle").unwrap_err();
        assert!(format!("{err:#}").contains("token 2 (wiggle)"));
    }

    #[test]
    fn empty_script_is_empty() {
        assert!(parse("   ").unwrap().is_empty());
    }
}
