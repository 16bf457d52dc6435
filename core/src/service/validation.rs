use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::input::EntryForm;
use crate::model::entry::{EntryId, WorkEntry, MAX_HOURS, MIN_HOURS};
use crate::model::workplace::Registry;
use crate::time::{is_saturday, parse_entry_date};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntryError {
    #[error("Unknown workplace: {0}")]
    UnknownWorkplace(String),
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },
    #[error("Hours must be a whole number, got '{0}'")]
    InvalidHours(String),
    #[error("Hours must be between 1 and 24, got {0}")]
    HoursOutOfRange(u32),
    #[error("{workplace} does not operate on Saturdays")]
    SaturdayNotAllowed { workplace: String },
}

/// The Saturday rule. Pure; the caller surfaces the message.
pub fn validate(registry: &Registry, date: NaiveDate, workplace: &str) -> Result<(), EntryError> {
    let place = registry
        .get(workplace)
        .ok_or_else(|| EntryError::UnknownWorkplace(workplace.to_string()))?;

    if is_saturday(date) && !place.allows_saturday {
        return Err(EntryError::SaturdayNotAllowed {
            workplace: place.name.clone(),
        });
    }
    Ok(())
}

/// Live check for the form being edited: date and workplace only, so a
/// half-typed hours field does not hide the Saturday message.
pub fn validate_form(registry: &Registry, form: &EntryForm, today: NaiveDate) -> Result<(), EntryError> {
    let date = parse_form_date(&form.date, today)?;
    validate(registry, date, &form.workplace)
}

/// Builds a new entry from the submitted form. Re-runs every check against the
/// form's own values; the result of any earlier live validation is ignored.
pub fn create_entry(registry: &Registry, form: &EntryForm, today: NaiveDate) -> Result<WorkEntry, EntryError> {
    let hours = parse_hours(&form.hours)?;
    let date = parse_form_date(&form.date, today)?;
    let place = registry
        .get(&form.workplace)
        .ok_or_else(|| EntryError::UnknownWorkplace(form.workplace.clone()))?;

    if let Err(e) = validate(registry, date, &place.name) {
        debug!(workplace = %place.name, %date, "rejected entry: {}", e);
        return Err(e);
    }

    Ok(WorkEntry {
        id: EntryId::generate(),
        workplace: place.name.clone(),
        date,
        hours,
        is_saturday: is_saturday(date),
    })
}

fn parse_form_date(input: &str, today: NaiveDate) -> Result<NaiveDate, EntryError> {
    parse_entry_date(input, today).map_err(|e| EntryError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

fn parse_hours(input: &str) -> Result<u32, EntryError> {
    let hours: u32 = input
        .trim()
        .parse()
        .map_err(|_| EntryError::InvalidHours(input.to_string()))?;
    if !(MIN_HOURS..=MAX_HOURS).contains(&hours) {
        return Err(EntryError::HoursOutOfRange(hours));
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn form(workplace: &str, date: &str, hours: &str) -> EntryForm {
        EntryForm {
            workplace: workplace.to_string(),
            date: date.to_string(),
            hours: hours.to_string(),
        }
    }

    #[test]
    fn test_saturday_rule_over_a_year_of_dates() {
        let registry = Registry::default();
        let mut date = d(2024, 1, 1);
        while date.year() == 2024 {
            for w in registry.iter() {
                let result = validate(&registry, date, &w.name);
                if date.weekday() == Weekday::Sat && !w.allows_saturday {
                    let err = result.unwrap_err();
                    assert!(err.to_string().contains(&w.name));
                } else {
                    assert!(result.is_ok(), "{} on {}", w.name, date);
                }
            }
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_holmes_place_saturday_message() {
        let registry = Registry::default();
        let err = validate(&registry, d(2024, 3, 9), "Holmes Place").unwrap_err();
        assert_eq!(err.to_string(), "Holmes Place does not operate on Saturdays");
    }

    #[test]
    fn test_unknown_workplace() {
        let registry = Registry::default();
        assert_eq!(
            validate(&registry, d(2024, 3, 4), "Nowhere").unwrap_err(),
            EntryError::UnknownWorkplace("Nowhere".to_string())
        );
    }

    #[test]
    fn test_create_entry_derives_saturday_flag() {
        let registry = Registry::default();
        let today = d(2024, 3, 13);

        let sat = create_entry(&registry, &form("Calma", "2024-03-09", "4"), today).unwrap();
        assert!(sat.is_saturday);
        assert_eq!(sat.hours, 4);
        assert_eq!(sat.workplace, "Calma");

        let mon = create_entry(&registry, &form("Calma", "2024-03-04", " 8 "), today).unwrap();
        assert!(!mon.is_saturday);
        assert_ne!(sat.id, mon.id);
    }

    #[test]
    fn test_create_entry_rejects_saturday_at_holmes_place() {
        let registry = Registry::default();
        let today = d(2024, 3, 13);
        let err = create_entry(&registry, &form("Holmes Place", "sat", "4"), today).unwrap_err();
        assert!(matches!(err, EntryError::SaturdayNotAllowed { ref workplace } if workplace == "Holmes Place"));
    }

    #[test]
    fn test_create_entry_never_breaks_saturday_invariant() {
        let registry = Registry::default();
        let today = d(2024, 3, 31);
        for offset in 0..31 {
            for w in registry.iter() {
                let f = form(&w.name, &format!("-{}d", offset), "3");
                if let Ok(entry) = create_entry(&registry, &f, today) {
                    assert!(!entry.is_saturday || w.allows_saturday);
                }
            }
        }
    }

    #[test]
    fn test_create_entry_hours_bounds() {
        let registry = Registry::default();
        let today = d(2024, 3, 13);
        assert!(create_entry(&registry, &form("Calma", "today", "1"), today).is_ok());
        assert!(create_entry(&registry, &form("Calma", "today", "24"), today).is_ok());
        assert_eq!(
            create_entry(&registry, &form("Calma", "today", "0"), today).unwrap_err(),
            EntryError::HoursOutOfRange(0)
        );
        assert_eq!(
            create_entry(&registry, &form("Calma", "today", "25"), today).unwrap_err(),
            EntryError::HoursOutOfRange(25)
        );
        assert_eq!(
            create_entry(&registry, &form("Calma", "today", "2.5"), today).unwrap_err(),
            EntryError::InvalidHours("2.5".to_string())
        );
        assert!(matches!(
            create_entry(&registry, &form("Calma", "soon", "2"), today).unwrap_err(),
            EntryError::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_validate_form_ignores_hours() {
        let registry = Registry::default();
        let today = d(2024, 3, 13);
        assert!(validate_form(&registry, &form("Calma", "today", ""), today).is_ok());
        assert!(validate_form(&registry, &form("Holmes Place", "2024-03-09", "3"), today).is_err());
    }
}
