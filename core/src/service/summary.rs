use std::collections::BTreeSet;

use crate::model::entry::WorkEntry;
use crate::model::summary::{MonthSummary, MonthlyReport};
use crate::model::workplace::Registry;
use crate::time::YearMonth;

/// Monthly hours and pay, one summary per registry workplace in registry order.
///
/// Entries are matched by the calendar month of their `date` and split by their
/// stored `is_saturday` flag. Entries naming a workplace the registry does not
/// know are skipped. The input is only read.
pub fn summarize(registry: &Registry, entries: &[WorkEntry], month: YearMonth) -> MonthlyReport {
    let summaries = registry
        .iter()
        .map(|place| {
            let mut summary = MonthSummary::empty(&place.name);

            for entry in entries
                .iter()
                .filter(|e| e.workplace == place.name && month.contains(e.date))
            {
                if entry.is_saturday {
                    summary.saturday_hours = summary.saturday_hours.saturating_add(entry.hours);
                } else {
                    summary.weekday_hours = summary.weekday_hours.saturating_add(entry.hours);
                }
            }

            summary.total_hours = summary.weekday_hours.saturating_add(summary.saturday_hours);
            summary.weekday_pay = summary.weekday_hours as f64 * place.weekday_rate;
            summary.saturday_pay = summary.saturday_hours as f64 * place.saturday_rate;
            summary.total_pay = summary.weekday_pay + summary.saturday_pay;
            summary
        })
        .collect();

    MonthlyReport { month, summaries }
}

/// Distinct months that have at least one entry, newest first.
pub fn months_with_entries(entries: &[WorkEntry]) -> Vec<YearMonth> {
    let months: BTreeSet<YearMonth> = entries.iter().map(|e| YearMonth::of(e.date)).collect();
    months.into_iter().rev().collect()
}

/// Entries of one month for the raw listing, by date then insertion order.
pub fn entries_in_month(entries: &[WorkEntry], month: YearMonth) -> Vec<&WorkEntry> {
    let mut selected: Vec<&WorkEntry> = entries.iter().filter(|e| month.contains(e.date)).collect();
    // Stable sort keeps insertion order within a day.
    selected.sort_by_key(|e| e.date);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EntryId;
    use crate::model::workplace::Workplace;
    use chrono::NaiveDate;

    fn entry(workplace: &str, date: &str, hours: u32, is_saturday: bool) -> WorkEntry {
        WorkEntry {
            id: EntryId::generate(),
            workplace: workplace.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            hours,
            is_saturday,
        }
    }

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn march_entries() -> Vec<WorkEntry> {
        vec![
            entry("Sher fitness", "2024-03-04", 5, false),
            entry("Sher fitness", "2024-03-09", 4, true),
            entry("Holmes Place", "2024-03-05", 3, false),
        ]
    }

    #[test]
    fn test_march_2024_scenario() {
        let registry = Registry::default();
        let report = summarize(&registry, &march_entries(), march());

        assert_eq!(report.summaries.len(), 3);
        let sher = &report.summaries[0];
        assert_eq!(sher.workplace, "Sher fitness");
        assert_eq!((sher.weekday_hours, sher.saturday_hours, sher.total_hours), (5, 4, 9));
        assert_eq!((sher.weekday_pay, sher.saturday_pay, sher.total_pay), (600.0, 480.0, 1080.0));

        assert_eq!(report.summaries[1], MonthSummary::empty("Calma"));

        let holmes = &report.summaries[2];
        assert_eq!((holmes.weekday_hours, holmes.saturday_hours, holmes.total_hours), (3, 0, 3));
        assert_eq!((holmes.weekday_pay, holmes.total_pay), (360.0, 360.0));

        assert_eq!(report.grand_total_pay(), 1440.0);
        assert_eq!(report.grand_total_hours(), 12);
        assert_eq!(report.worked().count(), 2);
    }

    #[test]
    fn test_empty_entries_still_yield_one_summary_per_workplace() {
        let registry = Registry::default();
        let report = summarize(&registry, &[], march());
        let names: Vec<&str> = report.summaries.iter().map(|s| s.workplace.as_str()).collect();
        assert_eq!(names, registry.names());
        assert_eq!(report.grand_total_pay(), 0.0);
    }

    #[test]
    fn test_registry_order_not_alphabetical_or_volume() {
        let registry = Registry::new(vec![
            Workplace::new("Zeta", 10.0, 10.0, true),
            Workplace::new("Alpha", 10.0, 10.0, true),
        ])
        .unwrap();
        let entries = vec![entry("Alpha", "2024-03-04", 20, false)];
        let report = summarize(&registry, &entries, march());
        assert_eq!(report.summaries[0].workplace, "Zeta");
        assert_eq!(report.summaries[1].workplace, "Alpha");
    }

    #[test]
    fn test_filters_other_months_and_years() {
        let registry = Registry::default();
        let entries = vec![
            entry("Calma", "2024-02-29", 2, false),
            entry("Calma", "2023-03-15", 2, false),
            entry("Calma", "2024-03-31", 3, false),
            entry("Calma", "2024-04-01", 2, false),
        ];
        let report = summarize(&registry, &entries, march());
        assert_eq!(report.summaries[1].total_hours, 3);
    }

    #[test]
    fn test_uses_frozen_saturday_flag() {
        let registry = Registry::default();
        // Flag says Saturday although 2024-03-04 is a Monday.
        let entries = vec![entry("Calma", "2024-03-04", 2, true)];
        let report = summarize(&registry, &entries, march());
        let calma = &report.summaries[1];
        assert_eq!(calma.saturday_hours, 2);
        assert_eq!(calma.saturday_pay, 300.0);
        assert_eq!(calma.weekday_hours, 0);
    }

    #[test]
    fn test_totals_identity_per_workplace() {
        let registry = Registry::default();
        let entries = vec![
            entry("Calma", "2024-03-02", 7, true),
            entry("Calma", "2024-03-03", 1, false),
            entry("Calma", "2024-03-16", 6, true),
            entry("Calma", "2024-03-20", 9, false),
        ];
        let report = summarize(&registry, &entries, march());
        let calma = &report.summaries[1];
        assert_eq!(calma.total_hours, calma.weekday_hours + calma.saturday_hours);
        assert_eq!(calma.total_pay, 10.0 * 130.0 + 13.0 * 150.0);
    }

    #[test]
    fn test_is_pure() {
        let registry = Registry::default();
        let entries = march_entries();
        let before = entries.clone();
        let first = summarize(&registry, &entries, march());
        let second = summarize(&registry, &entries, march());
        assert_eq!(first, second);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_oversized_hours_saturate_instead_of_overflowing() {
        let registry = Registry::default();
        let entries = vec![
            entry("Calma", "2024-03-04", u32::MAX, false),
            entry("Calma", "2024-03-05", 2, false),
            entry("Calma", "2024-03-09", u32::MAX, true),
            entry("Sher fitness", "2024-03-06", u32::MAX, false),
        ];
        let report = summarize(&registry, &entries, march());
        let calma = &report.summaries[1];
        assert_eq!(calma.weekday_hours, u32::MAX);
        assert_eq!(calma.total_hours, u32::MAX);
        assert_eq!(report.grand_total_hours(), u32::MAX);
    }

    #[test]
    fn test_unknown_workplaces_are_skipped() {
        let registry = Registry::default();
        let entries = vec![entry("Closed Gym", "2024-03-04", 5, false)];
        let report = summarize(&registry, &entries, march());
        assert_eq!(report.grand_total_hours(), 0);
    }

    #[test]
    fn test_months_with_entries_and_listing() {
        let entries = vec![
            entry("Calma", "2024-03-20", 1, false),
            entry("Calma", "2024-01-02", 1, false),
            entry("Calma", "2024-03-04", 2, false),
            entry("Calma", "2024-03-04", 3, false),
        ];
        assert_eq!(
            months_with_entries(&entries),
            vec![march(), YearMonth::new(2024, 1).unwrap()]
        );

        let listed: Vec<u32> = entries_in_month(&entries, march()).iter().map(|e| e.hours).collect();
        assert_eq!(listed, vec![2, 3, 1]);
    }
}
