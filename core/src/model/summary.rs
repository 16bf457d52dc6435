use serde::{Deserialize, Serialize};

use crate::time::YearMonth;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MonthSummary {
    pub workplace: String,
    pub weekday_hours: u32,
    pub saturday_hours: u32,
    pub total_hours: u32,
    pub weekday_pay: f64,
    pub saturday_pay: f64,
    pub total_pay: f64,
}

impl MonthSummary {
    pub fn empty(workplace: &str) -> Self {
        Self {
            workplace: workplace.to_string(),
            ..Default::default()
        }
    }
}

/// Derived on demand, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub month: YearMonth,
    /// One per registry workplace, in registry order.
    pub summaries: Vec<MonthSummary>,
}

impl MonthlyReport {
    pub fn grand_total_pay(&self) -> f64 {
        self.summaries.iter().map(|s| s.total_pay).sum()
    }

    pub fn grand_total_hours(&self) -> u32 {
        self.summaries
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.total_hours))
    }

    /// Workplaces with at least one hour this month. Display filtering only.
    pub fn worked(&self) -> impl Iterator<Item = &MonthSummary> {
        self.summaries.iter().filter(|s| s.total_hours > 0)
    }
}
