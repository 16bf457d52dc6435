use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const MIN_HOURS: u32 = 1;
pub const MAX_HOURS: u32 = 24;

/// Entry identifier. Stored documents may carry numeric ids (older data) or
/// strings; new entries get a v4 UUID string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EntryId {
    Number(u64),
    Text(String),
}

impl EntryId {
    pub fn generate() -> Self {
        EntryId::Text(Uuid::new_v4().to_string())
    }

    /// First eight characters, for compact tables.
    pub fn short(&self) -> String {
        let s = self.to_string();
        s.chars().take(8).collect()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{}", n),
            EntryId::Text(s) => f.write_str(s),
        }
    }
}

/// One recorded shift. Built only by `create_entry`; never edited afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    pub id: EntryId,
    pub workplace: String,
    pub date: NaiveDate,
    #[serde(deserialize_with = "hours_from_number_or_string")]
    pub hours: u32,
    /// Frozen at creation; aggregation reads this instead of `date`.
    pub is_saturday: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHours {
    Number(u32),
    Text(String),
}

fn hours_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let hours = match RawHours::deserialize(deserializer)? {
        RawHours::Number(n) => n,
        RawHours::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid hours value: {:?}", s)))?,
    };
    if !(MIN_HOURS..=MAX_HOURS).contains(&hours) {
        return Err(serde::de::Error::custom(format!(
            "hours out of range {}..={}: {}",
            MIN_HOURS, MAX_HOURS, hours
        )));
    }
    Ok(hours)
}
