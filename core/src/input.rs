use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::model::workplace::Registry;

pub const FORM_KEYS: [&str; 2] = ["date", "hours"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !key.chars().all(|c| c.is_ascii_digit()) {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub workplace: String,
    pub date: String,
    pub hours: String,
}

impl EntryForm {
    pub fn new(registry: &Registry) -> Self {
        Self {
            workplace: registry.first().name.clone(),
            date: "today".to_string(),
            hours: "1".to_string(),
        }
    }

    pub fn from_args(args: &[String], registry: &Registry) -> Result<Self> {
        let parsed = parse_args(args);
        let mut form = Self::new(registry);

        if parsed.name.trim().is_empty() {
            return Err(anyhow!("Workplace is required"));
        }
        form.workplace = match registry.resolve(&parsed.name) {
            Some(w) => w.name.clone(),
            None => parsed.name,
        };

        for (key, value) in parsed.metadata {
            match expand_key(&key, &FORM_KEYS)?.as_str() {
                "date" => form.date = value,
                "hours" => form.hours = value,
                _ => {}
            }
        }

        Ok(form)
    }
}
