use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workplace {
    pub name: String,
    pub weekday_rate: f64,
    #[serde(default)]
    pub saturday_rate: f64,
    #[serde(default)]
    pub allows_saturday: bool,
}

impl Workplace {
    pub fn new(name: &str, weekday_rate: f64, saturday_rate: f64, allows_saturday: bool) -> Self {
        Self {
            name: name.to_string(),
            weekday_rate,
            saturday_rate,
            allows_saturday,
        }
    }

    pub fn rate_for(&self, is_saturday: bool) -> f64 {
        if is_saturday {
            self.saturday_rate
        } else {
            self.weekday_rate
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("At least one workplace must be configured")]
    Empty,
    #[error("Workplace name cannot be empty")]
    EmptyName,
    #[error("Duplicate workplace name: {0}")]
    DuplicateName(String),
    #[error("Invalid rate for {0}: rates must be finite and non-negative")]
    InvalidRate(String),
}

/// The fixed, ordered set of workplaces. Every name lookup in the crate goes
/// through [`Registry::get`].
#[derive(Debug, Clone)]
pub struct Registry {
    workplaces: Vec<Workplace>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new(workplaces: Vec<Workplace>) -> Result<Self, RegistryError> {
        if workplaces.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut index = HashMap::with_capacity(workplaces.len());
        for (i, w) in workplaces.iter().enumerate() {
            if w.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            let valid = |r: f64| r.is_finite() && r >= 0.0;
            if !valid(w.weekday_rate) || !valid(w.saturday_rate) {
                return Err(RegistryError::InvalidRate(w.name.clone()));
            }
            if index.insert(w.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateName(w.name.clone()));
            }
        }

        Ok(Self { workplaces, index })
    }

    pub fn get(&self, name: &str) -> Option<&Workplace> {
        self.index.get(name).map(|&i| &self.workplaces[i])
    }

    /// Resolves user input to a workplace: exact name first, then a
    /// case-insensitive match, then a unique case-insensitive prefix.
    pub fn resolve(&self, input: &str) -> Option<&Workplace> {
        let input = input.trim();
        if let Some(w) = self.get(input) {
            return Some(w);
        }
        let lowered = input.to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        if let Some(w) = self.iter().find(|w| w.name.to_lowercase() == lowered) {
            return Some(w);
        }
        let mut matches = self
            .iter()
            .filter(|w| w.name.to_lowercase().starts_with(&lowered));
        match (matches.next(), matches.next()) {
            (Some(w), None) => Some(w),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workplace> {
        self.workplaces.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.workplaces.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn first(&self) -> &Workplace {
        // Non-empty by construction.
        &self.workplaces[0]
    }

    pub fn len(&self) -> usize {
        self.workplaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workplaces.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let workplaces = vec![
            Workplace::new("Sher fitness", 120.0, 120.0, true),
            Workplace::new("Calma", 130.0, 150.0, true),
            Workplace::new("Holmes Place", 120.0, 0.0, false),
        ];
        let index = workplaces
            .iter()
            .enumerate()
            .map(|(i, w)| (w.name.clone(), i))
            .collect();
        Self { workplaces, index }
    }
}
