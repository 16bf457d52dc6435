use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::input::EntryForm;
use crate::model::entry::WorkEntry;
use crate::model::summary::MonthlyReport;
use crate::model::workplace::Registry;
use crate::repository::EntryRepository;
use crate::service::session::{Session, SessionState};
use crate::service::summary::{months_with_entries, summarize};
use crate::service::validation::{create_entry, validate_form, EntryError};
use crate::time::YearMonth;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] EntryError),
    #[error("Not authorized: {0}")]
    Auth(String),
    #[error("Entries have not been loaded yet")]
    NotLoaded,
    #[error("Entries added since the last failed save would be lost; save them first")]
    UnsavedEntries,
    #[error("Storage error: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    /// Load failed; the collection was reset to empty.
    Failed(String),
}

impl LoadState {
    /// A load attempt has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Saved(WorkEntry),
    /// Kept in memory; the store did not accept the save.
    Unsaved { entry: WorkEntry, error: String },
}

impl Submission {
    pub fn entry(&self) -> &WorkEntry {
        match self {
            Submission::Saved(entry) | Submission::Unsaved { entry, .. } => entry,
        }
    }
}

/// Holds the entry collection and drives persistence for it.
///
/// Every mutation takes `&mut self`, so at most one save is ever in flight.
pub struct Tracker<R: EntryRepository> {
    registry: Registry,
    session: Session<R>,
    entries: Vec<WorkEntry>,
    load_state: LoadState,
    unsaved: bool,
    banner: Option<String>,
}

impl<R: EntryRepository> Tracker<R> {
    pub fn new(registry: Registry, repo: R) -> Self {
        Self {
            registry,
            session: Session::new(repo),
            entries: Vec::new(),
            load_state: LoadState::NotLoaded,
            unsaved: false,
            banner: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn has_unsaved(&self) -> bool {
        self.unsaved
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Signs in and loads. A failed load is not an error here; it shows up in
    /// `load_state` and the banner.
    pub fn sign_in(&mut self) -> Result<(), TrackerError> {
        if let Err(e) = self.session.sign_in() {
            self.banner = Some(e.to_string());
            return Err(e);
        }
        self.banner = None;
        self.load_entries();
        Ok(())
    }

    /// Clears what is in memory. Stored data is left alone, so signing in
    /// again brings it back.
    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.entries.clear();
        self.load_state = LoadState::NotLoaded;
        self.unsaved = false;
        self.banner = None;
    }

    /// Replaces the in-memory collection with the stored one. On failure the
    /// collection becomes empty and the error is returned and bannered.
    pub fn load(&mut self) -> Result<usize, TrackerError> {
        self.session.repository()?;
        if self.unsaved {
            return Err(TrackerError::UnsavedEntries);
        }
        match self.load_entries() {
            Some(message) => Err(TrackerError::Persistence(anyhow::anyhow!(message))),
            None => Ok(self.entries.len()),
        }
    }

    fn load_entries(&mut self) -> Option<String> {
        let repo = match self.session.repository() {
            Ok(repo) => repo,
            Err(e) => return Some(e.to_string()),
        };

        self.load_state = LoadState::Loading;
        match repo.load() {
            Ok(entries) => {
                info!(count = entries.len(), "entries loaded");
                self.entries = entries;
                self.load_state = LoadState::Loaded;
                None
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!("load failed, starting empty: {}", message);
                self.entries.clear();
                self.load_state = LoadState::Failed(message.clone());
                self.banner = Some(format!("Failed to load entries: {}", message));
                Some(message)
            }
        }
    }

    /// Live validation for the form being edited.
    pub fn check(&self, form: &EntryForm, today: NaiveDate) -> Result<(), EntryError> {
        validate_form(&self.registry, form, today)
    }

    /// Validates the form, appends the new entry and saves the whole
    /// collection including it.
    pub fn submit(&mut self, form: &EntryForm, today: NaiveDate) -> Result<Submission, TrackerError> {
        self.session.repository()?;
        if !self.load_state.is_settled() {
            return Err(TrackerError::NotLoaded);
        }

        let entry = create_entry(&self.registry, form, today)?;
        self.entries.push(entry.clone());

        let result = self.session.repository().and_then(|repo| {
            repo.save(&self.entries).map_err(TrackerError::Persistence)
        });

        match result {
            Ok(()) => {
                info!(id = %entry.id, workplace = %entry.workplace, date = %entry.date, hours = entry.hours, "entry saved");
                self.unsaved = false;
                Ok(Submission::Saved(entry))
            }
            Err(e) => {
                let error = e.to_string();
                warn!(id = %entry.id, "entry kept in memory only: {}", error);
                self.unsaved = true;
                self.banner = Some(format!("Entry not saved: {}", error));
                Ok(Submission::Unsaved { entry, error })
            }
        }
    }

    /// `None` until a load attempt has finished.
    pub fn entries(&self) -> Option<&[WorkEntry]> {
        self.load_state.is_settled().then_some(self.entries.as_slice())
    }

    pub fn summary(&self, month: YearMonth) -> Option<MonthlyReport> {
        self.entries()
            .map(|entries| summarize(&self.registry, entries, month))
    }

    pub fn months(&self) -> Option<Vec<YearMonth>> {
        self.entries().map(months_with_entries)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.state() == &SessionState::Ready
    }
}
