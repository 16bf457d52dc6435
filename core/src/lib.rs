pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use config::{AppConfig, BackendConfig, ConfigError};
pub use input::{expand_key, parse_args, EntryForm, ParsedInput};
pub use model::entry::{EntryId, WorkEntry};
pub use model::summary::{MonthSummary, MonthlyReport};
pub use model::workplace::{Registry, RegistryError, Workplace};
pub use repository::{EntryRepository, FileEntryRepository, MemoryEntryRepository};
pub use service::session::{Session, SessionState};
pub use service::summary::{entries_in_month, months_with_entries, summarize};
pub use service::tracker::{LoadState, Submission, Tracker, TrackerError};
pub use service::validation::{create_entry, validate, validate_form, EntryError};
pub use time::{is_saturday, parse_entry_date, parse_month, YearMonth};
