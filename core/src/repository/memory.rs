use std::cell::{Cell, RefCell};

use anyhow::{anyhow, Result};

use crate::model::entry::WorkEntry;
use crate::repository::traits::EntryRepository;

/// In-process store. Nothing outlives the process.
#[derive(Default)]
pub struct MemoryEntryRepository {
    entries: RefCell<Vec<WorkEntry>>,
    saves: Cell<usize>,
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<WorkEntry>) -> Self {
        Self {
            entries: RefCell::new(entries),
            saves: Cell::new(0),
        }
    }

    pub fn stored(&self) -> Vec<WorkEntry> {
        self.entries.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl EntryRepository for MemoryEntryRepository {
    fn load(&self) -> Result<Vec<WorkEntry>> {
        Ok(self.entries.borrow().clone())
    }

    fn save(&self, entries: &[WorkEntry]) -> Result<()> {
        let mut stored = self
            .entries
            .try_borrow_mut()
            .map_err(|_| anyhow!("Store is busy"))?;
        *stored = entries.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory (not persisted)".to_string()
    }
}
