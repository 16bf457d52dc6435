use crate::model::entry::WorkEntry;
use anyhow::Result;

/// Whole-collection persistence. There are no partial updates: every save
/// carries the full current collection and replaces what was stored.
pub trait EntryRepository {
    /// Checks that the backing store can be reached right now.
    fn authorize(&self) -> Result<()> {
        Ok(())
    }
    fn load(&self) -> Result<Vec<WorkEntry>>;
    fn save(&self, entries: &[WorkEntry]) -> Result<()>;
    /// Where the data lives, for status lines and logs.
    fn describe(&self) -> String;
}

impl<T: EntryRepository + ?Sized> EntryRepository for Box<T> {
    fn authorize(&self) -> Result<()> {
        (**self).authorize()
    }
    fn load(&self) -> Result<Vec<WorkEntry>> {
        (**self).load()
    }
    fn save(&self, entries: &[WorkEntry]) -> Result<()> {
        (**self).save(entries)
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}
