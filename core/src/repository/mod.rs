pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::{EntryDocument, FileEntryRepository};
pub use memory::MemoryEntryRepository;
pub use traits::EntryRepository;
