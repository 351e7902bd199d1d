pub mod entry;
pub mod tag;

pub use entry::{EmbeddedEntries, EntriesPage, Entry, EntryFilter, EntryTag};
pub use tag::ClassificationTag;
