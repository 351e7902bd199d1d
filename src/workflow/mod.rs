pub mod archive_flow;
pub mod entry_ctx;

pub use archive_flow::{is_paywalled, ArchiveFlow, ArchiveOutcome, KeepReason};
pub use entry_ctx::EntryCtx;
