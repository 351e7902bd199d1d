pub mod classifier;
pub mod fetcher;
pub mod tag_reconciler;
pub mod timestamp;

pub use classifier::{classify, AgeClass, AgeOutcome, BrokenReason, Classification, RuleSet, TagDecision};
pub use fetcher::EntryFetcher;
pub use tag_reconciler::{ReconcileOutcome, TagReconciler};
pub use timestamp::parse_created_at;
