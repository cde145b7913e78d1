pub mod filter;
pub mod intent;

pub use filter::{ContentType, FilterPredicate, build_filter};
pub use intent::{Classification, ClassificationFailure, Intent, IntentDecision};
