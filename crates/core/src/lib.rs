//! XPShare domain core.
//!
//! Pure domain logic shared by the database, API, and alert crates:
//! search filter model, query-text helpers, the search-log aggregator,
//! alert cadence rules, the vocabulary suggestion state machine, the
//! versioned preset store, and the debounced-fetch guard. This crate has
//! no internal dependencies so any future CLI or worker tooling can use
//! it directly.

pub mod alert;
pub mod analytics;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod preferences;
pub mod search;
pub mod types;
pub mod vocabulary;
