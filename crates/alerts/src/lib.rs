//! Saved-search alert dispatch.
//!
//! Building blocks for the periodic alert sweep:
//!
//! - [`AlertScheduler`] -- background service that finds due alert-enabled
//!   saved searches, re-executes their stored filters, and stamps the
//!   last-sent timestamp.
//! - [`email`] -- SMTP delivery of the result-count notification; skipped
//!   entirely when SMTP is not configured.

pub mod email;
pub mod scheduler;

pub use email::{EmailConfig, EmailDelivery};
pub use scheduler::AlertScheduler;
