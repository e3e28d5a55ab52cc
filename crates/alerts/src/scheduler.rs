//! Saved-search alert scheduler.
//!
//! [`AlertScheduler`] runs as a background task, periodically sweeping the
//! alert-enabled saved searches, re-executing the ones whose cadence has
//! elapsed, and stamping `last_alert_sent_at`. Executing a saved search
//! does not diff against earlier results; the alert simply reports the
//! fresh match count.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use xpshare_core::alert::{is_due, AlertFrequency};
use xpshare_core::filter::SearchFilters;
use xpshare_db::models::saved_search::SavedSearch;
use xpshare_db::repositories::{SavedSearchRepo, SearchRepo};
use xpshare_db::DbPool;

use crate::email::EmailDelivery;

/// Default sweep interval when `ALERT_CHECK_INTERVAL_SECS` is not set.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(3600);

// ---------------------------------------------------------------------------
// AlertScheduler
// ---------------------------------------------------------------------------

/// Background service that processes saved-search alerts periodically.
pub struct AlertScheduler {
    pool: DbPool,
    email: Option<EmailDelivery>,
    check_interval: Duration,
}

impl AlertScheduler {
    /// Create a new scheduler.
    ///
    /// `email` is `None` when SMTP is unconfigured; due alerts are then
    /// executed and stamped but nothing is delivered.
    pub fn new(pool: DbPool, email: Option<EmailDelivery>, check_interval: Duration) -> Self {
        Self {
            pool,
            email,
            check_interval,
        }
    }

    /// Run the scheduler loop.
    ///
    /// Exits gracefully when the provided [`CancellationToken`] is
    /// cancelled. A failed sweep is logged and retried on the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.check_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Alert scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep().await {
                        tracing::error!(error = %e, "Alert sweep failed");
                    }
                }
            }
        }
    }

    /// Find all due saved searches and process each one.
    ///
    /// Per-search failures are logged and never abort the rest of the
    /// sweep.
    async fn sweep(&self) -> Result<(), sqlx::Error> {
        let enabled = SavedSearchRepo::list_alert_enabled(&self.pool).await?;
        let now = Utc::now();

        let mut processed = 0usize;
        for search in &enabled {
            let Some(frequency) = parse_frequency(search) else {
                continue;
            };
            if !is_due(frequency, search.last_alert_sent_at, now) {
                continue;
            }
            match self.process(search).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    tracing::error!(
                        saved_search_id = search.id,
                        error = %e,
                        "Failed to process saved-search alert"
                    );
                }
            }
        }

        if processed > 0 {
            tracing::info!(count = processed, "Processed saved-search alerts");
        }

        Ok(())
    }

    /// Execute one due saved search and deliver its alert.
    async fn process(&self, search: &SavedSearch) -> Result<(), sqlx::Error> {
        let filters: SearchFilters = match serde_json::from_value(search.filters.clone()) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    saved_search_id = search.id,
                    error = %e,
                    "Stored filters no longer deserialize; skipping alert"
                );
                return Ok(());
            }
        };

        let results = SearchRepo::search(&self.pool, &filters, None, None).await?;
        let result_count = results.len() as i64;

        if let (Some(mailer), Some(to)) = (&self.email, search.notify_email.as_deref()) {
            // Delivery failures are not retried; the stamp below still
            // advances so a flaky mailbox cannot pile up duplicate sends.
            if let Err(e) = mailer.deliver(to, &search.name, result_count).await {
                tracing::error!(
                    saved_search_id = search.id,
                    error = %e,
                    "Alert email delivery failed"
                );
            }
        }

        SavedSearchRepo::mark_alert_sent(&self.pool, search.id).await?;

        tracing::info!(
            saved_search_id = search.id,
            owner_id = search.owner_id,
            result_count,
            "Saved-search alert executed"
        );

        Ok(())
    }
}

/// Parse a row's stored frequency, logging rows that violate the
/// enabled-implies-frequency invariant instead of failing the sweep.
fn parse_frequency(search: &SavedSearch) -> Option<AlertFrequency> {
    match search.alert_frequency.as_deref() {
        Some(raw) => match raw.parse() {
            Ok(f) => Some(f),
            Err(_) => {
                tracing::warn!(
                    saved_search_id = search.id,
                    frequency = raw,
                    "Unknown alert frequency on enabled saved search"
                );
                None
            }
        },
        None => {
            tracing::warn!(
                saved_search_id = search.id,
                "Alert-enabled saved search has no frequency"
            );
            None
        }
    }
}
