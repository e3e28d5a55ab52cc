//! Debounced-fetch coordination.
//!
//! The search box fires a suggestion fetch only after a quiet period, and
//! a response may only be applied while it is still the latest dispatch.
//! The original UI relied on the debounce delay alone, which leaves a
//! window where a network-reordered stale response overwrites newer
//! state; [`RequestSequence`] closes that window with a monotonically
//! increasing dispatch token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Quiet period used by the search-as-you-type surfaces.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// RequestSequence
// ---------------------------------------------------------------------------

/// Monotonic dispatch counter for stale-response detection.
///
/// Every dispatch calls [`begin`](RequestSequence::begin) and holds the
/// returned token; before applying a completed response the holder asks
/// [`is_current`](RequestSequence::is_current). A token goes stale the
/// moment a newer dispatch begins, regardless of completion order.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new dispatch, invalidating all earlier tokens.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` is still the newest dispatch.
    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Coalesces rapid calls down to the latest one.
///
/// ```ignore
/// if let Some(token) = debouncer.debounce().await {
///     let suggestions = fetch(&query).await?;
///     if debouncer.is_current(token) {
///         apply(suggestions);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    seq: RequestSequence,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            seq: RequestSequence::new(),
        }
    }

    /// Wait out the quiet period.
    ///
    /// Returns the dispatch token if this call is still the latest once the
    /// quiet period elapses, or `None` if a newer call superseded it (the
    /// superseded caller should drop its work entirely).
    pub async fn debounce(&self) -> Option<u64> {
        let token = self.seq.begin();
        tokio::time::sleep(self.quiet).await;
        self.seq.is_current(token).then_some(token)
    }

    /// Whether a previously returned token is still the latest dispatch.
    ///
    /// Checked again after the fetch completes so a reordered response
    /// cannot clobber the state of a newer one.
    pub fn is_current(&self, token: u64) -> bool {
        self.seq.is_current(token)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn tokens_increase_and_invalidate_predecessors() {
        let seq = RequestSequence::new();
        let first = seq.begin();
        let second = seq.begin();
        assert!(second > first);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn lone_call_survives_the_quiet_period() {
        let debouncer = Debouncer::default();
        let token = debouncer.debounce().await;
        assert!(token.is_some());
        assert!(debouncer.is_current(token.unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_calls_collapse_to_the_latest() {
        let debouncer = Arc::new(Debouncer::default());

        let d1 = Arc::clone(&debouncer);
        let first = tokio::spawn(async move { d1.debounce().await });

        // Retype within the quiet period.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let d2 = Arc::clone(&debouncer);
        let second = tokio::spawn(async move { d2.debounce().await });

        assert_eq!(first.await.unwrap(), None);
        let token = second.await.unwrap();
        assert!(token.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn calls_separated_by_the_quiet_period_both_fire() {
        let debouncer = Debouncer::default();

        let first = debouncer.debounce().await;
        assert!(first.is_some());

        tokio::time::sleep(DEFAULT_QUIET_PERIOD).await;
        let second = debouncer.debounce().await;
        assert!(second.is_some());

        // The earlier token is stale once the newer dispatch began.
        assert!(!debouncer.is_current(first.unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_token_fails_the_post_fetch_check() {
        let debouncer = Debouncer::default();

        // First dispatch debounces successfully; its fetch is now in flight.
        let token = debouncer.debounce().await.unwrap();
        // A newer dispatch begins before the first fetch resolves.
        let latest = debouncer.debounce().await.unwrap();

        assert!(!debouncer.is_current(token));
        assert!(debouncer.is_current(latest));
    }
}
