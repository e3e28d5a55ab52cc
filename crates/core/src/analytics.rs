//! Search-log aggregation.
//!
//! Pure single-pass folds over rows the repository layer has already
//! fetched. Nothing here does I/O; the output is recomputed in full on
//! every request and never persisted.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Input samples
// ---------------------------------------------------------------------------

/// One search-log row, reduced to the fields the aggregator needs.
#[derive(Debug, Clone)]
pub struct QuerySample {
    /// Raw query text as logged; canonicalized during aggregation.
    pub query: String,
    /// Result count recorded for the search, if any was recorded.
    pub result_count: Option<i32>,
    /// Whether the user clicked a result after this search.
    pub clicked: bool,
    pub searched_at: Timestamp,
}

/// One keyed observation (category, location name, ...) for count summaries.
#[derive(Debug, Clone)]
pub struct KeySample {
    pub key: String,
    pub observed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Aggregated statistics for one canonical query key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStat {
    /// Canonical key: trimmed, lower-cased query text.
    pub query: String,
    pub count: i64,
    /// Mean recorded result count, rounded to the nearest integer.
    /// 0 when the group has no recorded counts at all.
    pub avg_result_count: i32,
    /// `round(clicks / count * 100)`, always within `[0, 100]`.
    pub click_through_rate: i32,
    pub last_searched_at: Timestamp,
}

/// Aggregated count for one canonical key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyCount {
    pub key: String,
    pub count: i64,
    pub last_seen_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Canonical grouping key: trim + lowercase.
pub fn canonical_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

struct QueryAcc {
    count: i64,
    result_sum: i64,
    result_samples: i64,
    clicks: i64,
    last_searched_at: Timestamp,
}

/// Fold search-log samples into per-query statistics.
///
/// Single pass: samples are grouped under their canonical key, counts and
/// click totals accumulate, and the latest timestamp is tracked. Samples
/// whose canonical key is empty are dropped. Output is sorted descending by
/// count; ties keep the order in which their key first appeared in the
/// input (stable sort).
pub fn aggregate_query_stats(samples: &[QuerySample]) -> Vec<QueryStat> {
    let mut groups: HashMap<String, QueryAcc> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for sample in samples {
        let key = canonical_key(&sample.query);
        if key.is_empty() {
            continue;
        }

        let acc = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            QueryAcc {
                count: 0,
                result_sum: 0,
                result_samples: 0,
                clicks: 0,
                last_searched_at: sample.searched_at,
            }
        });

        acc.count += 1;
        if let Some(n) = sample.result_count {
            acc.result_sum += n as i64;
            acc.result_samples += 1;
        }
        if sample.clicked {
            acc.clicks += 1;
        }
        if sample.searched_at > acc.last_searched_at {
            acc.last_searched_at = sample.searched_at;
        }
    }

    let mut stats: Vec<QueryStat> = order
        .into_iter()
        .map(|key| {
            let acc = &groups[&key];
            // A group may have zero recorded counts; its average is 0, not NaN.
            let avg = if acc.result_samples == 0 {
                0
            } else {
                (acc.result_sum as f64 / acc.result_samples as f64).round() as i32
            };
            let ctr = (acc.clicks as f64 / acc.count as f64 * 100.0).round() as i32;
            QueryStat {
                query: key,
                count: acc.count,
                avg_result_count: avg,
                click_through_rate: ctr,
                last_searched_at: acc.last_searched_at,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Queries whose aggregated average result count is exactly zero.
pub fn zero_result_queries(stats: &[QueryStat]) -> Vec<QueryStat> {
    stats
        .iter()
        .filter(|s| s.avg_result_count == 0)
        .cloned()
        .collect()
}

/// Truncate a stat list to its top `n` entries.
pub fn top_n<T: Clone>(stats: &[T], n: usize) -> Vec<T> {
    stats.iter().take(n).cloned().collect()
}

/// Fold keyed observations into per-key counts.
///
/// Same canonicalization and ordering rules as [`aggregate_query_stats`].
pub fn count_by_key(samples: &[KeySample]) -> Vec<KeyCount> {
    let mut groups: HashMap<String, (i64, Timestamp)> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for sample in samples {
        let key = canonical_key(&sample.key);
        if key.is_empty() {
            continue;
        }
        let entry = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0, sample.observed_at)
        });
        entry.0 += 1;
        if sample.observed_at > entry.1 {
            entry.1 = sample.observed_at;
        }
    }

    let mut counts: Vec<KeyCount> = order
        .into_iter()
        .map(|key| {
            let (count, last_seen_at) = groups[&key];
            KeyCount {
                key,
                count,
                last_seen_at,
            }
        })
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn sample(query: &str, result_count: Option<i32>, clicked: bool, hour: u32) -> QuerySample {
        QuerySample {
            query: query.to_string(),
            result_count,
            clicked,
            searched_at: ts(hour),
        }
    }

    #[test]
    fn groups_case_and_whitespace_insensitively() {
        let rows = vec![
            sample("UFO", Some(0), false, 1),
            sample("ufo", Some(0), true, 2),
            sample("ghost", Some(3), false, 3),
        ];
        let stats = aggregate_query_stats(&rows);

        assert_eq!(stats.len(), 2);

        let ufo = &stats[0];
        assert_eq!(ufo.query, "ufo");
        assert_eq!(ufo.count, 2);
        assert_eq!(ufo.avg_result_count, 0);
        assert_eq!(ufo.click_through_rate, 50);
        assert_eq!(ufo.last_searched_at, ts(2));

        let ghost = &stats[1];
        assert_eq!(ghost.query, "ghost");
        assert_eq!(ghost.count, 1);
        assert_eq!(ghost.avg_result_count, 3);
        assert_eq!(ghost.click_through_rate, 0);

        let zero = zero_result_queries(&stats);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].query, "ufo");
    }

    #[test]
    fn count_matches_canonical_key_occurrences() {
        let rows = vec![
            sample("  Orb ", Some(1), false, 1),
            sample("orb", Some(2), false, 2),
            sample("ORB", None, false, 3),
            sample("shadow person", Some(5), false, 4),
        ];
        let stats = aggregate_query_stats(&rows);
        assert_eq!(stats[0].query, "orb");
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[1].count, 1);
    }

    #[test]
    fn group_with_no_recorded_counts_averages_to_zero() {
        let rows = vec![
            sample("dream", None, false, 1),
            sample("dream", None, true, 2),
        ];
        let stats = aggregate_query_stats(&rows);
        assert_eq!(stats[0].avg_result_count, 0);
        assert_eq!(stats[0].click_through_rate, 50);
        // And it counts as a zero-result query.
        assert_eq!(zero_result_queries(&stats).len(), 1);
    }

    #[test]
    fn average_rounds_to_nearest_integer() {
        let rows = vec![
            sample("haze", Some(1), false, 1),
            sample("haze", Some(2), false, 2),
        ];
        // mean 1.5 rounds to 2
        assert_eq!(aggregate_query_stats(&rows)[0].avg_result_count, 2);
    }

    #[test]
    fn ctr_stays_within_percent_bounds() {
        let rows = vec![
            sample("a1", Some(1), true, 1),
            sample("a1", Some(1), true, 2),
            sample("a1", Some(1), true, 3),
        ];
        let stats = aggregate_query_stats(&rows);
        assert_eq!(stats[0].click_through_rate, 100);

        let rows = vec![
            sample("b2", Some(1), true, 1),
            sample("b2", Some(1), false, 2),
            sample("b2", Some(1), false, 3),
        ];
        // 1/3 = 33.33 rounds to 33
        assert_eq!(aggregate_query_stats(&rows)[0].click_through_rate, 33);
    }

    #[test]
    fn blank_queries_are_dropped() {
        let rows = vec![sample("   ", Some(1), false, 1), sample("real", None, false, 2)];
        let stats = aggregate_query_stats(&rows);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].query, "real");
    }

    #[test]
    fn sort_is_descending_with_stable_ties() {
        let rows = vec![
            sample("first", Some(1), false, 1),
            sample("second", Some(1), false, 2),
            sample("third", Some(1), false, 3),
            sample("third", Some(1), false, 4),
        ];
        let stats = aggregate_query_stats(&rows);
        assert_eq!(stats[0].query, "third");
        // first/second tie on count and keep input order.
        assert_eq!(stats[1].query, "first");
        assert_eq!(stats[2].query, "second");
    }

    #[test]
    fn top_n_never_exceeds_n() {
        let rows: Vec<QuerySample> = (0..30)
            .map(|i| sample(&format!("q{i}"), Some(1), false, 1))
            .collect();
        let stats = aggregate_query_stats(&rows);
        assert_eq!(top_n(&stats, 20).len(), 20);
        assert_eq!(top_n(&stats, 50).len(), 30);
    }

    #[test]
    fn count_by_key_canonicalizes_and_sorts() {
        let rows = vec![
            KeySample {
                key: "Bodensee".to_string(),
                observed_at: ts(1),
            },
            KeySample {
                key: " bodensee ".to_string(),
                observed_at: ts(5),
            },
            KeySample {
                key: "Black Forest".to_string(),
                observed_at: ts(2),
            },
        ];
        let counts = count_by_key(&rows);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].key, "bodensee");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[0].last_seen_at, ts(5));
        assert_eq!(counts[1].key, "black forest");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_query_stats(&[]).is_empty());
        assert!(count_by_key(&[]).is_empty());
    }
}
