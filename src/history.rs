//! In-memory log of recent recommendation envelopes for the debug surface.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::recommendation::{RecommendationSet, SourceTag};

/// Compact fingerprint of one generated set: enough for diagnostics, no
/// profile data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub generated_at: DateTime<Utc>,
    pub source: SourceTag,
    pub fallback: bool,
    pub top_destinations: Vec<String>,
    pub top_scores: Vec<u8>,
    pub elapsed_ms: u64,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, set: &RecommendationSet) {
        let (destinations, scores) = {
            let mut d = Vec::new();
            let mut s = Vec::new();
            for r in set.recommendations.iter().take(3) {
                d.push(r.destination.clone());
                s.push(r.match_score);
            }
            (d, s)
        };

        let entry = HistoryEntry {
            generated_at: set.metadata.generated_at,
            source: set.metadata.source,
            fallback: set.metadata.fallback,
            top_destinations: destinations,
            top_scores: scores,
            elapsed_ms: set.metadata.elapsed_ms,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::{static_fallback, Metadata};
    use std::time::Duration;

    fn sample_set() -> RecommendationSet {
        RecommendationSet {
            recommendations: static_fallback(),
            metadata: Metadata::new(SourceTag::StaticFallback, true, Duration::from_millis(5)),
        }
    }

    #[test]
    fn capacity_drops_oldest_first() {
        let h = History::with_capacity(2);
        for _ in 0..3 {
            h.push(&sample_set());
        }
        assert_eq!(h.snapshot_last_n(10).len(), 2);
    }

    #[test]
    fn snapshot_returns_most_recent() {
        let h = History::with_capacity(10);
        h.push(&sample_set());
        h.push(&sample_set());
        let snap = h.snapshot_last_n(1);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].top_destinations, vec!["Lisbon".to_string()]);
        assert!(snap[0].fallback);
    }
}
