// src/interview/delta.rs
//! Preference-change tracking between recommendation generations.
//!
//! The tracker is session-scoped state, owned by whoever owns the session;
//! interested parties subscribe to its broadcast channel instead of reaching
//! for a process-wide singleton. Deltas are recomputed on demand from the
//! answer log against the snapshot taken at the last generation.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::interview::context::Answer;

/// Budget and duration changes always invalidate previous recommendations.
const ALWAYS_REGENERATE: [&str; 2] = ["budget", "duration"];

/// This many accumulated changes of any kind also force a full pass.
const CHANGE_COUNT_THRESHOLD: usize = 3;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceDelta {
    /// Question id → old/new pair. BTreeMap keeps serialization order
    /// deterministic.
    pub changed: BTreeMap<String, Change>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl PreferenceDelta {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.changed.len() + self.added.len() + self.removed.len()
    }

    fn touches(&self, id: &str) -> bool {
        self.changed.contains_key(id)
            || self.added.iter().any(|a| a == id)
            || self.removed.iter().any(|r| r == id)
    }
}

/// Effective answer per question id: the latest entry wins.
fn effective(answers: &[Answer]) -> BTreeMap<&str, &str> {
    let mut map = BTreeMap::new();
    for a in answers {
        map.insert(a.id.as_str(), a.answer.as_str());
    }
    map
}

pub fn calculate_delta(current: &[Answer], baseline: &[Answer]) -> PreferenceDelta {
    let now = effective(current);
    let before = effective(baseline);

    let mut delta = PreferenceDelta::default();
    for (id, answer) in &now {
        match before.get(id) {
            None => delta.added.push((*id).to_string()),
            Some(prev) if prev != answer => {
                delta.changed.insert(
                    (*id).to_string(),
                    Change {
                        old: (*prev).to_string(),
                        new: (*answer).to_string(),
                    },
                );
            }
            Some(_) => {}
        }
    }
    for id in before.keys() {
        if !now.contains_key(id) {
            delta.removed.push((*id).to_string());
        }
    }
    delta
}

/// Whether the delta warrants regenerating from scratch rather than patching
/// the previous result set.
pub fn should_full_regeneration(delta: &PreferenceDelta) -> bool {
    if ALWAYS_REGENERATE.iter().any(|id| delta.touches(id)) {
        return true;
    }
    delta.total_changes() >= CHANGE_COUNT_THRESHOLD
}

/// Broadcast payload for preference-change subscribers.
#[derive(Debug, Clone)]
pub struct PreferenceChange {
    pub question_id: String,
}

/// Session-scoped change tracker. Holds the answer snapshot from the last
/// recommendation generation and a broadcast channel for live subscribers.
#[derive(Debug)]
pub struct DeltaTracker {
    baseline: Vec<Answer>,
    tx: broadcast::Sender<PreferenceChange>,
}

impl Default for DeltaTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaTracker {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            baseline: Vec::new(),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.tx.subscribe()
    }

    /// Announce an accepted answer. Lagging or absent receivers are fine.
    pub fn note_answer(&self, question_id: &str) {
        let _ = self.tx.send(PreferenceChange {
            question_id: question_id.to_string(),
        });
    }

    pub fn delta(&self, current: &[Answer]) -> PreferenceDelta {
        calculate_delta(current, &self.baseline)
    }

    /// Snapshot the answers that produced the recommendations just served.
    pub fn mark_used_for_recommendations(&mut self, current: &[Answer]) {
        self.baseline = current.to_vec();
    }
}
