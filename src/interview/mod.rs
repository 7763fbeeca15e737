// src/interview/mod.rs
//! Budget-aware trip interview: a fixed four-question sequence, a context
//! value the answers fold into, and delta tracking against the last
//! recommendation run.

pub mod context;
pub mod delta;
pub mod questions;

pub use context::{Answer, QuestionContext};
pub use delta::{
    calculate_delta, should_full_regeneration, DeltaTracker, PreferenceChange, PreferenceDelta,
};
pub use questions::{apply_answer, is_complete, next_question, AnswerOutcome, Question};
