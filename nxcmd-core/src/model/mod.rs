//! Top-level module for the next-command model.
//!
//! Data flows through the submodules in this order:
//! - Raw line decoding and repair (`record`)
//! - Session segmentation on inactivity gaps (`session`)
//! - Transition counting (`trainer`) into the store (`store`)
//! - Ranking (`predictor`) and diagnostics (`stats`)
//! - Owned and shared model handles (`command_model`, `shared_model`)

/// Decoding of one history line, including the quote repair pass,
/// and command cleaning.
pub mod record;

/// Filtering, timestamp correction and gap-based grouping of records
/// into sessions.
pub mod session;

/// Order-1 and order-2 lookup keys.
pub mod context;

/// Per-context next-command counts and the ranking rule.
pub mod frequency;

/// Context → frequency map, built once per training run.
pub mod store;

/// N-gram extraction from sessions.
pub mod trainer;

/// Longest-context-first ranking with substring fallback.
pub mod predictor;

/// Read-only aggregate counters and dump.
pub mod stats;

/// Owned model: load, train and query in one value.
pub mod command_model;

/// Model handle with build-aside-then-swap retraining.
pub mod shared_model;

pub use command_model::{CommandModel, TrainingReport};
pub use context::Context;
pub use frequency::Candidate;
pub use predictor::{Prediction, Predictor, Strategy};
pub use session::Session;
pub use shared_model::SharedModel;
pub use store::TransitionStore;
