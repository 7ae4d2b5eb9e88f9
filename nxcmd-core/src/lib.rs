//! Next-command prediction from shell history.
//!
//! This crate learns order-1 and order-2 command transitions from a
//! JSON-lines history log and ranks likely next commands, including:
//! - Record decoding with a repair pass for unescaped quotes
//! - Session segmentation on inactivity gaps
//! - N-gram transition counting
//! - Longest-context-first prediction with a substring fallback
//! - Read-only statistics over the learned transitions
//!
//! The model is always rebuilt from the raw log; nothing is persisted.

/// Runtime configuration (log path, session threshold, fallback tuning).
pub mod config;

/// Error types for decoding, configuration and model loading.
pub mod error;

/// Core model: decoding, segmentation, training, prediction and statistics.
pub mod model;

/// I/O utilities (log loading, path helpers).
///
/// Not exposed
pub(crate) mod io;
