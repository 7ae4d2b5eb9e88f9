use log::{info, warn};
use serde::Serialize;

use super::predictor::{Prediction, Predictor};
use super::session::{SegmentStats, segment, unix_now};
use super::stats::{self, ContextSummary, ModelStats};
use super::store::TransitionStore;
use super::trainer::train;
use crate::config::Config;
use crate::error::ModelError;
use crate::io::read_lines_if_exists;

/// Progress counters of one training run.
#[derive(Serialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainingReport {
	/// `false` when the history log did not exist.
	pub log_found: bool,
	/// Number of sessions trained on.
	pub sessions: usize,
	/// Distinct contexts learned ("command patterns").
	pub patterns: usize,
	/// Line-level counters from segmentation.
	pub segmentation: SegmentStats,
}

/// Reads the configured history log and trains `store` from it.
///
/// # Parameters
/// - `config`: log location and thresholds.
/// - `store`: must be fresh; see `trainer::train`.
///
/// # Behavior
/// - A missing log is not an error: the store stays empty and a warning is
///   logged
/// - Malformed lines are skipped with a warning each
/// - Progress (sessions parsed, patterns learned) is logged at `info` level
///
/// # Errors
/// - `ModelError::Config` if `config` is invalid
/// - `ModelError::Io` if the log exists but cannot be read
pub fn load_and_train(config: &Config, store: &mut TransitionStore) -> Result<TrainingReport, ModelError> {
	config.validate()?;

	let path = config.resolved_log_path();
	let lines = read_lines_if_exists(&path).map_err(|source| ModelError::Io { path: path.clone(), source })?;

	let Some(lines) = lines else {
		warn!("history log {} does not exist, skipping training", path.display());
		return Ok(TrainingReport::default());
	};

	let mut report = train_from_lines(config, store, &lines, unix_now());
	report.log_found = true;
	Ok(report)
}

/// Segments `lines` and trains `store` on the resulting sessions.
///
/// `now` is the clock reading used to correct anomalous timestamps.
pub fn train_from_lines<S: AsRef<str>>(config: &Config, store: &mut TransitionStore, lines: &[S], now: i64) -> TrainingReport {
	let segmentation = segment(lines, config, now);
	info!("parsed {} sessions", segmentation.sessions.len());

	train(store, &segmentation.sessions);
	info!("training complete, learned {} command patterns", store.len());

	TrainingReport {
		log_found: true,
		sessions: segmentation.sessions.len(),
		patterns: store.len(),
		segmentation: segmentation.stats,
	}
}

/// A trained model: configuration plus the store it was built into.
///
/// This is the owned, explicit replacement for a process-wide model: the
/// caller holds it and queries it by reference. Each constructor performs a
/// full training pass into a new store, so retraining never double-counts.
#[derive(Clone, Debug)]
pub struct CommandModel {
	config: Config,
	store: TransitionStore,
	report: TrainingReport,
}

impl CommandModel {
	/// Loads the configured history log and trains a new model.
	///
	/// # Errors
	/// See `load_and_train`.
	pub fn load_and_train(config: Config) -> Result<Self, ModelError> {
		let mut store = TransitionStore::new();
		let report = load_and_train(&config, &mut store)?;
		Ok(Self { config, store, report })
	}

	/// Trains a new model from in-memory log lines.
	pub fn from_lines<S: AsRef<str>>(config: Config, lines: &[S], now: i64) -> Self {
		let mut store = TransitionStore::new();
		let report = train_from_lines(&config, &mut store, lines, now);
		Self { config, store, report }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn store(&self) -> &TransitionStore {
		&self.store
	}

	pub fn report(&self) -> &TrainingReport {
		&self.report
	}

	/// Ranks likely next commands after `history`; see `Predictor::predict`.
	pub fn predict<S: AsRef<str>>(&self, history: &[S], top_k: usize) -> Prediction {
		Predictor::new(&self.store, &self.config).predict(history, top_k)
	}

	/// Aggregate counters with the `top_n` most frequent commands.
	pub fn stats(&self, top_n: usize) -> ModelStats {
		stats::stats(&self.store, top_n)
	}

	/// The first `limit` contexts with their best candidates.
	pub fn debug_dump(&self, limit: usize) -> Vec<ContextSummary> {
		stats::debug_dump(&self.store, limit)
	}
}
