use std::sync::{Arc, PoisonError, RwLock};

use log::info;

use super::command_model::{CommandModel, TrainingReport};
use crate::config::Config;
use crate::error::ModelError;

/// A `CommandModel` shared between readers and an occasional retrainer.
///
/// Readers take an `Arc` snapshot and query it without holding any lock.
/// `retrain` builds a complete new model first and only then swaps the
/// active reference, so a reader sees either the old model or the new one,
/// never a store that is still being filled.
#[derive(Debug)]
pub struct SharedModel {
	active: RwLock<Arc<CommandModel>>,
}

impl SharedModel {
	pub fn new(model: CommandModel) -> Self {
		Self { active: RwLock::new(Arc::new(model)) }
	}

	/// Loads and trains the initial model.
	pub fn load(config: Config) -> Result<Self, ModelError> {
		Ok(Self::new(CommandModel::load_and_train(config)?))
	}

	/// The currently active model.
	pub fn snapshot(&self) -> Arc<CommandModel> {
		// The guarded value is a single `Arc`, it cannot be left half-written.
		self.active.read().unwrap_or_else(PoisonError::into_inner).clone()
	}

	/// Replaces the active model.
	pub fn replace(&self, model: CommandModel) {
		*self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(model);
	}

	/// Rebuilds the model from the log with the active configuration and
	/// swaps it in.
	///
	/// # Errors
	/// On failure the active model is kept unchanged.
	pub fn retrain(&self) -> Result<TrainingReport, ModelError> {
		let config = self.snapshot().config().clone();
		self.retrain_with(config)
	}

	/// Same as `retrain`, with a new configuration.
	pub fn retrain_with(&self, config: Config) -> Result<TrainingReport, ModelError> {
		let model = CommandModel::load_and_train(config)?;
		let report = *model.report();
		self.replace(model);
		info!("swapped in retrained model ({} patterns)", report.patterns);
		Ok(report)
	}
}
