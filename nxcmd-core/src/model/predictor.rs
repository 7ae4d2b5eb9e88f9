use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::context::Context;
use super::frequency::{Candidate, rank};
use super::store::TransitionStore;
use crate::config::Config;

/// Which lookup stage produced a prediction.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	/// At least one exact context (order 2 and/or order 1) was found.
	Exact,
	/// No exact context matched; candidates come from the substring fallback.
	Fuzzy,
	/// Nothing found.
	None,
}

/// Ranked suggestions for one query.
///
/// An empty prediction is a normal outcome meaning "no prediction
/// available", not an error.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
	pub candidates: Vec<Candidate>,
	pub strategy: Strategy,
}

impl Prediction {
	pub fn empty() -> Self {
		Self { candidates: Vec::new(), strategy: Strategy::None }
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	/// `(command, count)` pairs in rank order.
	pub fn pairs(&self) -> Vec<(&str, usize)> {
		self.candidates.iter().map(|c| (c.command.as_str(), c.count)).collect()
	}
}

/// Read-only ranking of next commands over a `TransitionStore`.
///
/// # Lookup order
/// 1. order-2 context built from the last two history commands
/// 2. order-1 context built from the last history command, filling the
///    remaining slots (entries already returned by step 1 may repeat)
/// 3. only if both found nothing: substring fallback over every stored
///    context
#[derive(Clone, Copy, Debug)]
pub struct Predictor<'a> {
	store: &'a TransitionStore,
	fuzzy_min_chars: usize,
	fuzzy_per_context: usize,
}

impl<'a> Predictor<'a> {
	/// Creates a predictor using the fallback tuning of `config`.
	pub fn new(store: &'a TransitionStore, config: &Config) -> Self {
		Self {
			store,
			fuzzy_min_chars: config.fuzzy_min_chars,
			fuzzy_per_context: config.fuzzy_per_context,
		}
	}

	/// Predicts the next command after `history` (oldest first).
	///
	/// # Parameters
	/// - `history`: recent commands, already cleaned.
	/// - `top_k`: maximum number of candidates.
	///
	/// # Returns
	/// At most `top_k` candidates. Empty when `history` is empty, when
	/// `top_k` is 0, or when nothing matches.
	pub fn predict<S: AsRef<str>>(&self, history: &[S], top_k: usize) -> Prediction {
		if history.is_empty() || top_k == 0 {
			return Prediction::empty();
		}

		let candidates = self.exact(history, top_k);
		if !candidates.is_empty() {
			return Prediction { candidates, strategy: Strategy::Exact };
		}

		let candidates = self.fuzzy(history, top_k);
		if !candidates.is_empty() {
			debug!("fuzzy fallback found {} candidates", candidates.len());
			return Prediction { candidates, strategy: Strategy::Fuzzy };
		}

		Prediction::empty()
	}

	/// Steps 1 and 2: longest context first, then the shorter one.
	fn exact<S: AsRef<str>>(&self, history: &[S], top_k: usize) -> Vec<Candidate> {
		let mut candidates = Vec::new();

		if let Some(map) = Context::from_tail(history, 2).and_then(|ctx| self.store.get(&ctx)) {
			candidates.extend(map.top(top_k));
			debug!("order-2 context gave {} candidates", candidates.len());
		}

		if candidates.len() < top_k {
			if let Some(map) = Context::from_tail(history, 1).and_then(|ctx| self.store.get(&ctx)) {
				let remaining = top_k - candidates.len();
				let found = map.top(remaining);
				debug!("order-1 context gave {} candidates", found.len());
				candidates.extend(found);
			}
		}

		candidates
	}

	/// Step 3: substring fallback.
	///
	/// Every history command of at least `fuzzy_min_chars` characters is
	/// searched for in each stored context's joined text. Each matching
	/// context contributes its `fuzzy_per_context` best entries. Entries are
	/// merged by command keeping the highest count, then ranked.
	///
	/// The match is plain substring containment, so short commands can match
	/// unrelated contexts (`"git"` is found in `"digit"`).
	pub fn fuzzy<S: AsRef<str>>(&self, history: &[S], top_k: usize) -> Vec<Candidate> {
		let needles: Vec<&str> = history
			.iter()
			.map(|cmd| cmd.as_ref())
			.filter(|cmd| cmd.chars().count() >= self.fuzzy_min_chars)
			.collect();
		if needles.is_empty() || top_k == 0 {
			return Vec::new();
		}

		let mut best: HashMap<String, usize> = HashMap::new();
		for (context, map) in self.store.iter() {
			let joined = context.joined();
			if !needles.iter().any(|needle| joined.contains(needle)) {
				continue;
			}
			for candidate in map.top(self.fuzzy_per_context) {
				let count = best.entry(candidate.command).or_insert(0);
				*count = (*count).max(candidate.count);
			}
		}

		let mut candidates: Vec<Candidate> = best.into_iter().map(|(command, count)| Candidate { command, count }).collect();
		rank(&mut candidates);
		candidates.truncate(top_k);
		candidates
	}
}
