use std::collections::BTreeMap;

use super::context::Context;
use super::frequency::FrequencyMap;

/// The learned mapping from context to next-command frequencies.
///
/// The `TransitionStore` is built fresh by one training pass and is then
/// only read. It is never persisted and never merged with another run.
///
/// # Responsibilities
/// - Accumulate transition counts during training
/// - Look up the frequency map of a context
/// - Iterate contexts in a deterministic order (see `Context`'s ordering)
///
/// # Invariants
/// - Each context appears once
/// - Every stored `FrequencyMap` is non-empty
/// - Counts only increase during a training pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionStore {
	transitions: BTreeMap<Context, FrequencyMap>,
}

impl TransitionStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one observation of `target` following `context`.
	///
	/// Only the trainer writes to a store.
	pub(crate) fn record(&mut self, context: Context, target: &str) {
		self.transitions.entry(context).or_default().add(target);
	}

	/// Frequency map of `context`, if it was ever observed.
	pub fn get(&self, context: &Context) -> Option<&FrequencyMap> {
		self.transitions.get(context)
	}

	pub fn contains(&self, context: &Context) -> bool {
		self.transitions.contains_key(context)
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Contexts and their frequency maps, in `Context` order.
	pub fn iter(&self) -> impl Iterator<Item = (&Context, &FrequencyMap)> {
		self.transitions.iter()
	}

	/// Number of distinct (context, target) pairs.
	pub fn transition_count(&self) -> usize {
		self.transitions.values().map(FrequencyMap::len).sum()
	}

	/// Sum of all counts across all contexts.
	pub fn observation_count(&self) -> usize {
		self.transitions.values().map(FrequencyMap::total).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_creates_and_increments() {
		let mut store = TransitionStore::new();
		store.record(Context::unigram("git add ."), "git commit");
		store.record(Context::unigram("git add ."), "git commit");
		store.record(Context::unigram("git add ."), "git status");
		store.record(Context::bigram("git status", "git add ."), "git commit");

		assert_eq!(store.len(), 2);
		assert_eq!(store.transition_count(), 3);
		assert_eq!(store.observation_count(), 4);

		let map = store.get(&Context::unigram("git add .")).unwrap();
		assert_eq!(map.count("git commit"), 2);
		assert!(store.contains(&Context::bigram("git status", "git add .")));
		assert!(!store.contains(&Context::unigram("git status")));
	}

	#[test]
	fn iteration_order_is_deterministic() {
		let mut store = TransitionStore::new();
		store.record(Context::bigram("a", "b"), "c");
		store.record(Context::unigram("b"), "c");
		store.record(Context::unigram("a"), "b");

		let keys: Vec<String> = store.iter().map(|(ctx, _)| ctx.joined()).collect();
		assert_eq!(keys, vec!["a", "b", "a b"]);
	}
}
