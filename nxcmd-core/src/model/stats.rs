use std::collections::HashMap;

use serde::Serialize;

use super::context::Context;
use super::frequency::{Candidate, rank};
use super::store::TransitionStore;

/// Number of candidates shown per context by `debug_dump`.
pub const DUMP_CANDIDATES: usize = 3;

/// Aggregate counters over a `TransitionStore`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ModelStats {
	/// Distinct contexts learned.
	pub contexts: usize,
	/// Distinct (context, target) pairs.
	pub transitions: usize,
	/// Sum of all transition counts.
	pub observations: usize,
	/// Most frequent target commands, counts summed over all contexts.
	pub top_commands: Vec<Candidate>,
}

/// One line of `debug_dump`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ContextSummary {
	pub context: Context,
	pub candidates: Vec<Candidate>,
}

/// Computes aggregate counters; never mutates the store.
///
/// # Parameters
/// - `top_n`: how many of the most frequent target commands to report.
pub fn stats(store: &TransitionStore, top_n: usize) -> ModelStats {
	let mut totals: HashMap<&str, usize> = HashMap::new();
	for (_, map) in store.iter() {
		for (command, count) in map.iter() {
			*totals.entry(command).or_insert(0) += count;
		}
	}

	let mut top_commands: Vec<Candidate> = totals.into_iter().map(|(command, count)| Candidate::new(command, count)).collect();
	rank(&mut top_commands);
	top_commands.truncate(top_n);

	ModelStats {
		contexts: store.len(),
		transitions: store.transition_count(),
		observations: store.observation_count(),
		top_commands,
	}
}

/// Lists the first `limit` contexts (store order) with their best candidates.
pub fn debug_dump(store: &TransitionStore, limit: usize) -> Vec<ContextSummary> {
	store
		.iter()
		.take(limit)
		.map(|(context, map)| ContextSummary { context: context.clone(), candidates: map.top(DUMP_CANDIDATES) })
		.collect()
}
