use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

/// A ranked next-command suggestion.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Candidate {
	pub command: String,
	/// Number of times the transition was observed.
	pub count: usize,
}

impl Candidate {
	pub fn new<S: Into<String>>(command: S, count: usize) -> Self {
		Self { command: command.into(), count }
	}
}

/// Ranking order used everywhere a list of candidates is returned:
/// count descending, then command ascending (byte-wise lexicographic).
///
/// The tie-break makes rankings independent of hash-map iteration order.
pub fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
	b.count.cmp(&a.count).then_with(|| a.command.cmp(&b.command))
}

/// Sorts candidates in place by `rank_order`.
pub fn rank(candidates: &mut [Candidate]) {
	candidates.sort_by(rank_order);
}

/// Outgoing transitions of one context.
///
/// Maps each observed next command to the number of times it followed the
/// context. Conceptually a node in a Markov chain whose edges are weighted
/// by observation counts.
///
/// # Invariants
/// - Each stored count is strictly positive
/// - Counts only grow (there is no removal)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyMap {
	counts: HashMap<String, usize>,
}

impl FrequencyMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `command`.
	///
	/// - If the command already exists, its count is increased.
	/// - Otherwise, it is inserted with a count of 1.
	pub fn add(&mut self, command: &str) {
		match self.counts.get_mut(command) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(command.to_owned(), 1);
			}
		}
	}

	/// Occurrences of `command`, `0` if never seen.
	pub fn count(&self, command: &str) -> usize {
		self.counts.get(command).copied().unwrap_or(0)
	}

	/// Number of distinct next commands.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.counts.values().sum()
	}

	/// Unordered `(command, count)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// All entries ranked by `rank_order`.
	pub fn ranked(&self) -> Vec<Candidate> {
		let mut candidates: Vec<Candidate> = self.iter().map(|(c, n)| Candidate::new(c, n)).collect();
		rank(&mut candidates);
		candidates
	}

	/// The `n` best entries ranked by `rank_order`.
	pub fn top(&self, n: usize) -> Vec<Candidate> {
		let mut candidates = self.ranked();
		candidates.truncate(n);
		candidates
	}
}
