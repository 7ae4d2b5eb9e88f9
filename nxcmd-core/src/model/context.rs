use std::fmt;

use serde::{Serialize, Serializer};

/// The one or two commands immediately preceding a target command.
///
/// Used as the lookup key into the `TransitionStore`. The derived ordering
/// (all unigrams before all bigrams, then lexicographic) is the iteration
/// order of the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Context {
	/// Order-1 context: the previous command.
	Unigram(String),
	/// Order-2 context: the two previous commands, oldest first.
	Bigram(String, String),
}

impl Context {
	pub fn unigram<S: Into<String>>(previous: S) -> Self {
		Self::Unigram(previous.into())
	}

	pub fn bigram<A: Into<String>, B: Into<String>>(before: A, previous: B) -> Self {
		Self::Bigram(before.into(), previous.into())
	}

	/// Builds the order-`n` context from the tail of `history`.
	///
	/// Returns `None` if `n` is not 1 or 2, or if `history` is too short.
	pub fn from_tail<S: AsRef<str>>(history: &[S], n: usize) -> Option<Self> {
		match (n, history) {
			(1, [.., last]) => Some(Self::unigram(last.as_ref())),
			(2, [.., before, last]) => Some(Self::bigram(before.as_ref(), last.as_ref())),
			_ => None,
		}
	}

	/// The commands of the context, oldest first.
	pub fn commands(&self) -> Vec<&str> {
		match self {
			Self::Unigram(a) => vec![a.as_str()],
			Self::Bigram(a, b) => vec![a.as_str(), b.as_str()],
		}
	}

	/// The commands joined with single spaces.
	///
	/// This is the text the substring fallback searches in.
	pub fn joined(&self) -> String {
		self.commands().join(" ")
	}
}

impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({})", self.commands().join(" → "))
	}
}

/// Serialized as a JSON array of one or two strings.
impl Serialize for Context {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.commands())
	}
}
