use log::trace;

use super::context::Context;
use super::session::Session;
use super::store::TransitionStore;

/// Extracts order-1 and order-2 transitions from one session.
///
/// For each position `i` (target = `session[i]`):
/// - `i >= 1`: counts `(session[i-1]) → target`
/// - `i >= 2`: counts `(session[i-2], session[i-1]) → target`
pub fn train_session(store: &mut TransitionStore, session: &Session) {
	let commands = session.commands();
	trace!("training on session starting with {:?}", &commands[..commands.len().min(3)]);

	for (i, target) in commands.iter().enumerate() {
		if i >= 1 {
			store.record(Context::unigram(&commands[i - 1]), target);
		}
		if i >= 2 {
			store.record(Context::bigram(&commands[i - 2], &commands[i - 1]), target);
		}
	}
}

/// Trains `store` on every session, in order.
///
/// Must run exactly once on a fresh store: training the same store twice
/// double-counts every transition. `TransitionStore::default()` followed by
/// one call is the supported lifecycle.
pub fn train<'a, I>(store: &mut TransitionStore, sessions: I)
where
	I: IntoIterator<Item = &'a Session>,
{
	for session in sessions {
		train_session(store, session);
	}
}

/// Builds a fresh store from `sessions`.
pub fn build_store<'a, I>(sessions: I) -> TransitionStore
where
	I: IntoIterator<Item = &'a Session>,
{
	let mut store = TransitionStore::new();
	train(&mut store, sessions);
	store
}
