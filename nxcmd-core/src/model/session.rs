use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::Serialize;

use super::record::{LogRecord, clean_command, decode_line, is_comment};
use crate::config::Config;
use crate::error::RecordError;

/// An ordered run of cleaned commands with no inactivity gap above the
/// configured threshold.
///
/// # Invariants
/// - Sessions produced by `SessionSegmenter` hold at least `min_session_len`
///   commands
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
	commands: Vec<String>,
}

impl Session {
	/// Wraps an already-cleaned command sequence.
	pub fn new(commands: Vec<String>) -> Self {
		Self { commands }
	}

	/// The commands, oldest first.
	pub fn commands(&self) -> &[String] {
		&self.commands
	}

	/// Number of commands in the session.
	pub fn len(&self) -> usize {
		self.commands.len()
	}

	/// Returns `true` if the session holds no command.
	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}
}

impl<S: Into<String>> FromIterator<S> for Session {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter.into_iter().map(Into::into).collect())
	}
}

/// Counters gathered while segmenting one log.
#[derive(Serialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentStats {
	/// Lines seen, blank ones included.
	pub lines_read: usize,
	/// Lines holding only whitespace.
	pub blank_lines: usize,
	/// Lines that could not be decoded.
	pub malformed: usize,
	/// Records whose command is empty once cleaned.
	pub rejected_empty: usize,
	/// Records whose command is a shell comment.
	pub rejected_comment: usize,
	/// Records with a non-zero (or unknown) exit status.
	pub rejected_failed: usize,
	/// Timestamps outside the accepted window, replaced with the current time.
	pub anomalous_timestamps: usize,
	/// Sessions kept for training.
	pub sessions_emitted: usize,
	/// Sessions closed with fewer than `min_session_len` commands.
	pub sessions_discarded: usize,
}

/// Result of segmenting a whole log: the sessions plus every diagnostic.
#[derive(Debug, Default)]
pub struct Segmentation {
	pub sessions: Vec<Session>,
	pub diagnostics: Vec<RecordError>,
	pub stats: SegmentStats,
}

/// Incremental session builder.
///
/// Feed lines (or decoded records) in log order; a completed `Session` is
/// returned whenever a gap closes the current one. Call `finish` once the
/// input is exhausted to flush the last buffer.
///
/// The accepted timestamp window is fixed at construction from `now`, so a
/// whole run is judged against a single clock reading.
#[derive(Debug)]
pub struct SessionSegmenter {
	gap_secs: i64,
	min_len: usize,
	floor: i64,
	ceiling: i64,
	now: i64,
	current: Vec<String>,
	last_ts: i64,
	stats: SegmentStats,
}

impl SessionSegmenter {
	/// Creates a segmenter using the thresholds of `config`.
	///
	/// # Parameters
	/// - `now`: epoch seconds substituted for anomalous timestamps.
	pub fn new(config: &Config, now: i64) -> Self {
		Self {
			gap_secs: config.session_gap_secs,
			min_len: config.min_session_len,
			floor: config.epoch_floor,
			ceiling: now.saturating_add(config.future_tolerance_secs),
			now,
			current: Vec::new(),
			last_ts: 0,
			stats: SegmentStats::default(),
		}
	}

	/// Counters accumulated so far.
	pub fn stats(&self) -> SegmentStats {
		self.stats
	}

	/// Decodes and processes one raw log line.
	///
	/// Blank lines are skipped silently.
	///
	/// # Returns
	/// - `Ok(Some(session))` if this line closed a qualifying session
	/// - `Ok(None)` otherwise
	/// - `Err(..)` if the line could not be decoded; the segmenter state is
	///   untouched and the next line can be pushed as usual
	pub fn push_line(&mut self, line_number: usize, line: &str) -> Result<Option<Session>, RecordError> {
		self.stats.lines_read += 1;
		if line.trim().is_empty() {
			self.stats.blank_lines += 1;
			return Ok(None);
		}

		match decode_line(line_number, line) {
			Ok(record) => Ok(self.push_record(record)),
			Err(e) => {
				self.stats.malformed += 1;
				Err(e)
			}
		}
	}

	/// Filters, normalizes and appends one decoded record.
	///
	/// Records with an empty or comment command, or a non-zero exit status,
	/// are dropped without touching the gap clock.
	pub fn push_record(&mut self, record: LogRecord) -> Option<Session> {
		let command = clean_command(&record.command);

		if command.is_empty() {
			self.stats.rejected_empty += 1;
			return None;
		}
		if is_comment(&command) {
			self.stats.rejected_comment += 1;
			return None;
		}
		if !record.succeeded() {
			self.stats.rejected_failed += 1;
			return None;
		}

		let ts = self.normalize_timestamp(record.timestamp);

		let mut closed = None;
		if !self.current.is_empty() && ts.saturating_sub(self.last_ts) > self.gap_secs {
			let finished = std::mem::replace(&mut self.current, vec![command]);
			closed = self.close(finished);
		} else {
			self.current.push(command);
		}
		self.last_ts = ts;

		closed
	}

	/// Flushes the last buffer, applying the same length rule.
	pub fn finish(mut self) -> (Option<Session>, SegmentStats) {
		let finished = std::mem::take(&mut self.current);
		let session = self.close(finished);
		(session, self.stats)
	}

	/// Replaces timestamps outside `[floor, now + tolerance]` with `now`.
	fn normalize_timestamp(&mut self, ts: i64) -> i64 {
		if ts < self.floor || ts > self.ceiling {
			self.stats.anomalous_timestamps += 1;
			self.now
		} else {
			ts
		}
	}

	fn close(&mut self, commands: Vec<String>) -> Option<Session> {
		if commands.is_empty() {
			return None;
		}
		if commands.len() < self.min_len {
			self.stats.sessions_discarded += 1;
			return None;
		}
		self.stats.sessions_emitted += 1;
		Some(Session::new(commands))
	}
}

/// Segments a whole log into sessions.
///
/// # Parameters
/// - `lines`: raw log lines in file order.
/// - `config`: thresholds.
/// - `now`: epoch seconds used for timestamp correction.
///
/// # Behavior
/// - Each undecodable line is logged at `warn` level, recorded in
///   `diagnostics`, and skipped
/// - Sessions are returned in log order
pub fn segment<I, S>(lines: I, config: &Config, now: i64) -> Segmentation
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut segmenter = SessionSegmenter::new(config, now);
	let mut sessions = Vec::new();
	let mut diagnostics = Vec::new();

	for (index, line) in lines.into_iter().enumerate() {
		match segmenter.push_line(index + 1, line.as_ref()) {
			Ok(Some(session)) => sessions.push(session),
			Ok(None) => (),
			Err(e) => {
				warn!("skipping {e}");
				diagnostics.push(e);
			}
		}
	}

	let (last, stats) = segmenter.finish();
	sessions.extend(last);

	debug!(
		"segmented {} lines into {} sessions ({} malformed, {} anomalous timestamps)",
		stats.lines_read, stats.sessions_emitted, stats.malformed, stats.anomalous_timestamps
	);

	Segmentation { sessions, diagnostics, stats }
}

/// Current time in epoch seconds.
pub fn unix_now() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
		.unwrap_or(0)
}
