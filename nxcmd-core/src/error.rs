use std::path::PathBuf;

use thiserror::Error;

/// Maximum number of characters of an offending line kept for diagnostics.
pub const EXCERPT_CHARS: usize = 100;

/// A history line that could not be decoded into a record.
///
/// Every variant carries the 1-based line number and a truncated excerpt of
/// the line. These are diagnostics only: the line is skipped and decoding of
/// the following lines continues.
#[derive(Debug, Error)]
pub enum RecordError {
	#[error("line {line}: malformed record: {source} ({excerpt}...)")]
	Malformed {
		line: usize,
		excerpt: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("line {line}: missing required field `{field}` ({excerpt}...)")]
	MissingField {
		line: usize,
		field: &'static str,
		excerpt: String,
	},

	#[error("line {line}: timestamp is not an integer ({excerpt}...)")]
	InvalidTimestamp { line: usize, excerpt: String },

	#[error("line {line}: exit status is not an integer ({excerpt}...)")]
	InvalidExitStatus { line: usize, excerpt: String },
}

impl RecordError {
	/// Line number (1-based) of the offending record.
	pub fn line(&self) -> usize {
		match self {
			Self::Malformed { line, .. }
			| Self::MissingField { line, .. }
			| Self::InvalidTimestamp { line, .. }
			| Self::InvalidExitStatus { line, .. } => *line,
		}
	}

	/// Truncated excerpt of the offending line.
	pub fn excerpt(&self) -> &str {
		match self {
			Self::Malformed { excerpt, .. }
			| Self::MissingField { excerpt, .. }
			| Self::InvalidTimestamp { excerpt, .. }
			| Self::InvalidExitStatus { excerpt, .. } => excerpt,
		}
	}
}

/// Returns the first `EXCERPT_CHARS` characters of `line` (UTF-8 safe).
pub(crate) fn excerpt(line: &str) -> String {
	line.chars().take(EXCERPT_CHARS).collect()
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("cannot read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("cannot parse config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid config: {0}")]
	Invalid(String),
}

/// Failure while loading the history log and training.
///
/// Bad log content never produces this error; only an unreadable log
/// (present but not readable) or an invalid configuration does.
#[derive(Debug, Error)]
pub enum ModelError {
	#[error("cannot read history log {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Config(#[from] ConfigError),
}
