use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{RecordError, excerpt};

/// Matches the command field up to the first `",` that follows it.
///
/// Group 2 is the (possibly defective) command text. The match is lazy, so
/// a command containing `",` itself is cut short; such lines stay malformed.
static COMMAND_FIELD: LazyLock<Regex> = LazyLock::new(|| {
	// Should not panic, the pattern is a literal
	Regex::new(r#"("(?:cmd|command)"\s*:\s*")(.*?)("\s*,)"#).unwrap()
});

/// One decoded history line.
///
/// Transient: only lives while a single line is being processed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
	/// Command as typed (not yet cleaned).
	pub command: String,
	/// Epoch seconds, as logged (not yet range-checked).
	pub timestamp: i64,
	/// Exit status of the command, `0` when the logger omitted it,
	/// `UNKNOWN_EXIT_STATUS` when it wrote `null`.
	pub exit_status: i64,
}

impl LogRecord {
	/// Returns `true` if the command exited successfully.
	pub fn succeeded(&self) -> bool {
		self.exit_status == 0
	}
}

/// Wire shape written by the shell hook.
///
/// Accepts the hook's short keys (`cmd`, `ts`, `exit_code`) as well as the
/// long ones. Unknown keys are ignored.
#[derive(Deserialize)]
struct RawRecord {
	#[serde(alias = "command")]
	cmd: Option<String>,
	#[serde(alias = "timestamp")]
	ts: Option<Value>,
	#[serde(alias = "exit_status", default, deserialize_with = "present")]
	exit_code: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only an absent key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
	Value::deserialize(deserializer).map(Some)
}

/// Exit status recorded when the logger wrote `null`. Non-zero, so such
/// records are never trained on.
pub const UNKNOWN_EXIT_STATUS: i64 = -1;

/// Escapes quote characters embedded in the command field.
///
/// Some shell hooks write `{"cmd":"echo "hi"", ...}` without escaping. This
/// rewrites the command text so that every quote not already preceded by a
/// backslash becomes `\"`. Lines without the defect are returned unchanged
/// (borrowed).
pub fn repair_line(line: &str) -> Cow<'_, str> {
	COMMAND_FIELD.replace_all(line, |caps: &Captures| {
		format!("{}{}{}", &caps[1], escape_bare_quotes(&caps[2]), &caps[3])
	})
}

/// Prefixes every unescaped `"` with a backslash.
///
/// A quote is already escaped when an odd number of backslashes precede it.
fn escape_bare_quotes(content: &str) -> String {
	let mut out = String::with_capacity(content.len() + 4);
	let mut backslashes = 0usize;

	for c in content.chars() {
		match c {
			'\\' => backslashes += 1,
			'"' => {
				if backslashes % 2 == 0 {
					out.push('\\');
				}
				backslashes = 0;
			}
			_ => backslashes = 0,
		}
		out.push(c);
	}

	out
}

/// Decodes one raw history line into a `LogRecord`.
///
/// The repair pass runs first, then structural decoding.
///
/// # Parameters
/// - `line_number`: 1-based position in the log, used for diagnostics only.
/// - `line`: the raw text line (without line terminator).
///
/// # Errors
/// - `Malformed`: not a JSON object, or `cmd` is not a string
/// - `MissingField`: `cmd` or `ts` absent (or `null`)
/// - `InvalidTimestamp`: `ts` is neither an integer, a float, nor a numeric string
/// - `InvalidExitStatus`: `exit_code` present but neither integral nor `null`
pub fn decode_line(line_number: usize, line: &str) -> Result<LogRecord, RecordError> {
	let line = line.trim();
	let repaired = repair_line(line);

	let raw: RawRecord = serde_json::from_str(&repaired).map_err(|source| RecordError::Malformed {
		line: line_number,
		excerpt: excerpt(line),
		source,
	})?;

	let command = raw.cmd.ok_or_else(|| RecordError::MissingField {
		line: line_number,
		field: "cmd",
		excerpt: excerpt(line),
	})?;

	let ts = raw.ts.ok_or_else(|| RecordError::MissingField {
		line: line_number,
		field: "ts",
		excerpt: excerpt(line),
	})?;
	let timestamp = timestamp_from_value(&ts).ok_or_else(|| RecordError::InvalidTimestamp {
		line: line_number,
		excerpt: excerpt(line),
	})?;

	let exit_status = match raw.exit_code {
		None => 0,
		Some(Value::Null) => UNKNOWN_EXIT_STATUS,
		Some(value) => integral(&value).ok_or_else(|| RecordError::InvalidExitStatus {
			line: line_number,
			excerpt: excerpt(line),
		})?,
	};

	Ok(LogRecord { command, timestamp, exit_status })
}

/// Converts a logged timestamp to epoch seconds.
///
/// Integers are taken as-is, finite floats are truncated toward zero, and
/// strings must hold a decimal integer (surrounding whitespace allowed).
fn timestamp_from_value(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n.as_i64().or_else(|| {
			let f = n.as_f64()?;
			(f.is_finite() && f.abs() < i64::MAX as f64).then(|| f.trunc() as i64)
		}),
		Value::String(s) => s.trim().parse::<i64>().ok(),
		_ => None,
	}
}

/// Reads an integral number (`0`, `1`, `0.0`); anything else is rejected.
fn integral(value: &Value) -> Option<i64> {
	let Value::Number(n) = value else {
		return None;
	};
	n.as_i64().or_else(|| {
		let f = n.as_f64()?;
		(f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
	})
}

/// Cleans a raw command.
///
/// - Strips a leading all-digit token (a `history` line number such as the
///   `825` in `"825  source ~/.bashrc"`) when more tokens follow
/// - Collapses every whitespace run to a single space and trims both ends
///
/// A command made of a single number is kept as-is.
pub fn clean_command(raw: &str) -> String {
	let tokens: Vec<&str> = raw.split_whitespace().collect();
	let start = match tokens.as_slice() {
		[first, _, ..] if is_history_number(first) => 1,
		_ => 0,
	};
	tokens[start..].join(" ")
}

fn is_history_number(token: &str) -> bool {
	!token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Returns `true` for shell comments (`# ...`), which are never trained on.
pub fn is_comment(command: &str) -> bool {
	command.starts_with('#')
}
