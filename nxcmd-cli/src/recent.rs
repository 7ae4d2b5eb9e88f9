use std::path::Path;
use std::{fs, io};

use nxcmd_core::model::record::{clean_command, decode_line};

/// Substrings identifying this tool's own invocations in the log.
const SELF_MARKERS: [&str; 3] = ["nxcmd", "nextcmd", "main.py"];

/// Reads the last `n` commands from the tail of the history log.
///
/// # Behavior
/// - Walks the log backwards, skipping undecodable lines
/// - Commands are cleaned the same way as for training
/// - Invocations of this tool itself are skipped, so `nxcmd suggest`
///   predicts from what the user ran before asking
/// - Returns the commands oldest first
/// - A missing log yields an empty list
pub fn recent_commands<P: AsRef<Path>>(log_path: P, n: usize) -> io::Result<Vec<String>> {
	let bytes = match fs::read(log_path) {
		Ok(bytes) => bytes,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(e) => return Err(e),
	};
	let text = String::from_utf8_lossy(&bytes);
	let lines: Vec<&str> = text.lines().collect();

	let mut recent = Vec::with_capacity(n);
	for (index, line) in lines.iter().enumerate().rev() {
		if recent.len() >= n {
			break;
		}
		let Ok(record) = decode_line(index + 1, line) else {
			continue;
		};
		if SELF_MARKERS.iter().any(|marker| record.command.contains(marker)) {
			continue;
		}
		let command = clean_command(&record.command);
		if !command.is_empty() {
			recent.push(command);
		}
	}

	recent.reverse();
	Ok(recent)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn returns_last_commands_in_order() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, r#"{{"cmd":"ls","ts":1700000000}}"#).unwrap();
		writeln!(file, r#"{{"cmd":"12  git add .","ts":1700000001}}"#).unwrap();
		writeln!(file, "garbage").unwrap();
		writeln!(file, r#"{{"cmd":"git   commit","ts":1700000002}}"#).unwrap();
		writeln!(file, r#"{{"cmd":"nxcmd suggest","ts":1700000003}}"#).unwrap();

		let recent = recent_commands(file.path(), 2).unwrap();
		assert_eq!(recent, vec!["git add .", "git commit"]);
	}

	#[test]
	fn missing_log_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		assert!(recent_commands(dir.path().join("none"), 2).unwrap().is_empty());
	}

	#[test]
	fn zero_requested_is_empty() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, r#"{{"cmd":"ls","ts":1700000000}}"#).unwrap();
		assert!(recent_commands(file.path(), 0).unwrap().is_empty());
	}
}
