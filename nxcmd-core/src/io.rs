use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Streams the file through a buffered reader
/// - Splits on `\n` / `\r\n`
/// - Invalid UTF-8 sequences are replaced with U+FFFD
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut reader = BufReader::new(File::open(filename)?);
	let mut lines = Vec::new();
	let mut buffer = Vec::new();

	loop {
		buffer.clear();
		if reader.read_until(b'\n', &mut buffer)? == 0 {
			break;
		}
		let line = String::from_utf8_lossy(&buffer);
		lines.push(line.trim_end_matches(['\n', '\r']).to_owned());
	}

	Ok(lines)
}

/// Reads a text file, treating a missing file as empty.
///
/// Returns `Ok(None)` if the file does not exist, so callers can tell
/// "absent" apart from "present but empty".
pub(crate) fn read_lines_if_exists<P: AsRef<Path>>(filename: P) -> io::Result<Option<Vec<String>>> {
	match read_lines(&filename) {
		Ok(lines) => Ok(Some(lines)),
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e),
	}
}

/// Expands a leading `~` to the user's home directory.
///
/// Examples:
/// - `"~/.wm_shell/history.jsonl"` → `"/home/me/.wm_shell/history.jsonl"`
/// - `"/var/log/x"` → unchanged
///
/// If no home directory can be determined the path is returned as-is.
pub(crate) fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
	let path = path.as_ref();
	let Ok(rest) = path.strip_prefix("~") else {
		return path.to_path_buf();
	};
	match dirs::home_dir() {
		Some(home) => home.join(rest),
		None => path.to_path_buf(),
	}
}

/// Returns `true` if `path` points to an existing regular file.
pub(crate) fn is_file<P: AsRef<Path>>(path: P) -> bool {
	fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn read_lines_strips_line_endings() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "one\r\ntwo\nthree").unwrap();

		let lines = read_lines(file.path()).unwrap();
		assert_eq!(lines, vec!["one", "two", "three"]);
	}

	#[test]
	fn missing_file_reads_as_none() {
		let dir = tempfile::tempdir().unwrap();
		let result = read_lines_if_exists(dir.path().join("absent.jsonl")).unwrap();
		assert!(result.is_none());
	}

	#[test]
	fn invalid_utf8_is_replaced() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"ok\n\xff\xfe bad\n").unwrap();

		let lines = read_lines(file.path()).unwrap();
		assert_eq!(lines.len(), 2);
		assert!(lines[1].ends_with(" bad"));
	}

	#[test]
	fn expand_home_leaves_absolute_paths() {
		assert_eq!(expand_home("/tmp/history.jsonl"), PathBuf::from("/tmp/history.jsonl"));
	}

	#[test]
	fn expand_home_replaces_tilde() {
		if let Some(home) = dirs::home_dir() {
			assert_eq!(expand_home("~/.wm_shell/x"), home.join(".wm_shell/x"));
		}
	}
}
