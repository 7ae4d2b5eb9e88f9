use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::io;

/// Default location of the history log written by the shell hook.
pub const DEFAULT_LOG_PATH: &str = "~/.wm_shell/history.jsonl";

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "~/.wm_shell/nxcmd.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "NXCMD_CONFIG";

/// Environment variable overriding `log_path`.
pub const LOG_PATH_ENV: &str = "NXCMD_LOG_PATH";

/// Runtime parameters for loading, segmenting and predicting.
///
/// All fields have defaults; a TOML file only needs the keys it changes:
///
/// ```toml
/// log_path = "~/history.jsonl"
/// session_gap_secs = 900
/// ```
///
/// # Invariants
/// - `session_gap_secs`, `min_session_len` and `fuzzy_min_chars` are non-zero
/// - `epoch_floor` and `future_tolerance_secs` are not negative
///
/// Both are enforced by `validate`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// History log (JSON lines). A leading `~` is expanded.
	pub log_path: PathBuf,

	/// A gap strictly greater than this many seconds closes a session.
	pub session_gap_secs: i64,

	/// Sessions with fewer commands are discarded.
	pub min_session_len: usize,

	/// Timestamps below this are replaced with the current time.
	pub epoch_floor: i64,

	/// Timestamps later than now + this are replaced with the current time.
	pub future_tolerance_secs: i64,

	/// History commands shorter than this never take part in the fuzzy fallback.
	pub fuzzy_min_chars: usize,

	/// Number of top entries admitted from each fuzzily matched context.
	pub fuzzy_per_context: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log_path: PathBuf::from(DEFAULT_LOG_PATH),
			session_gap_secs: 600,
			min_session_len: 2,
			epoch_floor: 1_600_000_000,
			future_tolerance_secs: 3600,
			fuzzy_min_chars: 3,
			fuzzy_per_context: 3,
		}
	}
}

impl Config {
	/// Parses a configuration from TOML text and validates it.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML configuration file.
	///
	/// # Errors
	/// Returns `ConfigError::Io` if the file cannot be read, including when it
	/// does not exist.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let path = io::expand_home(path);
		let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
		Self::from_toml_str(&text)
	}

	/// Resolves the effective configuration.
	///
	/// # Resolution order
	/// 1. `explicit` path, if given (must exist)
	/// 2. `$NXCMD_CONFIG`, if set (must exist)
	/// 3. `~/.wm_shell/nxcmd.toml`, only if present
	/// 4. built-in defaults
	///
	/// `$NXCMD_LOG_PATH` then overrides `log_path` whichever source was used.
	pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		let mut config = match explicit {
			Some(path) => Self::from_file(path)?,
			None => match env::var_os(CONFIG_ENV) {
				Some(path) => Self::from_file(PathBuf::from(path))?,
				None => {
					let default_path = io::expand_home(DEFAULT_CONFIG_PATH);
					if io::is_file(&default_path) {
						Self::from_file(default_path)?
					} else {
						Self::default()
					}
				}
			},
		};

		if let Some(log_path) = env::var_os(LOG_PATH_ENV) {
			config.log_path = PathBuf::from(log_path);
		}

		Ok(config)
	}

	/// Sets the history log path.
	pub fn with_log_path<P: Into<PathBuf>>(mut self, log_path: P) -> Self {
		self.log_path = log_path.into();
		self
	}

	/// Returns `log_path` with `~` expanded.
	pub fn resolved_log_path(&self) -> PathBuf {
		io::expand_home(&self.log_path)
	}

	/// Checks the invariants listed on the type.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.session_gap_secs <= 0 {
			return Err(ConfigError::Invalid(format!(
				"session_gap_secs must be positive, got {}",
				self.session_gap_secs
			)));
		}
		if self.min_session_len == 0 {
			return Err(ConfigError::Invalid("min_session_len must be at least 1".to_owned()));
		}
		if self.fuzzy_min_chars == 0 {
			return Err(ConfigError::Invalid("fuzzy_min_chars must be at least 1".to_owned()));
		}
		if self.epoch_floor < 0 {
			return Err(ConfigError::Invalid(format!("epoch_floor must not be negative, got {}", self.epoch_floor)));
		}
		if self.future_tolerance_secs < 0 {
			return Err(ConfigError::Invalid(format!(
				"future_tolerance_secs must not be negative, got {}",
				self.future_tolerance_secs
			)));
		}
		Ok(())
	}
}
