use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::bencode::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_LEN};

pub const CONFIG_FILE: &str = "bentok.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Invalid config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Cannot serialize config: {0}")]
	Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub bencode: BencodeConfig,
	pub token: TokenConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BencodeConfig {
	pub max_depth: usize,
	pub max_input_len: usize, // bytes, for stream input
	pub allow_trailing_data: bool,
	pub require_sorted_keys: bool,
}

impl Default for BencodeConfig {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			max_input_len: DEFAULT_MAX_INPUT_LEN,
			allow_trailing_data: false,
			require_sorted_keys: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
	pub min_hmac_secret_len: usize, // bytes
	pub min_rsa_modulus_bits: usize,
	pub leeway_secs: u64,
}

impl Default for TokenConfig {
	fn default() -> Self {
		Self {
			min_hmac_secret_len: 32,
			min_rsa_modulus_bits: 2048,
			leeway_secs: 0,
		}
	}
}

impl Config {
	/// Loads `bentok.toml` from the working directory, or the defaults if it is absent.
	pub fn load() -> Result<Self, ConfigError> {
		Self::load_from(CONFIG_FILE)
	}

	pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		if path.exists() {
			let contents = fs::read_to_string(path)?;
			let config: Config = toml::from_str(&contents)?;
			log::debug!("loaded config from {}", path.display());
			Ok(config)
		} else {
			Ok(Self::default())
		}
	}

	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
		let toml = toml::to_string(self)?;
		fs::write(path, toml)?;
		Ok(())
	}
}
