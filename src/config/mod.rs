//! Credential and API configuration.
//!
//! Configuration is an explicit [`KetConfig`] value handed to the repository
//! facade rather than ambient process state.
//!
//! # Precedence
//!
//! Values are resolved with the following precedence (lowest to highest):
//!
//! 1. **Defaults** – no credentials, the public Bitbucket Cloud API
//! 2. **Configuration file** – `~/.config/ket`, or the path given by
//!    `--config` / `KET_CONFIG`
//! 3. **Environment variables** – `KET_USERNAME`, `KET_API_KEY`, `KET_API_URL`
//! 4. **Command-line arguments** – `--username`, `--api-key`, `--api-url`
//!
//! Layers 3 and 4 are resolved by the CLI parser and applied with
//! [`KetConfig::with_overrides`].
//!
//! # Configuration File
//!
//! The file uses INI syntax:
//!
//! ```ini
//! [bitbucket]
//! username = team
//! api_key = app-password
//! ```
//!
//! A missing file or a missing `[bitbucket]` section leaves authentication
//! unconfigured; it is not an error.

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::bitbucket::DEFAULT_API_URL;

const SECTION: &str = "bitbucket";

/// Errors raised while locating or parsing the configuration file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The user's home directory could not be determined.
    #[error("could not determine the home directory for the configuration file")]
    NoHomeDirectory,

    /// The file exists but could not be read.
    #[error("failed to read configuration file {path}: {message}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// I/O error detail.
        message: String,
    },

    /// The file is not valid INI.
    #[error("failed to parse configuration file {path}: {message}")]
    Parse {
        /// Path of the configuration file.
        path: String,
        /// Parser error detail.
        message: String,
    },
}

/// Bitbucket credentials. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Bitbucket username; also the repository owner in API URLs.
    pub username: Option<String>,
    /// API key (app password) paired with `username`.
    pub api_key: Option<String>,
}

impl Credentials {
    /// Returns true when both username and API key are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.username.is_some() && self.api_key.is_some()
    }
}

/// Values supplied by the environment or command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Overrides `username`.
    pub username: Option<String>,
    /// Overrides `api_key`.
    pub api_key: Option<String>,
    /// Overrides the API base URL.
    pub api_url: Option<String>,
}

/// Resolved configuration passed to [`crate::Repo::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KetConfig {
    /// Credentials for basic authentication.
    pub credentials: Credentials,
    /// Bitbucket API base URL.
    pub api_url: String,
}

impl Default for KetConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            api_url: DEFAULT_API_URL.to_owned(),
        }
    }
}

impl KetConfig {
    /// Loads configuration from `~/.config/ket`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the home directory is unknown or the file
    /// exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_path(&default_config_path()?)
    }

    /// Loads configuration from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let ini = match Ini::load_from_file(path) {
            Ok(ini) => ini,
            Err(ini::Error::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file");
                return Ok(Self::default());
            }
            Err(ini::Error::Io(error)) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    message: error.to_string(),
                });
            }
            Err(ini::Error::Parse(error)) => {
                return Err(ConfigError::Parse {
                    path: path.display().to_string(),
                    message: error.to_string(),
                });
            }
        };
        Ok(Self::from_ini(&ini))
    }

    /// Parses configuration from INI text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `contents` is not valid INI.
    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        Ini::load_from_str(contents)
            .map(|ini| Self::from_ini(&ini))
            .map_err(|error| ConfigError::Parse {
                path: "<string>".to_owned(),
                message: error.to_string(),
            })
    }

    fn from_ini(ini: &Ini) -> Self {
        let Some(section) = ini.section(Some(SECTION)) else {
            return Self::default();
        };
        let value = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };

        Self {
            credentials: Credentials {
                username: value("username"),
                api_key: value("api_key"),
            },
            api_url: value("api_url").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
        }
    }

    /// Applies environment and command-line values on top of this layer.
    #[must_use]
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            credentials: Credentials {
                username: overrides.username.or(self.credentials.username),
                api_key: overrides.api_key.or(self.credentials.api_key),
            },
            api_url: overrides.api_url.unwrap_or(self.api_url),
        }
    }
}

/// Returns the fixed configuration path, `~/.config/ket`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] when the home directory is unknown.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("ket"))
        .ok_or(ConfigError::NoHomeDirectory)
}
