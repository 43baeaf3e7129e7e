//! Store location and field policy configuration.
//!
//! # Responsibility
//! - Hold process-wide settings resolved once at startup.
//! - Hand them to store constructors explicitly instead of via globals.
//!
//! # Invariants
//! - `file_name` is never empty and never contains a path separator.
//! - Two `StoreConfig` values with different `data_dir` never share a file.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default data directory, relative to the process working directory.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default backing file name inside the data directory.
pub const DEFAULT_FILE_NAME: &str = "repositorio.txt";

/// How field values containing the record delimiter are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Reject delimiter-containing values at create/update time.
    #[default]
    Strict,
    /// Accept delimiter-containing values and log a warning.
    Permissive,
}

impl FieldPolicy {
    /// Stable string id used by CLI flags and env values.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }
}

impl Display for FieldPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(ConfigError::UnknownFieldPolicy(other.to_string())),
        }
    }
}

/// Configuration error raised while resolving startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFieldPolicy(String),
    EmptyFileName,
    FileNameHasSeparator(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFieldPolicy(value) => write!(
                f,
                "unsupported field policy `{value}`; expected strict|permissive"
            ),
            Self::EmptyFileName => write!(f, "file name cannot be empty"),
            Self::FileNameHasSeparator(value) => {
                write!(f, "file name must not contain a path separator, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved store settings passed into `FileAppointmentStore::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    data_dir: PathBuf,
    file_name: String,
    field_policy: FieldPolicy,
}

impl StoreConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// - `EmptyFileName` when `file_name` is blank.
    /// - `FileNameHasSeparator` when `file_name` would escape `data_dir`.
    pub fn new(
        data_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
        field_policy: FieldPolicy,
    ) -> Result<Self, ConfigError> {
        let file_name = file_name.into().trim().to_string();
        if file_name.is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        if file_name.contains(['/', '\\']) {
            return Err(ConfigError::FileNameHasSeparator(file_name));
        }

        Ok(Self {
            data_dir: data_dir.into(),
            file_name,
            field_policy,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn field_policy(&self) -> FieldPolicy {
        self.field_policy
    }

    /// Full path of the backing file: `<data_dir>/<file_name>`.
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
            field_policy: FieldPolicy::Strict,
        }
    }
}
