//! Calculator configuration.
//!
//! Every field has a default matching the legacy accountant calculator, so an
//! empty TOML document is a valid configuration.
//!
//! ```toml
//! error_marker = "Error"
//! reset_delay_ms = 1500
//! reset_policy = "cancellable"
//! storage_key = "calc_history"
//! ```

use crate::core::ResetPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub mod error;

pub use error::{ConfigError, ConfigViolation};

/// Text shown on the display after a failed evaluation.
pub const DEFAULT_ERROR_MARKER: &str = "Ошибка";

/// Storage key the history log is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "calc_history";

/// Delay before the display returns to `0` after an error.
pub const DEFAULT_RESET_DELAY_MS: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Marker text shown while the display is in the error state
    pub error_marker: String,

    /// Milliseconds between an error and the automatic reset
    pub reset_delay_ms: u64,

    /// Whether later input cancels a pending reset
    pub reset_policy: ResetPolicy,

    /// Key the history log is stored under
    pub storage_key: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            reset_policy: ResetPolicy::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl CalculatorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validated()
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        let marker = self.error_marker.trim();
        checks.push(if marker.is_empty() {
            Validation::fail(ConfigViolation::EmptyErrorMarker)
        } else if marker.parse::<f64>().is_ok() {
            Validation::fail(ConfigViolation::NumericErrorMarker(
                self.error_marker.clone(),
            ))
        } else {
            Validation::success(())
        });

        checks.push(if self.storage_key.is_empty() {
            Validation::fail(ConfigViolation::EmptyStorageKey)
        } else if self.storage_key.contains(['/', '\\']) {
            Validation::fail(ConfigViolation::StorageKeyHasSeparator(
                self.storage_key.clone(),
            ))
        } else {
            Validation::success(())
        });

        checks.push(if self.reset_delay_ms == 0 {
            Validation::fail(ConfigViolation::ZeroResetDelay)
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }

    /// Consume the config, returning it if valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(violations) => Err(ConfigError::Invalid(
                violations.iter().cloned().collect(),
            )),
        }
    }
}
