//!
//! Deployment configuration.
//!
//! Values come from a JSON file, from `CAPTOKEN_*` environment variables, or
//! both (environment wins):
//!
//! | variable                    | field           |
//! |-----------------------------|-----------------|
//! | `CAPTOKEN_SUITE`            | `suite`         |
//! | `CAPTOKEN_SIGNING_KEY`      | `signing_key`   |
//! | `CAPTOKEN_VERIFYING_KEY`    | `verifying_key` |
//! | `CAPTOKEN_REVOCATION_LOG`   | `revocation_log`|
//! | `CAPTOKEN_NOT_FOUND_POLICY` | `not_found`     |

use std::path::{Path, PathBuf};

use crate::crypto::keys;
use crate::crypto::{SuiteSigner, SuiteVerifier};
use crate::error::ConfigError;
use crate::protocol::NotFoundPolicy;
use crate::revocation::FileRevocationStore;
use crate::types::AlgSuite;

pub const ENV_SUITE: &str = "CAPTOKEN_SUITE";
pub const ENV_SIGNING_KEY: &str = "CAPTOKEN_SIGNING_KEY";
pub const ENV_VERIFYING_KEY: &str = "CAPTOKEN_VERIFYING_KEY";
pub const ENV_REVOCATION_LOG: &str = "CAPTOKEN_REVOCATION_LOG";
pub const ENV_NOT_FOUND_POLICY: &str = "CAPTOKEN_NOT_FOUND_POLICY";

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub suite: AlgSuite,
    /// Private key file. Only the authority process sets this.
    pub signing_key: Option<PathBuf>,
    /// Public key file.
    pub verifying_key: Option<PathBuf>,
    /// Revocation log shared by the authority and verifiers.
    pub revocation_log: Option<PathBuf>,
    pub not_found: NotFoundPolicy,
}

impl Config {
    /// Parses a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(std::env::vars())
    }

    /// Applies `CAPTOKEN_*` pairs on top of `self`. Other keys are ignored.
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                ENV_SUITE => {
                    self.suite = value
                        .parse()
                        .map_err(|_| ConfigError::Invalid { key: ENV_SUITE, value })?;
                }
                ENV_SIGNING_KEY => self.signing_key = Some(PathBuf::from(value)),
                ENV_VERIFYING_KEY => self.verifying_key = Some(PathBuf::from(value)),
                ENV_REVOCATION_LOG => self.revocation_log = Some(PathBuf::from(value)),
                ENV_NOT_FOUND_POLICY => {
                    self.not_found = match value.trim().to_ascii_lowercase().as_str() {
                        "distinct" => NotFoundPolicy::Distinct,
                        "opaque" => NotFoundPolicy::Opaque,
                        _ => return Err(ConfigError::Invalid { key: ENV_NOT_FOUND_POLICY, value }),
                    };
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// Loads the private key named by `signing_key`.
    pub fn load_signer(&self) -> Result<SuiteSigner, ConfigError> {
        let path = self.signing_key.as_deref().ok_or(ConfigError::Missing("signing_key"))?;
        let signer = keys::read_signer(self.suite, path)?;
        tracing::info!(suite = %self.suite, "loaded signing key");
        Ok(signer)
    }

    /// Loads the public key named by `verifying_key`.
    pub fn load_verifier(&self) -> Result<SuiteVerifier, ConfigError> {
        let path = self.verifying_key.as_deref().ok_or(ConfigError::Missing("verifying_key"))?;
        let verifier = keys::read_verifier(self.suite, path)?;
        tracing::info!(suite = %self.suite, "loaded verifying key");
        Ok(verifier)
    }

    /// Opens the revocation log named by `revocation_log`.
    pub fn open_revocation_store(&self) -> Result<FileRevocationStore, ConfigError> {
        let path = self.revocation_log.as_deref().ok_or(ConfigError::Missing("revocation_log"))?;
        Ok(FileRevocationStore::open(path)?)
    }
}
