//! API key lookup for the upstream rate service.

use super::error::{RateError, RateResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn api_key(&self) -> RateResult<String>;
}

/// Reads the API key from a dotenv file, falling back to the process
/// environment. The environment itself is never modified.
pub struct EnvFileCredentials {
    env_file: PathBuf,
    var_name: String,
}

impl EnvFileCredentials {
    pub fn new<P: AsRef<Path>>(env_file: P, var_name: &str) -> Self {
        Self {
            env_file: env_file.as_ref().to_path_buf(),
            var_name: var_name.to_string(),
        }
    }

    fn read_from_file(&self) -> RateResult<Option<String>> {
        let iter = match dotenvy::from_path_iter(&self.env_file) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                debug!("No env file at {}", self.env_file.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(RateError::InvalidCredential(format!(
                    "failed to read {}: {e}",
                    self.env_file.display()
                )));
            }
        };

        for item in iter {
            let (key, value) = item.map_err(|e| {
                RateError::InvalidCredential(format!(
                    "failed to parse {}: {e}",
                    self.env_file.display()
                ))
            })?;
            if key == self.var_name {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl CredentialProvider for EnvFileCredentials {
    async fn api_key(&self) -> RateResult<String> {
        let key = match self.read_from_file()? {
            Some(key) => Some(key),
            None => std::env::var(&self.var_name).ok(),
        };

        match key.map(|k| k.trim().to_string()) {
            Some(k) if !k.is_empty() => Ok(k),
            _ => Err(RateError::InvalidCredential(format!(
                "{} not found in {} or environment",
                self.var_name,
                self.env_file.display()
            ))),
        }
    }
}

/// Fixed API key, for embedding and tests.
pub struct StaticCredentials(pub String);

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn api_key(&self) -> RateResult<String> {
        if self.0.is_empty() {
            return Err(RateError::InvalidCredential("API key is empty".to_string()));
        }
        Ok(self.0.clone())
    }
}
