use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::ClientError;

pub const ENV_BUGTRACK_CONFIG: &str = "BUGTRACK_CONFIG";
pub const ENV_BUGTRACK_API_URL: &str = "BUGTRACK_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_credential_db")]
    pub credential_db: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            credential_db: default_credential_db(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ClientError> {
        toml::from_str(raw).map_err(|err| ClientError::Config(err.to_string()))
    }

    /// Reads `path`, or `BUGTRACK_CONFIG` when no path is given. A missing
    /// file means defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => config_path_from_env()?,
        };
        let config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path).map_err(|err| {
                    ClientError::Config(format!("failed to read {}: {err}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            _ => Self::default(),
        };
        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ClientError> {
        match std::env::var(ENV_BUGTRACK_API_URL) {
            Ok(raw) if !raw.trim().is_empty() => self.api_base_url = raw.trim().to_string(),
            Ok(_) | Err(std::env::VarError::NotPresent) => {}
            Err(_) => {
                return Err(ClientError::Config(format!(
                    "{ENV_BUGTRACK_API_URL} contained invalid UTF-8"
                )));
            }
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn config_path_from_env() -> Result<Option<PathBuf>, ClientError> {
    match std::env::var(ENV_BUGTRACK_CONFIG) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw.into())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(_) => Err(ClientError::Config(format!(
            "{ENV_BUGTRACK_CONFIG} contained invalid UTF-8"
        ))),
    }
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_owned()
}

fn default_credential_db() -> PathBuf {
    PathBuf::from("bugtrack-credential.db")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn fields_override_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://bugs.example.com"
            request_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://bugs.example.com");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str("colour = \"blue\""),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config.credential_db, PathBuf::from("bugtrack-credential.db"));
    }
}
