/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use duration_str::deserialize_duration;
use serde::{Deserialize, Serialize, Serializer};

/// Configuration for photon-api. `DATABASE_URL` and `SESSION_SECRET`
/// environment variables take precedence over file contents.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PhotonConfig {
    #[serde(default = "Defaults::listen_address")]
    pub listen_address: SocketAddr,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub session_secret: Option<String>,
    #[serde(
        default = "Defaults::refresh_interval",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub refresh_interval: Duration,
}

pub struct Defaults;

impl Defaults {
    pub fn listen_address() -> SocketAddr {
        "0.0.0.0:5000".parse().expect("BUG: static default address must parse")
    }

    pub fn refresh_interval() -> Duration {
        olt::DEFAULT_REFRESH_INTERVAL
    }
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            listen_address: Defaults::listen_address(),
            database_url: None,
            session_secret: None,
            refresh_interval: Defaults::refresh_interval(),
        }
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&humantime::format_duration(*duration))
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {error}")]
    Read {
        path: String,
        error: std::io::Error,
    },
    #[error("could not parse config file {path}: {error}")]
    Parse {
        path: String,
        error: Box<toml::de::Error>,
    },
    #[error("database_url is not set (config file or DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("session_secret is not set (config file or SESSION_SECRET)")]
    MissingSessionSecret,
    #[error("session_secret must be at least {minimum} characters, got {actual}")]
    SessionSecretTooShort { minimum: usize, actual: usize },
}

const SESSION_SECRET_MIN_LEN: usize = 32;

impl PhotonConfig {
    /// Read the file (or start from defaults) and apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
                    path: path.display().to_string(),
                    error,
                })?;
                toml::from_str(&text).map_err(|error| ConfigError::Parse {
                    path: path.display().to_string(),
                    error: Box::new(error),
                })?
            }
            None => Self::default(),
        };
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            config.session_secret = Some(secret);
        }
        if let Ok(listen) = std::env::var("PHOTON_API_LISTEN")
            && let Ok(addr) = listen.parse()
        {
            config.listen_address = addr;
        }
        Ok(config)
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    pub fn session_secret(&self) -> Result<&str, ConfigError> {
        let secret = self
            .session_secret
            .as_deref()
            .ok_or(ConfigError::MissingSessionSecret)?;
        if secret.len() < SESSION_SECRET_MIN_LEN {
            return Err(ConfigError::SessionSecretTooShort {
                minimum: SESSION_SECRET_MIN_LEN,
                actual: secret.len(),
            });
        }
        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn defaults_listen_on_5000() {
        let config = PhotonConfig::default();
        assert_eq!(config.listen_address.port(), 5000);
        assert_eq!(config.refresh_interval, Duration::from_secs(3600));
    }

    #[test]
    fn file_values_parse() {
        let config: PhotonConfig = toml::from_str(indoc! {r#"
            listen_address = "127.0.0.1:8080"
            database_url = "postgres://photon@localhost/photon"
            session_secret = "0123456789abcdef0123456789abcdef"
            refresh_interval = "30m"
        "#})
        .unwrap();
        assert_eq!(config.listen_address.port(), 8080);
        assert_eq!(config.refresh_interval, Duration::from_secs(30 * 60));
        assert_eq!(
            config.session_secret().unwrap(),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = PhotonConfig {
            session_secret: Some("short".to_string()),
            ..PhotonConfig::default()
        };
        assert!(matches!(
            config.session_secret(),
            Err(ConfigError::SessionSecretTooShort { .. })
        ));
    }

    #[test]
    fn missing_values_are_reported() {
        let config = PhotonConfig::default();
        assert!(matches!(
            config.database_url(),
            Err(ConfigError::MissingDatabaseUrl)
        ));
        assert!(matches!(
            config.session_secret(),
            Err(ConfigError::MissingSessionSecret)
        ));
    }
}
