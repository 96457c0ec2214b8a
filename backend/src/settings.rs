//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `MEDICARE_*` environment variables, CLI flags or a
//! configuration file. The bind address carries a loader default; the
//! remaining fields are optional and their accessors apply defaults.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_TOKEN_TTL;
use crate::outbound::password::DEFAULT_PASSWORD_ITERATIONS;
use crate::outbound::persistence::DEFAULT_POOL_MAX_SIZE;
use crate::scanning::DEFAULT_QR_SIZE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address")]
    BindAddr { value: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEDICARE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL. Without one the server runs on in-memory storage.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Bearer token lifetime in minutes.
    pub token_ttl_minutes: Option<i64>,
    /// PBKDF2 iteration count for new password hashes.
    pub password_iterations: Option<u32>,
    /// Default QR code edge length in pixels.
    pub qr_size: Option<u32>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr.parse().map_err(|_| SettingsError::BindAddr {
            value: self.bind_addr.clone(),
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        match self.token_ttl_minutes {
            None => Ok(DEFAULT_TOKEN_TTL),
            Some(minutes) if minutes > 0 => TimeDelta::try_minutes(minutes).ok_or(
                SettingsError::NotPositive {
                    field: "token_ttl_minutes",
                },
            ),
            Some(_) => Err(SettingsError::NotPositive {
                field: "token_ttl_minutes",
            }),
        }
    }

    pub fn password_iterations(&self) -> Result<u32, SettingsError> {
        match self.password_iterations {
            None => Ok(DEFAULT_PASSWORD_ITERATIONS),
            Some(0) => Err(SettingsError::NotPositive {
                field: "password_iterations",
            }),
            Some(iterations) => Ok(iterations),
        }
    }

    pub fn qr_size(&self) -> u32 {
        self.qr_size.unwrap_or(DEFAULT_QR_SIZE)
    }
}
