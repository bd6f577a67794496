// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup (a `.env` file
//! is loaded first when present).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATABASE_PATH` | redb database file | `data/events.redb` |
//! | `JWT_SECRET` | HS256 signing secret for session tokens | Required |
//! | `JWT_ISSUER` | Issuer claim written to and expected in tokens | `pitchday` |
//! | `TOKEN_TTL_DAYS` | Session lifetime in days | `30` |
//! | `CORS_ALLOWED_ORIGIN` | Frontend origin allowed by CORS (`*` for any) | `http://localhost:5173` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::DEFAULT_TOKEN_TTL_DAYS;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const TOKEN_TTL_DAYS_ENV: &str = "TOKEN_TTL_DAYS";
pub const CORS_ALLOWED_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "data/events.redb";
const DEFAULT_JWT_ISSUER: &str = "pitchday";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_ttl_days: i64,
    pub cors_allowed_origin: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: HOST_ENV,
                    value: host.clone(),
                    reason: e.to_string(),
                })?;

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let token_ttl_days = match get(TOKEN_TTL_DAYS_ENV) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if days > 0 => days,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_DAYS_ENV,
                        value: raw,
                        reason: "must be positive".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_DAYS_ENV,
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_DAYS,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr,
            database_path: get(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            jwt_secret,
            jwt_issuer: get(JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string()),
            token_ttl_days,
            cors_allowed_origin: get(CORS_ALLOWED_ORIGIN_ENV)
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            log_format,
        })
    }
}
