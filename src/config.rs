//! Session core configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::check::CheckPolicy;
use crate::navigation::Routes;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:4000/api";
pub const DEFAULT_CREDENTIAL_PATH: &str = ".jobmatch/credentials.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_UNAUTHORIZED_ROUTE: &str = "/unauthorized";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be greater than zero")]
    ZeroTimeout { var: &'static str },
    #[error("{var} must be an absolute path starting with '/', got '{value}'")]
    InvalidRoute { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    /// Whole-request HTTP timeout.
    pub request: Duration,
    pub connect: Duration,
    /// Deadline for one session operation (check, login, logout) end to end.
    pub operation: Duration,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            operation: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub api_base_url: String,
    pub credential_path: PathBuf,
    pub timeouts: SessionTimeouts,
    pub routes: Routes,
    pub check_policy: CheckPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            credential_path: PathBuf::from(DEFAULT_CREDENTIAL_PATH),
            timeouts: SessionTimeouts::default(),
            routes: Routes::default(),
            check_policy: CheckPolicy::TrustLocal,
        }
    }
}

impl SessionConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `JOBMATCH_API_BASE_URL`: backend base URL
    /// - `JOBMATCH_CREDENTIAL_PATH`: credential file location
    /// - `JOBMATCH_REQUEST_TIMEOUT_SECS`: default 15
    /// - `JOBMATCH_CONNECT_TIMEOUT_SECS`: default 5
    /// - `JOBMATCH_OPERATION_TIMEOUT_SECS`: default 20
    /// - `JOBMATCH_LOGIN_ROUTE`: default `/login`
    /// - `JOBMATCH_UNAUTHORIZED_ROUTE`: default `/unauthorized`
    /// - `JOBMATCH_REVALIDATE`: `true` to revalidate stored tokens on check
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a zero timeout or a relative route.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("JOBMATCH_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let credential_path =
            PathBuf::from(lookup("JOBMATCH_CREDENTIAL_PATH").unwrap_or_else(|| DEFAULT_CREDENTIAL_PATH.to_owned()));

        let timeouts = SessionTimeouts {
            request: secs(&lookup, "JOBMATCH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect: secs(&lookup, "JOBMATCH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            operation: secs(&lookup, "JOBMATCH_OPERATION_TIMEOUT_SECS", DEFAULT_OPERATION_TIMEOUT_SECS)?,
        };

        let routes = Routes {
            login: route(&lookup, "JOBMATCH_LOGIN_ROUTE", DEFAULT_LOGIN_ROUTE)?,
            unauthorized: route(&lookup, "JOBMATCH_UNAUTHORIZED_ROUTE", DEFAULT_UNAUTHORIZED_ROUTE)?,
        };

        let check_policy = if lookup("JOBMATCH_REVALIDATE").as_deref().and_then(parse_bool).unwrap_or(false) {
            CheckPolicy::Revalidate
        } else {
            CheckPolicy::TrustLocal
        };

        Ok(Self { api_base_url, credential_path, timeouts, routes, check_policy })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn secs<F>(lookup: &F, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default);
    if value == 0 {
        return Err(ConfigError::ZeroTimeout { var });
    }
    Ok(Duration::from_secs(value))
}

fn route<F>(lookup: &F, var: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var).unwrap_or_else(|| default.to_owned());
    if !value.starts_with('/') {
        return Err(ConfigError::InvalidRoute { var, value });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
