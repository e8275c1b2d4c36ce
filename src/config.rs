// Configuration record built once at startup from named variables (the
// process environment, after `.env` files have been merged into it).

use std::path::Path;

use tracing::debug;

use crate::error::{PastebinError, Result};
use crate::paste::Visibility;

pub const DEFAULT_API_URL: &str = "https://pastebin.com/api/api_post.php";
pub const DEFAULT_LOGIN_URL: &str = "https://pastebin.com/api/api_login.php";
pub const DEFAULT_RAW_URL: &str = "https://pastebin.com/raw";
pub const DEFAULT_EXPIRATION: &str = "N";
pub const DEFAULT_LIST_LIMIT: u32 = 50;
/// Largest `api_result_limit` the API accepts.
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Credentials, endpoints and paste defaults.
///
/// Missing credentials are kept as empty strings; they only become an
/// error when an operation needs them (see [`Config::ensure_login_ready`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub login: String,
    pub dev_key: String,
    pub password: String,
    /// Endpoint for list, create, delete and show calls.
    pub api_url: String,
    pub login_url: String,
    /// Public raw-text endpoint, `{raw_url}/{key}`.
    pub raw_url: String,
    pub visibility: Visibility,
    /// Expiration code forwarded verbatim (`N`, `10M`, `1H`, `1D`, ...).
    pub expiration: String,
    /// `api_result_limit` sent with the list call.
    pub list_limit: u32,
}

impl Config {
    /// Build a config from any source of named variables.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).unwrap_or_default();
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let visibility_code = or_default("APIPASTEPRIVATE", "0");
        let visibility = Visibility::from_code(visibility_code.trim()).ok_or_else(|| {
            PastebinError::Configuration(format!(
                "APIPASTEPRIVATE must be 0, 1 or 2, got `{visibility_code}`"
            ))
        })?;

        let limit = or_default("APIRESULTLIMIT", &DEFAULT_LIST_LIMIT.to_string());
        let list_limit = limit
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_LIST_LIMIT).contains(n))
            .ok_or_else(|| {
                PastebinError::Configuration(format!(
                    "APIRESULTLIMIT must be between 1 and {MAX_LIST_LIMIT}, got `{limit}`"
                ))
            })?;

        Ok(Config {
            login: get("APILOGIN"),
            dev_key: get("APIDEVKEY"),
            password: get("APIPASSWORD"),
            api_url: or_default("APIURL", DEFAULT_API_URL),
            login_url: or_default("APILOGINURL", DEFAULT_LOGIN_URL),
            raw_url: or_default("APIRAWURL", DEFAULT_RAW_URL),
            visibility,
            expiration: or_default("APIPASTEEXPIREDATE", DEFAULT_EXPIRATION),
            list_limit,
        })
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Login needs every credential and somewhere to send them.
    pub fn ensure_login_ready(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("APIDEVKEY", &self.dev_key),
            ("APILOGIN", &self.login),
            ("APIPASSWORD", &self.password),
            ("APILOGINURL", &self.login_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PastebinError::Configuration(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

/// Merge `.env` files into the process environment without overriding
/// variables that are already set.
///
/// `./.env` and `<config dir>/pastebiner/.env` are optional; an explicitly
/// requested file must exist.
pub fn load_env_files(explicit: Option<&Path>) -> Result<()> {
    // try the implicit locations, ignoring any errors
    if let Ok(path) = dotenvy::dotenv() {
        debug!("loaded {}", path.display());
    }
    if let Some(dir) = dirs::config_dir() {
        let path = dir.join("pastebiner").join(".env");
        if dotenvy::from_path(&path).is_ok() {
            debug!("loaded {}", path.display());
        }
    }

    if let Some(path) = explicit {
        dotenvy::from_path(path).map_err(|e| {
            PastebinError::Configuration(format!("cannot load {}: {e}", path.display()))
        })?;
        debug!("loaded {}", path.display());
    }
    Ok(())
}
