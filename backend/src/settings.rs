//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `DASHBOARD_*` environment variables and an
//! optional configuration file. [`AppSettings::validate`] turns the raw,
//! all-optional layer into [`ResolvedSettings`] or one error naming every
//! missing or malformed key.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::gemini::DEFAULT_GEMINI_MODEL;
use crate::outbound::gophish::{DEFAULT_GOPHISH_TIMEOUT, GophishSettings};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Raw configuration layer.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DASHBOARD")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string for the enrollment ledger.
    pub database_url: Option<String>,
    /// Upper bound on pooled ledger connections.
    pub db_max_connections: Option<u32>,
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection before failing the request.
    pub db_connection_timeout_secs: Option<u64>,
    /// Campaign server base URL; campaign views stay empty when unset.
    pub gophish_url: Option<String>,
    pub gophish_api_key: Option<String>,
    /// Accept self-signed certificates from the campaign server.
    #[ortho_config(default = false)]
    pub gophish_accept_invalid_certs: bool,
    /// Learning platform base URL, e.g. `https://lms.example.com/`.
    pub moodle_url: Option<String>,
    /// Web-service token for the learning platform.
    pub moodle_token: Option<String>,
    /// Enables the content lab when present.
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    /// Session signing secret; an ephemeral key is used in debug builds.
    pub secret_key: Option<String>,
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

/// Reasons the raw settings cannot start the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required configuration: {}", keys.join(", "))]
    Missing { keys: Vec<&'static str> },
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Generative model settings.
#[derive(Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
}

/// Settings after validation.
#[derive(Clone)]
pub struct ResolvedSettings {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub pool: PoolConfig,
    pub gophish: Option<GophishSettings>,
    pub moodle_url: Url,
    pub moodle_token: String,
    pub gemini: Option<GeminiSettings>,
    pub secret_key: Option<Zeroizing<String>>,
    pub cookie_secure: bool,
}

impl fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("bind_addr", &self.bind_addr)
            .field("pool_max_size", &self.pool.max_size())
            .field("gophish_configured", &self.gophish.is_some())
            .field("moodle_url", &self.moodle_url.as_str())
            .field("gemini_configured", &self.gemini.is_some())
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|error| SettingsError::Invalid {
        key,
        message: error.to_string(),
    })
}

impl AppSettings {
    fn pool_config(&self, database_url: &str) -> Result<PoolConfig, SettingsError> {
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.db_max_connections {
            if max_size == 0 {
                return Err(SettingsError::Invalid {
                    key: "db_max_connections",
                    message: "must be at least 1".to_owned(),
                });
            }
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.db_min_idle {
            if min_idle > config.max_size() {
                return Err(SettingsError::Invalid {
                    key: "db_min_idle",
                    message: format!("must not exceed {}", config.max_size()),
                });
            }
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(secs) = self.db_connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Check required keys and parse structured values.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] listing every absent key, or
    /// [`SettingsError::Invalid`] for the first value that fails to parse.
    pub fn validate(&self) -> Result<ResolvedSettings, SettingsError> {
        let mut missing = Vec::new();
        let database_url = non_empty(&self.database_url);
        let moodle_url = non_empty(&self.moodle_url);
        let moodle_token = non_empty(&self.moodle_token);
        let gophish_url = non_empty(&self.gophish_url);
        let gophish_api_key = non_empty(&self.gophish_api_key);

        if database_url.is_none() {
            missing.push("database_url");
        }
        if moodle_url.is_none() {
            missing.push("moodle_url");
        }
        if moodle_token.is_none() {
            missing.push("moodle_token");
        }
        if gophish_url.is_some() && gophish_api_key.is_none() {
            missing.push("gophish_api_key");
        }

        let (Some(database_url), Some(moodle_url), Some(moodle_token), true) = (
            database_url,
            moodle_url,
            moodle_token,
            missing.is_empty(),
        ) else {
            return Err(SettingsError::Missing { keys: missing });
        };

        let bind_addr = non_empty(&self.bind_addr)
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|error| SettingsError::Invalid {
                key: "bind_addr",
                message: error.to_string(),
            })?;

        let gophish = match (gophish_url, gophish_api_key) {
            (Some(url), Some(api_key)) => Some(GophishSettings {
                base_url: parse_url("gophish_url", url)?,
                api_key: api_key.to_owned(),
                timeout: DEFAULT_GOPHISH_TIMEOUT,
                accept_invalid_certs: self.gophish_accept_invalid_certs,
            }),
            _ => None,
        };

        let gemini = non_empty(&self.gemini_api_key).map(|api_key| GeminiSettings {
            api_key: api_key.to_owned(),
            model: non_empty(&self.gemini_model)
                .unwrap_or(DEFAULT_GEMINI_MODEL)
                .to_owned(),
        });

        Ok(ResolvedSettings {
            bind_addr,
            pool: self.pool_config(database_url)?,
            database_url: database_url.to_owned(),
            gophish,
            moodle_url: parse_url("moodle_url", moodle_url)?,
            moodle_token: moodle_token.to_owned(),
            gemini,
            secret_key: non_empty(&self.secret_key).map(|key| Zeroizing::new(key.to_owned())),
            cookie_secure: self.cookie_secure,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Configuration defaults, environment overrides and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 14] = [
        "DASHBOARD_BIND_ADDR",
        "DASHBOARD_DATABASE_URL",
        "DASHBOARD_DB_MAX_CONNECTIONS",
        "DASHBOARD_DB_MIN_IDLE",
        "DASHBOARD_DB_CONNECTION_TIMEOUT_SECS",
        "DASHBOARD_GOPHISH_URL",
        "DASHBOARD_GOPHISH_API_KEY",
        "DASHBOARD_GOPHISH_ACCEPT_INVALID_CERTS",
        "DASHBOARD_MOODLE_URL",
        "DASHBOARD_MOODLE_TOKEN",
        "DASHBOARD_GEMINI_API_KEY",
        "DASHBOARD_GEMINI_MODEL",
        "DASHBOARD_SECRET_KEY",
        "DASHBOARD_COOKIE_SECURE",
    ];

    fn env_with(values: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = values
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("dashboard")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert!(settings.cookie_secure);
        assert!(!settings.gophish_accept_invalid_certs);
        assert!(settings.database_url.is_none());
    }

    #[rstest]
    fn validation_names_every_missing_key() {
        let _guard = lock_env(env_with(&[("DASHBOARD_GOPHISH_URL", "https://gophish:3333")]));

        let error = load_from_empty_args().validate().expect_err("incomplete");

        assert_eq!(
            error,
            SettingsError::Missing {
                keys: vec!["database_url", "moodle_url", "moodle_token", "gophish_api_key"],
            }
        );
        assert_eq!(
            error.to_string(),
            "missing required configuration: database_url, moodle_url, moodle_token, gophish_api_key"
        );
    }

    #[rstest]
    fn environment_overrides_are_resolved() {
        let _guard = lock_env(env_with(&[
            ("DASHBOARD_BIND_ADDR", "127.0.0.1:9000"),
            ("DASHBOARD_DATABASE_URL", "postgres://localhost/dashboard"),
            ("DASHBOARD_GOPHISH_URL", "https://gophish:3333/"),
            ("DASHBOARD_GOPHISH_API_KEY", "gp-key"),
            ("DASHBOARD_GOPHISH_ACCEPT_INVALID_CERTS", "true"),
            ("DASHBOARD_MOODLE_URL", "https://lms.example.com/"),
            ("DASHBOARD_MOODLE_TOKEN", "tok"),
            ("DASHBOARD_GEMINI_API_KEY", "gm-key"),
            ("DASHBOARD_COOKIE_SECURE", "false"),
        ]));

        let resolved = load_from_empty_args().validate().expect("valid settings");

        assert_eq!(resolved.bind_addr, "127.0.0.1:9000".parse().expect("addr"));
        assert!(!resolved.cookie_secure);
        let gophish = resolved.gophish.expect("campaign server configured");
        assert!(gophish.accept_invalid_certs);
        assert_eq!(gophish.api_key, "gp-key");
        let gemini = resolved.gemini.expect("generator configured");
        assert_eq!(gemini.model, DEFAULT_GEMINI_MODEL);
        assert!(resolved.secret_key.is_none());
    }

    #[rstest]
    fn minimal_settings_use_default_bind_address() {
        let _guard = lock_env(env_with(&[
            ("DASHBOARD_DATABASE_URL", "postgres://localhost/dashboard"),
            ("DASHBOARD_MOODLE_URL", "https://lms.example.com/"),
            ("DASHBOARD_MOODLE_TOKEN", "tok"),
        ]));

        let resolved = load_from_empty_args().validate().expect("valid settings");

        assert_eq!(resolved.bind_addr, DEFAULT_BIND_ADDR.parse().expect("addr"));
        assert!(resolved.gophish.is_none());
        assert!(resolved.gemini.is_none());
    }

    #[rstest]
    fn malformed_urls_are_reported() {
        let _guard = lock_env(env_with(&[
            ("DASHBOARD_DATABASE_URL", "postgres://localhost/dashboard"),
            ("DASHBOARD_MOODLE_URL", "not a url"),
            ("DASHBOARD_MOODLE_TOKEN", "tok"),
        ]));

        let error = load_from_empty_args().validate().expect_err("bad url");

        assert!(matches!(error, SettingsError::Invalid { key: "moodle_url", .. }));
    }

    #[rstest]
    fn pool_sizing_comes_from_settings() {
        let _guard = lock_env(env_with(&[
            ("DASHBOARD_DATABASE_URL", "postgres://localhost/dashboard"),
            ("DASHBOARD_MOODLE_URL", "https://lms.example.com/"),
            ("DASHBOARD_MOODLE_TOKEN", "tok"),
            ("DASHBOARD_DB_MAX_CONNECTIONS", "12"),
            ("DASHBOARD_DB_MIN_IDLE", "0"),
            ("DASHBOARD_DB_CONNECTION_TIMEOUT_SECS", "3"),
        ]));

        let resolved = load_from_empty_args().validate().expect("valid settings");

        assert_eq!(resolved.pool.database_url(), "postgres://localhost/dashboard");
        assert_eq!(resolved.pool.max_size(), 12);
        assert_eq!(resolved.pool.min_idle(), Some(0));
        assert_eq!(resolved.pool.connection_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    #[case::zero_pool(&[("DASHBOARD_DB_MAX_CONNECTIONS", "0")], "db_max_connections")]
    #[case::idle_above_max(
        &[("DASHBOARD_DB_MAX_CONNECTIONS", "2"), ("DASHBOARD_DB_MIN_IDLE", "3")],
        "db_min_idle"
    )]
    fn invalid_pool_sizing_is_reported(
        #[case] overrides: &[(&str, &str)],
        #[case] expected_key: &str,
    ) {
        let mut values = vec![
            ("DASHBOARD_DATABASE_URL", "postgres://localhost/dashboard"),
            ("DASHBOARD_MOODLE_URL", "https://lms.example.com/"),
            ("DASHBOARD_MOODLE_TOKEN", "tok"),
        ];
        values.extend_from_slice(overrides);
        let _guard = lock_env(env_with(&values));

        let error = load_from_empty_args().validate().expect_err("bad pool sizing");

        assert!(matches!(error, SettingsError::Invalid { key, .. } if key == expected_key));
    }
}
