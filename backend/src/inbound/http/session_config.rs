//! Session cookie settings derived from validated configuration.

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroizing;

const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to an ephemeral key.
    Debug,
    /// Release builds require an explicit secret.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Cookie session settings handed to the server.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while deriving the session key.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionConfigError {
    #[error("secret_key is required in release builds")]
    MissingSecret,
    #[error("secret_key too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// Derive session settings from the configured secret.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a release build has no secret or the
/// secret is shorter than 64 bytes.
pub fn session_settings(
    secret: Option<&Zeroizing<String>>,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = match secret {
        Some(secret) => {
            let length = secret.len();
            if length < SESSION_KEY_MIN_LEN {
                return Err(SessionConfigError::SecretTooShort {
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            Key::derive_from(secret.as_bytes())
        }
        None if mode == BuildMode::Debug => {
            warn!("secret_key not set; using temporary session key (dev only)");
            Key::generate()
        }
        None => return Err(SessionConfigError::MissingSecret),
    };

    if !cookie_secure {
        warn!("session cookies are not marked Secure");
    }

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site: SameSite::Lax,
    })
}
