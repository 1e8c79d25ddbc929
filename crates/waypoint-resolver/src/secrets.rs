//! JWT signing secret resolution.
//!
//! The secret is taken from the first source that yields a non-empty value:
//!
//! 1. `JWT_SECRET_KEY`
//! 2. `AG_AUTH_JWT_SECRET_KEY`
//! 3. `auth.jwt_secret` from the settings
//! 4. A fixed development secret, with a warning

use std::fmt;

use tracing::warn;

use crate::settings::AuthSettings;

/// Primary environment variable holding the secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";

/// Alternate environment variable holding the secret.
pub const JWT_SECRET_ALT_ENV: &str = "AG_AUTH_JWT_SECRET_KEY";

/// Development-only fallback secret.
pub const INSECURE_DEV_SECRET: &str = "insecure-development-secret-do-not-use-in-production";

/// Where a secret was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    /// An environment variable.
    Env(&'static str),
    /// The settings file or `WAYPOINT__AUTH__JWT_SECRET`.
    Settings,
    /// The built-in development secret.
    InsecureDefault,
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(name) => write!(f, "env:{}", name),
            Self::Settings => write!(f, "settings"),
            Self::InsecureDefault => write!(f, "insecure-default"),
        }
    }
}

/// A resolved JWT signing secret.
#[derive(Clone)]
pub struct JwtSecret {
    value: String,
    source: SecretSource,
}

impl JwtSecret {
    /// Returns the secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Returns where the secret came from.
    pub fn source(&self) -> SecretSource {
        self.source
    }

    /// Returns true if the development fallback is in use.
    pub fn is_insecure(&self) -> bool {
        self.source == SecretSource::InsecureDefault
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolves the JWT secret from the process environment and `auth`.
pub fn jwt_secret(auth: &AuthSettings) -> JwtSecret {
    resolve_jwt_secret(|name| std::env::var(name).ok(), auth)
}

/// Resolves the JWT secret using `lookup` for environment variables.
pub fn resolve_jwt_secret<F>(lookup: F, auth: &AuthSettings) -> JwtSecret
where
    F: Fn(&str) -> Option<String>,
{
    for name in [JWT_SECRET_ENV, JWT_SECRET_ALT_ENV] {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            return JwtSecret {
                value,
                source: SecretSource::Env(name),
            };
        }
    }

    if let Some(value) = auth.jwt_secret.as_ref().filter(|v| !v.is_empty()) {
        return JwtSecret {
            value: value.clone(),
            source: SecretSource::Settings,
        };
    }

    warn!("Using the insecure development JWT secret; set {} in production", JWT_SECRET_ENV);
    JwtSecret {
        value: INSECURE_DEV_SECRET.to_string(),
        source: SecretSource::InsecureDefault,
    }
}
