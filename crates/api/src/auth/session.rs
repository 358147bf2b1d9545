//! Session cookie handling.
//!
//! The token itself is produced and checked by `gemeinde_core::session`;
//! this module only moves it in and out of HTTP headers.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use gemeinde_core::session::SESSION_MAX_AGE_DAYS;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gemeinde_session";

/// Minimum accepted length of `SESSION_SECRET` in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Session signing configuration.
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 key used to sign and verify session tokens.
    pub secret: Vec<u8>,
    /// Add the `Secure` attribute (HTTPS deployments).
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `SESSION_SECRET`        | **yes**  | --      |
    /// | `SESSION_COOKIE_SECURE` | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is missing or shorter than 32 bytes.
    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set in the environment");
        assert!(
            secret.len() >= MIN_SECRET_BYTES,
            "SESSION_SECRET must be at least {MIN_SECRET_BYTES} bytes"
        );

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        Self {
            secret: secret.into_bytes(),
            cookie_secure,
        }
    }
}

/// `Set-Cookie` value carrying a freshly signed token.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    let max_age = SESSION_MAX_AGE_DAYS * 24 * 60 * 60;
    with_secure(
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"),
        config,
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    with_secure(
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        config,
    )
}

fn with_secure(cookie: String, config: &SessionConfig) -> String {
    if config.cookie_secure {
        cookie + "; Secure"
    } else {
        cookie
    }
}

/// Find the session token among the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}
