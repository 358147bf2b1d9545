//! Signed session tokens.
//!
//! A token is `<payload>.<signature>` where `<payload>` is the hex-encoded
//! JSON of a [`SessionPayload`] and `<signature>` is the hex-encoded
//! HMAC-SHA256 of the payload text under the server secret. Tokens are not
//! encrypted; they only need to be tamper-evident.
//!
//! Verification never errors: anything malformed or forged is simply "no
//! session". Expiry is a separate check ([`is_expired`]) made by the caller.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Separator between payload and signature.
pub const SEPARATOR: char = '.';

/// Sessions older than this are rejected.
pub const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Allowed clock skew for tokens that claim to be issued in the future.
const MAX_FUTURE_SKEW_SECS: i64 = 60;

/// Data carried inside the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user_id: DbId,
    pub username: String,
    pub role: Option<String>,
    /// Issue time as Unix milliseconds.
    pub timestamp: i64,
}

impl SessionPayload {
    pub fn new(user_id: DbId, username: &str, role: Option<&str>, issued_at: Timestamp) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            role: role.map(str::to_string),
            timestamp: issued_at.timestamp_millis(),
        }
    }

    pub fn issued_at(&self) -> Option<Timestamp> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
    }
}

/// Serialize and sign `payload` with `secret`.
pub fn sign_session(payload: &SessionPayload, secret: &[u8]) -> Result<String, CoreError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| CoreError::Internal(format!("Session serialization failed: {e}")))?;
    let payload_hex = hex::encode(json);
    let signature = hex::encode(mac_for(secret, &payload_hex).finalize().into_bytes());
    Ok(format!("{payload_hex}{SEPARATOR}{signature}"))
}

/// Check the signature of `token` and recover its payload.
///
/// Returns `None` for malformed tokens, bad signatures, or undecodable
/// payloads. Does not check expiry.
pub fn verify_session(token: &str, secret: &[u8]) -> Option<SessionPayload> {
    let (payload_hex, signature_hex) = token.split_once(SEPARATOR)?;

    // Only the canonical lowercase encoding is accepted, so every byte of
    // the token is covered by the signature.
    if !is_lower_hex(payload_hex) || !is_lower_hex(signature_hex) {
        return None;
    }

    let signature = hex::decode(signature_hex).ok()?;
    mac_for(secret, payload_hex).verify_slice(&signature).ok()?;

    let json = hex::decode(payload_hex).ok()?;
    serde_json::from_slice(&json).ok()
}

/// Whether a verified payload is outside the session window at `now`.
pub fn is_expired(payload: &SessionPayload, now: Timestamp) -> bool {
    let Some(issued_at) = payload.issued_at() else {
        return true;
    };
    if issued_at - now > Duration::seconds(MAX_FUTURE_SKEW_SECS) {
        return true;
    }
    now - issued_at > Duration::days(SESSION_MAX_AGE_DAYS)
}

fn mac_for(secret: &[u8], payload_hex: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload_hex.as_bytes());
    mac
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-session-secret-that-is-long-enough";

    fn payload() -> SessionPayload {
        SessionPayload::new(42, "gemeinderat", Some("editor"), Utc::now())
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let p = payload();
        let token = sign_session(&p, SECRET).unwrap();
        assert_eq!(verify_session(&token, SECRET), Some(p));
    }

    #[test]
    fn round_trip_without_role_and_unicode_name() {
        let p = SessionPayload::new(1, "Jürgen Müller", None, Utc::now());
        let token = sign_session(&p, SECRET).unwrap();
        assert_eq!(verify_session(&token, SECRET), Some(p));
    }

    #[test]
    fn any_tampered_byte_fails() {
        let token = sign_session(&payload(), SECRET).unwrap();
        let bytes = token.as_bytes();
        for i in 0..bytes.len() {
            let mut forged = bytes.to_vec();
            forged[i] ^= 0x01;
            let forged = String::from_utf8(forged).unwrap();
            assert_eq!(
                verify_session(&forged, SECRET),
                None,
                "flipping byte {i} must invalidate the token"
            );
        }
    }

    #[test]
    fn uppercase_signature_is_rejected() {
        let token = sign_session(&payload(), SECRET).unwrap();
        let (p, s) = token.split_once('.').unwrap();
        let forged = format!("{p}.{}", s.to_uppercase());
        assert_eq!(verify_session(&forged, SECRET), None);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = sign_session(&payload(), SECRET).unwrap();
        assert_eq!(verify_session(&token, b"another-secret"), None);
    }

    #[test]
    fn malformed_tokens_yield_none() {
        for token in ["", ".", "abc", "abc.", ".abc", "zz.zz", "00.00", "a.b.c"] {
            assert_eq!(verify_session(token, SECRET), None, "token {token:?}");
        }
    }

    #[test]
    fn signed_non_payload_json_is_rejected() {
        let payload_hex = hex::encode(br#"{"hello":"world"}"#);
        let sig = hex::encode(mac_for(SECRET, &payload_hex).finalize().into_bytes());
        assert_eq!(verify_session(&format!("{payload_hex}.{sig}"), SECRET), None);
    }

    #[test]
    fn expiry_window() {
        let now = Utc::now();
        let fresh = SessionPayload::new(1, "a", None, now - Duration::days(6));
        assert!(!is_expired(&fresh, now));

        let stale = SessionPayload::new(1, "a", None, now - Duration::days(7) - Duration::seconds(1));
        assert!(is_expired(&stale, now));

        let future = SessionPayload::new(1, "a", None, now + Duration::hours(1));
        assert!(is_expired(&future, now));
    }

    #[test]
    fn out_of_range_timestamp_is_expired() {
        let mut p = payload();
        p.timestamp = i64::MAX;
        assert!(is_expired(&p, Utc::now()));
    }
}
