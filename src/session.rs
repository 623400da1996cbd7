//! Signed session cookies.
//!
//! The session is a JSON-serialized user object carried in the `user`
//! cookie, signed with HMAC-SHA256: `base64url(payload).base64url(tag)`.
//! Expiry lives inside the signed payload. Anything that fails to decode
//! or verify is treated as an absent session rather than an error.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::company::CompanyRole;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "user";

/// The authenticated user carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    /// Company account id
    pub id: Uuid,
    /// Login email
    pub email: String,
    /// Company display name
    pub name: String,
    /// Account role: supplier|buyer
    pub role: String,
    /// Expiry as unix timestamp (seconds)
    pub exp: i64,
}

impl SessionUser {
    /// Parsed role of the session user; None for unknown role strings.
    pub fn company_role(&self) -> Option<CompanyRole> {
        CompanyRole::parse(&self.role)
    }
}

/// Encode and sign a session payload into a cookie value.
pub fn encode(user: &SessionUser, key: &[u8]) -> String {
    let payload = serde_json::to_vec(user).expect("session payload serializes");
    let encoded_payload = URL_SAFE_NO_PAD.encode(&payload);

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(encoded_payload.as_bytes());
    let tag = mac.finalize().into_bytes();

    format!("{}.{}", encoded_payload, URL_SAFE_NO_PAD.encode(tag))
}

/// Decode and verify a cookie value.
///
/// Returns None for any malformed, tampered, or expired value; the session
/// gate treats all of those exactly like a missing cookie.
pub fn decode(value: &str, key: &[u8]) -> Option<SessionUser> {
    let (encoded_payload, encoded_tag) = value.split_once('.')?;

    let tag = URL_SAFE_NO_PAD.decode(encoded_tag).ok()?;

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(encoded_payload.as_bytes());
    mac.verify_slice(&tag).ok()?;

    let payload = URL_SAFE_NO_PAD.decode(encoded_payload).ok()?;
    let user: SessionUser = serde_json::from_slice(&payload).ok()?;

    if user.exp <= Utc::now().timestamp() {
        return None;
    }

    Some(user)
}

/// Build the `Set-Cookie` header value establishing a session.
pub fn login_cookie(user: &SessionUser, key: &[u8], ttl_seconds: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        encode(user, key),
        ttl_seconds
    )
}

/// Build the `Set-Cookie` header value clearing the session.
pub fn logout_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Extract the raw session cookie value from a `Cookie` request header.
pub fn cookie_value(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}
