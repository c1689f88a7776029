use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::models::Role;

const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub user_id: String,
    pub role: Role,
    pub expires_at: i64,
}

fn sign(secret: &str, payload: &str) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload.as_bytes());
    Some(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Bearer token: `base64url(user_id:role:expires_unix)` + `.` + signature.
pub fn issue_token(secret: &str, user_id: &str, role: Role) -> String {
    let expires_at = Utc::now().timestamp() + TOKEN_TTL_SECS;
    let payload = format!("{user_id}:{}:{expires_at}", role.as_str());
    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&payload);
    let signature = sign(secret, &payload).unwrap_or_default();
    format!("{encoded}.{signature}")
}

pub fn verify_token(secret: &str, token: &str) -> Option<TokenClaims> {
    let (encoded, signature) = token.split_once('.')?;
    let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(encoded)
        .ok()?;
    let payload = String::from_utf8(payload_bytes).ok()?;

    if sign(secret, &payload)? != signature {
        return None;
    }

    let mut parts = payload.split(':');
    let user_id = parts.next()?.to_string();
    let role = Role::parse(parts.next()?)?;
    let expires_at: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || user_id.is_empty() {
        return None;
    }
    if expires_at <= Utc::now().timestamp() {
        return None;
    }

    Some(TokenClaims {
        user_id,
        role,
        expires_at,
    })
}

pub fn generate_salt() -> String {
    let mut buf = [0u8; 16];
    rand::thread_rng().fill(&mut buf);
    base64::engine::general_purpose::STANDARD.encode(buf)
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(salt.as_bytes()) {
        Ok(m) => m,
        // HMAC accepts keys of any length; this arm is unreachable.
        Err(_) => return String::new(),
    };
    mac.update(password.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    hash_password(password, salt) == hash
}
