use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::ports::session_repository::SessionRepository;

/// Sessions are stored hashed; a leaked table does not leak usable tokens.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

fn generate_token() -> String {
    let mut raw = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut raw);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}

pub struct StartSession<'a, R: SessionRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Opaque token handed to the client. Only its hash is persisted.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl<'a, R: SessionRepository + ?Sized> StartSession<'a, R> {
    pub async fn execute(&self, user_id: Uuid, ttl_secs: i64) -> anyhow::Result<IssuedSession> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);
        self.repo
            .create_session(user_id, &hash_session_token(&token), expires_at)
            .await?;
        Ok(IssuedSession { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(a.len() >= 43);
        assert!(
            a.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn hashing_is_stable_and_not_the_identity() {
        let token = generate_token();
        assert_eq!(hash_session_token(&token), hash_session_token(&token));
        assert_ne!(hash_session_token(&token), token);
    }
}
