use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::user_repository::UserRow;

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Server-side session store. Only the SHA-256 hash of the cookie token is
/// ever passed across this boundary; the raw token never reaches the
/// database.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<SessionRow>;

    /// Resolves an unexpired session to its user. Expired or unknown tokens
    /// yield `None`.
    async fn find_user_by_token_hash(&self, token_hash: &str) -> anyhow::Result<Option<UserRow>>;

    async fn delete_by_token_hash(&self, token_hash: &str) -> anyhow::Result<bool>;

    /// Removes expired sessions, returning how many rows went away.
    async fn delete_expired(&self) -> anyhow::Result<u64>;
}
