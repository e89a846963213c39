use crate::application::ports::session_repository::SessionRepository;
use crate::application::ports::user_repository::UserRow;
use crate::application::use_cases::auth::session::hash_session_token;

/// Resolves a presented session token to its user, if the session is live.
pub struct GetMe<'a, R: SessionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SessionRepository + ?Sized> GetMe<'a, R> {
    pub async fn execute(&self, token: &str) -> anyhow::Result<Option<UserRow>> {
        self.repo
            .find_user_by_token_hash(&hash_session_token(token))
            .await
    }
}
