use crate::application::ports::session_repository::SessionRepository;
use crate::application::use_cases::auth::session::hash_session_token;

pub struct Logout<'a, R: SessionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SessionRepository + ?Sized> Logout<'a, R> {
    /// Revokes the session behind `token`. Returns whether one existed.
    pub async fn execute(&self, token: &str) -> anyhow::Result<bool> {
        self.repo
            .delete_by_token_hash(&hash_session_token(token))
            .await
    }
}
