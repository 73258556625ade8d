use std::sync::Arc;
use async_trait::async_trait;

use crate::{
    domain::User,
    error::Result,
    repository::UserRepository,
};

use super::AuthService;

/// Answers "who is making this request" for a presented credential.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<User>>;
}

pub struct SessionIdentityResolver {
    auth_service: Arc<AuthService>,
    user_repo: Arc<dyn UserRepository>,
}

impl SessionIdentityResolver {
    pub fn new(auth_service: Arc<AuthService>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { auth_service, user_repo }
    }
}

#[async_trait]
impl IdentityResolver for SessionIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let Some(session) = self.auth_service.validate_session(token).await? else {
            return Ok(None);
        };

        self.user_repo.find_by_id(session.user_id).await
    }
}
