use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The requesting user as handed over by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub subscription: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// No subscription, or a blank one.
    pub fn is_free(&self) -> bool {
        self.subscription
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub subscription: Option<String>,
    pub locale: Option<String>,
}
