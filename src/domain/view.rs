use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records that `user_id` has read `announcement_id`. At most one per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub announcement_id: Uuid,
    pub created_at: DateTime<Utc>,
}
