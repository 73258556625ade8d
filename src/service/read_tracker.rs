use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::AnnouncementView,
    error::{AppError, Result},
    repository::{AnnouncementRepository, AnnouncementViewRepository},
};

/// Records which users have read which announcements.
pub struct ReadTracker {
    announcement_repo: Arc<dyn AnnouncementRepository>,
    view_repo: Arc<dyn AnnouncementViewRepository>,
}

impl ReadTracker {
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        view_repo: Arc<dyn AnnouncementViewRepository>,
    ) -> Self {
        Self { announcement_repo, view_repo }
    }

    /// Idempotent: marking the same pair twice returns the original view.
    pub async fn mark_as_read(&self, user_id: Uuid, announcement_id: Uuid) -> Result<AnnouncementView> {
        if self.announcement_repo.find_by_id(announcement_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Announcement {} not found",
                announcement_id
            )));
        }

        self.view_repo.first_or_create(user_id, announcement_id).await
    }

    pub async fn read_count(&self, user_id: Uuid, announcement_id: Uuid) -> Result<i64> {
        self.view_repo.count_for(user_id, announcement_id).await
    }

    pub async fn views_for(&self, user_id: Uuid) -> Result<Vec<AnnouncementView>> {
        self.view_repo.list_by_user(user_id).await
    }
}
