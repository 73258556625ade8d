use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    config::AnnouncementConfig,
    domain::{Announcement, AnnouncementView, RecentAnnouncement, User},
    error::{AppError, Result},
    repository::{AnnouncementRepository, AnnouncementViewRepository},
    selection::{eligibility, matches, AnnouncementQuery, UserSnapshot},
};

use super::read_tracker::ReadTracker;

pub struct AnnouncementService {
    announcement_repo: Arc<dyn AnnouncementRepository>,
    tracker: ReadTracker,
    config: AnnouncementConfig,
}

impl AnnouncementService {
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        view_repo: Arc<dyn AnnouncementViewRepository>,
        config: AnnouncementConfig,
    ) -> Self {
        for name in &config.user_predicates {
            if eligibility::lookup_predicate(name).is_none() {
                tracing::warn!("Ignoring unknown user predicate '{}'", name);
            }
        }

        Self {
            tracker: ReadTracker::new(announcement_repo.clone(), view_repo),
            announcement_repo,
            config,
        }
    }

    pub fn tracker(&self) -> &ReadTracker {
        &self.tracker
    }

    /// Default `as_of` for recent listings.
    pub fn recent_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.config.recent_window_days)
    }

    /// The oldest deliverable announcement the user hasn't read and is eligible for.
    pub async fn current(&self, user: Option<&User>) -> Result<Option<Announcement>> {
        self.current_at(user, Utc::now()).await
    }

    pub async fn current_at(&self, user: Option<&User>, now: DateTime<Utc>) -> Result<Option<Announcement>> {
        let user = user.ok_or_else(|| {
            AppError::InvalidArgument("User is required to find current announcement".to_string())
        })?;

        let query = AnnouncementQuery::new()
            .ready_for_delivery(now)
            .unread_by(user.id)
            .in_delivery_order();
        let candidates = self.announcement_repo.select(&query).await?;

        let snapshot = UserSnapshot::build(user, &self.config);
        Ok(candidates
            .into_iter()
            .map(|c| c.announcement)
            .find(|a| matches(&snapshot, &a.limit_to_users)))
    }

    /// Every deliverable announcement newer than `as_of` the user is eligible
    /// for, newest first, read or not.
    pub async fn recent_for(
        &self,
        user: Option<&User>,
        as_of: Option<DateTime<Utc>>,
        category: Option<&str>,
    ) -> Result<Vec<RecentAnnouncement>> {
        self.recent_for_at(user, as_of, category, Utc::now()).await
    }

    pub async fn recent_for_at(
        &self,
        user: Option<&User>,
        as_of: Option<DateTime<Utc>>,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecentAnnouncement>> {
        let user = user.ok_or_else(|| {
            AppError::InvalidArgument("User is required to find recent announcements".to_string())
        })?;
        let as_of = as_of.unwrap_or_else(|| self.recent_cutoff(now));

        let query = AnnouncementQuery::new()
            .ready_for_delivery(now)
            .newer_than(as_of)
            .with_read_by(user.id)
            .in_category(category)
            .in_reverse_delivery_order();
        let candidates = self.announcement_repo.select(&query).await?;

        let snapshot = UserSnapshot::build(user, &self.config);
        Ok(candidates
            .into_iter()
            .filter(|c| matches(&snapshot, &c.announcement.limit_to_users))
            .collect())
    }

    pub async fn mark_as_read(&self, user: Option<&User>, announcement_id: Uuid) -> Result<AnnouncementView> {
        let user = user.ok_or_else(|| {
            AppError::InvalidArgument("User is required to mark an announcement as read".to_string())
        })?;

        self.tracker.mark_as_read(user.id, announcement_id).await
    }
}
