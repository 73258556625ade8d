//! Announcement selection: which announcements are current or recent for a user.

pub mod eligibility;
pub mod filters;
pub mod read_state;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Announcement, AnnouncementView, RecentAnnouncement};

pub use eligibility::{matches, UserSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Exclude announcements the user has read.
    Unread,
    /// Keep everything and attach the user's read count.
    Annotated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryOrder {
    #[default]
    Ascending,
    Descending,
}

/// A composable filter set. Repositories push it down into their store;
/// [`AnnouncementQuery::apply`] evaluates the same rules in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementQuery {
    pub ready_at: Option<DateTime<Utc>>,
    pub newer_than: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub reader: Option<(Uuid, ReadState)>,
    pub order: DeliveryOrder,
}

impl AnnouncementQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready_for_delivery(mut self, now: DateTime<Utc>) -> Self {
        self.ready_at = Some(now);
        self
    }

    pub fn newer_than(mut self, cutoff: DateTime<Utc>) -> Self {
        self.newer_than = Some(cutoff);
        self
    }

    pub fn in_category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(str::to_string);
        self
    }

    pub fn unread_by(mut self, user_id: Uuid) -> Self {
        self.reader = Some((user_id, ReadState::Unread));
        self
    }

    pub fn with_read_by(mut self, user_id: Uuid) -> Self {
        self.reader = Some((user_id, ReadState::Annotated));
        self
    }

    pub fn in_delivery_order(mut self) -> Self {
        self.order = DeliveryOrder::Ascending;
        self
    }

    pub fn in_reverse_delivery_order(mut self) -> Self {
        self.order = DeliveryOrder::Descending;
        self
    }

    pub fn apply(
        &self,
        announcements: Vec<Announcement>,
        views: &[AnnouncementView],
    ) -> Vec<RecentAnnouncement> {
        let mut candidates = announcements;

        if let Some(now) = self.ready_at {
            candidates = filters::ready_for_delivery(candidates, now);
        }
        if let Some(cutoff) = self.newer_than {
            candidates = filters::newer_than(candidates, cutoff);
        }
        candidates = filters::in_category(candidates, self.category.as_deref());

        let mut selected = match self.reader {
            Some((user_id, ReadState::Unread)) => {
                let unread = read_state::unread_filter(candidates, views, user_id);
                read_state::read_annotation(unread, views, user_id)
            }
            Some((user_id, ReadState::Annotated)) => {
                read_state::read_annotation(candidates, views, user_id)
            }
            None => candidates
                .into_iter()
                .map(|announcement| RecentAnnouncement { announcement, read: 0 })
                .collect(),
        };

        match self.order {
            DeliveryOrder::Ascending => filters::in_delivery_order(&mut selected),
            DeliveryOrder::Descending => filters::in_reverse_delivery_order(&mut selected),
        }

        selected
    }
}
