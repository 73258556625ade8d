use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;
use crate::selection::AnnouncementQuery;

pub mod announcement_repository;
pub mod announcement_view_repository;
pub mod user_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use announcement_view_repository::SqliteAnnouncementViewRepository;
pub use user_repository::SqliteUserRepository;

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self) -> Result<Vec<Announcement>>;
    /// Runs the filter set against the store, annotating read counts when
    /// the query names a reader.
    async fn select(&self, query: &AnnouncementQuery) -> Result<Vec<RecentAnnouncement>>;
}

#[async_trait]
pub trait AnnouncementViewRepository: Send + Sync {
    /// Returns the existing view for the pair, or creates it. Never duplicates.
    async fn first_or_create(&self, user_id: Uuid, announcement_id: Uuid) -> Result<AnnouncementView>;
    async fn find(&self, user_id: Uuid, announcement_id: Uuid) -> Result<Option<AnnouncementView>>;
    async fn count_for(&self, user_id: Uuid, announcement_id: Uuid) -> Result<i64>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AnnouncementView>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}
