pub mod announcement_service;
pub mod read_tracker;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::auth::{AuthService, IdentityResolver, SessionIdentityResolver};
use crate::config::AnnouncementConfig;
use crate::repository::*;

pub use announcement_service::AnnouncementService;
pub use read_tracker::ReadTracker;

pub struct ServiceContext {
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub auth_service: Arc<AuthService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, config: AnnouncementConfig) -> Self {
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let view_repo: Arc<dyn AnnouncementViewRepository> =
            Arc::new(SqliteAnnouncementViewRepository::new(db_pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db_pool.clone()));

        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo.clone(),
            view_repo,
            config,
        ));
        let auth_service = Arc::new(AuthService::new(db_pool.clone()));
        let identity: Arc<dyn IdentityResolver> = Arc::new(SessionIdentityResolver::new(
            auth_service.clone(),
            user_repo.clone(),
        ));

        Self {
            announcement_repo,
            user_repo,
            announcement_service,
            auth_service,
            identity,
            db_pool,
        }
    }
}
