#![allow(dead_code)]

use std::sync::Arc;

use bulletin::{
    config::AnnouncementConfig,
    domain::{Announcement, CreateUserRequest, NewAnnouncement, User},
    service::ServiceContext,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use uuid::Uuid;

/// A single long-lived connection so the in-memory database survives the test.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

/// A throwaway on-disk database that several connections can write to at once.
pub async fn shared_test_pool(max_connections: u32) -> anyhow::Result<SqlitePool> {
    let path = std::env::temp_dir().join(format!("bulletin-test-{}.db", Uuid::new_v4().simple()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .min_connections(max_connections)
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub async fn test_context(config: AnnouncementConfig) -> anyhow::Result<Arc<ServiceContext>> {
    let pool = test_pool().await?;
    Ok(Arc::new(ServiceContext::new(pool, config)))
}

pub async fn create_user(ctx: &ServiceContext, subscription: Option<&str>) -> anyhow::Result<User> {
    let name = Uuid::new_v4().simple().to_string();
    let user = ctx.user_repo.create(CreateUserRequest {
        username: name.clone(),
        email: format!("{}@example.com", name),
        subscription: subscription.map(str::to_string),
        locale: None,
    }).await?;
    Ok(user)
}

pub async fn create_announcement(
    ctx: &ServiceContext,
    announcement: NewAnnouncement,
) -> anyhow::Result<Announcement> {
    let body = if announcement.body.is_empty() {
        "Something happened".to_string()
    } else {
        announcement.body
    };
    let created = ctx.announcement_repo.create(NewAnnouncement { body, ..announcement }).await?;
    Ok(created)
}

pub fn ids<T: AsRef<Announcement>>(items: &[T]) -> Vec<Uuid> {
    items.iter().map(|item| item.as_ref().id).collect()
}

pub fn sorted(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids
}
