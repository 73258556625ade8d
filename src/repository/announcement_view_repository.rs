use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::AnnouncementView,
    error::{AppError, Result},
    repository::AnnouncementViewRepository,
};

#[derive(FromRow)]
struct AnnouncementViewRow {
    id: String,
    user_id: String,
    announcement_id: String,
    created_at: NaiveDateTime,
}

pub struct SqliteAnnouncementViewRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementViewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_view(row: AnnouncementViewRow) -> Result<AnnouncementView> {
        Ok(AnnouncementView {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id).map_err(|e| AppError::Database(e.to_string()))?,
            announcement_id: Uuid::parse_str(&row.announcement_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl AnnouncementViewRepository for SqliteAnnouncementViewRepository {
    async fn first_or_create(&self, user_id: Uuid, announcement_id: Uuid) -> Result<AnnouncementView> {
        // The unique (user_id, announcement_id) index turns concurrent inserts
        // for the same pair into no-ops.
        let result = sqlx::query(
            r#"
            INSERT INTO announcement_views (id, user_id, announcement_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, announcement_id) DO NOTHING
            "#
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(announcement_id.to_string())
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("User {} already read announcement {}", user_id, announcement_id);
        } else {
            tracing::debug!("User {} read announcement {}", user_id, announcement_id);
        }

        self.find(user_id, announcement_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve announcement view".to_string())
        })
    }

    async fn find(&self, user_id: Uuid, announcement_id: Uuid) -> Result<Option<AnnouncementView>> {
        let row = sqlx::query_as::<_, AnnouncementViewRow>(
            r#"
            SELECT id, user_id, announcement_id, created_at
            FROM announcement_views
            WHERE user_id = ? AND announcement_id = ?
            "#
        )
        .bind(user_id.to_string())
        .bind(announcement_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_view).transpose()
    }

    async fn count_for(&self, user_id: Uuid, announcement_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM announcement_views WHERE user_id = ? AND announcement_id = ?"
        )
        .bind(user_id.to_string())
        .bind(announcement_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AnnouncementView>> {
        let rows = sqlx::query_as::<_, AnnouncementViewRow>(
            r#"
            SELECT id, user_id, announcement_id, created_at
            FROM announcement_views
            WHERE user_id = ?
            ORDER BY created_at ASC
            "#
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_view).collect()
    }
}
