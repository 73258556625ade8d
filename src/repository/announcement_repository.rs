use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{Announcement, Condition, NewAnnouncement, RecentAnnouncement},
    error::{AppError, Result},
    repository::AnnouncementRepository,
    selection::{AnnouncementQuery, DeliveryOrder, ReadState},
};

const ANNOUNCEMENT_COLUMNS: &str = "a.id, a.title, a.body, a.category, a.start_delivering_at, \
     a.stop_delivering_at, a.limit_to_users, a.created_at, a.updated_at";

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    body: String,
    category: Option<String>,
    start_delivering_at: Option<NaiveDateTime>,
    stop_delivering_at: Option<NaiveDateTime>,
    limit_to_users: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct SelectedRow {
    #[sqlx(flatten)]
    announcement: AnnouncementRow,
    read_count: i64,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        let limit_to_users: Vec<Condition> = serde_json::from_str(&row.limit_to_users)
            .map_err(|e| AppError::Database(format!("Invalid limit_to_users: {}", e)))?;

        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            body: row.body,
            category: row.category,
            start_delivering_at: row.start_delivering_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            stop_delivering_at: row.stop_delivering_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            limit_to_users,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    /// Translates the filter set into a single grouped query.
    fn build_select(query: &AnnouncementQuery) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT {}, ", ANNOUNCEMENT_COLUMNS));

        match query.reader {
            Some((user_id, _)) => {
                qb.push("COUNT(v.id) AS read_count FROM announcements a ");
                qb.push(
                    "LEFT JOIN announcement_views v \
                     ON v.announcement_id = a.id AND v.user_id = ",
                );
                qb.push_bind(user_id.to_string());
            }
            None => {
                qb.push("0 AS read_count FROM announcements a");
            }
        }

        qb.push(" WHERE 1 = 1");

        if let Some(now) = query.ready_at {
            let now = now.naive_utc();
            qb.push(" AND (a.start_delivering_at < ")
                .push_bind(now)
                .push(" OR a.start_delivering_at IS NULL)");
            qb.push(" AND (a.stop_delivering_at > ")
                .push_bind(now)
                .push(" OR a.stop_delivering_at IS NULL)");
        }

        if let Some(cutoff) = query.newer_than {
            let cutoff = cutoff.naive_utc();
            qb.push(" AND (a.start_delivering_at >= ")
                .push_bind(cutoff)
                .push(" OR (a.start_delivering_at IS NULL AND a.created_at >= ")
                .push_bind(cutoff)
                .push("))");
        }

        if let Some(category) = &query.category {
            qb.push(" AND a.category = ").push_bind(category.clone());
        }

        if let Some((_, ReadState::Unread)) = query.reader {
            qb.push(" AND v.id IS NULL");
        }

        qb.push(" GROUP BY a.id");

        // SQLite sorts NULL first ascending and last descending, matching
        // the in-memory ordering.
        match query.order {
            DeliveryOrder::Ascending => {
                qb.push(" ORDER BY a.start_delivering_at ASC, a.created_at ASC, a.id ASC");
            }
            DeliveryOrder::Descending => {
                qb.push(" ORDER BY a.start_delivering_at DESC, a.created_at DESC, a.id DESC");
            }
        }

        qb
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        announcement.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now();
        let created_at = announcement.created_at.unwrap_or(now).naive_utc();
        let limit_to_users = serde_json::to_string(&announcement.limit_to_users)?;

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, body, category, start_delivering_at, stop_delivering_at,
                limit_to_users, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&announcement.title)
        .bind(&announcement.body)
        .bind(&announcement.category)
        .bind(announcement.start_delivering_at.map(|dt| dt.naive_utc()))
        .bind(announcement.stop_delivering_at.map(|dt| dt.naive_utc()))
        .bind(&limit_to_users)
        .bind(created_at)
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created announcement {}", id);

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "SELECT {} FROM announcements a WHERE a.id = ?",
            ANNOUNCEMENT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_announcement).transpose()
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "SELECT {} FROM announcements a ORDER BY a.created_at ASC, a.id ASC",
            ANNOUNCEMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_announcement).collect()
    }

    async fn select(&self, query: &AnnouncementQuery) -> Result<Vec<RecentAnnouncement>> {
        let mut qb = Self::build_select(query);
        let rows: Vec<SelectedRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| -> Result<RecentAnnouncement> {
                Ok(RecentAnnouncement {
                    announcement: Self::row_to_announcement(row.announcement)?,
                    read: row.read_count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_reader_skips_join() {
        let qb = SqliteAnnouncementRepository::build_select(&AnnouncementQuery::new());
        let sql = qb.sql();
        assert!(!sql.contains("JOIN"));
        assert!(sql.contains("0 AS read_count"));
    }

    #[test]
    fn test_unread_filter_pushed_down() {
        let query = AnnouncementQuery::new()
            .ready_for_delivery(Utc::now())
            .unread_by(Uuid::new_v4())
            .in_delivery_order();
        let qb = SqliteAnnouncementRepository::build_select(&query);
        let sql = qb.sql();
        assert!(sql.contains("LEFT JOIN announcement_views v"));
        assert!(sql.contains("v.id IS NULL"));
        assert!(sql.ends_with("ORDER BY a.start_delivering_at ASC, a.created_at ASC, a.id ASC"));
    }

    #[test]
    fn test_category_only_when_given() {
        let none = SqliteAnnouncementRepository::build_select(&AnnouncementQuery::new().in_category(None));
        assert!(!none.sql().contains("a.category ="));

        let en = SqliteAnnouncementRepository::build_select(&AnnouncementQuery::new().in_category(Some("en")));
        assert!(en.sql().contains("a.category ="));
    }
}
