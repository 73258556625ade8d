use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A single eligibility rule: the user's snapshot must carry `field`
/// with exactly `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub start_delivering_at: Option<DateTime<Utc>>,
    pub stop_delivering_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit_to_users: Vec<Condition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Open-ended on either side when the bound is unset; both bounds are exclusive.
    pub fn is_deliverable_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.start_delivering_at.map_or(true, |start| start < now);
        let not_stopped = self.stop_delivering_at.map_or(true, |stop| stop > now);
        started && not_stopped
    }

    /// The moment an announcement counts as published for recency checks.
    pub fn delivered_since(&self) -> DateTime<Utc> {
        self.start_delivering_at.unwrap_or(self.created_at)
    }
}

impl AsRef<Announcement> for Announcement {
    fn as_ref(&self) -> &Announcement {
        self
    }
}

/// An announcement annotated with how many times the requesting user has
/// marked it read (0 or 1, views are unique per user).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentAnnouncement {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub read: i64,
}

impl RecentAnnouncement {
    pub fn is_read(&self) -> bool {
        self.read > 0
    }
}

impl AsRef<Announcement> for RecentAnnouncement {
    fn as_ref(&self) -> &Announcement {
        &self.announcement
    }
}

/// Wire representation: only id, title and body leave the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementSummary {
    pub id: Uuid,
    pub title: String,
    pub body: String,
}

impl From<&Announcement> for AnnouncementSummary {
    fn from(announcement: &Announcement) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title.clone(),
            body: announcement.body.clone(),
        }
    }
}

impl From<&RecentAnnouncement> for AnnouncementSummary {
    fn from(recent: &RecentAnnouncement) -> Self {
        Self::from(&recent.announcement)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewAnnouncement {
    #[serde(default)]
    pub title: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub body: String,
    pub category: Option<String>,
    pub start_delivering_at: Option<DateTime<Utc>>,
    pub stop_delivering_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit_to_users: Vec<Condition>,
    /// Backdating hook for imports; defaults to now.
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("can't be blank".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn announcement(start: Option<DateTime<Utc>>, stop: Option<DateTime<Utc>>) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4(),
            title: "Maintenance".to_string(),
            body: "We'll be down for a bit".to_string(),
            category: None,
            start_delivering_at: start,
            stop_delivering_at: stop,
            limit_to_users: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_deliverable_window() {
        let now = Utc::now();
        let minute = Duration::minutes(1);

        assert!(announcement(None, None).is_deliverable_at(now));
        assert!(announcement(Some(now - minute), None).is_deliverable_at(now));
        assert!(!announcement(Some(now + minute), None).is_deliverable_at(now));
        assert!(announcement(None, Some(now + minute)).is_deliverable_at(now));
        assert!(!announcement(None, Some(now - minute)).is_deliverable_at(now));
        // Both bounds are exclusive
        assert!(!announcement(Some(now), None).is_deliverable_at(now));
        assert!(!announcement(None, Some(now)).is_deliverable_at(now));
    }

    #[test]
    fn test_blank_body_is_rejected() {
        let blank = NewAnnouncement {
            body: "   ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let present = NewAnnouncement {
            body: "Hello".to_string(),
            ..Default::default()
        };
        assert!(present.validate().is_ok());
    }

    #[test]
    fn test_summary_drops_everything_but_id_title_body() {
        let a = announcement(None, None);
        let json = serde_json::to_value(AnnouncementSummary::from(&a)).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(json["title"], "Maintenance");
    }
}
