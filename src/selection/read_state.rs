use uuid::Uuid;

use crate::domain::{Announcement, AnnouncementView, RecentAnnouncement};

fn read_count(views: &[AnnouncementView], user_id: Uuid, announcement_id: Uuid) -> i64 {
    views
        .iter()
        .filter(|v| v.user_id == user_id && v.announcement_id == announcement_id)
        .count() as i64
}

/// Drops every announcement `user_id` has a view for.
pub fn unread_filter(
    candidates: Vec<Announcement>,
    views: &[AnnouncementView],
    user_id: Uuid,
) -> Vec<Announcement> {
    candidates
        .into_iter()
        .filter(|a| read_count(views, user_id, a.id) == 0)
        .collect()
}

/// Keeps every candidate, tagging each with the user's view count.
pub fn read_annotation(
    candidates: Vec<Announcement>,
    views: &[AnnouncementView],
    user_id: Uuid,
) -> Vec<RecentAnnouncement> {
    candidates
        .into_iter()
        .map(|announcement| {
            let read = read_count(views, user_id, announcement.id);
            RecentAnnouncement { announcement, read }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn announcement() -> Announcement {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4(),
            title: String::new(),
            body: "body".to_string(),
            category: None,
            start_delivering_at: None,
            stop_delivering_at: None,
            limit_to_users: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn view(user_id: Uuid, announcement: &Announcement) -> AnnouncementView {
        AnnouncementView {
            id: Uuid::new_v4(),
            user_id,
            announcement_id: announcement.id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unread_filter_ignores_other_users_views() {
        let current_user = Uuid::new_v4();
        let another_user = Uuid::new_v4();
        let first = announcement();
        let second = announcement();

        let views = vec![view(another_user, &first), view(current_user, &second)];
        let unread = unread_filter(vec![first.clone(), second], &views, current_user);

        assert_eq!(unread, vec![first]);
    }

    #[test]
    fn test_read_annotation_keeps_read_items() {
        let user = Uuid::new_v4();
        let first = announcement();
        let second = announcement();

        let views = vec![view(user, &second)];
        let annotated = read_annotation(vec![first, second], &views, user);

        assert_eq!(annotated.len(), 2);
        assert!(!annotated[0].is_read());
        assert_eq!(annotated[1].read, 1);
    }
}
