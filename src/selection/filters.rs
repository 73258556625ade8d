//! Window, category and recency filters plus delivery ordering.
//!
//! Each filter keeps the relative order of its input, so they compose in
//! any sequence.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::Announcement;

pub fn ready_for_delivery<T: AsRef<Announcement>>(items: Vec<T>, now: DateTime<Utc>) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.as_ref().is_deliverable_at(now))
        .collect()
}

/// `None` leaves the set alone; otherwise only exact category matches remain,
/// so uncategorised announcements drop out.
pub fn in_category<T: AsRef<Announcement>>(items: Vec<T>, category: Option<&str>) -> Vec<T> {
    match category {
        None => items,
        Some(wanted) => items
            .into_iter()
            .filter(|item| item.as_ref().category.as_deref() == Some(wanted))
            .collect(),
    }
}

/// Scheduled announcements count from their start time, unscheduled ones
/// from their creation time.
pub fn newer_than<T: AsRef<Announcement>>(items: Vec<T>, cutoff: DateTime<Utc>) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.as_ref().delivered_since() >= cutoff)
        .collect()
}

/// Start time ascending with unscheduled first, then creation time, then id.
pub fn delivery_order(a: &Announcement, b: &Announcement) -> Ordering {
    a.start_delivering_at
        .cmp(&b.start_delivering_at)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn in_delivery_order<T: AsRef<Announcement>>(items: &mut [T]) {
    items.sort_by(|a, b| delivery_order(a.as_ref(), b.as_ref()));
}

pub fn in_reverse_delivery_order<T: AsRef<Announcement>>(items: &mut [T]) {
    items.sort_by(|a, b| delivery_order(b.as_ref(), a.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn announcement(
        start: Option<DateTime<Utc>>,
        stop: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Announcement {
        Announcement {
            id: Uuid::new_v4(),
            title: String::new(),
            body: "body".to_string(),
            category: None,
            start_delivering_at: start,
            stop_delivering_at: stop,
            limit_to_users: vec![],
            created_at,
            updated_at: created_at,
        }
    }

    fn ids(items: &[Announcement]) -> Vec<Uuid> {
        items.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_ready_for_delivery() {
        let now = Utc::now();
        let minute = Duration::minutes(1);

        let due = announcement(Some(now - minute), None, now);
        let not_due = announcement(Some(now + minute), None, now);
        let expired = announcement(None, Some(now - minute), now);
        let not_expired = announcement(None, Some(now + minute), now);
        let unscheduled = announcement(None, None, now);

        let ready = ready_for_delivery(
            vec![
                due.clone(),
                not_due,
                expired,
                not_expired.clone(),
                unscheduled.clone(),
            ],
            now,
        );

        assert_eq!(ids(&ready), vec![due.id, not_expired.id, unscheduled.id]);
    }

    #[test]
    fn test_in_category_is_exact() {
        let now = Utc::now();
        let mut en = announcement(None, None, now);
        en.category = Some("en".to_string());
        let mut english = announcement(None, None, now);
        english.category = Some("english".to_string());
        let none = announcement(None, None, now);

        let all = vec![en.clone(), english, none];
        assert_eq!(in_category(all.clone(), None).len(), 3);
        assert_eq!(ids(&in_category(all, Some("en"))), vec![en.id]);
    }

    #[test]
    fn test_newer_than_uses_start_then_created_at() {
        let now = Utc::now();
        let cutoff = now - Duration::weeks(2);

        let fresh = announcement(None, None, now);
        let old_start = announcement(Some(now - Duration::days(20)), None, now);
        let old_created = announcement(None, None, now - Duration::weeks(3));
        // A recent start wins over an old creation time
        let rescheduled = announcement(Some(now - Duration::days(1)), None, now - Duration::weeks(5));

        let kept = newer_than(
            vec![fresh.clone(), old_start, old_created, rescheduled.clone()],
            cutoff,
        );
        assert_eq!(ids(&kept), vec![fresh.id, rescheduled.id]);
    }

    #[test]
    fn test_newer_than_keeps_exact_cutoff() {
        let now = Utc::now();
        let cutoff = now - Duration::weeks(2);
        let just_before = cutoff - Duration::seconds(1);

        let starts_at_cutoff = announcement(Some(cutoff), None, now - Duration::weeks(5));
        let starts_before = announcement(Some(just_before), None, now);
        let created_at_cutoff = announcement(None, None, cutoff);
        let created_before = announcement(None, None, just_before);

        let kept = newer_than(
            vec![
                starts_at_cutoff.clone(),
                starts_before,
                created_at_cutoff.clone(),
                created_before,
            ],
            cutoff,
        );
        assert_eq!(ids(&kept), vec![starts_at_cutoff.id, created_at_cutoff.id]);
    }

    #[test]
    fn test_later_cutoff_never_adds() {
        let now = Utc::now();
        let all: Vec<Announcement> = (0..10)
            .map(|days| announcement(None, None, now - Duration::days(days * 3)))
            .collect();

        let wide = newer_than(all.clone(), now - Duration::weeks(4));
        let narrow = newer_than(all, now - Duration::weeks(1));

        assert!(narrow.len() <= wide.len());
        assert!(narrow.iter().all(|a| wide.contains(a)));
    }

    #[test]
    fn test_delivery_order_nulls_first_with_stable_tie_break() {
        let now = Utc::now();
        let first_unscheduled = announcement(None, None, now - Duration::minutes(5));
        let second_unscheduled = announcement(None, None, now - Duration::minutes(4));
        let older = announcement(Some(now - Duration::minutes(2)), None, now);
        let newer = announcement(Some(now - Duration::minutes(1)), None, now);

        let mut items = vec![
            newer.clone(),
            second_unscheduled.clone(),
            older.clone(),
            first_unscheduled.clone(),
        ];

        in_delivery_order(&mut items);
        assert_eq!(
            ids(&items),
            vec![first_unscheduled.id, second_unscheduled.id, older.id, newer.id]
        );

        in_reverse_delivery_order(&mut items);
        assert_eq!(
            ids(&items),
            vec![newer.id, older.id, second_unscheduled.id, first_unscheduled.id]
        );
    }
}
