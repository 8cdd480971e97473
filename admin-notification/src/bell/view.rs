use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::BellState;
use crate::models::NotificationKind;

/// One dropdown row, ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub id: String,
    pub kind: NotificationKind,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub age: String,
    pub unread: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BellView {
    pub badge: String,
    pub dropdown_open: bool,
    pub rows: Vec<NotificationView>,
}

impl BellState {
    pub fn view(&self, now: DateTime<Utc>) -> BellView {
        BellView {
            badge: badge_label(self.unread_count),
            dropdown_open: self.dropdown_open,
            rows: self
                .notifications
                .iter()
                .map(|n| NotificationView {
                    id: n.id.clone(),
                    kind: n.kind,
                    icon: n.kind.icon(),
                    title: n.title.clone(),
                    message: n.message.clone(),
                    age: age_label(n.created_at, now),
                    unread: !n.is_read,
                })
                .collect(),
        }
    }
}

/// Text on the bell badge. Empty hides the badge.
pub fn badge_label(unread: u64) -> String {
    match unread {
        0 => String::new(),
        1..=9 => unread.to_string(),
        _ => "9+".to_string(),
    }
}

/// Coarse relative age. Timestamps in the future read as "just now".
pub fn age_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationSnapshot;
    use crate::services::FetchMode;
    use crate::testing::notification;
    use chrono::Duration;

    #[test]
    fn badge_caps_at_nine() {
        assert_eq!(badge_label(0), "");
        assert_eq!(badge_label(1), "1");
        assert_eq!(badge_label(9), "9");
        assert_eq!(badge_label(10), "9+");
    }

    #[test]
    fn age_buckets() {
        let now: DateTime<Utc> = "2026-10-10T12:00:00Z".parse().unwrap();
        assert_eq!(age_label(now - Duration::seconds(30), now), "just now");
        assert_eq!(age_label(now + Duration::minutes(5), now), "just now");
        assert_eq!(age_label(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(age_label(now - Duration::hours(3), now), "3h ago");
        assert_eq!(age_label(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn rows_follow_state_order_and_icons() {
        let mut approval = notification("b", true);
        approval.kind = NotificationKind::PropertyApproval;
        let mut state = BellState::default();
        state.apply_snapshot(
            NotificationSnapshot {
                notifications: vec![notification("a", false), approval],
                unread_count: 1,
            },
            FetchMode::Authoritative,
            Utc::now(),
        );

        let view = state.view(Utc::now());

        assert_eq!(view.badge, "1");
        assert!(!view.dropdown_open);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].id, "a");
        assert!(view.rows[0].unread);
        assert_eq!(view.rows[1].icon, "check-circle");
        assert!(!view.rows[1].unread);
    }
}
