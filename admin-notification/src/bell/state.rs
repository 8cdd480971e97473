use chrono::{DateTime, Utc};

use crate::models::{Notification, NotificationSnapshot};
use crate::services::reconciler::{self, FetchMode, MergeStats};

/// Everything the bell renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BellState {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub dropdown_open: bool,
}

impl BellState {
    /// Fold a fetched snapshot into the displayed state.
    ///
    /// Only an authoritative fetch touches the counter. A preserve-local poll
    /// would otherwise bring back the server's stale count right after a local
    /// mark-read.
    pub fn apply_snapshot(
        &mut self,
        snapshot: NotificationSnapshot,
        mode: FetchMode,
        now: DateTime<Utc>,
    ) -> MergeStats {
        let merged = reconciler::merge(snapshot.notifications, &self.notifications, mode, now);
        self.notifications = merged.notifications;
        if mode == FetchMode::Authoritative {
            self.unread_count = snapshot.unread_count;
        }
        merged.stats
    }

    /// Optimistically mark one notification read.
    ///
    /// Returns `true` if a record flipped from unread to read. Unknown or
    /// already read ids leave the counter alone.
    pub fn mark_read(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.is_read => {
                n.mark_read(now);
                self.unread_count = self.unread_count.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Optimistically mark everything read and zero the counter.
    ///
    /// Every record gets `read_at = now`. Returns how many flipped from unread.
    pub fn mark_all_read(&mut self, now: DateTime<Utc>) -> usize {
        let mut flipped = 0;
        for n in self.notifications.iter_mut() {
            if !n.is_read {
                flipped += 1;
            }
            n.mark_read(now);
        }
        self.unread_count = 0;
        flipped
    }

    pub fn find(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }
}
