use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::Notification;

/// How a fetched list is folded into what is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Server wins outright. Used for the first load after mount.
    Authoritative,
    /// Locally read notifications stay read even if the server has not caught up.
    PreserveLocal,
}

impl FetchMode {
    pub fn preserves_local(&self) -> bool {
        matches!(self, Self::PreserveLocal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authoritative => "authoritative",
            Self::PreserveLocal => "preserve_local",
        }
    }
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ids currently displayed as read.
///
/// Rebuilt from the displayed list on every merge. Anything the server also
/// reports as read is already folded into that list, so the set never needs an
/// explicit clear.
#[derive(Debug, Default)]
pub struct ReadCache {
    ids: HashSet<String>,
}

impl ReadCache {
    pub fn from_display(displayed: &[Notification]) -> Self {
        let ids = displayed
            .iter()
            .filter(|n| n.is_read)
            .map(|n| n.id.clone())
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Counters from one merge, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Server records flipped from unread because they were read locally.
    pub patched: usize,
    /// Locally read ids the server no longer returns.
    pub dropped: usize,
}

/// Result of folding one server list into the displayed one.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub notifications: Vec<Notification>,
    pub stats: MergeStats,
}

/// Fold `server` into `displayed`.
///
/// Server order is kept as-is. In `PreserveLocal` mode every record read on
/// screen comes back read with `read_at = now`, whatever the server says.
pub fn merge(
    server: Vec<Notification>,
    displayed: &[Notification],
    mode: FetchMode,
    now: DateTime<Utc>,
) -> Merged {
    if !mode.preserves_local() {
        return Merged {
            notifications: server,
            stats: MergeStats::default(),
        };
    }

    let cache = ReadCache::from_display(displayed);
    let mut seen = 0;
    let mut patched = 0;

    let notifications = server
        .into_iter()
        .map(|mut n| {
            if cache.contains(&n.id) {
                seen += 1;
                if !n.is_read {
                    patched += 1;
                }
                n.mark_read(now);
            }
            n
        })
        .collect();

    Merged {
        notifications,
        stats: MergeStats {
            patched,
            dropped: cache.len().saturating_sub(seen),
        },
    }
}
