use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a notification is about. Only drives the icon shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AgentRequest,
    PropertyApproval,
    Maintenance,
    Inquiry,
    #[serde(other)]
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgentRequest => "agent_request",
            Self::PropertyApproval => "property_approval",
            Self::Maintenance => "maintenance",
            Self::Inquiry => "inquiry",
            Self::Other => "other",
        }
    }

    /// Icon name rendered in the dropdown row.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::AgentRequest => "user-plus",
            Self::PropertyApproval => "check-circle",
            Self::Maintenance => "wrench",
            Self::Inquiry => "message-circle",
            Self::Other => "bell",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn mark_read(&mut self, at: DateTime<Utc>) {
        self.is_read = true;
        self.read_at = Some(at);
    }
}

/// Body of `GET /notifications`.
///
/// Everything is optional on purpose: a body without a true `success` flag is
/// treated as "no update" rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: Option<i64>,
}

/// A successful fetch, normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
}

impl NotificationListResponse {
    /// `None` unless the server flagged the response as successful.
    pub fn into_snapshot(self) -> Option<NotificationSnapshot> {
        if self.success != Some(true) {
            return None;
        }

        let unread_count = match self.unread_count {
            Some(count) => count.max(0) as u64,
            None => self.notifications.iter().filter(|n| !n.is_read).count() as u64,
        };

        Some(NotificationSnapshot {
            notifications: self.notifications,
            unread_count,
        })
    }
}

/// Body of both mark-read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    pub read_at: DateTime<Utc>,
}
