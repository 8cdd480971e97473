use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use admin_shared::clients::ApiClient;
use admin_shared::errors::ClientResult;

use crate::models::{NotificationListResponse, NotificationSnapshot, ReadRequest};

/// Where notifications come from and where read marks go.
///
/// Every call takes the bearer token explicitly; whether a token exists at all
/// is decided by the caller before reaching this seam.
#[async_trait]
pub trait NotificationSource: Send + Sync + 'static {
    /// `Ok(None)` means the backend answered without a success flag.
    async fn fetch(&self, token: &str) -> ClientResult<Option<NotificationSnapshot>>;

    async fn mark_read(&self, token: &str, id: &str, read_at: DateTime<Utc>) -> ClientResult<()>;

    async fn mark_all_read(&self, token: &str, read_at: DateTime<Utc>) -> ClientResult<()>;
}

/// The dashboard REST backend.
#[derive(Clone)]
pub struct HttpNotificationSource {
    api: ApiClient,
}

impl HttpNotificationSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        Ok(Self {
            api: ApiClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn fetch(&self, token: &str) -> ClientResult<Option<NotificationSnapshot>> {
        let response: NotificationListResponse = self.api.get_json(&["notifications"], token).await?;
        Ok(response.into_snapshot())
    }

    async fn mark_read(&self, token: &str, id: &str, read_at: DateTime<Utc>) -> ClientResult<()> {
        let ack = self
            .api
            .put_json(&["notifications", id, "read"], token, &ReadRequest { read_at })
            .await?;
        tracing::debug!(notification_id = %id, success = ?ack.success, "mark-read acknowledged");
        Ok(())
    }

    async fn mark_all_read(&self, token: &str, read_at: DateTime<Utc>) -> ClientResult<()> {
        let ack = self
            .api
            .put_json(&["notifications", "read-all"], token, &ReadRequest { read_at })
            .await?;
        tracing::debug!(success = ?ack.success, "mark-all-read acknowledged");
        Ok(())
    }
}
