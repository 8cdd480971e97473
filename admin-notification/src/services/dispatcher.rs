use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use admin_shared::types::CredentialProvider;

use crate::source::NotificationSource;

/// A read-state change to report to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    MarkRead { id: String, read_at: DateTime<Utc> },
    MarkAllRead { read_at: DateTime<Utc> },
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MarkRead { .. } => "mark_read",
            Self::MarkAllRead { .. } => "mark_all_read",
        }
    }
}

/// Sends read marks to the backend in the background.
///
/// Failures are logged and forgotten: no retry, no rollback of the local state
/// that was already updated.
pub struct MutationDispatcher<S> {
    source: Arc<S>,
    credentials: Arc<dyn CredentialProvider>,
}

impl<S> Clone for MutationDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<S: NotificationSource> MutationDispatcher<S> {
    pub fn new(source: Arc<S>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { source, credentials }
    }

    /// Spawn the request and return at once.
    ///
    /// Returns `None` when there is no credential and nothing was sent. The
    /// handle is only useful to callers that want to wait for delivery.
    pub fn dispatch(&self, mutation: Mutation) -> Option<JoinHandle<()>> {
        let Some(token) = self.credentials.bearer_token() else {
            tracing::debug!(mutation = mutation.label(), "no credential, skipping mutation");
            return None;
        };

        let source = Arc::clone(&self.source);
        Some(tokio::spawn(async move {
            let result = match &mutation {
                Mutation::MarkRead { id, read_at } => source.mark_read(&token, id, *read_at).await,
                Mutation::MarkAllRead { read_at } => source.mark_all_read(&token, *read_at).await,
            };

            match result {
                Ok(()) => tracing::debug!(mutation = mutation.label(), "mutation delivered"),
                Err(e) => tracing::warn!(
                    mutation = mutation.label(),
                    status = ?e.status(),
                    error = %e,
                    "mutation failed, local state kept"
                ),
            }
        }))
    }
}
