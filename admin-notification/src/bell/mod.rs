//! The notification bell: polling, optimistic read marks, dropdown state.
//!
//! Lifecycle:
//!
//!   mount ──> authoritative fetch ──> every `poll_interval`: preserve-local fetch
//!     │
//!     └──> outside-click listener (closes the dropdown)
//!
//!   opening the dropdown fires an extra preserve-local fetch without
//!   touching the interval. Fetches are never queued or cancelled when they
//!   overlap; whichever response lands last is what gets displayed.

pub mod state;
pub mod ui;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use admin_shared::types::CredentialProvider;

use crate::services::{FetchMode, Mutation, MutationDispatcher};
use crate::source::NotificationSource;

pub use state::BellState;
pub use ui::{ClickBus, ClickTarget};
pub use view::{BellView, NotificationView};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

pub struct NotificationBell<S> {
    source: Arc<S>,
    credentials: Arc<dyn CredentialProvider>,
    dispatcher: MutationDispatcher<S>,
    state: Arc<RwLock<BellState>>,
    poll_interval: Duration,
}

impl<S> Clone for NotificationBell<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            credentials: Arc::clone(&self.credentials),
            dispatcher: self.dispatcher.clone(),
            state: Arc::clone(&self.state),
            poll_interval: self.poll_interval,
        }
    }
}

impl<S: NotificationSource> NotificationBell<S> {
    pub fn new(source: Arc<S>, credentials: Arc<dyn CredentialProvider>, poll_interval: Duration) -> Self {
        Self {
            dispatcher: MutationDispatcher::new(Arc::clone(&source), Arc::clone(&credentials)),
            source,
            credentials,
            state: Arc::new(RwLock::new(BellState::default())),
            // tokio intervals panic on a zero period.
            poll_interval: poll_interval.max(Duration::from_secs(1)),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Copy of the current displayed state.
    pub async fn state(&self) -> BellState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> BellView {
        self.state.read().await.view(Utc::now())
    }

    /// Fetch once and fold the result into the displayed state.
    ///
    /// Returns `true` if the state was updated. Every failure mode (no
    /// credential, transport error, response without a success flag) leaves
    /// the state untouched and returns `false`.
    pub async fn refresh(&self, mode: FetchMode) -> bool {
        let Some(token) = self.credentials.bearer_token() else {
            debug!(mode = %mode, "no credential, skipping notification fetch");
            return false;
        };

        let snapshot = match self.source.fetch(&token).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(mode = %mode, "notification response without success flag, ignoring");
                return false;
            }
            Err(e) => {
                warn!(mode = %mode, status = ?e.status(), error = %e, "notification fetch failed");
                return false;
            }
        };

        let mut state = self.state.write().await;
        let stats = state.apply_snapshot(snapshot, mode, Utc::now());
        debug!(
            mode = %mode,
            total = state.notifications.len(),
            unread = state.unread_count,
            patched = stats.patched,
            dropped = stats.dropped,
            "notifications reconciled"
        );
        true
    }

    /// Run `refresh` in its own task, independent of any other fetch.
    pub fn spawn_refresh(&self, mode: FetchMode) -> JoinHandle<bool> {
        let bell = self.clone();
        tokio::spawn(async move { bell.refresh(mode).await })
    }

    /// Open the dropdown and fetch right away, outside the regular interval.
    pub async fn open_dropdown(&self) -> JoinHandle<bool> {
        self.state.write().await.dropdown_open = true;
        self.spawn_refresh(FetchMode::PreserveLocal)
    }

    pub async fn close_dropdown(&self) {
        self.state.write().await.dropdown_open = false;
    }

    /// Flip the dropdown. Returns the fetch handle when it was opened.
    pub async fn toggle_dropdown(&self) -> Option<JoinHandle<bool>> {
        let opened = {
            let mut state = self.state.write().await;
            state.dropdown_open = !state.dropdown_open;
            state.dropdown_open
        };
        opened.then(|| self.spawn_refresh(FetchMode::PreserveLocal))
    }

    /// Optimistically mark `id` read, then tell the backend.
    ///
    /// The request goes out even when the id was already read locally; the
    /// counter only moves on an unread-to-read flip. The returned handle
    /// tracks delivery and can be dropped.
    pub async fn mark_read(&self, id: &str) -> Option<JoinHandle<()>> {
        let now = Utc::now();
        let flipped = self.state.write().await.mark_read(id, now);
        debug!(notification_id = %id, flipped, "marked read locally");

        self.dispatcher.dispatch(Mutation::MarkRead {
            id: id.to_string(),
            read_at: now,
        })
    }

    /// Optimistically mark everything read, then tell the backend.
    pub async fn mark_all_read(&self) -> Option<JoinHandle<()>> {
        let now = Utc::now();
        let flipped = self.state.write().await.mark_all_read(now);
        debug!(flipped, "marked all read locally");

        self.dispatcher.dispatch(Mutation::MarkAllRead { read_at: now })
    }

    /// Start polling and listening for outside clicks.
    ///
    /// Both are released when the returned guard is unmounted or dropped.
    pub fn mount(&self, clicks: &ClickBus) -> MountedBell {
        let cancel = CancellationToken::new();

        let poller = spawn_poller(self.clone(), cancel.clone());
        let listener = spawn_click_listener(self.clone(), clicks.subscribe(), cancel.clone());

        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "notification bell mounted"
        );

        MountedBell {
            cancel,
            poller: Some(poller),
            listener: Some(listener),
        }
    }
}

fn spawn_poller<S: NotificationSource>(bell: NotificationBell<S>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = bell.poll_interval;
        // The interval runs from mount, not from when the first load returns.
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = bell.refresh(FetchMode::Authoritative) => {}
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = bell.refresh(FetchMode::PreserveLocal) => {}
            }
        }

        debug!("notification poller stopped");
    })
}

fn spawn_click_listener<S: NotificationSource>(
    bell: NotificationBell<S>,
    mut rx: broadcast::Receiver<ClickTarget>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = rx.recv() => match result {
                    Ok(ClickTarget::Outside) => bell.close_dropdown().await,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("click listener lagged, skipped {n} clicks");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        debug!("outside-click listener released");
    })
}

/// Guard for a mounted bell's background work.
///
/// Prefer `unmount`, which waits for both tasks to finish. Dropping the guard
/// cancels and aborts them without waiting.
pub struct MountedBell {
    cancel: CancellationToken,
    poller: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl MountedBell {
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub async fn unmount(mut self) {
        self.cancel.cancel();

        for handle in [self.poller.take(), self.listener.take()].into_iter().flatten() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "bell task ended abnormally");
                }
            }
        }

        info!("notification bell unmounted");
    }
}

impl Drop for MountedBell {
    fn drop(&mut self) {
        self.cancel.cancel();
        for handle in [self.poller.take(), self.listener.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}
