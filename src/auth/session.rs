//! Session invalidation and the events the host application observes.
//!
//! The invalidator is the only component that ends a session. Hosts call
//! [`SessionInvalidator::subscribe`] and route the user to sign-in when they
//! receive [`SessionEvent::Invalidated`] or [`SessionEvent::LoggedOut`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::traits::CredentialStore;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were stored by an explicit sign-in.
    SignedIn,
    /// The refresh exchange failed and credentials were cleared.
    Invalidated,
    /// The user signed out.
    LoggedOut,
}

/// Clears credentials and signals the host when a session cannot continue.
pub struct SessionInvalidator {
    store: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
    invalidated: AtomicBool,
}

impl std::fmt::Debug for SessionInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionInvalidator")
            .field("invalidated", &self.is_invalidated())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionInvalidator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            events,
            invalidated: AtomicBool::new(false),
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst)
    }

    /// Clear stored credentials, then emit [`SessionEvent::Invalidated`].
    ///
    /// Returns `false` without doing anything if the session is already
    /// invalidated.
    pub async fn invalidate(&self) -> bool {
        if self.invalidated.swap(true, Ordering::SeqCst) {
            debug!("Session already invalidated; skipping");
            return false;
        }

        self.store.clear().await;
        info!("Session invalidated; credentials cleared");
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::Invalidated);
        true
    }

    /// Clear stored credentials and emit [`SessionEvent::LoggedOut`].
    pub async fn logout(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
        self.store.clear().await;
        info!("Signed out; credentials cleared");
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    /// Re-arm without emitting an event.
    ///
    /// Called when a refresh window starts with a refresh credential in the
    /// store, which may have been written by another client or process.
    pub fn rearm(&self) {
        if self.invalidated.swap(false, Ordering::SeqCst) {
            debug!("Refresh credential present again; session re-armed");
        }
    }

    /// Re-arm after credentials were stored and emit [`SessionEvent::SignedIn`].
    pub fn signed_in(&self) {
        self.invalidated.store(false, Ordering::SeqCst);
        let _ = self.events.send(SessionEvent::SignedIn);
    }
}
