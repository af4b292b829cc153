//! Single-flight credential refresh.
//!
//! When a request is rejected with 401, the client asks the
//! [`RefreshCoordinator`] for a new credential pair. At most one exchange with
//! `POST /auth/refresh` is in flight at a time; every 401 that arrives while
//! it runs joins the same exchange and receives the same outcome.
//!
//! The exchange itself runs in a spawned task. It persists the new pair (or
//! invalidates the session) and returns the coordinator to idle before any
//! waiter observes the outcome, so a 401 that arrives afterwards always starts
//! a fresh exchange. Dropping a waiter never cancels the exchange.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use super::authenticator::{bearer, AUTHORIZATION};
use super::credentials::{CredentialKind, CredentialPair};
use super::session::SessionInvalidator;
use crate::error::{NetworkError, RefreshFailure};
use crate::traits::{CredentialStore, HttpClient, HttpRequest, Method};

/// Maximum number of response body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Observable state of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    RefreshInFlight,
    RefreshSucceeded,
    RefreshFailed,
}

pub type RefreshOutcome = Result<CredentialPair, RefreshFailure>;

type SharedOutcome = Shared<BoxFuture<'static, RefreshOutcome>>;

enum Slot {
    Idle,
    InFlight { epoch: u64, outcome: SharedOutcome },
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

struct Inner {
    transport: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    invalidator: Arc<SessionInvalidator>,
    refresh_url: String,
    slot: Mutex<Slot>,
    next_epoch: AtomicU64,
    exchanges: AtomicUsize,
    phase: watch::Sender<RefreshPhase>,
}

/// Coordinates credential refresh across concurrent requests.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.inner.refresh_url)
            .field("phase", &self.phase())
            .field("exchanges", &self.exchange_count())
            .finish()
    }
}

impl RefreshCoordinator {
    /// Create a coordinator that exchanges refresh tokens at `refresh_url`.
    pub fn new(
        transport: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        invalidator: Arc<SessionInvalidator>,
        refresh_url: impl Into<String>,
    ) -> Self {
        let (phase, _) = watch::channel(RefreshPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                transport,
                store,
                invalidator,
                refresh_url: refresh_url.into(),
                slot: Mutex::new(Slot::Idle),
                next_epoch: AtomicU64::new(1),
                exchanges: AtomicUsize::new(0),
                phase,
            }),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RefreshPhase {
        *self.inner.phase.borrow()
    }

    /// Watch phase transitions.
    pub fn subscribe_phase(&self) -> watch::Receiver<RefreshPhase> {
        self.inner.phase.subscribe()
    }

    /// Number of exchanges sent to the refresh endpoint so far.
    pub fn exchange_count(&self) -> usize {
        self.inner.exchanges.load(Ordering::SeqCst)
    }

    /// Obtain a new credential pair, joining the in-flight exchange if any.
    ///
    /// On failure the session has already been invalidated by the time this
    /// returns.
    pub async fn refresh(&self) -> RefreshOutcome {
        let outcome = {
            let mut slot = self.inner.slot.lock().await;

            if let Slot::InFlight { epoch, outcome } = &*slot {
                debug!(epoch = *epoch, "Joining in-flight refresh");
                outcome.clone()
            } else {
                let Some(refresh_token) = self.inner.store.get(CredentialKind::Refresh).await
                else {
                    drop(slot);
                    return self.inner.fail_without_exchange().await;
                };

                let epoch = self.inner.next_epoch.fetch_add(1, Ordering::SeqCst);
                self.inner.invalidator.rearm();
                self.inner.phase.send_replace(RefreshPhase::RefreshInFlight);
                let outcome = self.inner.start(epoch, refresh_token);
                *slot = Slot::InFlight {
                    epoch,
                    outcome: outcome.clone(),
                };
                outcome
            }
        };

        outcome.await
    }
}

impl Inner {
    /// Spawn the exchange plus a supervisor that settles the window even if
    /// the exchange task panics or is aborted.
    fn start(self: &Arc<Self>, epoch: u64, refresh_token: String) -> SharedOutcome {
        let exchange = {
            let inner = Arc::clone(self);
            tokio::spawn(async move { inner.run(epoch, refresh_token).await })
        };

        let inner = Arc::clone(self);
        let supervisor = tokio::spawn(async move {
            match exchange.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(epoch, "Refresh task ended abnormally: {}", err);
                    inner.abandon(epoch).await;
                    Err(RefreshFailure::Interrupted)
                }
            }
        });

        async move {
            supervisor.await.unwrap_or_else(|err| {
                warn!(epoch, "Refresh supervisor ended abnormally: {}", err);
                Err(RefreshFailure::Interrupted)
            })
        }
        .boxed()
        .shared()
    }

    async fn run(&self, epoch: u64, refresh_token: String) -> RefreshOutcome {
        info!(epoch, "Refreshing credentials");
        let outcome = self.exchange(&refresh_token).await;

        match &outcome {
            Ok(pair) => {
                // A pair we could not persist is still good for this process.
                if let Err(err) = self.store.set(pair).await {
                    warn!(epoch, "Failed to persist refreshed credentials: {}", err);
                }
                info!(epoch, "Credential refresh succeeded");
                self.phase.send_replace(RefreshPhase::RefreshSucceeded);
            }
            Err(failure) => {
                warn!(
                    epoch,
                    code = failure.error_code(),
                    "Credential refresh failed: {}",
                    failure
                );
                self.invalidator.invalidate().await;
                self.phase.send_replace(RefreshPhase::RefreshFailed);
            }
        }

        self.settle(epoch).await;
        outcome
    }

    async fn exchange(&self, refresh_token: &str) -> RefreshOutcome {
        self.exchanges.fetch_add(1, Ordering::SeqCst);

        let request = HttpRequest::new(Method::Post, self.refresh_url.as_str())
            .with_header(AUTHORIZATION, bearer(refresh_token))
            .with_header("Content-Type", "application/json")
            .with_body("{}");

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|err| RefreshFailure::Transport(NetworkError::from_http(&self.refresh_url, err)))?;

        if !response.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(RefreshFailure::Rejected {
                status: response.status,
                message: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body: RefreshResponse =
            response
                .json()
                .map_err(|err| RefreshFailure::MalformedResponse {
                    message: err.to_string(),
                })?;

        CredentialPair::from_parts(body.access_token, body.refresh_token).ok_or_else(|| {
            RefreshFailure::MalformedResponse {
                message: "response is missing access_token or refresh_token".to_string(),
            }
        })
    }

    async fn fail_without_exchange(&self) -> RefreshOutcome {
        warn!("No refresh token stored; ending session");
        self.phase.send_replace(RefreshPhase::RefreshFailed);
        self.invalidator.invalidate().await;
        self.phase.send_replace(RefreshPhase::Idle);
        Err(RefreshFailure::MissingRefreshCredential)
    }

    /// Close a window whose exchange never produced an outcome.
    async fn abandon(&self, epoch: u64) {
        self.invalidator.invalidate().await;
        self.phase.send_replace(RefreshPhase::RefreshFailed);
        self.settle(epoch).await;
    }

    async fn settle(&self, epoch: u64) {
        let mut slot = self.slot.lock().await;
        if matches!(&*slot, Slot::InFlight { epoch: current, .. } if *current == epoch) {
            *slot = Slot::Idle;
        }
        self.phase.send_replace(RefreshPhase::Idle);
    }
}
