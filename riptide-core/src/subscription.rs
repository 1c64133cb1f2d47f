//! Per-subscription state and the caller-facing subscription handle

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::envelope::Envelope;
use crate::event::Event;
use crate::filter::Filters;

/// Subscription table shared between the reader task and caller handles.
/// The mutex only guards lookups and inserts; nothing blocks while holding it.
pub(crate) type SubscriptionRegistry = Arc<Mutex<HashMap<String, ActiveSubscription>>>;

/// The multiplexer's side of one subscription.
#[derive(Debug)]
pub(crate) struct ActiveSubscription {
    pub(crate) events_tx: mpsc::Sender<Event>,
    pub(crate) eose_tx: watch::Sender<bool>,
    pub(crate) closed_tx: watch::Sender<Option<String>>,
    pub(crate) token: CancellationToken,
}

impl ActiveSubscription {
    /// Idempotent: the watch holds `true` forever after the first EOSE.
    pub(crate) fn fire_eose(&self) {
        self.eose_tx.send_replace(true);
    }

    /// Record the CLOSED reason, release EOSE waiters and cancel the
    /// subscription. Dropping `self` afterwards closes the event channel.
    pub(crate) fn close(self, reason: String) {
        self.closed_tx.send_replace(Some(reason));
        self.eose_tx.send_replace(true);
        self.token.cancel();
    }
}

/// Lifecycle of a subscription as observed by the caller.
///
/// The REQ is already enqueued by the time a handle exists, so a handle never
/// observes the pre-request state. Transitions are monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// REQ sent, stored events flowing.
    Streaming,
    /// EOSE received, deliveries are now live.
    Live,
    /// CLOSE sent, CLOSED received, or the connection died.
    Closed,
}

/// Caller handle for one subscription on a relay connection.
///
/// Events arrive on a bounded channel via [`recv`](Self::recv) in the order
/// the relay sent them. The handle owns no socket resources; dropping it (or
/// calling [`unsub`](Self::unsub)) dispatches a CLOSE and detaches from the
/// connection.
#[derive(Debug)]
pub struct Subscription {
    pub(crate) id: String,
    pub(crate) filters: Filters,
    pub(crate) events: mpsc::Receiver<Event>,
    pub(crate) eose: watch::Receiver<bool>,
    pub(crate) closed: watch::Receiver<Option<String>>,
    pub(crate) token: CancellationToken,
    pub(crate) out_tx: mpsc::UnboundedSender<String>,
    pub(crate) registry: SubscriptionRegistry,
}

impl Subscription {
    /// The id this subscription uses on the wire.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The filters the REQ was issued with. Immutable for the lifetime of
    /// the subscription.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Next event, or `None` once the subscription is over.
    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Direct access to the event channel, for `tokio::select!` loops.
    pub fn events(&mut self) -> &mut mpsc::Receiver<Event> {
        &mut self.events
    }

    /// Resolves once the relay signals the end of stored events. Also
    /// resolves when the subscription terminates without one.
    pub async fn end_of_stored_events(&self) {
        let mut rx = self.eose.clone();
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Resolves with the CLOSED reason, or `None` when the subscription ends
    /// without the relay closing it.
    pub async fn closed_reason(&self) -> Option<String> {
        let mut rx = self.closed.clone();
        let result = match rx.wait_for(|reason| reason.is_some()).await {
            Ok(reason) => reason.clone(),
            Err(_) => None,
        };
        result
    }

    /// Cancellation that fires when the subscription terminates for any
    /// reason: `unsub`, CLOSED, or connection death.
    pub fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn state(&self) -> SubscriptionState {
        if self.token.is_cancelled() || self.closed.borrow().is_some() {
            SubscriptionState::Closed
        } else if *self.eose.borrow() {
            SubscriptionState::Live
        } else {
            SubscriptionState::Streaming
        }
    }

    /// Terminate the subscription and dispatch a CLOSE to the relay.
    ///
    /// Idempotent, and tolerated after the relay already sent CLOSED: once
    /// the table entry is gone no second CLOSE goes out. Inbound EVENTs for
    /// this id are dropped from here on.
    pub fn unsub(&self) {
        self.token.cancel();
        let removed = lock_registry(&self.registry).remove(&self.id);
        if removed.is_some() {
            if let Ok(json) = Envelope::Close(self.id.clone()).to_json() {
                let _ = self.out_tx.send(json);
            }
        }
    }

    pub(crate) fn eose_receiver(&self) -> watch::Receiver<bool> {
        self.eose.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsub();
    }
}

pub(crate) fn lock_registry(
    registry: &SubscriptionRegistry,
) -> std::sync::MutexGuard<'_, HashMap<String, ActiveSubscription>> {
    registry.lock().unwrap()
}
