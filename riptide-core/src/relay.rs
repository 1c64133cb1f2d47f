//! Single relay connection: one socket, many subscriptions.
//!
//! A [`Relay`] owns its WebSocket exclusively and runs two tasks over it: a
//! reader that parses inbound frames and dispatches them to subscriptions and
//! pending awaiters, and a writer that drains an unbounded outbound queue so
//! there is never more than one writer per socket. Publish and count calls
//! correlate their replies by id, so out-of-order acknowledgements across
//! concurrent calls are fine.
//!
//! There is no transparent reconnection: when the socket dies the connection
//! cancellation fires, every subscription channel closes and every pending
//! call resolves with [`Error::Disconnected`]. Reconnecting is the caller's
//! job.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::envelope::{AuthPayload, Envelope};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::filter::Filters;
use crate::subscription::{lock_registry, ActiveSubscription, Subscription, SubscriptionRegistry};
use crate::util::{next_subscription_id, normalize_url};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Predicate invoked on every inbound event before delivery. Returning false
/// drops the event without touching the subscription.
pub type SignatureChecker = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// What an OK acknowledgement resolved to.
type OkReply = (bool, String);

struct CountReply {
    count: i64,
    #[allow(dead_code)] // carried for NIP-45 consumers, unused by `count`
    hyperloglog: Option<Vec<u8>>,
}

type PendingMap<T> = Arc<Mutex<HashMap<String, oneshot::Sender<T>>>>;

/// Connection configuration.
///
/// The default verifies every inbound event's schnorr signature; tests and
/// batching layers can swap the checker out.
#[derive(Clone)]
pub struct RelayOptions {
    /// Value for the `User-Agent` request header.
    pub user_agent: String,
    /// Optional `Origin` request header.
    pub origin: Option<String>,
    /// Gate for inbound events; defaults to full signature verification.
    pub signature_checker: SignatureChecker,
    /// Where to forward NOTICE texts; dropped when absent.
    pub notices: Option<mpsc::UnboundedSender<String>>,
    /// Where to surface AUTH challenges; ignored when absent.
    pub auth_challenges: Option<mpsc::UnboundedSender<String>>,
    /// Caller cancellation honored from connect onwards. The connection
    /// context is a child of it.
    pub cancellation: CancellationToken,
    /// Capacity of each subscription's event buffer.
    pub event_channel_size: usize,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!("riptide/", env!("CARGO_PKG_VERSION")).to_string(),
            origin: None,
            signature_checker: Arc::new(|event| event.check_signature()),
            notices: None,
            auth_challenges: None,
            cancellation: CancellationToken::new(),
            event_channel_size: 100,
        }
    }
}

impl RelayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn signature_checker<F>(mut self, checker: F) -> Self
    where
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        self.signature_checker = Arc::new(checker);
        self
    }

    pub fn notices(mut self, tx: mpsc::UnboundedSender<String>) -> Self {
        self.notices = Some(tx);
        self
    }

    pub fn auth_challenges(mut self, tx: mpsc::UnboundedSender<String>) -> Self {
        self.auth_challenges = Some(tx);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn event_channel_size(mut self, size: usize) -> Self {
        self.event_channel_size = size;
        self
    }
}

impl fmt::Debug for RelayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayOptions")
            .field("user_agent", &self.user_agent)
            .field("origin", &self.origin)
            .field("event_channel_size", &self.event_channel_size)
            .finish_non_exhaustive()
    }
}

/// A live connection to one relay.
///
/// All methods take `&self`; the relay is safe to share behind an `Arc`.
/// Every blocking call resolves promptly when the connection context is
/// cancelled, and cleans up whatever pending state it registered when its
/// future is dropped early.
pub struct Relay {
    url: Url,
    out_tx: mpsc::UnboundedSender<String>,
    subscriptions: SubscriptionRegistry,
    pending_publishes: PendingMap<OkReply>,
    pending_counts: PendingMap<CountReply>,
    token: CancellationToken,
    event_channel_size: usize,
}

impl Relay {
    /// Connect to `url` and spawn the connection's reader and writer tasks.
    ///
    /// A cancellation that fires before the socket is up yields
    /// [`Error::Cancelled`], not a disguised I/O error.
    pub async fn connect(url: &str, opts: RelayOptions) -> Result<Relay> {
        let url = normalize_url(url)?;

        if opts.cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut request = url.as_str().into_client_request()?;
        match HeaderValue::from_str(&opts.user_agent) {
            Ok(value) => {
                request.headers_mut().insert(header::USER_AGENT, value);
            }
            Err(e) => warn!(url = %url, error = %e, "skipping unusable User-Agent header"),
        }
        if let Some(origin) = &opts.origin {
            match HeaderValue::from_str(origin) {
                Ok(value) => {
                    request.headers_mut().insert(header::ORIGIN, value);
                }
                Err(e) => warn!(url = %url, error = %e, "skipping unusable Origin header"),
            }
        }

        debug!(url = %url, "connecting");
        let (ws, _response) = tokio::select! {
            biased;
            _ = opts.cancellation.cancelled() => return Err(Error::Cancelled),
            res = connect_async(request) => res?,
        };
        info!(url = %url, "connected");

        let (sink, stream) = ws.split();
        let token = opts.cancellation.child_token();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let relay = Relay {
            url: url.clone(),
            out_tx,
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
            pending_publishes: Arc::new(Mutex::new(HashMap::new())),
            pending_counts: Arc::new(Mutex::new(HashMap::new())),
            token: token.clone(),
            event_channel_size: opts.event_channel_size,
        };

        tokio::spawn(writer_loop(url.clone(), sink, out_rx, token.clone()));
        tokio::spawn(
            ReaderContext {
                url,
                subscriptions: relay.subscriptions.clone(),
                pending_publishes: relay.pending_publishes.clone(),
                pending_counts: relay.pending_counts.clone(),
                token,
                signature_checker: opts.signature_checker.clone(),
                notices: opts.notices.clone(),
                auth_challenges: opts.auth_challenges.clone(),
            }
            .run(stream),
        );

        Ok(relay)
    }

    /// The normalized URL this relay was connected with.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// False once the connection context has been cancelled.
    pub fn is_connected(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Connection-wide cancellation: fires on socket failure or [`close`](Self::close).
    pub fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Tear the connection down. Idempotent. Both tasks exit, every
    /// subscription channel closes and every pending publish or count
    /// resolves with [`Error::Disconnected`].
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Open a subscription: allocate an id, install the handle, enqueue the
    /// REQ. Dropping the handle (or [`Subscription::unsub`]) sends CLOSE.
    pub fn subscribe(&self, filters: impl Into<Filters>) -> Result<Subscription> {
        self.ensure_open()?;
        let filters = filters.into();
        if filters.is_empty() {
            return Err(Error::InvalidFilter(
                "a REQ needs at least one filter".to_string(),
            ));
        }

        let id = next_subscription_id();
        let sub_token = self.token.child_token();
        let (events_tx, events_rx) = mpsc::channel(self.event_channel_size);
        let (eose_tx, eose_rx) = watch::channel(false);
        let (closed_tx, closed_rx) = watch::channel(None);

        lock_registry(&self.subscriptions).insert(
            id.clone(),
            ActiveSubscription {
                events_tx,
                eose_tx,
                closed_tx,
                token: sub_token.clone(),
            },
        );

        let json = Envelope::Req {
            subscription_id: id.clone(),
            filters: filters.clone(),
        }
        .to_json()?;
        if let Err(e) = self.enqueue(json) {
            lock_registry(&self.subscriptions).remove(&id);
            return Err(e);
        }

        Ok(Subscription {
            id,
            filters,
            events: events_rx,
            eose: eose_rx,
            closed: closed_rx,
            token: sub_token,
            out_tx: self.out_tx.clone(),
            registry: self.subscriptions.clone(),
        })
    }

    /// Publish one event and wait for the relay's OK.
    ///
    /// `Ok(())` on acceptance, [`Error::PublishRejected`] with the relay's
    /// reason otherwise, [`Error::Disconnected`] if the socket dies first.
    pub async fn publish(&self, mut event: Event) -> Result<()> {
        self.ensure_open()?;

        if event.id.is_empty() {
            event.id = event.compute_id()?;
        }
        let event_id = event.id.clone();

        let rx = self.register_pending(&self.pending_publishes, event_id.clone());
        let _guard = PendingGuard::new(self.pending_publishes.clone(), event_id);

        let json = Envelope::Event {
            subscription_id: None,
            events: vec![event],
        }
        .to_json()?;
        self.enqueue(json)?;

        self.await_ok(rx).await
    }

    /// Publish a batch of events in a single EVENT frame and wait for every
    /// OK. An empty batch is a no-op success; any rejection fails the call.
    pub async fn publish_many(&self, mut events: Vec<Event>) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        self.ensure_open()?;

        let mut receivers = Vec::with_capacity(events.len());
        let mut guards = Vec::with_capacity(events.len());
        for event in &mut events {
            if event.id.is_empty() {
                event.id = event.compute_id()?;
            }
            receivers.push(self.register_pending(&self.pending_publishes, event.id.clone()));
            guards.push(PendingGuard::new(
                self.pending_publishes.clone(),
                event.id.clone(),
            ));
        }

        let json = Envelope::Event {
            subscription_id: None,
            events,
        }
        .to_json()?;
        self.enqueue(json)?;

        for rx in receivers {
            self.await_ok(rx).await?;
        }
        Ok(())
    }

    /// Ask the relay how many stored events match the filters (NIP-45).
    pub async fn count(&self, filters: impl Into<Filters>) -> Result<i64> {
        self.ensure_open()?;
        let filters = filters.into();
        if filters.is_empty() {
            return Err(Error::InvalidFilter(
                "a COUNT needs at least one filter".to_string(),
            ));
        }

        let id = next_subscription_id();
        let rx = self.register_pending(&self.pending_counts, id.clone());
        let _guard = PendingGuard::new(self.pending_counts.clone(), id.clone());

        let json = Envelope::Count {
            subscription_id: id,
            filters,
            count: None,
            hyperloglog: None,
        }
        .to_json()?;
        self.enqueue(json)?;

        tokio::select! {
            _ = self.token.cancelled() => Err(Error::Disconnected),
            res = rx => match res {
                Ok(reply) => Ok(reply.count),
                Err(_) => Err(Error::Disconnected),
            }
        }
    }

    /// Subscribe, collect stored events until EOSE, unsubscribe, return the
    /// batch. Returns what it has when the connection context fires first.
    pub async fn query_sync(&self, filters: impl Into<Filters>) -> Result<Vec<Event>> {
        let mut sub = self.subscribe(filters)?;
        let mut eose = sub.eose_receiver();
        let mut collected = Vec::new();

        loop {
            tokio::select! {
                // Drain buffered events before honoring EOSE or teardown.
                biased;
                maybe = sub.recv() => match maybe {
                    Some(event) => collected.push(event),
                    None => break,
                },
                _ = eose.wait_for(|fired| *fired) => break,
                _ = self.token.cancelled() => break,
            }
        }

        sub.unsub();
        Ok(collected)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.token.is_cancelled() {
            Err(Error::Disconnected)
        } else {
            Ok(())
        }
    }

    fn enqueue(&self, json: String) -> Result<()> {
        self.out_tx.send(json).map_err(|_| Error::Disconnected)
    }

    fn register_pending<T>(&self, map: &PendingMap<T>, key: String) -> oneshot::Receiver<T> {
        let (tx, rx) = oneshot::channel();
        map.lock().unwrap().insert(key, tx);
        rx
    }

    async fn await_ok(&self, rx: oneshot::Receiver<OkReply>) -> Result<()> {
        tokio::select! {
            _ = self.token.cancelled() => Err(Error::Disconnected),
            res = rx => match res {
                Ok((true, _)) => Ok(()),
                Ok((false, reason)) => Err(Error::PublishRejected(reason)),
                Err(_) => Err(Error::Disconnected),
            }
        }
    }
}

impl fmt::Debug for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("url", &self.url.as_str())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Removes a pending-map entry when the registering call completes or its
/// future is dropped, so cancelled callers never leak awaiters.
struct PendingGuard<T> {
    map: PendingMap<T>,
    key: String,
}

impl<T> PendingGuard<T> {
    fn new(map: PendingMap<T>, key: String) -> Self {
        PendingGuard { map, key }
    }
}

impl<T> Drop for PendingGuard<T> {
    fn drop(&mut self) {
        self.map.lock().unwrap().remove(&self.key);
    }
}

async fn writer_loop(
    url: Url,
    mut sink: SplitSink<WsStream, Message>,
    mut out_rx: mpsc::UnboundedReceiver<String>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            msg = out_rx.recv() => match msg {
                Some(json) => {
                    debug!(url = %url, msg = %json, "sending");
                    if let Err(e) = sink.send(Message::Text(json)).await {
                        warn!(url = %url, error = %e, "websocket write failed");
                        token.cancel();
                        break;
                    }
                }
                None => break,
            }
        }
    }
    let _ = sink.close().await;
    debug!(url = %url, "writer exited");
}

/// Everything the reader task needs; cheap clones of the relay's shared state.
struct ReaderContext {
    url: Url,
    subscriptions: SubscriptionRegistry,
    pending_publishes: PendingMap<OkReply>,
    pending_counts: PendingMap<CountReply>,
    token: CancellationToken,
    signature_checker: SignatureChecker,
    notices: Option<mpsc::UnboundedSender<String>>,
    auth_challenges: Option<mpsc::UnboundedSender<String>>,
}

impl ReaderContext {
    async fn run(self, mut stream: SplitStream<WsStream>) {
        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_frame(&text).await,
                    Some(Ok(Message::Close(frame))) => {
                        info!(url = %self.url, ?frame, "connection closed by relay");
                        break;
                    }
                    // Pings are answered by the protocol layer; binary frames
                    // have no meaning on a Nostr connection.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(url = %self.url, error = %e, "websocket read failed");
                        break;
                    }
                    None => break,
                }
            }
        }
        self.shutdown();
        debug!(url = %self.url, "reader exited");
    }

    /// A frame that fails to parse is skipped; only I/O kills the connection.
    async fn handle_frame(&self, text: &str) {
        debug!(url = %self.url, msg = %text, "received");
        let envelope = match Envelope::parse(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(url = %self.url, error = %e, "skipping undecodable frame");
                return;
            }
        };

        match envelope {
            Envelope::Event {
                subscription_id,
                events,
            } => {
                let Some(sub_id) = subscription_id else {
                    debug!(url = %self.url, "dropping EVENT without subscription id");
                    return;
                };
                self.deliver_events(&sub_id, events).await;
            }
            Envelope::Eose(sub_id) => {
                if let Some(sub) = lock_registry(&self.subscriptions).get(&sub_id) {
                    sub.fire_eose();
                }
            }
            Envelope::Closed {
                subscription_id,
                reason,
            } => {
                debug!(url = %self.url, id = %subscription_id, reason = %reason, "subscription closed by relay");
                if let Some(sub) = lock_registry(&self.subscriptions).remove(&subscription_id) {
                    sub.close(reason);
                }
            }
            Envelope::Ok {
                event_id,
                ok,
                reason,
            } => {
                if let Some(tx) = self.pending_publishes.lock().unwrap().remove(&event_id) {
                    let _ = tx.send((ok, reason));
                } else {
                    debug!(url = %self.url, id = %event_id, "OK for unknown publish");
                }
            }
            Envelope::Count {
                subscription_id,
                count: Some(count),
                hyperloglog,
                ..
            } => {
                if let Some(tx) = self.pending_counts.lock().unwrap().remove(&subscription_id) {
                    let _ = tx.send(CountReply { count, hyperloglog });
                }
            }
            Envelope::Notice(text) => match &self.notices {
                Some(tx) => {
                    let _ = tx.send(text);
                }
                None => info!(url = %self.url, notice = %text, "relay notice"),
            },
            Envelope::Auth(AuthPayload::Challenge(challenge)) => match &self.auth_challenges {
                Some(tx) => {
                    let _ = tx.send(challenge);
                }
                None => debug!(url = %self.url, "ignoring AUTH challenge"),
            },
            // Client-bound frames a relay should never send.
            other => {
                debug!(url = %self.url, label = other.label(), "dropping relay-bound frame");
            }
        }
    }

    /// Deliver a batch to its subscription. The per-subscription buffer is
    /// bounded; a slow consumer blocks only until its own cancellation fires,
    /// never a different subscription's delivery.
    async fn deliver_events(&self, sub_id: &str, events: Vec<Event>) {
        let target = lock_registry(&self.subscriptions)
            .get(sub_id)
            .map(|sub| (sub.events_tx.clone(), sub.token.clone()));
        let Some((events_tx, sub_token)) = target else {
            debug!(url = %self.url, id = %sub_id, "dropping EVENT for unknown subscription");
            return;
        };

        for event in events {
            if !(self.signature_checker)(&event) {
                debug!(url = %self.url, id = %event.id, "dropping event that failed the signature check");
                continue;
            }
            tokio::select! {
                _ = sub_token.cancelled() => break,
                res = events_tx.send(event) => {
                    if res.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Fan the connection's death out to every awaiter.
    fn shutdown(&self) {
        self.token.cancel();

        let subs: Vec<ActiveSubscription> = {
            let mut registry = lock_registry(&self.subscriptions);
            registry.drain().map(|(_, sub)| sub).collect()
        };
        for sub in &subs {
            sub.token.cancel();
        }
        drop(subs); // closes every event channel and watch

        self.pending_publishes.lock().unwrap().clear();
        self.pending_counts.lock().unwrap().clear();
    }
}
