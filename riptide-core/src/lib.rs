//! Riptide Core Library
//!
//! Client-side core of the Nostr protocol: the strict codec for the relay
//! control messages, the filter/matching algebra shared by clients and
//! relays, and a per-connection multiplexer that runs many concurrent
//! subscriptions and publishes over one WebSocket.
//!
//! # Features
//!
//! - Canonical event serialization, SHA-256 ids and BIP-340 schnorr
//!   signatures (`sign`/`verify` on [`Event`])
//! - Bit-exact envelope codec for EVENT, REQ, COUNT, CLOSE, CLOSED, OK,
//!   EOSE, NOTICE and AUTH frames
//! - Two-dimensional tag matching with positional wildcards and the
//!   theoretical-limit analysis relays use to short-circuit fan-out
//! - One reader and one writer task per socket, id-correlated OK/COUNT
//!   acknowledgements, per-subscription bounded buffering and cancellation
//! - Injectable signature checking for tests and batching layers
//!
//! # Examples
//!
//! ## Subscribing and reading events
//!
//! ```no_run
//! use riptide_core::{Filter, Relay, RelayOptions};
//!
//! # async fn run() -> riptide_core::Result<()> {
//! let relay = Relay::connect("wss://relay.example.com", RelayOptions::default()).await?;
//!
//! let filter = Filter {
//!     kinds: vec![1],
//!     limit: 10,
//!     ..Default::default()
//! };
//! let mut sub = relay.subscribe(filter)?;
//!
//! while let Some(event) = sub.recv().await {
//!     println!("{event}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Publishing a signed event
//!
//! ```no_run
//! use riptide_core::{EventBuilder, Relay, RelayOptions, Timestamp};
//!
//! # async fn run(secret_key: &str) -> riptide_core::Result<()> {
//! let relay = Relay::connect("wss://relay.example.com", RelayOptions::default()).await?;
//!
//! let mut event = EventBuilder::new()
//!     .kind(1)
//!     .created_at(Timestamp::now().as_i64())
//!     .content("Hello, Nostr!")
//!     .build();
//! event.sign(secret_key)?;
//!
//! relay.publish(event).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod display;
pub mod envelope;
pub mod error;
pub mod event;
pub mod filter;
pub mod kind;
pub mod relay;
pub mod subscription;
pub mod tag;
pub mod timestamp;
pub mod util;

pub use builder::EventBuilder;
pub use envelope::{AuthPayload, Envelope};
pub use error::{Error, Result};
pub use event::Event;
pub use filter::{Filter, Filters, TagMap, TagValues};
pub use kind::{
    is_addressable_kind, is_ephemeral_kind, is_regular_kind, is_replaceable_kind,
};
pub use relay::{Relay, RelayOptions, SignatureChecker};
pub use subscription::{Subscription, SubscriptionState};
pub use tag::{Tag, Tags};
pub use timestamp::Timestamp;
pub use util::normalize_url;
