//! # Pub/Sub Contracts
//!
//! The leaf contracts every other module builds on: the message
//! [`Discriminator`], the object-safe [`Message`] trait, the async
//! [`Handler`] trait, and the [`Dispatcher`] registry mapping
//! discriminators to handlers.
//!
//! The dispatcher is built once at startup and then shared read-only
//! behind an `Arc` for the lifetime of a run.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::messaging::DecodeError;

/// Opaque tag identifying a message's logical type.
///
/// Stable for the lifetime of a message's processing; used as the registry
/// and routing key. Const-constructible so event modules can expose
/// discriminator constants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Discriminator(Cow<'static, str>);

impl Discriminator {
    pub const EMPTY: Discriminator = Discriminator::from_static("");

    pub const fn from_static(tag: &'static str) -> Self {
        Discriminator(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Discriminator {
    fn from(tag: &str) -> Self {
        Discriminator(Cow::Owned(tag.to_owned()))
    }
}

impl From<String> for Discriminator {
    fn from(tag: String) -> Self {
        Discriminator(Cow::Owned(tag))
    }
}

/// A typed domain message.
///
/// Created by a decoder from a raw delivery body, owned by the pipeline until
/// handed to a handler, and not mutated after creation. `decode_body` exists
/// for the two-phase decode strategy: the registry supplies an empty shell via
/// [`Handler::create`] and the producer decodes the raw bytes into it. An
/// implementation must replace the whole value on success and leave it
/// untouched on failure, so a partially populated message can never escape.
pub trait Message: Send + Sync {
    fn discriminator(&self) -> Discriminator;

    /// Decode the raw delivery body into this message shell.
    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError>;

    /// Downcasting support for partition-key and handler code.
    fn as_any(&self) -> &dyn Any;
}

/// A registered message handler.
///
/// Stateless across calls; one implementation per concrete event type.
/// `create` returns an empty message shell for registry-driven decoding.
#[async_trait]
pub trait Handler: Send + Sync {
    fn discriminator(&self) -> Discriminator;

    fn create(&self) -> Box<dyn Message>;

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()>;
}

/// Placeholder message for discriminators with no registered handler.
///
/// The decode path produces one of these instead of failing, so the
/// consumer-side handler-not-found policy (log and complete) applies in
/// exactly one place.
#[derive(Debug, Clone, Default)]
pub struct EmptyMessage {
    discriminator: Discriminator,
}

impl EmptyMessage {
    pub fn new(discriminator: Discriminator) -> Self {
        EmptyMessage { discriminator }
    }
}

impl Message for EmptyMessage {
    fn discriminator(&self) -> Discriminator {
        self.discriminator.clone()
    }

    fn decode_body(&mut self, _body: &[u8]) -> Result<(), DecodeError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Registry mapping a [`Discriminator`] to exactly one [`Handler`].
///
/// Last registration for a given discriminator wins; absence on dispatch is a
/// signaled condition, not an error.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<Discriminator, Arc<dyn Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            handlers: HashMap::new(),
        }
    }

    /// Store a handler under its own discriminator, replacing any prior
    /// registration for that tag.
    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        let discriminator = handler.discriminator();

        if self.handlers.insert(discriminator.clone(), handler).is_some() {
            warn!(
                discriminator = %discriminator,
                "replacing existing handler registration"
            );
        }
    }

    /// Remove a registration; returns whether an entry existed.
    pub fn unregister(&mut self, discriminator: &Discriminator) -> bool {
        self.handlers.remove(discriminator).is_some()
    }

    /// Pure lookup by discriminator.
    pub fn dispatch(&self, discriminator: &Discriminator) -> Option<Arc<dyn Handler>> {
        self.handlers.get(discriminator).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
