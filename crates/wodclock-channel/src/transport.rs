//! Transport abstraction for named publish/subscribe channels.
//!
//! Production backends are typically WebSocket pub/sub services; tests use
//! [`crate::MemoryHub`]. The contract is deliberately thin:
//!
//! - Subscribing to a channel yields a [`Link`] (one membership)
//! - Publishing is fire-and-forget and never waits for peers
//! - Receiving yields payloads in arrival order, then [`LinkEvent::Closed`]
//! - A link never receives its own publishes

use async_trait::async_trait;
use bytes::Bytes;
use wodclock_proto::ChannelName;

use crate::ChannelError;

/// Backend that can create channel memberships.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Membership handle produced by [`Transport::subscribe`].
    type Link: Link;

    /// Join `channel`.
    ///
    /// Resolves once the backend confirms the subscription.
    async fn subscribe(&self, channel: &ChannelName) -> Result<Self::Link, ChannelError>;
}

/// Something a [`Link`] observed on its channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A peer published this payload
    Payload(Bytes),
    /// The membership ended (unsubscribe, backend shutdown, connection loss)
    Closed,
    /// The backend reported an error; the membership is unusable
    Error(String),
}

/// One membership in a named channel.
#[async_trait]
pub trait Link: Send + 'static {
    /// Publish `payload` to every other member.
    ///
    /// Non-blocking. Fails if the membership is closed.
    fn publish(&self, payload: Bytes) -> Result<(), ChannelError>;

    /// Wait for the next event.
    ///
    /// Must be cancel safe: dropping the future loses no payloads.
    async fn recv(&mut self) -> LinkEvent;

    /// Leave the channel. Idempotent.
    fn close(&mut self);
}
