//! Synchronization channel.
//!
//! # Lifecycle
//!
//! ```text
//! ┌──────────────┐  connect ok   ┌───────────┐
//! │ Disconnected │──────────────>│ Connected │
//! └──────────────┘<──────────────└───────────┘
//!        │  ↑      link closed /       │
//!        │  │      disconnect          │ link error
//!        │  │ disconnect               ↓
//!        │  └───────────────────── ┌───────┐
//!        └────────────────────────>│ Error │
//!              connect failed      └───────┘
//! ```
//!
//! Status changes are published on a `watch` channel so renderers can follow
//! them without polling. Failures are reported through the status; nothing
//! here panics or propagates a transport error to the Display's clock.
//!
//! # Broadcast deduplication
//!
//! The Display ticks every 100ms but its snapshot changes at most about once
//! per second. [`SyncChannel::broadcast_state`] compares the encoded snapshot
//! with the last one it published and suppresses identical sends.

use tokio::sync::watch;
use wodclock_proto::{
    ChannelMessage, ChannelName, CommandAction, RemoteCommand, TimerStateMessage, Timestamp,
};

use crate::{ChannelError, Link, LinkEvent, Transport};

/// Connection status of a [`SyncChannel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    /// No subscription
    #[default]
    Disconnected,
    /// Subscribed and able to publish
    Connected,
    /// Subscription failed or broke
    Error,
}

/// Result of [`SyncChannel::broadcast_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Handed to the transport
    Published,
    /// Identical to the previous broadcast; not sent
    Suppressed,
    /// No active subscription; not sent
    NotConnected,
    /// Encoding or transport failure; not sent
    Failed,
}

type StateHandler = Box<dyn FnMut(&TimerStateMessage) + Send>;
type CommandHandler = Box<dyn FnMut(&RemoteCommand) + Send>;

/// Owned handle on a tenant's timer channel.
///
/// Dropping the handle releases the subscription.
pub struct SyncChannel<T: Transport> {
    transport: T,
    link: Option<T::Link>,
    channel: Option<ChannelName>,
    status: watch::Sender<ConnectionStatus>,
    last_broadcast: Option<bytes::Bytes>,
    state_handlers: Vec<StateHandler>,
    command_handlers: Vec<CommandHandler>,
}

impl<T: Transport> SyncChannel<T> {
    /// Create a disconnected channel handle over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            link: None,
            channel: None,
            status: watch::Sender::new(ConnectionStatus::Disconnected),
            last_broadcast: None,
            state_handlers: Vec::new(),
            command_handlers: Vec::new(),
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// True if commands and broadcasts can be published.
    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected && self.link.is_some()
    }

    /// Follow status changes.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Channel joined by the last successful [`SyncChannel::connect`].
    pub fn channel(&self) -> Option<&ChannelName> {
        self.channel.as_ref()
    }

    /// Subscribe to `channel`.
    ///
    /// Idempotent while connected to the same channel. Connecting to a
    /// different channel leaves the current one first. Failure is reported as
    /// [`ConnectionStatus::Error`].
    pub async fn connect(&mut self, channel: &ChannelName) -> ConnectionStatus {
        if self.is_connected() && self.channel.as_ref() == Some(channel) {
            return ConnectionStatus::Connected;
        }
        self.release();

        match self.transport.subscribe(channel).await {
            Ok(link) => {
                self.link = Some(link);
                self.channel = Some(channel.clone());
                self.last_broadcast = None;
                self.set_status(ConnectionStatus::Connected);
                tracing::info!(%channel, "connected to timer channel");
            },
            Err(error) => {
                self.set_status(ConnectionStatus::Error);
                tracing::warn!(%channel, %error, "failed to connect to timer channel");
            },
        }

        self.status()
    }

    /// Publish a Display snapshot, suppressing repeats.
    ///
    /// Fire-and-forget: the outcome is informational.
    pub fn broadcast_state(&mut self, snapshot: &TimerStateMessage) -> BroadcastOutcome {
        if !self.is_connected() {
            return BroadcastOutcome::NotConnected;
        }

        let bytes = match ChannelMessage::State(snapshot.clone()).encode() {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, "failed to encode timer state");
                return BroadcastOutcome::Failed;
            },
        };

        if self.last_broadcast.as_ref() == Some(&bytes) {
            return BroadcastOutcome::Suppressed;
        }

        match self.publish(bytes.clone()) {
            Ok(()) => {
                tracing::debug!(display_time = %snapshot.display_time, status = ?snapshot.state.status, "broadcast timer state");
                self.last_broadcast = Some(bytes);
                BroadcastOutcome::Published
            },
            Err(error) => {
                tracing::warn!(%error, "timer state broadcast dropped");
                BroadcastOutcome::Failed
            },
        }
    }

    /// Publish a Remote command.
    ///
    /// At most once: nothing is queued or retried. Returns
    /// [`ChannelError::NotConnected`] without publishing when there is no
    /// active subscription.
    pub fn send_command(
        &mut self,
        action: CommandAction,
        timestamp: Timestamp,
    ) -> Result<RemoteCommand, ChannelError> {
        if !self.is_connected() {
            tracing::warn!(%action, "cannot send command: not connected");
            return Err(ChannelError::NotConnected);
        }

        let command = RemoteCommand::new(action, timestamp);
        let bytes = ChannelMessage::Command(command).encode()?;
        self.publish(bytes)?;
        tracing::debug!(%action, "command sent");
        Ok(command)
    }

    /// Register a handler for inbound state snapshots.
    pub fn on_state<F>(&mut self, handler: F)
    where
        F: FnMut(&TimerStateMessage) + Send + 'static,
    {
        self.state_handlers.push(Box::new(handler));
    }

    /// Register a handler for inbound commands.
    pub fn on_command<F>(&mut self, handler: F)
    where
        F: FnMut(&RemoteCommand) + Send + 'static,
    {
        self.command_handlers.push(Box::new(handler));
    }

    /// Wait for the next well-formed inbound message.
    ///
    /// Handlers run before the message is returned, in arrival order.
    /// Malformed payloads are dropped. Returns `None` when there is no
    /// subscription or it ends; the status reflects why.
    ///
    /// Cancel safe if the transport's [`Link::recv`] is.
    pub async fn recv(&mut self) -> Option<ChannelMessage> {
        loop {
            let link = self.link.as_mut()?;

            match link.recv().await {
                LinkEvent::Payload(bytes) => match ChannelMessage::decode(&bytes) {
                    Ok(message) => {
                        self.dispatch(&message);
                        return Some(message);
                    },
                    Err(error) => {
                        tracing::warn!(%error, len = bytes.len(), "dropping malformed message");
                    },
                },
                LinkEvent::Closed => {
                    self.release();
                    self.set_status(ConnectionStatus::Disconnected);
                    tracing::info!("timer channel closed");
                    return None;
                },
                LinkEvent::Error(reason) => {
                    self.release();
                    self.set_status(ConnectionStatus::Error);
                    tracing::warn!(%reason, "timer channel error");
                    return None;
                },
            }
        }
    }

    /// Leave the channel. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        if self.release() {
            tracing::info!("disconnected from timer channel");
        }
        self.set_status(ConnectionStatus::Disconnected);
    }

    fn dispatch(&mut self, message: &ChannelMessage) {
        match message {
            ChannelMessage::State(snapshot) => {
                for handler in &mut self.state_handlers {
                    handler(snapshot);
                }
            },
            ChannelMessage::Command(command) => {
                for handler in &mut self.command_handlers {
                    handler(command);
                }
            },
        }
    }

    fn publish(&mut self, bytes: bytes::Bytes) -> Result<(), ChannelError> {
        let link = self.link.as_ref().ok_or(ChannelError::NotConnected)?;
        let result = link.publish(bytes);
        if matches!(result, Err(ChannelError::Closed)) {
            self.release();
            self.set_status(ConnectionStatus::Disconnected);
        }
        result
    }

    fn release(&mut self) -> bool {
        self.last_broadcast = None;
        match self.link.take() {
            Some(mut link) => {
                link.close();
                true
            },
            None => false,
        }
    }

    fn set_status(&self, status: ConnectionStatus) {
        let previous = self.status.send_replace(status);
        if previous != status {
            tracing::debug!(?previous, ?status, "channel status changed");
        }
    }
}

impl<T: Transport> Drop for SyncChannel<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Transport> std::fmt::Debug for SyncChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncChannel")
            .field("channel", &self.channel)
            .field("status", &self.status())
            .field("state_handlers", &self.state_handlers.len())
            .field("command_handlers", &self.command_handlers.len())
            .finish_non_exhaustive()
    }
}
