//! In-process transport.
//!
//! Every channel name maps to one `tokio::sync::broadcast` queue. Members
//! publish into it and filter out their own frames, matching pub/sub services
//! that do not echo to the sender. Slow members that fall more than
//! [`HubConfig::capacity`] frames behind lose the oldest frames: delivery is
//! at most once. A channel's queue is dropped when its last member leaves.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::broadcast::{self, error::RecvError};
use wodclock_proto::ChannelName;

use crate::{ChannelError, Link, LinkEvent, Transport};

/// Hub configuration
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Frames buffered per channel before slow members start losing them
    pub capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

#[derive(Debug, Clone)]
enum HubFrame {
    Data { origin: u64, payload: Bytes },
    Severed,
}

#[derive(Debug)]
struct Slot {
    tx: broadcast::Sender<HubFrame>,
    severed: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct HubInner {
    channels: HashMap<ChannelName, Slot>,
    next_member: u64,
    unavailable: bool,
}

/// In-process pub/sub backend. Cheap to clone; clones share channels.
#[derive(Debug, Clone, Default)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubInner>>,
    config: HubConfig,
}

impl MemoryHub {
    /// Create a hub with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hub with `config`.
    pub fn with_config(config: HubConfig) -> Self {
        Self { inner: Arc::default(), config }
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of channels with at least one live membership.
    pub fn channel_count(&self) -> usize {
        self.lock().channels.len()
    }

    /// Number of live memberships in `channel`.
    pub fn member_count(&self, channel: &ChannelName) -> usize {
        self.lock().channels.get(channel).map_or(0, |slot| slot.tx.receiver_count())
    }

    /// Drop every membership of `channel`, as if the backend lost them.
    ///
    /// Members observe [`LinkEvent::Closed`] and further publishes fail.
    /// New subscriptions get a fresh channel.
    pub fn sever(&self, channel: &ChannelName) {
        if let Some(slot) = self.lock().channels.remove(channel) {
            slot.severed.store(true, Ordering::Release);
            let _ = slot.tx.send(HubFrame::Severed);
            tracing::info!(%channel, "channel severed");
        }
    }

    /// Make subsequent subscriptions fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.lock().unavailable = !available;
    }
}

#[async_trait]
impl Transport for MemoryHub {
    type Link = MemoryLink;

    async fn subscribe(&self, channel: &ChannelName) -> Result<MemoryLink, ChannelError> {
        let mut inner = self.lock();
        if inner.unavailable {
            return Err(ChannelError::Transport("hub unavailable".into()));
        }

        let member = inner.next_member;
        inner.next_member += 1;

        let capacity = self.config.capacity.max(1);
        let slot = inner.channels.entry(channel.clone()).or_insert_with(|| Slot {
            tx: broadcast::channel(capacity).0,
            severed: Arc::new(AtomicBool::new(false)),
        });

        tracing::debug!(%channel, member, "member joined");
        Ok(MemoryLink {
            hub: Arc::clone(&self.inner),
            member,
            channel: channel.clone(),
            tx: slot.tx.clone(),
            rx: Some(slot.tx.subscribe()),
            severed: Arc::clone(&slot.severed),
        })
    }
}

/// Membership in a [`MemoryHub`] channel.
#[derive(Debug)]
pub struct MemoryLink {
    hub: Arc<Mutex<HubInner>>,
    member: u64,
    channel: ChannelName,
    tx: broadcast::Sender<HubFrame>,
    rx: Option<broadcast::Receiver<HubFrame>>,
    severed: Arc<AtomicBool>,
}

impl MemoryLink {
    /// Channel this link belongs to.
    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    fn is_open(&self) -> bool {
        self.rx.is_some() && !self.severed.load(Ordering::Acquire)
    }

    /// Drop the channel's slot if this was its last member. A severed slot
    /// has already been replaced, so only the slot this link joined is
    /// considered.
    fn prune(&self) {
        let mut inner = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
        let empty = inner.channels.get(&self.channel).is_some_and(|slot| {
            Arc::ptr_eq(&slot.severed, &self.severed) && slot.tx.receiver_count() == 0
        });
        if empty {
            inner.channels.remove(&self.channel);
            tracing::debug!(channel = %self.channel, "channel emptied");
        }
    }
}

impl Drop for MemoryLink {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait]
impl Link for MemoryLink {
    fn publish(&self, payload: Bytes) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::Closed);
        }
        // No other members is not an error for fire-and-forget publishes.
        let _ = self.tx.send(HubFrame::Data { origin: self.member, payload });
        Ok(())
    }

    async fn recv(&mut self) -> LinkEvent {
        loop {
            let Some(rx) = self.rx.as_mut() else {
                return LinkEvent::Closed;
            };

            match rx.recv().await {
                Ok(HubFrame::Data { origin, .. }) if origin == self.member => {},
                Ok(HubFrame::Data { payload, .. }) => return LinkEvent::Payload(payload),
                Ok(HubFrame::Severed) | Err(RecvError::Closed) => {
                    self.rx = None;
                    return LinkEvent::Closed;
                },
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(channel = %self.channel, member = self.member, missed, "member lagged, frames dropped");
                },
            }
        }
    }

    fn close(&mut self) {
        if let Some(rx) = self.rx.take() {
            drop(rx);
            tracing::debug!(channel = %self.channel, member = self.member, "member left");
            self.prune();
        }
    }
}

#[cfg(test)]
mod tests {
    use wodclock_proto::TenantId;

    use super::*;

    fn channel(tenant: &str) -> ChannelName {
        ChannelName::for_tenant(&TenantId::new(tenant).unwrap())
    }

    #[tokio::test]
    async fn payload_reaches_peers_not_sender() {
        let hub = MemoryHub::new();
        let mut a = hub.subscribe(&channel("box")).await.unwrap();
        let mut b = hub.subscribe(&channel("box")).await.unwrap();

        a.publish(Bytes::from_static(b"one")).unwrap();
        b.publish(Bytes::from_static(b"two")).unwrap();

        assert_eq!(b.recv().await, LinkEvent::Payload(Bytes::from_static(b"one")));
        assert_eq!(a.recv().await, LinkEvent::Payload(Bytes::from_static(b"two")));
    }

    #[tokio::test]
    async fn channels_are_isolated_by_tenant() {
        let hub = MemoryHub::new();
        let a = hub.subscribe(&channel("north")).await.unwrap();
        let _b = hub.subscribe(&channel("south")).await.unwrap();

        a.publish(Bytes::from_static(b"hi")).unwrap();
        assert_eq!(hub.member_count(&channel("north")), 1);
        assert_eq!(hub.member_count(&channel("south")), 1);
    }

    #[tokio::test]
    async fn close_and_drop_release_membership() {
        let hub = MemoryHub::new();
        let name = channel("box");
        let mut a = hub.subscribe(&name).await.unwrap();
        let b = hub.subscribe(&name).await.unwrap();
        assert_eq!(hub.member_count(&name), 2);

        a.close();
        assert_eq!(hub.member_count(&name), 1);
        assert_eq!(a.recv().await, LinkEvent::Closed);
        assert!(matches!(a.publish(Bytes::new()), Err(ChannelError::Closed)));

        drop(b);
        assert_eq!(hub.member_count(&name), 0);
    }

    #[tokio::test]
    async fn last_member_leaving_drops_the_channel() {
        let hub = MemoryHub::new();
        let mut a = hub.subscribe(&channel("north")).await.unwrap();
        let b = hub.subscribe(&channel("north")).await.unwrap();
        let _c = hub.subscribe(&channel("south")).await.unwrap();
        assert_eq!(hub.channel_count(), 2);

        a.close();
        assert_eq!(hub.channel_count(), 2);
        drop(b);
        assert_eq!(hub.channel_count(), 1);
        assert_eq!(hub.member_count(&channel("north")), 0);

        // Rejoining creates a fresh channel.
        let _d = hub.subscribe(&channel("north")).await.unwrap();
        assert_eq!(hub.channel_count(), 2);
    }

    #[tokio::test]
    async fn stale_link_does_not_prune_replacement_channel() {
        let hub = MemoryHub::new();
        let name = channel("box");
        let mut old = hub.subscribe(&name).await.unwrap();

        hub.sever(&name);
        let _fresh = hub.subscribe(&name).await.unwrap();
        old.close();

        assert_eq!(hub.channel_count(), 1);
        assert_eq!(hub.member_count(&name), 1);
    }

    #[tokio::test]
    async fn sever_closes_members() {
        let hub = MemoryHub::new();
        let name = channel("box");
        let mut a = hub.subscribe(&name).await.unwrap();

        hub.sever(&name);
        assert!(matches!(a.publish(Bytes::new()), Err(ChannelError::Closed)));
        assert_eq!(a.recv().await, LinkEvent::Closed);

        let fresh = hub.subscribe(&name).await.unwrap();
        assert!(fresh.publish(Bytes::new()).is_ok());
    }

    #[tokio::test]
    async fn unavailable_hub_rejects_subscribe() {
        let hub = MemoryHub::new();
        hub.set_available(false);
        assert!(matches!(hub.subscribe(&channel("box")).await, Err(ChannelError::Transport(_))));
        hub.set_available(true);
        assert!(hub.subscribe(&channel("box")).await.is_ok());
    }

    #[tokio::test]
    async fn lagging_member_skips_oldest() {
        let hub = MemoryHub::with_config(HubConfig { capacity: 2 });
        let name = channel("box");
        let a = hub.subscribe(&name).await.unwrap();
        let mut b = hub.subscribe(&name).await.unwrap();

        for payload in [&b"1"[..], b"2", b"3", b"4"] {
            a.publish(Bytes::copy_from_slice(payload)).unwrap();
        }

        assert_eq!(b.recv().await, LinkEvent::Payload(Bytes::from_static(b"3")));
        assert_eq!(b.recv().await, LinkEvent::Payload(Bytes::from_static(b"4")));
    }
}
