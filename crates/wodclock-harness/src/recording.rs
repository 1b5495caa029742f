//! Recording transport.
//!
//! Captures every publish instead of delivering it, and lets tests inject
//! inbound payloads, close memberships and refuse subscriptions. Use it to
//! assert on exactly what a [`wodclock_channel::SyncChannel`] put on the wire.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;
use wodclock_channel::{ChannelError, Link, LinkEvent, Transport};
use wodclock_proto::{ChannelMessage, ChannelName};

#[derive(Debug)]
struct Member {
    inbound: mpsc::UnboundedSender<LinkEvent>,
    closed: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct Recorder {
    published: Vec<(ChannelName, Bytes)>,
    members: Vec<Member>,
    subscriptions: usize,
    unavailable: bool,
}

/// Transport that records publishes. Clones share the recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    shared: Arc<Mutex<Recorder>>,
}

impl RecordingTransport {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorder> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make subsequent subscriptions fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.lock().unavailable = !available;
    }

    /// Number of successful subscriptions so far.
    pub fn subscriptions(&self) -> usize {
        self.lock().subscriptions
    }

    /// Number of payloads published so far.
    pub fn publish_count(&self) -> usize {
        self.lock().published.len()
    }

    /// Raw published payloads, in order.
    pub fn published(&self) -> Vec<Bytes> {
        self.lock().published.iter().map(|(_, bytes)| bytes.clone()).collect()
    }

    /// Channels published to, in order.
    pub fn channels(&self) -> Vec<ChannelName> {
        self.lock().published.iter().map(|(channel, _)| channel.clone()).collect()
    }

    /// Published payloads that decode as channel messages, in order.
    pub fn messages(&self) -> Vec<ChannelMessage> {
        self.lock()
            .published
            .iter()
            .filter_map(|(_, bytes)| ChannelMessage::decode(bytes).ok())
            .collect()
    }

    /// Deliver `message` to every open membership.
    pub fn inject(&self, message: &ChannelMessage) -> Result<(), ChannelError> {
        self.inject_raw(message.encode()?);
        Ok(())
    }

    /// Deliver raw bytes to every open membership.
    pub fn inject_raw(&self, payload: Bytes) {
        self.broadcast(&LinkEvent::Payload(payload));
    }

    /// Fail every open membership with a backend error.
    pub fn fail_links(&self, reason: &str) {
        self.end_links(&LinkEvent::Error(reason.to_string()));
    }

    /// Close every open membership, as if the backend dropped them.
    pub fn close_links(&self) {
        self.end_links(&LinkEvent::Closed);
    }

    fn broadcast(&self, event: &LinkEvent) {
        let mut recorder = self.lock();
        recorder.members.retain(|m| !m.closed.load(Ordering::Acquire));
        for member in &recorder.members {
            let _ = member.inbound.send(event.clone());
        }
    }

    fn end_links(&self, event: &LinkEvent) {
        let mut recorder = self.lock();
        for member in recorder.members.drain(..) {
            member.closed.store(true, Ordering::Release);
            let _ = member.inbound.send(event.clone());
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    type Link = RecordingLink;

    async fn subscribe(&self, channel: &ChannelName) -> Result<RecordingLink, ChannelError> {
        let mut recorder = self.lock();
        if recorder.unavailable {
            return Err(ChannelError::Transport("recording transport unavailable".into()));
        }

        let (inbound, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        recorder.members.push(Member { inbound, closed: Arc::clone(&closed) });
        recorder.subscriptions += 1;

        Ok(RecordingLink { channel: channel.clone(), shared: Arc::clone(&self.shared), rx, closed })
    }
}

/// Membership created by [`RecordingTransport`].
#[derive(Debug)]
pub struct RecordingLink {
    channel: ChannelName,
    shared: Arc<Mutex<Recorder>>,
    rx: mpsc::UnboundedReceiver<LinkEvent>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Link for RecordingLink {
    fn publish(&self, payload: Bytes) -> Result<(), ChannelError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChannelError::Closed);
        }
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .published
            .push((self.channel.clone(), payload));
        Ok(())
    }

    async fn recv(&mut self) -> LinkEvent {
        match self.rx.recv().await {
            Some(event) => event,
            None => LinkEvent::Closed,
        }
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use wodclock_proto::TenantId;

    use super::*;

    fn channel() -> ChannelName {
        ChannelName::for_tenant(&TenantId::new("box").unwrap())
    }

    #[tokio::test]
    async fn records_publishes_and_delivers_injections() {
        let transport = RecordingTransport::new();
        let mut link = transport.subscribe(&channel()).await.unwrap();

        link.publish(Bytes::from_static(b"out")).unwrap();
        transport.inject_raw(Bytes::from_static(b"in"));

        assert_eq!(transport.published(), vec![Bytes::from_static(b"out")]);
        assert_eq!(transport.channels(), vec![channel()]);
        assert_eq!(link.recv().await, LinkEvent::Payload(Bytes::from_static(b"in")));
    }

    #[tokio::test]
    async fn closed_links_reject_publish() {
        let transport = RecordingTransport::new();
        let mut link = transport.subscribe(&channel()).await.unwrap();

        transport.close_links();
        assert_eq!(link.recv().await, LinkEvent::Closed);
        assert!(matches!(link.publish(Bytes::new()), Err(ChannelError::Closed)));
        assert_eq!(transport.publish_count(), 0);
    }

    #[tokio::test]
    async fn unavailable_refuses_subscribe() {
        let transport = RecordingTransport::new();
        transport.set_available(false);
        assert!(transport.subscribe(&channel()).await.is_err());
        assert_eq!(transport.subscriptions(), 0);
    }
}
