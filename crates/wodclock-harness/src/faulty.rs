//! Fault injection.
//!
//! Wraps any [`Transport`] and silently drops a seeded-random share of
//! publishes, modelling a lossy realtime backend. The same seed drops the
//! same publishes on every run.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wodclock_channel::{ChannelError, Link, LinkEvent, Transport};
use wodclock_proto::ChannelName;

#[derive(Debug)]
struct Faults {
    rng: ChaCha8Rng,
    drop_rate: f64,
    dropped: u64,
}

impl Faults {
    fn should_drop(&mut self) -> bool {
        let drop = self.drop_rate > 0.0 && self.rng.gen_bool(self.drop_rate.min(1.0));
        if drop {
            self.dropped += 1;
        }
        drop
    }
}

fn lock(faults: &Mutex<Faults>) -> MutexGuard<'_, Faults> {
    faults.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lossy wrapper around another transport.
#[derive(Debug, Clone)]
pub struct FaultyTransport<T> {
    inner: T,
    faults: Arc<Mutex<Faults>>,
}

impl<T: Transport> FaultyTransport<T> {
    /// Wrap `inner`. Nothing is dropped until [`FaultyTransport::set_drop_rate`].
    pub fn new(inner: T, seed: u64) -> Self {
        let faults = Faults { rng: ChaCha8Rng::seed_from_u64(seed), drop_rate: 0.0, dropped: 0 };
        Self { inner, faults: Arc::new(Mutex::new(faults)) }
    }

    /// Probability in `[0, 1]` that a publish is dropped.
    pub fn set_drop_rate(&self, rate: f64) {
        lock(&self.faults).drop_rate = rate.clamp(0.0, 1.0);
    }

    /// Publishes dropped so far, across all links.
    pub fn dropped(&self) -> u64 {
        lock(&self.faults).dropped
    }
}

#[async_trait]
impl<T: Transport> Transport for FaultyTransport<T> {
    type Link = FaultyLink<T::Link>;

    async fn subscribe(&self, channel: &ChannelName) -> Result<Self::Link, ChannelError> {
        let inner = self.inner.subscribe(channel).await?;
        Ok(FaultyLink { inner, faults: Arc::clone(&self.faults) })
    }
}

/// Membership created by [`FaultyTransport`].
#[derive(Debug)]
pub struct FaultyLink<L> {
    inner: L,
    faults: Arc<Mutex<Faults>>,
}

#[async_trait]
impl<L: Link> Link for FaultyLink<L> {
    fn publish(&self, payload: Bytes) -> Result<(), ChannelError> {
        if lock(&self.faults).should_drop() {
            tracing::debug!(len = payload.len(), "fault injection: publish dropped");
            return Ok(());
        }
        self.inner.publish(payload)
    }

    async fn recv(&mut self) -> LinkEvent {
        self.inner.recv().await
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use wodclock_proto::TenantId;

    use super::*;
    use crate::RecordingTransport;

    async fn publish_many(seed: u64, rate: f64) -> (usize, u64) {
        let recorder = RecordingTransport::new();
        let faulty = FaultyTransport::new(recorder.clone(), seed);
        faulty.set_drop_rate(rate);

        let channel = ChannelName::for_tenant(&TenantId::new("box").unwrap());
        let link = faulty.subscribe(&channel).await.unwrap();
        for i in 0..100_u8 {
            link.publish(Bytes::copy_from_slice(&[i])).unwrap();
        }
        (recorder.publish_count(), faulty.dropped())
    }

    #[tokio::test]
    async fn drop_rate_extremes() {
        assert_eq!(publish_many(1, 0.0).await, (100, 0));
        assert_eq!(publish_many(1, 1.0).await, (0, 100));
    }

    #[tokio::test]
    async fn same_seed_drops_the_same_publishes() {
        let first = publish_many(42, 0.3).await;
        let second = publish_many(42, 0.3).await;

        assert_eq!(first, second);
        assert_eq!(first.0 as u64 + first.1, 100);
        assert!(first.1 > 0 && first.1 < 100);
    }
}
