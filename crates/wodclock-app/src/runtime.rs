//! Async orchestration loops.
//!
//! Each runtime owns its [`SyncChannel`] and runs as a single task, so every
//! mutation of its state machine is serialized through one `select!` loop.
//! Loops end when their [`CancellationToken`] fires and release the channel
//! on the way out.
//!
//! Losing the channel never stops the Display's clock: ticks keep running
//! and rejoin attempts happen every `reconnect_interval`. The first snapshot
//! after a rejoin is always published so Remotes resynchronize.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{self, Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use wodclock_channel::{ChannelError, ConnectionStatus, SyncChannel, Transport};
use wodclock_core::Environment;
use wodclock_proto::{
    ChannelMessage, ChannelName, CommandAction, RemoteCommand, TimerStateMessage,
};

use crate::{
    Display, DisplayAction, DisplayConfig, DisplayEvent, DisplayView, Remote, RemoteConfig,
    SessionContext,
};

fn interval(period: Duration, immediate: bool) -> Interval {
    // `time::interval` rejects a zero period.
    let mut interval = time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    if !immediate {
        interval.reset();
    }
    interval
}

/// Drives a [`Display`]: clock ticks, inbound commands and local controls.
pub struct DisplayRuntime<T: Transport, E: Environment> {
    display: Display,
    channel: SyncChannel<T>,
    env: E,
    config: DisplayConfig,
    views: watch::Sender<DisplayView>,
    controls_tx: mpsc::Sender<CommandAction>,
    controls_rx: mpsc::Receiver<CommandAction>,
}

impl<T: Transport, E: Environment> DisplayRuntime<T, E> {
    /// Create a runtime. Nothing happens until [`DisplayRuntime::run`].
    pub fn new(display: Display, channel: SyncChannel<T>, env: E, config: DisplayConfig) -> Self {
        let (views, _) = watch::channel(display.view());
        let (controls_tx, controls_rx) = mpsc::channel(16);
        Self { display, channel, env, config, views, controls_tx, controls_rx }
    }

    /// Follow rendered frames.
    pub fn views(&self) -> watch::Receiver<DisplayView> {
        self.views.subscribe()
    }

    /// Follow channel connectivity.
    pub fn connection(&self) -> watch::Receiver<ConnectionStatus> {
        self.channel.watch_status()
    }

    /// Sender for the Display's own controls.
    pub fn controls(&self) -> mpsc::Sender<CommandAction> {
        self.controls_tx.clone()
    }

    /// Run until `cancel` fires, then hand the Display back.
    pub async fn run(mut self, cancel: CancellationToken) -> Display {
        let context = self.display.context();
        let channel = context.channel_name();
        tracing::info!(role = %context.role, %channel, workout = %context.workout_id, "session started");
        self.connect(&channel).await;

        let mut ticks = interval(self.config.tick_interval, true);
        let mut retries = interval(self.config.reconnect_interval, false);

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                _ = ticks.tick() => self.dispatch(DisplayEvent::Tick),

                Some(action) = self.controls_rx.recv() => {
                    self.dispatch(DisplayEvent::Local(action));
                },

                message = self.channel.recv(), if self.channel.is_connected() => {
                    self.on_message(message);
                },

                _ = retries.tick(), if !self.channel.is_connected() => {
                    self.connect(&channel).await;
                },
            }
        }

        self.channel.disconnect();
        let context = self.display.context();
        tracing::info!(role = %context.role, workout = %context.workout_id, "session stopped");
        self.display
    }

    async fn connect(&mut self, channel: &ChannelName) {
        if self.channel.connect(channel).await == ConnectionStatus::Connected {
            self.dispatch(DisplayEvent::Connected);
        }
    }

    fn on_message(&mut self, message: Option<ChannelMessage>) {
        match message {
            Some(ChannelMessage::Command(command)) => {
                self.dispatch(DisplayEvent::Command(command));
            },
            Some(ChannelMessage::State(other)) => {
                tracing::warn!(
                    workout = %other.workout_id,
                    "another display is broadcasting on this channel"
                );
            },
            None => {
                tracing::warn!(status = ?self.channel.status(), "channel lost, timing continues");
            },
        }
    }

    fn dispatch(&mut self, event: DisplayEvent) {
        let now = self.env.now();
        for action in self.display.handle(event, now) {
            match action {
                DisplayAction::Render => {
                    self.views.send_replace(self.display.view());
                },
                DisplayAction::Broadcast(snapshot) => {
                    let outcome = self.channel.broadcast_state(&snapshot);
                    tracing::trace!(?outcome, display_time = %snapshot.display_time, "broadcast");
                },
            }
        }
    }
}

type Request = (CommandAction, oneshot::Sender<Result<RemoteCommand, ChannelError>>);

fn lock(remote: &Mutex<Remote>) -> MutexGuard<'_, Remote> {
    remote.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives a [`Remote`]: mirrors inbound state and sends queued commands.
pub struct RemoteRuntime<T: Transport, E: Environment> {
    remote: Arc<Mutex<Remote>>,
    channel: SyncChannel<T>,
    env: E,
    config: RemoteConfig,
    requests: mpsc::Receiver<Request>,
    states: watch::Sender<Option<TimerStateMessage>>,
}

impl<T: Transport, E: Environment> RemoteRuntime<T, E> {
    /// Create a runtime and the handle used to talk to it.
    pub fn new(
        context: SessionContext,
        channel: SyncChannel<T>,
        env: E,
        config: RemoteConfig,
    ) -> (Self, RemoteHandle) {
        let remote = Arc::new(Mutex::new(Remote::new(context)));
        let (requests_tx, requests) = mpsc::channel(config.mailbox.max(1));
        let (states, states_rx) = watch::channel(None);

        let handle =
            RemoteHandle { remote: Arc::clone(&remote), requests: requests_tx, states: states_rx };
        (Self { remote, channel, env, config, requests, states }, handle)
    }

    /// Run until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let context = lock(&self.remote).context().clone();
        let channel = context.channel_name();
        tracing::info!(role = %context.role, %channel, workout = %context.workout_id, "session started");
        self.connect(&channel).await;

        let mut retries = interval(self.config.reconnect_interval, false);

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                Some((action, reply)) = self.requests.recv() => {
                    let result = self.send(action);
                    // The caller may have given up waiting.
                    let _ = reply.send(result);
                },

                message = self.channel.recv(), if self.channel.is_connected() => {
                    self.on_message(message);
                },

                _ = retries.tick(), if !self.channel.is_connected() => {
                    self.connect(&channel).await;
                },
            }
        }

        self.channel.disconnect();
        lock(&self.remote).set_connected(false);
        tracing::info!(role = %context.role, workout = %context.workout_id, "session stopped");
    }

    async fn connect(&mut self, channel: &ChannelName) {
        let status = self.channel.connect(channel).await;
        lock(&self.remote).set_connected(status == ConnectionStatus::Connected);
    }

    fn send(&mut self, action: CommandAction) -> Result<RemoteCommand, ChannelError> {
        let command = lock(&self.remote).command(action, self.env.now());
        let Some(command) = command else {
            tracing::warn!(%action, "command dropped: not connected");
            return Err(ChannelError::NotConnected);
        };

        let result = self.channel.send_command(command.action, command.timestamp);
        if result.is_err() {
            lock(&self.remote).set_connected(self.channel.is_connected());
        }
        result
    }

    fn on_message(&mut self, message: Option<ChannelMessage>) {
        match message {
            Some(ChannelMessage::State(snapshot)) => {
                lock(&self.remote).apply_state(snapshot.clone());
                self.states.send_replace(Some(snapshot));
            },
            Some(ChannelMessage::Command(command)) => {
                tracing::trace!(action = %command.action, "command from another remote");
            },
            None => {
                lock(&self.remote).set_connected(false);
                tracing::warn!(status = ?self.channel.status(), "channel lost");
            },
        }
    }
}

/// Cloneable access to a running [`RemoteRuntime`].
#[derive(Debug, Clone)]
pub struct RemoteHandle {
    remote: Arc<Mutex<Remote>>,
    requests: mpsc::Sender<Request>,
    states: watch::Receiver<Option<TimerStateMessage>>,
}

impl RemoteHandle {
    /// Send a command to the Display.
    ///
    /// # Errors
    ///
    /// [`ChannelError::NotConnected`] while the channel is down (nothing is
    /// queued for later), a publish failure, or [`ChannelError::Closed`] if
    /// the runtime has stopped.
    pub async fn send(&self, action: CommandAction) -> Result<RemoteCommand, ChannelError> {
        let (reply, response) = oneshot::channel();
        self.requests.send((action, reply)).await.map_err(|_| ChannelError::Closed)?;
        response.await.map_err(|_| ChannelError::Closed)?
    }

    /// True if commands can be sent.
    pub fn can_send(&self) -> bool {
        lock(&self.remote).can_send()
    }

    /// Commands the Display would act on right now.
    pub fn available_actions(&self) -> Vec<CommandAction> {
        lock(&self.remote).available_actions()
    }

    /// Last mirrored snapshot.
    pub fn state(&self) -> Option<TimerStateMessage> {
        lock(&self.remote).state().cloned()
    }

    /// Follow mirrored snapshots.
    pub fn states(&self) -> watch::Receiver<Option<TimerStateMessage>> {
        self.states.clone()
    }
}
