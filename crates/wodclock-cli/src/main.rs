//! wodclock binary.
//!
//! Loads a workout, starts a Display and a Remote on the in-memory hub, and
//! reads Remote commands from stdin. Status lines go to stdout, logs to
//! stderr.

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout},
    sync::watch,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wodclock_app::{
    Display, DisplayRuntime, DisplayView, RemoteConfig, RemoteHandle, RemoteRuntime,
    SessionContext,
};
use wodclock_channel::{MemoryHub, SyncChannel};
use wodclock_cli::{Args, CliError, Command, JsonFileSource, commands, render};
use wodclock_core::{SystemEnv, TimerEvent};
use wodclock_proto::{TenantId, WorkoutId};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "failed to start async runtime");
            return ExitCode::FAILURE;
        },
    };

    let result = runtime.block_on(run(args));
    // Blocking stdin reads would otherwise hold shutdown until the next line.
    runtime.shutdown_timeout(Duration::from_millis(100));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "wodclock failed");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(args: Args) -> Result<(), CliError> {
    let tenant = TenantId::new(args.tenant.as_str())?;
    let workout_id = WorkoutId::new(args.workout.as_str());
    let source = JsonFileSource::new(args.library.clone());

    let mut display =
        Display::load(&source, SessionContext::display(tenant.clone(), workout_id.clone()))?;
    display.subscribe(|state, events| {
        for event in events {
            match event {
                TimerEvent::StepChanged { to, .. } => tracing::info!(step = to, "next step"),
                TimerEvent::Completed => tracing::info!("workout complete"),
                TimerEvent::Paused { elapsed } => tracing::info!(elapsed, "paused"),
                _ => tracing::trace!(?event, ?state, "timer event"),
            }
        }
    });

    let hub = MemoryHub::new();
    let env = SystemEnv;
    let cancel = CancellationToken::new();

    let display_runtime =
        DisplayRuntime::new(display, SyncChannel::new(hub.clone()), env, args.display_config());
    let views = display_runtime.views();
    let display_task = tokio::spawn(display_runtime.run(cancel.clone()));

    let (remote_runtime, remote) = RemoteRuntime::new(
        SessionContext::remote(tenant, workout_id),
        SyncChannel::new(hub),
        env,
        RemoteConfig::default(),
    );
    let remote_task = tokio::spawn(remote_runtime.run(cancel.clone()));
    let render_task = tokio::spawn(render_views(views, cancel.clone()));

    write_line(&mut tokio::io::stdout(), commands::HELP).await?;

    let outcome = tokio::select! {
        result = read_commands(remote) => result,
        signal = tokio::signal::ctrl_c() => signal.map_err(CliError::from),
    };

    cancel.cancel();
    let finished = display_task.await?;
    remote_task.await?;
    render_task.await??;

    tracing::info!(state = ?finished.state(), "session ended");
    outcome
}

async fn write_line(out: &mut Stdout, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

async fn render_views(
    mut views: watch::Receiver<DisplayView>,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let mut out = tokio::io::stdout();
    loop {
        tokio::select! {
            () = cancel.cancelled() => return Ok(()),
            changed = views.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let line = render::display_line(&views.borrow_and_update());
                write_line(&mut out, &line).await?;
            },
        }
    }
}

async fn read_commands(remote: RemoteHandle) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line) {
            Command::Action(action) => {
                if let Err(error) = remote.send(action).await {
                    write_line(&mut out, &format!("{action} not sent: {error}")).await?;
                }
            },
            Command::Status => {
                let line = render::remote_line(
                    remote.state().as_ref(),
                    &remote.available_actions(),
                );
                write_line(&mut out, &line).await?;
            },
            Command::Help => write_line(&mut out, commands::HELP).await?,
            Command::Quit => break,
            Command::Empty => {},
            Command::Unknown { input } => {
                write_line(&mut out, &format!("unknown command {input:?}; try help")).await?;
            },
        }
    }

    Ok(())
}
