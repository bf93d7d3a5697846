//! Animated button demo - main entry point.
//!
//! Spawns two buttons on timer-backed hosts. Clicking one plays a scripted
//! series of state changes against it while every committed snapshot is
//! logged as JSON.

mod host;
mod timeline;

use std::sync::Arc;
use std::time::Duration;

use animbutton_core::{ButtonConfig, ButtonError, Size, View};
use animbutton_engine::ClickEvent;
use animbutton_runtime::{ButtonHandle, ButtonRuntime};
use parking_lot::Mutex;

use host::{SharedSurface, Surface, TimerHost};
use timeline::{Cue, AUTO_SCRIPT, CUSTOM_SCRIPT};

/// Time between script cues.
const STEP: Duration = Duration::from_millis(500);

/// Initial body size of every demo button.
const BODY: Size = Size {
    width: 320,
    height: 48,
};

struct DemoButton {
    name: &'static str,
    runtime: ButtonRuntime,
    surface: SharedSurface,
}

fn spawn_button(
    name: &'static str,
    config: ButtonConfig,
    script: &'static [Cue],
    rt: &tokio::runtime::Handle,
) -> Result<DemoButton, ButtonError> {
    let surface = Arc::new(Mutex::new(Surface::new(BODY)));

    let host_surface = surface.clone();
    let host_rt = rt.clone();
    let runtime = ButtonRuntime::spawn(config, move |completions| {
        TimerHost::new(host_surface, completions, host_rt)
    })?;
    let handle = runtime.handle();
    tracing::info!("Spawned {} button {}", name, handle.id());

    let script_handle = handle.clone();
    let script_rt = rt.clone();
    handle.set_click_listener(Box::new(move |event: &ClickEvent| {
        tracing::info!(
            "{} clicked in {} (auto transition: {:?})",
            name,
            event.state,
            event.auto_transition
        );
        let handle = script_handle.clone();
        script_rt.spawn(async move {
            if let Err(e) = timeline::play(&handle, script, STEP).await {
                tracing::error!("{} script failed: {}", name, e);
            }
        });
    }))?;

    rt.spawn(log_snapshots(name, handle));

    Ok(DemoButton {
        name,
        runtime,
        surface,
    })
}

async fn log_snapshots(name: &'static str, handle: ButtonHandle) {
    let mut rx = handle.subscribe();
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        match serde_json::to_string(&snapshot) {
            Ok(json) => tracing::info!("{} snapshot: {}", name, json),
            Err(e) => tracing::warn!("{} snapshot not serializable: {}", name, e),
        }
    }
}

async fn run(config: ButtonConfig, rt: tokio::runtime::Handle) -> Result<(), ButtonError> {
    let buttons = [
        spawn_button("auto", config.clone(), AUTO_SCRIPT, &rt)?,
        spawn_button(
            "custom",
            config.clone().with_auto_transition(false),
            CUSTOM_SCRIPT,
            &rt,
        )?,
    ];

    for button in &buttons {
        let accepted = button.runtime.handle().click().await?;
        tracing::info!("{} click accepted: {}", button.name, accepted);
    }

    let settle = config.transition_duration() + config.fade_duration() * 2;
    let length = timeline::script_length(AUTO_SCRIPT, STEP, settle)
        .max(timeline::script_length(CUSTOM_SCRIPT, STEP, settle));
    tokio::time::sleep(length).await;

    for button in &buttons {
        let snapshot = button.runtime.handle().snapshot().await?;
        let surface = button.surface.lock();
        tracing::info!(
            "{} finished in {} (body width {}, showing {:?}, interactive {})",
            button.name,
            snapshot.state,
            surface.size(View::Body).width,
            surface.shown(),
            surface.is_interactive()
        );
    }

    for button in &buttons {
        button.runtime.shutdown();
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Animated button demo starting...");

    let config = ButtonConfig::load_or_default().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        ButtonConfig::default()
    });

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to build tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(config, rt.handle().clone())) {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
