use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use watchface_core::{
    BatteryGauge, Catalog, InputRouter, JsonFileStore, LastFace, LocalClock, Sampler,
};
use watchface_hw::{FsFontLoader, HeadlessSurface, SysfsBattery};

mod config;
mod console;
mod engine;
mod session;

use session::{FaceSession, SessionOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = config::Config::load()?;
    tracing::info!(
        faces_dir = %config.faces_dir.display(),
        fonts_dir = %config.fonts_dir.display(),
        tick_ms = config.tick_ms,
        "watchfaced starting"
    );

    let catalog = match Catalog::scan(&config.faces_dir) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "no faces to show");
            return Err(e.into());
        }
    };

    let last_face = LastFace::new(Arc::new(JsonFileStore::new(&config.state_dir)));

    let battery: Option<Arc<dyn BatteryGauge>> = match &config.battery_path {
        Some(path) => Some(Arc::new(SysfsBattery::new(path))),
        None => SysfsBattery::detect().map(|b| Arc::new(b) as Arc<dyn BatteryGauge>),
    };
    if battery.is_none() {
        tracing::info!("no battery gauge; battery placeholders render empty");
    }
    let sampler = Sampler::new(Arc::new(LocalClock), battery);

    let (handle, rx) = engine::channel();

    console::spawn_console(
        InputRouter::new(config.width, config.margin_percent),
        handle.clone(),
    )
    .context("starting input console")?;

    let signal_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            signal_handle.terminate();
        }
    });

    let session = FaceSession::new(
        catalog,
        last_face,
        HeadlessSurface::new(config.width, config.height),
        FsFontLoader::new(),
        sampler,
        handle,
        SessionOptions {
            fonts_dir: config.fonts_dir.clone(),
            tick: Duration::from_millis(config.tick_ms),
            persist_on_navigate: config.persist_on_navigate,
        },
    );
    session.run(rx).await;

    tracing::info!("watchfaced shutting down");
    Ok(())
}
