//! Face session: the state machine that owns the displayed face.
//!
//! ```text
//! Idle ──LoadFace──▶ Loading ──ok──▶ Loaded ◀──Tick (refresh labels)
//!  ▲                   │                │
//!  │              ConfigError        Cleanup / Navigate
//!  │                   ▼                ▼
//!  └───────────────── Idle ◀──────── CleaningUp
//!
//! Terminate (from any state) ──▶ Terminated
//! ```
//!
//! Per-face errors stop at [`FaceSession::load`]; the session keeps
//! running and stays navigable whatever a face's descriptor contains.

use crate::engine::{spawn_ticker, EngineHandle, FaceMessage};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use watchface_core::{Catalog, Direction, FaceDescriptor, LastFace, Sampler};
use watchface_hw::{build_background, build_label, FontCache, FontLoader, LabelInstance, RenderSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Loaded,
    CleaningUp,
    Terminated,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub fonts_dir: PathBuf,
    pub tick: Duration,
    pub persist_on_navigate: bool,
}

pub struct FaceSession<S: RenderSurface, L: FontLoader> {
    catalog: Catalog,
    last_face: LastFace,
    surface: S,
    fonts: FontCache<L>,
    sampler: Sampler,
    options: SessionOptions,
    handle: EngineHandle,
    state: SessionState,
    /// Face selected for display.
    current: String,
    /// Face whose widgets are on the surface, if any.
    shown: Option<String>,
    labels: Vec<LabelInstance>,
    /// Set while labels are being built; ticks are dropped meanwhile.
    loading: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl<S: RenderSurface, L: FontLoader> FaceSession<S, L> {
    pub fn new(
        catalog: Catalog,
        last_face: LastFace,
        surface: S,
        font_loader: L,
        sampler: Sampler,
        handle: EngineHandle,
        options: SessionOptions,
    ) -> Self {
        let current = catalog.first().to_string();
        Self {
            catalog,
            last_face,
            surface,
            fonts: FontCache::new(font_loader),
            sampler,
            options,
            handle,
            state: SessionState::Idle,
            current,
            shown: None,
            labels: Vec::new(),
            loading: Arc::new(AtomicBool::new(false)),
            ticker: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn fonts(&self) -> &FontCache<L> {
        &self.fonts
    }

    pub fn labels(&self) -> &[LabelInstance] {
        &self.labels
    }

    /// Select the starting face, queue its load and start the tick scheduler.
    pub fn start(&mut self) {
        self.current = self.initial_face();
        tracing::info!(face = %self.current, faces = self.catalog.len(), "session starting");
        self.handle.send(FaceMessage::LoadFace);
        self.ticker = Some(spawn_ticker(
            self.handle.clone(),
            self.options.tick,
            self.loading.clone(),
        ));
    }

    /// Start, then consume messages until `Terminate`.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<FaceMessage>) {
        self.start();
        while let Some(msg) = rx.recv().await {
            if self.handle_message(msg).await.is_break() {
                break;
            }
        }
    }

    /// Process one message to completion.
    pub async fn handle_message(&mut self, msg: FaceMessage) -> ControlFlow<()> {
        if self.state == SessionState::Terminated {
            return ControlFlow::Break(());
        }
        match msg {
            FaceMessage::LoadFace => self.load().await,
            FaceMessage::Tick => self.tick(),
            FaceMessage::Cleanup => self.cleanup(),
            FaceMessage::Navigate(direction) => self.navigate(direction),
            FaceMessage::Terminate => {
                self.terminate();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn initial_face(&self) -> String {
        match self.last_face.get() {
            Some(name) if self.catalog.contains(&name) => name,
            stale => {
                if let Some(name) = stale {
                    tracing::info!(face = %name, "persisted face no longer installed");
                }
                let first = self.catalog.first().to_string();
                self.persist(&first);
                first
            }
        }
    }

    fn persist(&self, name: &str) {
        if let Err(e) = self.last_face.set(name) {
            tracing::error!(face = name, error = %e, "failed to persist last face");
        }
    }

    /// Build the current face. A descriptor error leaves the surface empty
    /// and the session idle.
    async fn load(&mut self) {
        // Never build on top of a previous face.
        self.cleanup();
        self.state = SessionState::Loading;

        let name = self.current.clone();
        let face_dir = self.catalog.face_dir(&name);
        let descriptor = match FaceDescriptor::parse_dir(&face_dir) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(face = %name, error = %e, "failed to load face");
                self.state = SessionState::Idle;
                return;
            }
        };

        self.loading.store(true, Ordering::Release);
        self.shown = Some(name.clone());

        let container =
            build_background(&mut self.surface, descriptor.background.as_ref(), &face_dir);
        for spec in &descriptor.labels {
            let label = build_label(
                &mut self.surface,
                &mut self.fonts,
                container,
                spec,
                &self.options.fonts_dir,
            );
            self.labels.push(label);
            // Font loads can be slow; let the scheduler and input run between labels.
            tokio::task::yield_now().await;
        }

        self.loading.store(false, Ordering::Release);
        self.state = SessionState::Loaded;
        tracing::info!(
            face = %name,
            labels = self.labels.len(),
            fonts = self.fonts.len(),
            "face loaded"
        );
    }

    fn tick(&mut self) {
        if self.state != SessionState::Loaded || self.loading.load(Ordering::Acquire) {
            tracing::trace!(state = ?self.state, "tick dropped");
            return;
        }
        let sample = self.sampler.sample();
        let mut updated = 0usize;
        for label in &mut self.labels {
            if label.refresh(&mut self.surface, &sample) {
                updated += 1;
            }
        }
        if updated > 0 {
            tracing::debug!(updated, "labels refreshed");
        }
    }

    /// Tear down the shown face. No-op when nothing is shown.
    fn cleanup(&mut self) {
        let Some(face) = self.shown.take() else {
            return;
        };
        self.state = SessionState::CleaningUp;

        // Widgets go first: they may still reference the fonts freed below.
        self.surface.clear();
        self.labels.clear();
        self.fonts.release_all();

        self.state = SessionState::Idle;
        tracing::info!(face = %face, "face cleaned up");
    }

    fn navigate(&mut self, direction: Direction) {
        let next = self.catalog.neighbor(&self.current, direction).to_string();
        tracing::info!(from = %self.current, to = %next, ?direction, "navigating");
        self.current = next;
        if self.options.persist_on_navigate {
            self.persist(&self.current);
        }
        self.handle.send(FaceMessage::Cleanup);
        self.handle.send(FaceMessage::LoadFace);
    }

    fn terminate(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if self.last_face.get().as_deref() != Some(self.current.as_str()) {
            self.persist(&self.current);
        }
        self.cleanup();
        self.state = SessionState::Terminated;
        tracing::info!(face = %self.current, "session terminated");
    }
}
