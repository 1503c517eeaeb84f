//! Message plumbing between input, the tick scheduler and the face session.
//!
//! Everything that mutates the face goes through one unbounded channel and
//! is consumed in order by the session loop on a single task. That ordering
//! is the only synchronization: a `Cleanup` queued before a `LoadFace` is
//! fully processed before the load starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use watchface_core::{Direction, Intent};

/// The closed set of session messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMessage {
    /// Load the session's current face.
    LoadFace,
    /// Re-evaluate label templates.
    Tick,
    /// Tear down the loaded face.
    Cleanup,
    Navigate(Direction),
    Terminate,
}

impl From<Intent> for FaceMessage {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Navigate(direction) => FaceMessage::Navigate(direction),
            Intent::Exit => FaceMessage::Terminate,
        }
    }
}

/// Clone-safe sender into the session loop.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<FaceMessage>,
}

impl EngineHandle {
    pub fn new(tx: mpsc::UnboundedSender<FaceMessage>) -> Self {
        Self { tx }
    }

    /// Queue a message. Returns `false` once the session has shut down.
    pub fn send(&self, msg: FaceMessage) -> bool {
        self.tx.send(msg).is_ok()
    }

    pub fn terminate(&self) -> bool {
        self.send(FaceMessage::Terminate)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create the session channel.
pub fn channel() -> (EngineHandle, mpsc::UnboundedReceiver<FaceMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EngineHandle::new(tx), rx)
}

/// Publish a `Tick` every `period` until aborted or the session goes away.
///
/// While `busy` is set (a face is loading or being torn down) ticks are
/// dropped instead of queued, and missed periods are skipped rather than
/// replayed in a burst.
pub fn spawn_ticker(handle: EngineHandle, period: Duration, busy: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if busy.load(Ordering::Acquire) {
                tracing::trace!("tick dropped: face busy");
                continue;
            }
            if !handle.send(FaceMessage::Tick) {
                tracing::debug!("session closed; ticker exiting");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_mapping() {
        assert_eq!(
            FaceMessage::from(Intent::Navigate(Direction::Next)),
            FaceMessage::Navigate(Direction::Next)
        );
        assert_eq!(FaceMessage::from(Intent::Exit), FaceMessage::Terminate);
    }

    #[test]
    fn test_send_after_close() {
        let (handle, rx) = channel();
        assert!(handle.send(FaceMessage::Tick));
        drop(rx);
        assert!(handle.is_closed());
        assert!(!handle.terminate());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_ticks() {
        let (handle, mut rx) = channel();
        let busy = Arc::new(AtomicBool::new(false));
        let ticker = spawn_ticker(handle, Duration::from_millis(100), busy);

        assert_eq!(rx.recv().await, Some(FaceMessage::Tick));
        assert_eq!(rx.recv().await, Some(FaceMessage::Tick));
        ticker.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_drops_ticks_while_busy() {
        let (handle, mut rx) = channel();
        let busy = Arc::new(AtomicBool::new(true));
        let ticker = spawn_ticker(handle, Duration::from_millis(100), busy.clone());

        tokio::time::sleep(Duration::from_millis(550)).await;
        assert!(rx.try_recv().is_err());

        busy.store(false, Ordering::Release);
        assert_eq!(rx.recv().await, Some(FaceMessage::Tick));
        ticker.abort();
        let _ = ticker.await;
        while let Ok(msg) = rx.try_recv() {
            assert_eq!(msg, FaceMessage::Tick);
        }
    }
}
