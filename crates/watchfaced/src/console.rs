//! Line-oriented input console.
//!
//! Stands in for the touch panel: each line on stdin is a tap, a swipe or
//! `quit`. Events go through the [`InputRouter`] exactly as panel events
//! would, so margins and the swipe/tap debounce behave the same.
//!
//! ```text
//! tap 12 120
//! swipe left
//! quit
//! ```

use crate::engine::{EngineHandle, FaceMessage};
use std::io::BufRead;
use std::thread::JoinHandle;
use thiserror::Error;
use watchface_core::{GestureDir, InputEvent, InputRouter};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(InputEvent),
    Quit,
}

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "tap" => {
            const USAGE: &str = "tap <x> <y>";
            let [x, y] = rest.as_slice() else {
                return Err(CommandError::Usage(USAGE));
            };
            let x = x.parse().map_err(|_| CommandError::Usage(USAGE))?;
            let y = y.parse().map_err(|_| CommandError::Usage(USAGE))?;
            Command::Input(InputEvent::Tap { x, y })
        }
        "swipe" => {
            const USAGE: &str = "swipe left|right|up|down";
            let [dir] = rest.as_slice() else {
                return Err(CommandError::Usage(USAGE));
            };
            let dir = match dir.to_ascii_lowercase().as_str() {
                "left" => GestureDir::Left,
                "right" => GestureDir::Right,
                "up" => GestureDir::Up,
                "down" => GestureDir::Down,
                _ => return Err(CommandError::Usage(USAGE)),
            };
            Command::Input(InputEvent::Gesture(dir))
        }
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Read commands until EOF or the session goes away.
pub fn run_console<R: BufRead>(reader: R, mut router: InputRouter, handle: EngineHandle) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "console read failed");
                break;
            }
        };

        let msg = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => FaceMessage::Terminate,
            Ok(Some(Command::Input(event))) => match router.route(event) {
                Some(intent) => FaceMessage::from(intent),
                None => {
                    tracing::trace!(?event, "input ignored");
                    continue;
                }
            },
            Err(e) => {
                tracing::warn!(line = %line, error = %e, "bad console command");
                continue;
            }
        };

        tracing::debug!(?msg, "console input");
        if !handle.send(msg) {
            return;
        }
    }
    tracing::debug!("console input closed");
}

/// Read the process stdin on a dedicated thread. Blocking reads never hold
/// up runtime shutdown; the thread dies with the process.
pub fn spawn_console(
    router: InputRouter,
    handle: EngineHandle,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || run_console(std::io::stdin().lock(), router, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use watchface_core::Direction;

    #[test]
    fn test_parse_tap() {
        assert_eq!(
            parse_command("tap 10 200").unwrap(),
            Some(Command::Input(InputEvent::Tap { x: 10, y: 200 }))
        );
        assert_eq!(parse_command("tap 10"), Err(CommandError::Usage("tap <x> <y>")));
        assert!(parse_command("tap a b").is_err());
    }

    #[test]
    fn test_parse_swipe_and_quit() {
        assert_eq!(
            parse_command("  SWIPE Left ").unwrap(),
            Some(Command::Input(InputEvent::Gesture(GestureDir::Left)))
        );
        assert!(parse_command("swipe sideways").is_err());
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(
            parse_command("jump"),
            Err(CommandError::Unknown("jump".to_string()))
        );
    }

    #[test]
    fn test_console_routes_through_router() {
        let (handle, mut rx) = engine::channel();
        let script: &[u8] = b"tap 5 100\nbogus\nswipe left\ntap 120 120\ntap 235 0\nswipe up\nquit\n";
        run_console(script, InputRouter::new(240, 20), handle);

        let mut got = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            got.push(msg);
        }
        // The tap right after the swipe is swallowed by the gesture debounce.
        assert_eq!(
            got,
            vec![
                FaceMessage::Navigate(Direction::Previous),
                FaceMessage::Navigate(Direction::Next),
                FaceMessage::Navigate(Direction::Next),
                FaceMessage::Terminate,
            ]
        );
    }
}
