//! Touch input classification.
//!
//! The touch toolkit reports a swipe as a gesture event *and* a click for
//! the same physical interaction. The router remembers that a gesture just
//! happened and swallows the click that follows it, so a swipe never also
//! triggers the tap-to-exit path.

/// Navigation direction through the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

/// Swipe direction as reported by the touch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureDir {
    Left,
    Right,
    Up,
    Down,
}

/// Raw input from the touch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Tap { x: i32, y: i32 },
    Gesture(GestureDir),
}

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Navigate(Direction),
    Exit,
}

pub const DEFAULT_MARGIN_PERCENT: u32 = 20;

/// Turns taps and swipes into navigation/exit intents.
#[derive(Debug, Clone)]
pub struct InputRouter {
    width: u32,
    margin_percent: u32,
    gesture_in_progress: bool,
}

impl InputRouter {
    /// `width` is the surface width in pixels; `margin_percent` of it on each
    /// side is the previous/next tap zone.
    pub fn new(width: u32, margin_percent: u32) -> Self {
        Self {
            width,
            margin_percent: margin_percent.min(50),
            gesture_in_progress: false,
        }
    }

    pub fn route(&mut self, event: InputEvent) -> Option<Intent> {
        match event {
            InputEvent::Tap { x, .. } => self.on_tap(x),
            InputEvent::Gesture(dir) => self.on_gesture(dir),
        }
    }

    /// Classify a tap at horizontal position `x`.
    ///
    /// Returns `None` when the tap is the trailing half of a swipe.
    pub fn on_tap(&mut self, x: i32) -> Option<Intent> {
        if self.gesture_in_progress {
            self.gesture_in_progress = false;
            tracing::trace!(x, "tap swallowed after gesture");
            return None;
        }

        let w = self.width as i64;
        let margin = w * self.margin_percent as i64 / 100;
        let x = x as i64;
        let intent = if x < margin {
            Intent::Navigate(Direction::Previous)
        } else if x > w - margin {
            Intent::Navigate(Direction::Next)
        } else {
            Intent::Exit
        };
        Some(intent)
    }

    /// Classify a swipe. Vertical swipes arm the tap filter but do nothing else.
    pub fn on_gesture(&mut self, dir: GestureDir) -> Option<Intent> {
        self.gesture_in_progress = true;
        match dir {
            GestureDir::Left => Some(Intent::Navigate(Direction::Next)),
            GestureDir::Right => Some(Intent::Navigate(Direction::Previous)),
            GestureDir::Up | GestureDir::Down => None,
        }
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.gesture_in_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_zones() {
        let mut r = InputRouter::new(240, DEFAULT_MARGIN_PERCENT);
        // margin = 48px
        assert_eq!(r.on_tap(10), Some(Intent::Navigate(Direction::Previous)));
        assert_eq!(r.on_tap(47), Some(Intent::Navigate(Direction::Previous)));
        assert_eq!(r.on_tap(48), Some(Intent::Exit));
        assert_eq!(r.on_tap(120), Some(Intent::Exit));
        assert_eq!(r.on_tap(192), Some(Intent::Exit));
        assert_eq!(r.on_tap(193), Some(Intent::Navigate(Direction::Next)));
        assert_eq!(r.on_tap(239), Some(Intent::Navigate(Direction::Next)));
    }

    #[test]
    fn test_swipes() {
        let mut r = InputRouter::new(240, 20);
        assert_eq!(r.on_gesture(GestureDir::Left), Some(Intent::Navigate(Direction::Next)));
        r.on_tap(0);
        assert_eq!(r.on_gesture(GestureDir::Right), Some(Intent::Navigate(Direction::Previous)));
    }

    #[test]
    fn test_tap_after_gesture_is_swallowed_once() {
        let mut r = InputRouter::new(240, 20);
        r.route(InputEvent::Gesture(GestureDir::Left));
        assert!(r.gesture_in_progress());
        assert_eq!(r.route(InputEvent::Tap { x: 120, y: 120 }), None);
        assert!(!r.gesture_in_progress());
        assert_eq!(r.route(InputEvent::Tap { x: 120, y: 120 }), Some(Intent::Exit));
    }

    #[test]
    fn test_vertical_swipe_arms_filter() {
        let mut r = InputRouter::new(240, 20);
        assert_eq!(r.on_gesture(GestureDir::Up), None);
        assert_eq!(r.on_tap(120), None);
    }

    #[test]
    fn test_custom_margin() {
        let mut r = InputRouter::new(200, 10);
        assert_eq!(r.on_tap(19), Some(Intent::Navigate(Direction::Previous)));
        assert_eq!(r.on_tap(20), Some(Intent::Exit));
        assert_eq!(r.on_tap(181), Some(Intent::Navigate(Direction::Next)));
    }
}
