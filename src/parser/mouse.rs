//! Click-count tracking for SGR mouse reports
//!
//! Consecutive presses that arrive within [`CLICK_WINDOW`] of each other are
//! promoted to double and triple clicks. A drag that is not part of a click
//! sequence, or a pause longer than the window, starts counting again.

use std::time::{Duration, Instant};

use super::event::{MouseEvent, MouseKind};

/// Maximum gap between presses of one multi-click
pub const CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Button bits of an SGR mouse report
const BUTTON_MASK: u16 = 0b11;
const MOTION_BIT: u16 = 32;
const WHEEL_BIT: u16 = 64;

/// Tracks the click sequence across reports
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_press: Option<Instant>,
    count: u8,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of presses in the running sequence
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Classify one SGR report `ESC [ < button ; col ; row (M|m)`
    pub fn classify(
        &mut self,
        button: u16,
        col: u16,
        row: u16,
        pressed: bool,
        now: Instant,
    ) -> Option<MouseEvent> {
        let kind = if button & WHEEL_BIT != 0 {
            match button & BUTTON_MASK {
                0 => MouseKind::WheelUp,
                1 => MouseKind::WheelDown,
                _ => return None,
            }
        } else if !pressed {
            MouseKind::Up
        } else if button & MOTION_BIT != 0 {
            self.drag(now)
        } else if button & BUTTON_MASK == 0 {
            self.press(now)
        } else {
            // Middle and right buttons are not used
            return None;
        };

        Some(MouseEvent { kind, col, row })
    }

    fn expired(&self, now: Instant) -> bool {
        self.last_press
            .map_or(true, |at| now.saturating_duration_since(at) > CLICK_WINDOW)
    }

    fn press(&mut self, now: Instant) -> MouseKind {
        if self.expired(now) {
            self.count = 0;
        }
        self.count += 1;
        self.last_press = Some(now);

        match self.count {
            1 => MouseKind::Down,
            2 => MouseKind::DoubleClick,
            _ => {
                self.count = 0;
                self.last_press = None;
                MouseKind::TripleClick
            }
        }
    }

    fn drag(&mut self, now: Instant) -> MouseKind {
        // A drag ends any click sequence once it leaves the window
        if self.expired(now) {
            self.count = 0;
            self.last_press = None;
        }
        MouseKind::Drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(tracker: &mut ClickTracker, button: u16, pressed: bool, at: Instant) -> MouseKind {
        tracker.classify(button, 10, 5, pressed, at).unwrap().kind
    }

    #[test]
    fn test_click_sequence() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        assert_eq!(kind(&mut tracker, 0, true, t0), MouseKind::Down);
        assert_eq!(kind(&mut tracker, 0, false, t0 + ms(50)), MouseKind::Up);
        assert_eq!(kind(&mut tracker, 0, true, t0 + ms(100)), MouseKind::DoubleClick);
        assert_eq!(kind(&mut tracker, 0, true, t0 + ms(200)), MouseKind::TripleClick);
        assert_eq!(kind(&mut tracker, 0, true, t0 + ms(300)), MouseKind::Down);
    }

    #[test]
    fn test_click_window_timeout() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();

        assert_eq!(kind(&mut tracker, 0, true, t0), MouseKind::Down);
        assert_eq!(
            kind(&mut tracker, 0, true, t0 + Duration::from_millis(401)),
            MouseKind::Down
        );
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn test_late_drag_resets_count() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();

        assert_eq!(kind(&mut tracker, 0, true, t0), MouseKind::Down);
        assert_eq!(
            kind(&mut tracker, 32, true, t0 + Duration::from_millis(500)),
            MouseKind::Drag
        );
        assert_eq!(tracker.count(), 0);
        assert_eq!(
            kind(&mut tracker, 0, true, t0 + Duration::from_millis(550)),
            MouseKind::Down
        );
    }

    #[test]
    fn test_wheel_and_other_buttons() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();

        assert_eq!(kind(&mut tracker, 64, true, t0), MouseKind::WheelUp);
        assert_eq!(kind(&mut tracker, 65, true, t0), MouseKind::WheelDown);
        assert_eq!(tracker.classify(2, 1, 1, true, t0), None);
        assert_eq!(tracker.count(), 0);
    }
}
