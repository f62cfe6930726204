use crate::timeline::{Timeline, TimerId};
use std::time::Duration;

pub const HOLD_TICK: Duration = Duration::from_millis(100);
/// Ticks of [`HOLD_TICK`] needed to complete the hug (3 seconds).
pub const HOLD_TICKS: u32 = 30;
pub const FINISH_DELAY: Duration = Duration::from_millis(800);
/// Vibration pattern in milliseconds: on, off, on.
pub const VIBRATION: [u64; 3] = [70, 100, 70];

/// Vibration capability. Platforms without a motor simply do nothing.
pub trait Haptics {
    fn vibrate(&self, pattern: &[u64]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldState {
    Waiting,
    Holding,
    /// Full hold reached; the burst plays before the finish text.
    Completed,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldEvent {
    Tick,
    Finish,
}

#[derive(Debug, Clone)]
pub struct HoldGesture {
    state: HoldState,
    ticks: u32,
    ticker: Option<TimerId>,
    timeline: Timeline<HoldEvent>,
}

impl Default for HoldGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldGesture {
    pub fn new() -> Self {
        Self {
            state: HoldState::Waiting,
            ticks: 0,
            ticker: None,
            timeline: Timeline::new(),
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Held time in seconds.
    pub fn progress(&self) -> f64 {
        f64::from(self.ticks) * HOLD_TICK.as_secs_f64()
    }

    pub fn scale(&self) -> f64 {
        1.0 + self.progress() * 0.6
    }

    pub fn press(&mut self) {
        if self.state != HoldState::Waiting {
            return;
        }
        self.state = HoldState::Holding;
        self.ticks = 0;
        self.ticker = Some(self.timeline.every(HOLD_TICK, HoldEvent::Tick));
    }

    /// Letting go early throws the progress away.
    pub fn release(&mut self) {
        if self.state != HoldState::Holding {
            return;
        }
        if let Some(id) = self.ticker.take() {
            self.timeline.cancel(id);
        }
        self.state = HoldState::Waiting;
        self.ticks = 0;
    }

    /// Returns how many vibration pulses are due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let until = self.timeline.now() + dt;
        let mut pulses = 0;
        while let Some(event) = self.timeline.poll(until) {
            match event {
                HoldEvent::Tick => {
                    pulses += 1;
                    self.ticks += 1;
                    if self.ticks >= HOLD_TICKS {
                        if let Some(id) = self.ticker.take() {
                            self.timeline.cancel(id);
                        }
                        log::debug!("Hug completed");
                        self.state = HoldState::Completed;
                        self.timeline.after(FINISH_DELAY, HoldEvent::Finish);
                    }
                }
                HoldEvent::Finish => self.state = HoldState::Finished,
            }
        }
        self.timeline.settle(until);
        pulses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_hold_completes_after_three_seconds() {
        let mut hug = HoldGesture::new();
        hug.press();
        assert_eq!(hug.advance(ms(2900)), 29);
        assert_eq!(hug.state(), HoldState::Holding);
        assert_eq!(hug.advance(ms(100)), 1);
        assert_eq!(hug.state(), HoldState::Completed);
        assert!((hug.scale() - 2.8).abs() < 1e-9);

        // No more pulses once complete; the finish text follows.
        assert_eq!(hug.advance(ms(799)), 0);
        assert_eq!(hug.state(), HoldState::Completed);
        hug.advance(ms(1));
        assert_eq!(hug.state(), HoldState::Finished);
    }

    #[test]
    fn test_early_release_resets() {
        let mut hug = HoldGesture::new();
        hug.press();
        hug.advance(ms(2950));
        hug.release();
        assert_eq!(hug.state(), HoldState::Waiting);
        assert_eq!(hug.progress(), 0.0);
        assert_eq!(hug.advance(ms(5000)), 0);
        assert_eq!(hug.state(), HoldState::Waiting);
    }

    #[test]
    fn test_release_after_completion_is_ignored() {
        let mut hug = HoldGesture::new();
        hug.press();
        hug.advance(ms(3000));
        hug.release();
        assert_eq!(hug.state(), HoldState::Completed);
        hug.press();
        assert_eq!(hug.state(), HoldState::Completed);
    }
}
