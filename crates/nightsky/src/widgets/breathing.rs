use crate::timeline::Timeline;
use std::time::Duration;
use strum::Display as StrumDisplay;

pub const BREATH_PERIOD: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Exhale,
}

impl BreathPhase {
    fn flip(self) -> Self {
        match self {
            Self::Inhale => Self::Exhale,
            Self::Exhale => Self::Inhale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BreathingPacer {
    phase: BreathPhase,
    timeline: Timeline<()>,
}

impl Default for BreathingPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathingPacer {
    pub fn new() -> Self {
        let mut timeline = Timeline::new();
        timeline.every(BREATH_PERIOD, ());
        Self {
            phase: BreathPhase::Inhale,
            timeline,
        }
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Position inside the current phase, `0..1`.
    pub fn phase_progress(&self) -> f64 {
        let period = BREATH_PERIOD.as_secs_f64();
        (self.timeline.now().as_secs_f64() % period) / period
    }

    pub fn advance(&mut self, dt: Duration) {
        for () in self.timeline.advance(dt) {
            self.phase = self.phase.flip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_alternate() {
        let mut pacer = BreathingPacer::new();
        assert_eq!(pacer.phase(), BreathPhase::Inhale);
        pacer.advance(Duration::from_millis(3999));
        assert_eq!(pacer.phase(), BreathPhase::Inhale);
        pacer.advance(Duration::from_millis(1));
        assert_eq!(pacer.phase(), BreathPhase::Exhale);
        pacer.advance(Duration::from_millis(8000));
        assert_eq!(pacer.phase(), BreathPhase::Exhale);
        assert_eq!(pacer.phase().to_string(), "exhale");
    }
}
