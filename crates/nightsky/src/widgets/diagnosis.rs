use crate::content::DIAGNOSIS_RESULTS;
use crate::timeline::Timeline;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::time::Duration;
use thiserror::Error;

pub const FADE_IN_AT: Duration = Duration::from_millis(100);
pub const FADE_OUT_AT: Duration = Duration::from_millis(3000);
pub const INTRO_DURATION: Duration = Duration::from_millis(4500);
pub const PROCESSING_DURATION: Duration = Duration::from_millis(4500);

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("Microphone unavailable: {0}")]
    MicrophoneUnavailable(String),
}

/// Live input level, `0..=255` like a byte spectrum average.
pub trait LevelMeter {
    fn level(&self) -> f32;
}

/// Opens an input stream. Dropping the returned meter stops capture.
pub trait Microphone {
    fn open(&self) -> Result<Box<dyn LevelMeter>, DiagnosisError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroFade {
    Hidden,
    FadingIn,
    FadingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisPhase {
    Intro(IntroFade),
    Idle,
    Recording,
    Processing,
    Result(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagnosisEvent {
    FadeIn,
    FadeOut,
    IntroDone,
    Diagnose(&'static str),
}

pub struct Diagnosis {
    phase: DiagnosisPhase,
    meter: Option<Box<dyn LevelMeter>>,
    level: f32,
    timeline: Timeline<DiagnosisEvent>,
}

impl Default for Diagnosis {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnosis {
    pub fn new() -> Self {
        let mut timeline = Timeline::new();
        timeline.after(FADE_IN_AT, DiagnosisEvent::FadeIn);
        timeline.after(FADE_OUT_AT, DiagnosisEvent::FadeOut);
        timeline.after(INTRO_DURATION, DiagnosisEvent::IntroDone);
        Self {
            phase: DiagnosisPhase::Intro(IntroFade::Hidden),
            meter: None,
            level: 0.0,
            timeline,
        }
    }

    pub fn phase(&self) -> DiagnosisPhase {
        self.phase
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn scale(&self) -> f64 {
        1.0 + f64::from(self.level) / 100.0
    }

    /// Starts listening. On failure the phase stays where it was.
    pub fn press(&mut self, mic: &dyn Microphone) -> Result<(), DiagnosisError> {
        if self.phase != DiagnosisPhase::Idle {
            return Ok(());
        }
        self.meter = Some(mic.open()?);
        self.phase = DiagnosisPhase::Recording;
        log::debug!("Diagnosis recording");
        Ok(())
    }

    /// Stops listening and schedules the verdict.
    pub fn release(&mut self, rng: &mut impl Rng) {
        if self.phase != DiagnosisPhase::Recording {
            return;
        }
        self.meter = None;
        self.level = 0.0;
        self.phase = DiagnosisPhase::Processing;
        let verdict = DIAGNOSIS_RESULTS.choose(rng).copied().unwrap_or_default();
        self.timeline
            .after(PROCESSING_DURATION, DiagnosisEvent::Diagnose(verdict));
    }

    pub fn sample(&mut self) -> f32 {
        if let Some(meter) = &self.meter {
            self.level = meter.level().clamp(0.0, 255.0);
        }
        self.level
    }

    pub fn advance(&mut self, dt: Duration) {
        for event in self.timeline.advance(dt) {
            self.phase = match event {
                DiagnosisEvent::FadeIn => DiagnosisPhase::Intro(IntroFade::FadingIn),
                DiagnosisEvent::FadeOut => DiagnosisPhase::Intro(IntroFade::FadingOut),
                DiagnosisEvent::IntroDone => DiagnosisPhase::Idle,
                DiagnosisEvent::Diagnose(verdict) => DiagnosisPhase::Result(verdict),
            };
        }
        if self.meter.is_some() {
            self.sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedMeter(Rc<Cell<f32>>);

    impl LevelMeter for FixedMeter {
        fn level(&self) -> f32 {
            self.0.get()
        }
    }

    struct FakeMic {
        level: Rc<Cell<f32>>,
        allowed: bool,
    }

    impl Microphone for FakeMic {
        fn open(&self) -> Result<Box<dyn LevelMeter>, DiagnosisError> {
            if !self.allowed {
                return Err(DiagnosisError::MicrophoneUnavailable("denied".into()));
            }
            Ok(Box::new(FixedMeter(self.level.clone())))
        }
    }

    fn mic(allowed: bool) -> FakeMic {
        FakeMic {
            level: Rc::new(Cell::new(0.0)),
            allowed,
        }
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_intro_sequence() {
        let mut diagnosis = Diagnosis::new();
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Intro(IntroFade::Hidden));
        diagnosis.advance(ms(100));
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Intro(IntroFade::FadingIn));
        diagnosis.advance(ms(2900));
        assert_eq!(
            diagnosis.phase(),
            DiagnosisPhase::Intro(IntroFade::FadingOut)
        );
        diagnosis.advance(ms(1500));
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Idle);
    }

    #[test]
    fn test_press_ignored_during_intro() {
        let mut diagnosis = Diagnosis::new();
        diagnosis.press(&mic(true)).unwrap();
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Intro(IntroFade::Hidden));
    }

    #[test]
    fn test_denied_microphone_keeps_phase() {
        let mut diagnosis = Diagnosis::new();
        diagnosis.advance(INTRO_DURATION);
        let err = diagnosis.press(&mic(false)).unwrap_err();
        assert!(matches!(err, DiagnosisError::MicrophoneUnavailable(_)));
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Idle);
    }

    #[test]
    fn test_recording_to_result() {
        let mut rng = StdRng::seed_from_u64(4);
        let mic = mic(true);
        let mut diagnosis = Diagnosis::new();
        diagnosis.advance(INTRO_DURATION);

        diagnosis.press(&mic).unwrap();
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Recording);
        mic.level.set(150.0);
        diagnosis.advance(ms(16));
        assert!((diagnosis.scale() - 2.5).abs() < 1e-6);

        diagnosis.release(&mut rng);
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Processing);
        assert_eq!(diagnosis.scale(), 1.0);
        diagnosis.advance(ms(4499));
        assert_eq!(diagnosis.phase(), DiagnosisPhase::Processing);
        diagnosis.advance(ms(1));
        match diagnosis.phase() {
            DiagnosisPhase::Result(text) => assert!(DIAGNOSIS_RESULTS.contains(&text)),
            other => panic!("unexpected phase {other:?}"),
        }
    }
}
