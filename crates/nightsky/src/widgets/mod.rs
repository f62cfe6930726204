//! Self-contained effect widgets. Each owns its own timers and is dropped
//! when its panel closes.

pub mod audio;
pub mod balance;
pub mod breathing;
pub mod carousel;
pub mod diagnosis;
pub mod fireworks;
pub mod hug;
pub mod praise;
pub mod scratch;

pub use audio::AudioStatus;
pub use balance::{BalanceGame, Side};
pub use breathing::{BreathPhase, BreathingPacer};
pub use carousel::{Carousel, Swipe};
pub use diagnosis::{
    Diagnosis, DiagnosisError, DiagnosisPhase, IntroFade, LevelMeter, Microphone,
};
pub use fireworks::{Particle, ParticleBurst};
pub use hug::{Haptics, HoldGesture, HoldState};
pub use praise::{PraisePicker, PraiseTopic};
pub use scratch::ScratchCard;
