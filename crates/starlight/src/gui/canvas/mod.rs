pub mod view;

pub use view::{draw_breathing, draw_diagnosis, draw_hug, draw_scratch, draw_sky};

pub const STAR_RADIUS: f64 = 1.6;
pub const MESSAGE_STAR_RADIUS: f64 = 2.4;
pub const LIT_GLOW_RADIUS: f64 = 18.0;
pub const FADING_GLOW_RADIUS: f64 = 10.0;
pub const LETTER_RADIUS: f64 = 2.2;
pub const LETTER_GLOW_RADIUS: f64 = 9.0;
pub const PATH_WIDTH: f64 = 1.4;

pub const FLIGHT_ORIGIN: (f64, f64) = (50.0, 92.0);

pub const HEART_SIZE: f64 = 60.0;
pub const BREATH_MIN_RADIUS: f64 = 40.0;
pub const BREATH_MAX_RADIUS: f64 = 90.0;
pub const DIAGNOSIS_RADIUS: f64 = 42.0;
