//! Night sky greeting core: stars, highlighting, the modal scene, star
//! letters and the effect widgets. Nothing here touches a toolkit; the
//! frontend drives everything through [`Sky`].

#[macro_use]
mod macros;

pub mod constellation;
pub mod content;
pub mod cycler;
pub mod letters;
pub mod scene;
pub mod sky;
pub mod stars;
pub mod timeline;
pub mod widgets;

pub use constellation::{ConstellationPlan, MonthDay, SeasonWindow};
pub use cycler::Timing;
pub use scene::{Overlay, Panel, ResetOutcome, Scene};
pub use sky::{Highlighter, MessageWidget, PanelWidget, SeasonMode, Sky, SkyOptions};
pub use stars::{Catalog, Feature, Position, Star, StarId};
