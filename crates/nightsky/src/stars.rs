use crate::content;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct StarId(u32);

impl StarId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A point on the sky in percent of the viewport (0..=100 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pixels(self, width: f64, height: f64) -> (f64, f64) {
        (self.x / 100.0 * width, self.y / 100.0 * height)
    }

    pub fn from_pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self::new(x / width * 100.0, y / height * 100.0)
    }

    /// Distance in pixels between two sky positions on a viewport of the given size.
    pub fn pixel_distance(self, other: Position, width: f64, height: f64) -> f64 {
        let (ax, ay) = self.to_pixels(width, height);
        let (bx, by) = other.to_pixels(width, height);
        (ax - bx).hypot(ay - by)
    }
}

/// What sits behind a message-bearing star besides its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Feature {
    Plain,
    Fireworks,
    Bored,
    Hug,
    Secret,
    Breathing,
    Scratch,
    CourageAudio,
    Praise,
    Diagnosis,
    Letter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarMessage {
    pub label: &'static str,
    pub body: &'static str,
    pub feature: Feature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: StarId,
    pub position: Position,
    pub message: Option<StarMessage>,
}

impl Star {
    pub fn is_message_bearing(&self) -> bool {
        self.message.is_some()
    }

    pub fn feature(&self) -> Option<Feature> {
        self.message.as_ref().map(|m| m.feature)
    }
}

/// The fixed set of stars shown on the sky, in declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    stars: Vec<Star>,
}

impl Catalog {
    pub fn new(stars: Vec<Star>) -> Self {
        Self { stars }
    }

    pub fn builtin() -> Self {
        Self::new(content::stars())
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn get(&self, id: StarId) -> Option<&Star> {
        self.stars.iter().find(|s| s.id == id)
    }

    pub fn message_bearing(&self) -> Vec<StarId> {
        self.stars
            .iter()
            .filter(|s| s.is_message_bearing())
            .map(|s| s.id)
            .collect()
    }

    pub fn path(&self, ids: &[StarId]) -> Vec<Position> {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(|s| s.position)
            .collect()
    }

    /// Nearest star accepted by `filter` within `radius` pixels of `point`.
    pub fn nearest(
        &self,
        point: Position,
        width: f64,
        height: f64,
        radius: f64,
        filter: impl Fn(&Star) -> bool,
    ) -> Option<StarId> {
        self.stars
            .iter()
            .filter(|s| filter(s))
            .map(|s| (s.id, s.position.pixel_distance(point, width, height)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_message_bearing_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<u32> = catalog
            .message_bearing()
            .into_iter()
            .map(u32::from)
            .collect();
        assert_eq!(ids, vec![5, 6, 7, 9, 11, 12, 13, 15, 16, 17]);
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<_> = catalog.stars().iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.stars().len());
    }

    #[test]
    fn test_nearest_respects_radius_and_filter() {
        let catalog = Catalog::new(vec![
            Star {
                id: StarId::new(1),
                position: Position::new(10.0, 10.0),
                message: None,
            },
            Star {
                id: StarId::new(2),
                position: Position::new(12.0, 10.0),
                message: None,
            },
        ]);

        let probe = Position::new(11.6, 10.0);
        assert_eq!(
            catalog.nearest(probe, 1000.0, 1000.0, 20.0, |_| true),
            Some(StarId::new(2))
        );
        assert_eq!(
            catalog.nearest(probe, 1000.0, 1000.0, 20.0, |s| s.id == StarId::new(1)),
            Some(StarId::new(1))
        );
        assert_eq!(catalog.nearest(probe, 1000.0, 1000.0, 2.0, |_| true), None);
    }

    #[test]
    fn test_position_pixel_round_trip_handles_empty_viewport() {
        assert_eq!(
            Position::from_pixels(50.0, 50.0, 0.0, 100.0),
            Position::default()
        );
        let p = Position::from_pixels(200.0, 50.0, 400.0, 100.0);
        assert_eq!(p, Position::new(50.0, 50.0));
    }
}
