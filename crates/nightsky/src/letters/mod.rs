//! Star letters: short notes the visitor launches into the sky.

pub mod composer;
pub mod store;

pub use composer::{Composer, LetterText, LineModel, MAX_COMPOSER_HEIGHT, TextMeasure};
pub use store::{JsonFileStore, LetterStore, MemoryStore, STORAGE_KEY, StorageError};

use crate::stars::Position;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

pub const FLIGHT_DURATION: Duration = Duration::from_millis(800);

/// Landing area in viewport percent, kept clear of the edges.
pub const LANDING_X: Range<f64> = 8.0..93.0;
pub const LANDING_Y: Range<f64> = 8.0..63.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStar {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub message: String,
}

impl UserStar {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub target: Position,
    pub message: LetterText,
}

pub struct LetterBoard {
    stars: Vec<UserStar>,
    composer: Composer,
    flight: Option<Flight>,
    store: Box<dyn LetterStore>,
}

impl LetterBoard {
    /// Loads earlier letters. Unreadable storage counts as empty.
    pub fn open(store: Box<dyn LetterStore>) -> Self {
        let stars = match store.load() {
            Ok(Some(stars)) => stars,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Ignoring stored star letters: {}", e);
                Vec::new()
            }
        };
        log::debug!("Loaded {} star letters", stars.len());
        Self {
            stars,
            composer: Composer::default(),
            flight: None,
            store,
        }
    }

    pub fn stars(&self) -> &[UserStar] {
        &self.stars
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn edit(&mut self, text: &str, measure: &dyn TextMeasure) -> bool {
        if self.flight.is_some() {
            return false;
        }
        self.composer.edit(text, measure)
    }

    pub fn flight(&self) -> Option<&Flight> {
        self.flight.as_ref()
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Starts the flight for the current text. Blank text does nothing.
    pub fn submit(&mut self, rng: &mut impl Rng) -> Option<&Flight> {
        if self.flight.is_some() || self.composer.is_blank() {
            return None;
        }
        let target = Position::new(rng.random_range(LANDING_X), rng.random_range(LANDING_Y));
        self.flight = Some(Flight {
            target,
            message: self.composer.take(),
        });
        self.flight.as_ref()
    }

    /// Turns the flight into a persisted star. Ids stay strictly increasing
    /// even if the clock does not.
    pub fn land(&mut self, id: i64) -> Option<&UserStar> {
        let flight = self.flight.take()?;
        let id = match self.stars.last() {
            Some(last) if last.id >= id => last.id + 1,
            _ => id,
        };
        self.stars.push(UserStar {
            id,
            x: flight.target.x,
            y: flight.target.y,
            message: flight.message.into(),
        });
        if let Err(e) = self.store.save(&self.stars) {
            log::error!("Failed to save star letters: {}", e);
        }
        self.stars.last()
    }

    pub fn collect(&mut self) -> usize {
        let count = self.stars.len();
        self.stars.clear();
        self.composer.clear();
        if let Err(e) = self.store.clear() {
            log::error!("Failed to clear star letters: {}", e);
        }
        log::info!("Collected {} star letters", count);
        count
    }

    pub fn close_composer(&mut self) {
        self.composer.clear();
    }

    pub fn star_at(
        &self,
        point: Position,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Option<&UserStar> {
        self.stars
            .iter()
            .map(|s| (s, s.position().pixel_distance(point, width, height)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(store: &MemoryStore) -> LetterBoard {
        LetterBoard::open(Box::new(store.clone()))
    }

    fn write(board: &mut LetterBoard, text: &str) {
        assert!(board.edit(text, &LineModel::default()));
    }

    #[test]
    fn test_blank_letters_are_not_sent() {
        let store = MemoryStore::new();
        let mut board = board(&store);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(board.submit(&mut rng).is_none());
        write(&mut board, "   \n ");
        assert!(board.submit(&mut rng).is_none());
        assert!(board.land(1).is_none());
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn test_blank_letter_keeps_saved_stars() {
        let store = MemoryStore::new();
        let mut board = board(&store);
        let mut rng = StdRng::seed_from_u64(11);
        write(&mut board, "first");
        board.submit(&mut rng);
        board.land(1);
        let saved = store.raw();
        assert!(saved.is_some());

        write(&mut board, "   \n ");
        assert!(board.submit(&mut rng).is_none());
        assert!(board.land(2).is_none());
        assert_eq!(store.raw(), saved);
        assert_eq!(board.stars().len(), 1);
    }

    #[test]
    fn test_sent_letter_survives_reload() {
        let store = MemoryStore::new();
        let mut board = board(&store);
        let mut rng = StdRng::seed_from_u64(42);

        write(&mut board, "Hello");
        let target = board.submit(&mut rng).unwrap().target;
        assert!(LANDING_X.contains(&target.x));
        assert!(LANDING_Y.contains(&target.y));
        assert!(board.composer().is_blank());
        board.land(1_000).unwrap();

        let reloaded = LetterBoard::open(Box::new(store.clone()));
        assert_eq!(reloaded.stars().len(), 1);
        let star = &reloaded.stars()[0];
        assert_eq!(star.message, "Hello");
        assert_eq!(star.position(), target);
    }

    #[test]
    fn test_collect_clears_and_counts() {
        let store = MemoryStore::new();
        let mut board = board(&store);
        let mut rng = StdRng::seed_from_u64(1);
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            write(&mut board, text);
            board.submit(&mut rng);
            board.land(i as i64);
        }
        assert_eq!(board.stars().len(), 3);

        assert_eq!(board.collect(), 3);
        assert!(board.stars().is_empty());
        assert_eq!(store.raw(), None);
        assert!(LetterBoard::open(Box::new(store.clone())).stars().is_empty());
    }

    #[test]
    fn test_malformed_storage_loads_empty() {
        let store = MemoryStore::with_raw("[{\"id\": \"oops\"");
        let board = board(&store);
        assert!(board.stars().is_empty());
    }

    #[test]
    fn test_ids_stay_increasing() {
        let store = MemoryStore::new();
        let mut board = board(&store);
        let mut rng = StdRng::seed_from_u64(3);
        write(&mut board, "one");
        board.submit(&mut rng);
        board.land(500);
        write(&mut board, "two");
        board.submit(&mut rng);
        assert_eq!(board.land(500).unwrap().id, 501);
    }

    #[test]
    fn test_editing_is_locked_while_flying() {
        let store = MemoryStore::new();
        let mut board = board(&store);
        let mut rng = StdRng::seed_from_u64(3);
        write(&mut board, "hi");
        board.submit(&mut rng);
        assert!(board.is_flying());
        assert!(!board.edit("more", &LineModel::default()));
        assert!(board.submit(&mut rng).is_none());
    }
}
