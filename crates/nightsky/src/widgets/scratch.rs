use crate::content::{SCRATCH_MESSAGES, ScratchMessage};
use rand::Rng;
use rand::seq::IndexedRandom;

pub const CARD_WIDTH: usize = 320;
pub const CARD_HEIGHT: usize = 200;
pub const ERASE_RADIUS: f64 = 20.0;
/// Share of the coating that must be gone before the message counts as seen.
pub const REVEAL_THRESHOLD: f64 = 0.70;

/// A silver coating over a hidden message, tracked one pixel per cell.
#[derive(Debug, Clone)]
pub struct ScratchCard {
    width: usize,
    height: usize,
    mask: Vec<bool>,
    cleared: usize,
    pressed: bool,
    revealed: bool,
    message: &'static ScratchMessage,
}

impl ScratchCard {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self::with_size(CARD_WIDTH, CARD_HEIGHT, rng)
    }

    pub fn with_size(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        Self {
            width,
            height,
            mask: vec![false; width * height],
            cleared: 0,
            pressed: false,
            revealed: false,
            message: SCRATCH_MESSAGES.choose(rng).unwrap_or(&SCRATCH_MESSAGES[0]),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn message(&self) -> &'static ScratchMessage {
        self.message
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn fraction(&self) -> f64 {
        if self.mask.is_empty() {
            return 1.0;
        }
        self.cleared as f64 / self.mask.len() as f64
    }

    pub fn is_cleared(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.mask[y * self.width + x]
    }

    pub fn press(&mut self, x: f64, y: f64) {
        self.pressed = true;
        self.scratch_at(x, y);
    }

    pub fn drag(&mut self, x: f64, y: f64) {
        if self.pressed {
            self.scratch_at(x, y);
        }
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Erases a disc around `(x, y)`. Returns true when this stroke revealed
    /// the message.
    pub fn scratch_at(&mut self, x: f64, y: f64) -> bool {
        let r = ERASE_RADIUS;
        let x0 = (x - r).floor().max(0.0) as usize;
        let y0 = (y - r).floor().max(0.0) as usize;
        let x1 = ((x + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((y + r).ceil().max(0.0) as usize).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let (dx, dy) = (px as f64 + 0.5 - x, py as f64 + 0.5 - y);
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let cell = &mut self.mask[py * self.width + px];
                if !*cell {
                    *cell = true;
                    self.cleared += 1;
                }
            }
        }

        if !self.revealed && self.fraction() >= REVEAL_THRESHOLD {
            log::debug!("Scratch card revealed");
            self.revealed = true;
            return true;
        }
        false
    }

    /// Horizontal runs `(y, x_start, x_end)` still covered, for painting the
    /// coating row by row.
    pub fn covered_runs(&self) -> Vec<(usize, usize, usize)> {
        let mut runs = Vec::new();
        for (y, row) in self.mask.chunks(self.width.max(1)).enumerate() {
            let mut start = None;
            for (x, &cleared) in row.iter().enumerate() {
                match (cleared, start) {
                    (false, None) => start = Some(x),
                    (true, Some(s)) => {
                        runs.push((y, s, x));
                        start = None;
                    }
                    _ => {}
                }
            }
            if let Some(s) = start {
                runs.push((y, s, row.len()));
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card() -> ScratchCard {
        ScratchCard::new(&mut StdRng::seed_from_u64(8))
    }

    #[test]
    fn test_drag_needs_press() {
        let mut card = card();
        card.drag(100.0, 100.0);
        assert_eq!(card.fraction(), 0.0);
        card.press(100.0, 100.0);
        let after_press = card.fraction();
        assert!(after_press > 0.0);
        card.release();
        card.drag(200.0, 100.0);
        assert_eq!(card.fraction(), after_press);
    }

    #[test]
    fn test_reveal_at_threshold_is_one_way() {
        let mut card = card();
        let mut revealed_at = None;
        'rows: for y in (0..CARD_HEIGHT).step_by(10) {
            for x in (0..CARD_WIDTH).step_by(10) {
                if card.scratch_at(x as f64, y as f64) {
                    revealed_at = Some(card.fraction());
                    break 'rows;
                }
                assert!(!card.is_revealed());
                assert!(card.fraction() < REVEAL_THRESHOLD);
            }
        }
        assert!(revealed_at.unwrap() >= REVEAL_THRESHOLD);

        for _ in 0..10 {
            assert!(!card.scratch_at(5.0, 5.0));
            assert!(card.is_revealed());
        }
    }

    #[test]
    fn test_covered_runs_skip_cleared_cells() {
        let mut card = ScratchCard::with_size(100, 2, &mut StdRng::seed_from_u64(1));
        assert_eq!(card.covered_runs(), vec![(0, 0, 100), (1, 0, 100)]);
        card.scratch_at(50.0, 1.0);
        let runs = card.covered_runs();
        assert_eq!(runs.len(), 4);
        for &(y, start, end) in &runs {
            assert!((start..end).all(|x| !card.is_cleared(x, y)));
        }
        assert!(card.is_cleared(50, 0));
        assert!(!card.is_cleared(0, 0));
    }

    #[test]
    fn test_message_comes_from_pool() {
        let card = card();
        assert!(SCRATCH_MESSAGES.iter().any(|m| m.text == card.message().text));
    }
}
