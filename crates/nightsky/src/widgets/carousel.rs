/// Minimum horizontal travel, in pixels, for a drag to count as a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Previous,
}

/// Photo viewer index with wraparound and swipe tracking.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    len: usize,
    index: usize,
    touch_start: Option<f64>,
    touch_end: Option<f64>,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            self.index = self.index.checked_sub(1).unwrap_or(self.len - 1);
        }
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start = Some(x);
        self.touch_end = None;
    }

    pub fn touch_move(&mut self, x: f64) {
        self.touch_end = Some(x);
    }

    /// Ends the gesture, turning the page when the travel was long enough.
    pub fn touch_end(&mut self) -> Option<Swipe> {
        let (start, end) = (self.touch_start.take()?, self.touch_end.take()?);
        let distance = start - end;
        let swipe = if distance > MIN_SWIPE_DISTANCE {
            Swipe::Next
        } else if distance < -MIN_SWIPE_DISTANCE {
            Swipe::Previous
        } else {
            return None;
        };
        match swipe {
            Swipe::Next => self.next(),
            Swipe::Previous => self.previous(),
        }
        Some(swipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut carousel = Carousel::new(3);
        carousel.previous();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_empty_carousel_stays_put() {
        let mut carousel = Carousel::new(0);
        carousel.next();
        carousel.previous();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_swipe_needs_distance() {
        let mut carousel = Carousel::new(5);
        carousel.touch_start(300.0);
        carousel.touch_move(260.0);
        assert_eq!(carousel.touch_end(), None);
        assert_eq!(carousel.index(), 0);

        carousel.touch_start(300.0);
        carousel.touch_move(200.0);
        assert_eq!(carousel.touch_end(), Some(Swipe::Next));
        assert_eq!(carousel.index(), 1);

        carousel.touch_start(100.0);
        carousel.touch_move(180.0);
        assert_eq!(carousel.touch_end(), Some(Swipe::Previous));
        assert_eq!(carousel.index(), 0);

        // A tap without movement is not a swipe.
        carousel.touch_start(100.0);
        assert_eq!(carousel.touch_end(), None);
    }
}
