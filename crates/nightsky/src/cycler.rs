use crate::stars::StarId;
use crate::timeline::{TimerId, Timeline};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub intro_delay: Duration,
    pub period: Duration,
    pub activation_delay: Duration,
    /// How long the previous star stays clickable after it goes dark.
    pub fade_grace: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            intro_delay: Duration::from_millis(3500),
            period: Duration::from_millis(2800),
            activation_delay: Duration::from_millis(200),
            fade_grace: Duration::from_millis(2500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CyclerEvent {
    Intro,
    Tick,
    Activate,
    Unfade(StarId),
}

/// Lights message-bearing stars one at a time, round robin.
#[derive(Debug, Clone)]
pub struct HighlightCycler {
    order: Vec<StarId>,
    timing: Timing,
    timeline: Timeline<CyclerEvent>,
    cursor: usize,
    last: Option<usize>,
    active: Option<StarId>,
    fading: Option<StarId>,
    introduced: bool,
    running: bool,
    tick: Option<TimerId>,
    activation: Option<TimerId>,
}

impl HighlightCycler {
    pub fn new(order: Vec<StarId>, timing: Timing) -> Self {
        Self {
            order,
            timing,
            timeline: Timeline::new(),
            cursor: 0,
            last: None,
            active: None,
            fading: None,
            introduced: false,
            running: false,
            tick: None,
            activation: None,
        }
    }

    /// Arms the intro delay. The first star lights up one period plus the
    /// activation delay after the intro ends.
    pub fn start(&mut self) {
        self.timeline.clear();
        self.introduced = false;
        self.running = true;
        self.timeline.after(self.timing.intro_delay, CyclerEvent::Intro);
    }

    pub fn active(&self) -> Option<StarId> {
        self.active
    }

    pub fn fading(&self) -> Option<StarId> {
        self.fading
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_clickable(&self, id: StarId) -> bool {
        self.active == Some(id) || self.fading == Some(id)
    }

    pub fn select(&mut self, id: StarId) {
        if let Some(idx) = self.order.iter().position(|s| *s == id) {
            self.last = Some(idx);
            self.cursor = idx + 1;
        }
        self.active = None;
    }

    pub fn suspend(&mut self) {
        if !self.running {
            return;
        }
        log::debug!("Highlight cycler suspended");
        self.timeline.clear();
        self.tick = None;
        self.activation = None;
        self.active = None;
        self.fading = None;
        self.running = false;
    }

    pub fn resume(&mut self) {
        if self.running {
            return;
        }
        log::debug!("Highlight cycler resumed at {}", self.cursor);
        self.running = true;
        if self.introduced {
            self.begin();
        } else {
            self.timeline.after(self.timing.intro_delay, CyclerEvent::Intro);
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        let until = self.timeline.now() + dt;
        while let Some(event) = self.timeline.poll(until) {
            self.handle(event);
        }
        self.timeline.settle(until);
    }

    fn begin(&mut self) {
        if let Some(id) = self.tick.take() {
            self.timeline.cancel(id);
        }
        if let Some(id) = self.activation.take() {
            self.timeline.cancel(id);
        }
        self.tick = Some(self.timeline.every(self.timing.period, CyclerEvent::Tick));
    }

    fn handle(&mut self, event: CyclerEvent) {
        match event {
            CyclerEvent::Intro => {
                self.introduced = true;
                self.begin();
            }
            CyclerEvent::Tick => {
                if let Some(id) = self.last.and_then(|i| self.order.get(i)).copied() {
                    self.fading = Some(id);
                    self.timeline
                        .after(self.timing.fade_grace, CyclerEvent::Unfade(id));
                }
                self.active = None;
                self.activation = Some(
                    self.timeline
                        .after(self.timing.activation_delay, CyclerEvent::Activate),
                );
            }
            CyclerEvent::Activate => {
                self.activation = None;
                if self.order.is_empty() {
                    return;
                }
                self.cursor %= self.order.len();
                self.active = Some(self.order[self.cursor]);
                self.last = Some(self.cursor);
                self.cursor += 1;
            }
            CyclerEvent::Unfade(id) => {
                if self.fading == Some(id) {
                    self.fading = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<StarId> {
        raw.iter().copied().map(StarId::new).collect()
    }

    /// Steps in 50 ms increments and records every newly lit star.
    fn run(cycler: &mut HighlightCycler, total: Duration) -> Vec<StarId> {
        let step = Duration::from_millis(50);
        let mut lit = Vec::new();
        let mut elapsed = Duration::ZERO;
        let mut previous = cycler.active();
        while elapsed < total {
            cycler.advance(step);
            elapsed += step;
            let now = cycler.active();
            if now.is_some() && now != previous {
                lit.push(now.unwrap());
            }
            previous = now;
        }
        lit
    }

    #[test]
    fn test_round_robin_covers_every_star_before_repeating() {
        let order = ids(&[5, 6, 7, 9, 11]);
        let mut cycler = HighlightCycler::new(order.clone(), Timing::default());
        cycler.start();

        let lit = run(&mut cycler, Duration::from_secs(60));
        assert!(lit.len() > order.len() * 2);
        for window in lit.chunks(order.len()).filter(|c| c.len() == order.len()) {
            let mut sorted = window.to_vec();
            sorted.sort();
            assert_eq!(sorted, order);
        }
        assert_eq!(&lit[..order.len()], order.as_slice());
    }

    #[test]
    fn test_first_star_lights_after_intro_period_and_delay() {
        let mut cycler = HighlightCycler::new(ids(&[1, 2]), Timing::default());
        cycler.start();

        cycler.advance(Duration::from_millis(3500 + 2800 + 199));
        assert_eq!(cycler.active(), None);
        cycler.advance(Duration::from_millis(1));
        assert_eq!(cycler.active(), Some(StarId::new(1)));
    }

    #[test]
    fn test_previous_star_stays_clickable_during_grace() {
        let mut cycler = HighlightCycler::new(ids(&[1, 2]), Timing::default());
        cycler.start();
        cycler.advance(Duration::from_millis(3500 + 2800 + 200));
        assert!(cycler.is_clickable(StarId::new(1)));

        // Next tick: star 1 goes dark but keeps a grace window.
        cycler.advance(Duration::from_millis(2700));
        assert_eq!(cycler.active(), None);
        assert_eq!(cycler.fading(), Some(StarId::new(1)));
        assert!(cycler.is_clickable(StarId::new(1)));

        cycler.advance(Duration::from_millis(100));
        assert_eq!(cycler.active(), Some(StarId::new(2)));
        assert!(cycler.is_clickable(StarId::new(1)));

        cycler.advance(Duration::from_millis(2300));
        assert!(!cycler.is_clickable(StarId::new(1)));
    }

    #[test]
    fn test_at_most_one_active_star() {
        let order = ids(&[1, 2, 3]);
        let mut cycler = HighlightCycler::new(order.clone(), Timing::default());
        cycler.start();
        for _ in 0..2000 {
            cycler.advance(Duration::from_millis(17));
            let active = order
                .iter()
                .filter(|id| cycler.active() == Some(**id))
                .count();
            assert!(active <= 1);
        }
    }

    #[test]
    fn test_resume_continues_after_selected_star() {
        let mut cycler = HighlightCycler::new(ids(&[1, 2, 3, 4]), Timing::default());
        cycler.start();
        cycler.advance(Duration::from_millis(3500 + 2800 + 200));
        assert_eq!(cycler.active(), Some(StarId::new(1)));

        cycler.select(StarId::new(1));
        cycler.suspend();
        assert_eq!(cycler.active(), None);
        cycler.advance(Duration::from_secs(30));
        assert_eq!(cycler.active(), None);

        cycler.resume();
        cycler.advance(Duration::from_millis(3000));
        assert_eq!(cycler.active(), Some(StarId::new(2)));
        assert_eq!(cycler.fading(), Some(StarId::new(1)));
    }

    #[test]
    fn test_resume_before_intro_rearms_intro() {
        let mut cycler = HighlightCycler::new(ids(&[1]), Timing::default());
        cycler.start();
        cycler.advance(Duration::from_millis(1000));
        cycler.suspend();
        cycler.resume();
        cycler.advance(Duration::from_millis(3500 + 2800 + 199));
        assert_eq!(cycler.active(), None);
        cycler.advance(Duration::from_millis(1));
        assert_eq!(cycler.active(), Some(StarId::new(1)));
    }
}
