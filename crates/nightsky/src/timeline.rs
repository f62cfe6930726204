use std::time::Duration;

/// Smallest period a repeating timer may have. Keeps `poll` from spinning on a
/// zero-length interval.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// A deterministic timer wheel owned by a single component.
///
/// Time only moves when the owner calls [`Timeline::poll`] / [`Timeline::settle`]
/// (or [`Timeline::advance`]), so tests can step through long sequences without
/// sleeping. The owner usually handles events one at a time so that handlers
/// may schedule follow-up timers that still fall inside the same step:
///
/// ```
/// # use nightsky::timeline::Timeline;
/// # use std::time::Duration;
/// let mut timeline = Timeline::new();
/// timeline.after(Duration::from_millis(10), "ping");
/// let until = timeline.now() + Duration::from_millis(50);
/// while let Some(event) = timeline.poll(until) {
///     assert_eq!(event, "ping");
/// }
/// timeline.settle(until);
/// ```
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn after(&mut self, delay: Duration, event: E) -> TimerId {
        self.push(self.now + delay, None, event)
    }

    /// Fires `event` every `period`, first one `period` from now.
    pub fn every(&mut self, period: Duration, event: E) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(self.now + period, Some(period), event)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pops the earliest event due at or before `until` and moves the clock to
    /// its deadline. Ties fire in scheduling order.
    pub fn poll(&mut self, until: Duration) -> Option<E> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        self.now = self.now.max(timer.due);
        let event = timer.event.clone();
        match timer.period {
            Some(period) => timer.due += period,
            None => {
                self.timers.remove(idx);
            }
        }
        Some(event)
    }

    /// Moves the clock to `until` once every due event has been polled.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advances by `dt` and returns everything that fired. Only suitable when
    /// handlers never schedule timers that would land inside the same window.
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        let until = self.now + dt;
        let mut fired = Vec::new();
        while let Some(event) = self.poll(until) {
            fired.push(event);
        }
        self.settle(until);
        fired
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due,
            period,
            event,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timeline = Timeline::new();
        timeline.after(ms(100), 'a');

        assert!(timeline.advance(ms(99)).is_empty());
        assert_eq!(timeline.advance(ms(1)), vec!['a']);
        assert!(timeline.advance(ms(1000)).is_empty());
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_repeating_fires_for_each_period_in_window() {
        let mut timeline = Timeline::new();
        timeline.every(ms(250), 't');

        assert_eq!(timeline.advance(ms(1000)).len(), 4);
        assert_eq!(timeline.now(), ms(1000));
        assert_eq!(timeline.advance(ms(249)).len(), 0);
        assert_eq!(timeline.advance(ms(1)).len(), 1);
    }

    #[test]
    fn test_events_come_out_in_deadline_order() {
        let mut timeline = Timeline::new();
        timeline.after(ms(30), 3);
        timeline.after(ms(10), 1);
        timeline.after(ms(20), 2);
        timeline.after(ms(10), 11);

        assert_eq!(timeline.advance(ms(30)), vec![1, 11, 2, 3]);
    }

    #[test]
    fn test_cancel_stops_a_timer() {
        let mut timeline = Timeline::new();
        let id = timeline.every(ms(10), ());
        assert!(timeline.is_scheduled(id));
        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
        assert!(timeline.advance(ms(100)).is_empty());
    }

    #[test]
    fn test_poll_lets_handlers_schedule_inside_window() {
        let mut timeline = Timeline::new();
        timeline.after(ms(10), 0u32);

        let until = ms(100);
        let mut seen = Vec::new();
        while let Some(n) = timeline.poll(until) {
            seen.push((n, timeline.now()));
            if n < 3 {
                timeline.after(ms(20), n + 1);
            }
        }
        timeline.settle(until);

        assert_eq!(
            seen,
            vec![(0, ms(10)), (1, ms(30)), (2, ms(50)), (3, ms(70))]
        );
        assert_eq!(timeline.now(), until);
    }
}
