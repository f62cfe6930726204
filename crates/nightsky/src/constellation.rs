use crate::content::{ARIES_OFFSETS_MS, ARIES_PATH};
use crate::stars::StarId;
use crate::timeline::Timeline;
use chrono::{Datelike, NaiveDate};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthDayError {
    #[error("expected MM-DD, got '{0}'")]
    Format(String),
    #[error("{0:02}-{1:02} is not a calendar day")]
    OutOfRange(u32, u32),
}

/// A calendar day without a year, ordered January 1 first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self, MonthDayError> {
        // 2000 is a leap year so February 29 is accepted.
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self { month, day })
            .ok_or(MonthDayError::OutOfRange(month, day))
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl FromStr for MonthDay {
    type Err = MonthDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (m, d) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| MonthDayError::Format(s.to_string()))?;
        let month = m
            .parse()
            .map_err(|_| MonthDayError::Format(s.to_string()))?;
        let day = d
            .parse()
            .map_err(|_| MonthDayError::Format(s.to_string()))?;
        Self::new(month, day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Inclusive range of days in which the constellation replaces the cycler.
/// A window whose end precedes its start wraps over New Year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SeasonWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let today = MonthDay::from(date);
        if self.start <= self.end {
            self.start <= today && today <= self.end
        } else {
            today >= self.start || today <= self.end
        }
    }
}

impl Default for SeasonWindow {
    fn default() -> Self {
        Self {
            start: MonthDay { month: 4, day: 1 },
            end: MonthDay { month: 4, day: 12 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub star: StarId,
    pub offset: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationPlan {
    pub reveal_delay: Duration,
    pub draw_duration: Duration,
    pub steps: Vec<PathStep>,
}

impl Default for ConstellationPlan {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(7000),
            draw_duration: Duration::from_secs(40),
            steps: ARIES_PATH
                .iter()
                .zip(ARIES_OFFSETS_MS)
                .map(|(&id, ms)| PathStep {
                    star: StarId::new(id),
                    offset: Duration::from_millis(ms),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstellationEvent {
    RevealPath,
    Activate(StarId),
}

/// Scripted reveal: after a delay the path appears and its stars light up
/// one by one at fixed offsets. Lit stars stay lit.
#[derive(Debug, Clone)]
pub struct Constellation {
    plan: ConstellationPlan,
    timeline: Timeline<ConstellationEvent>,
    revealed_at: Option<Duration>,
    activated: Vec<StarId>,
}

impl Constellation {
    pub fn new(plan: ConstellationPlan) -> Self {
        Self {
            plan,
            timeline: Timeline::new(),
            revealed_at: None,
            activated: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.timeline.clear();
        self.revealed_at = None;
        self.activated.clear();
        self.timeline
            .after(self.plan.reveal_delay, ConstellationEvent::RevealPath);
    }

    pub fn advance(&mut self, dt: Duration) {
        let until = self.timeline.now() + dt;
        while let Some(event) = self.timeline.poll(until) {
            match event {
                ConstellationEvent::RevealPath => {
                    log::info!("Constellation path revealed");
                    self.revealed_at = Some(self.timeline.now());
                    for step in &self.plan.steps {
                        self.timeline
                            .after(step.offset, ConstellationEvent::Activate(step.star));
                    }
                }
                ConstellationEvent::Activate(id) => {
                    if !self.activated.contains(&id) {
                        self.activated.push(id);
                    }
                }
            }
        }
        self.timeline.settle(until);
    }

    pub fn path(&self) -> Vec<StarId> {
        self.plan.steps.iter().map(|s| s.star).collect()
    }

    pub fn is_on_path(&self, id: StarId) -> bool {
        self.plan.steps.iter().any(|s| s.star == id)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    pub fn is_activated(&self, id: StarId) -> bool {
        self.activated.contains(&id)
    }

    pub fn is_clickable(&self, id: StarId) -> bool {
        self.is_on_path(id) && self.is_activated(id)
    }

    pub fn path_progress(&self) -> f64 {
        let Some(start) = self.revealed_at else {
            return 0.0;
        };
        let elapsed = self.timeline.now().saturating_sub(start).as_secs_f64();
        let total = self.plan.draw_duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        (elapsed / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::Catalog;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_month_day_parsing() {
        assert_eq!("04-12".parse(), MonthDay::new(4, 12));
        assert_eq!(" 4-1 ".parse(), MonthDay::new(4, 1));
        assert!("02-29".parse::<MonthDay>().is_ok());
        assert_eq!(
            "13-01".parse::<MonthDay>(),
            Err(MonthDayError::OutOfRange(13, 1))
        );
        assert!(matches!(
            "april".parse::<MonthDay>(),
            Err(MonthDayError::Format(_))
        ));
    }

    #[test]
    fn test_month_day_deserialization() {
        let md: MonthDay = serde_json::from_str("\"12-24\"").unwrap();
        assert_eq!(md, MonthDay::new(12, 24).unwrap());
        assert_eq!(serde_json::to_string(&md).unwrap(), "\"12-24\"");
    }

    #[test]
    fn test_default_window_is_early_april() {
        let window = SeasonWindow::default();
        assert!(window.contains(date(4, 1)));
        assert!(window.contains(date(4, 12)));
        assert!(!window.contains(date(4, 13)));
        assert!(!window.contains(date(3, 31)));
    }

    #[test]
    fn test_window_wraps_over_new_year() {
        let window = SeasonWindow {
            start: MonthDay::new(12, 20).unwrap(),
            end: MonthDay::new(1, 5).unwrap(),
        };
        assert!(window.contains(date(12, 31)));
        assert!(window.contains(date(1, 1)));
        assert!(!window.contains(date(6, 1)));
    }

    #[test]
    fn test_stars_activate_on_schedule() {
        let mut constellation = Constellation::new(ConstellationPlan::default());
        constellation.start();

        constellation.advance(Duration::from_millis(6999));
        assert!(!constellation.is_revealed());
        constellation.advance(Duration::from_millis(1));
        assert!(constellation.is_revealed());
        assert!(constellation.is_clickable(StarId::new(5)));
        assert!(!constellation.is_clickable(StarId::new(6)));

        constellation.advance(Duration::from_millis(2020));
        assert!(constellation.is_clickable(StarId::new(6)));
        assert!(!constellation.is_clickable(StarId::new(9)));

        constellation.advance(Duration::from_millis(1780));
        for id in [5, 6, 9, 13] {
            assert!(constellation.is_clickable(StarId::new(id)));
        }
    }

    #[test]
    fn test_off_path_stars_never_clickable() {
        let catalog = Catalog::builtin();
        let mut constellation = Constellation::new(ConstellationPlan::default());
        constellation.start();

        for _ in 0..400 {
            constellation.advance(Duration::from_millis(137));
            for star in catalog.stars() {
                if !constellation.is_on_path(star.id) {
                    assert!(!constellation.is_clickable(star.id));
                }
            }
        }
    }

    #[test]
    fn test_path_progress_runs_over_draw_duration() {
        let mut constellation = Constellation::new(ConstellationPlan::default());
        constellation.start();
        assert_eq!(constellation.path_progress(), 0.0);
        constellation.advance(Duration::from_millis(7000 + 20_000));
        assert!((constellation.path_progress() - 0.5).abs() < 1e-9);
        constellation.advance(Duration::from_secs(60));
        assert_eq!(constellation.path_progress(), 1.0);
    }
}
