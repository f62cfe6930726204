//! The coordinator that owns every component of the night sky.
//!
//! Control flows one way: the highlighter decides which stars can be clicked,
//! a click enters the [`Scene`], and a non-idle scene suspends the cycler
//! until the visitor returns to the open sky. Widgets are rebuilt whenever the
//! visible overlay changes, so closing a panel drops its timers and devices.

use crate::constellation::{Constellation, ConstellationPlan, SeasonWindow};
use crate::cycler::{HighlightCycler, Timing};
use crate::letters::{Flight, FLIGHT_DURATION, LetterBoard, LetterStore, TextMeasure, UserStar};
use crate::scene::{Anchor, Overlay, Panel, ResetOutcome, Scene};
use crate::stars::{Catalog, Feature, Position, StarId};
use crate::timeline::Timeline;
use crate::widgets::hug::VIBRATION;
use crate::widgets::{
    AudioStatus, BalanceGame, BreathingPacer, Carousel, Diagnosis, DiagnosisError, Haptics,
    HoldGesture, Microphone, ParticleBurst, PraisePicker, PraiseTopic, ScratchCard, Side, Swipe,
};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

/// Click tolerance around a star, in pixels.
pub const HIT_RADIUS: f64 = 24.0;

pub const COLLECT_NOTICE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SeasonMode {
    /// Seasonal when today falls inside the configured window.
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Debug, Clone, Default)]
pub struct SkyOptions {
    pub timing: Timing,
    pub season: SeasonWindow,
    pub season_mode: SeasonMode,
    pub plan: ConstellationPlan,
    /// Fixed seed for every random choice; `None` draws from the OS.
    pub seed: Option<u64>,
    pub photo_count: usize,
}

/// Which component decides the clickable stars. Chosen once at load.
#[derive(Debug, Clone)]
pub enum Highlighter {
    Cycling(HighlightCycler),
    Seasonal(Constellation),
}

impl Highlighter {
    pub fn is_seasonal(&self) -> bool {
        matches!(self, Self::Seasonal(_))
    }

    pub fn is_clickable(&self, id: StarId) -> bool {
        match self {
            Self::Cycling(cycler) => cycler.is_clickable(id),
            Self::Seasonal(constellation) => constellation.is_clickable(id),
        }
    }

    pub fn is_lit(&self, id: StarId) -> bool {
        match self {
            Self::Cycling(cycler) => cycler.active() == Some(id),
            Self::Seasonal(constellation) => constellation.is_activated(id),
        }
    }

    /// A star that just went dark but still accepts clicks.
    pub fn is_fading(&self, id: StarId) -> bool {
        match self {
            Self::Cycling(cycler) => cycler.fading() == Some(id),
            Self::Seasonal(_) => false,
        }
    }

    fn advance(&mut self, dt: Duration) {
        match self {
            Self::Cycling(cycler) => cycler.advance(dt),
            Self::Seasonal(constellation) => constellation.advance(dt),
        }
    }
}

#[derive(Debug, Clone)]
pub enum MessageWidget {
    None,
    Fireworks(ParticleBurst),
    Praise(PraisePicker),
}

pub enum PanelWidget {
    None,
    Photos(Carousel),
    Balance(BalanceGame),
    Breathing(BreathingPacer),
    Hug(HoldGesture),
    Scratch(ScratchCard),
    Diagnosis(Diagnosis),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkyEvent {
    LandLetter,
    ShowCollected { star: StarId, count: usize },
}

pub struct Sky {
    catalog: Catalog,
    highlighter: Highlighter,
    scene: Scene,
    letters: LetterBoard,
    timeline: Timeline<SkyEvent>,
    flight_started: Option<Duration>,
    rng: StdRng,
    haptics: Option<Box<dyn Haptics>>,
    shown: Overlay,
    message_widget: MessageWidget,
    panel_widget: PanelWidget,
    audio: AudioStatus,
    collected: Option<usize>,
    photo_count: usize,
    width: f64,
    height: f64,
}

impl Sky {
    pub fn new(
        catalog: Catalog,
        options: SkyOptions,
        store: Box<dyn LetterStore>,
        today: NaiveDate,
    ) -> Self {
        let seasonal = match options.season_mode {
            SeasonMode::Auto => options.season.contains(today),
            SeasonMode::On => true,
            SeasonMode::Off => false,
        };
        let highlighter = if seasonal {
            log::info!(
                "Seasonal constellation mode ({} to {})",
                options.season.start,
                options.season.end
            );
            let mut constellation = Constellation::new(options.plan);
            constellation.start();
            Highlighter::Seasonal(constellation)
        } else {
            log::info!("Highlight cycling mode");
            let mut cycler = HighlightCycler::new(catalog.message_bearing(), options.timing);
            cycler.start();
            Highlighter::Cycling(cycler)
        };
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            catalog,
            highlighter,
            scene: Scene::default(),
            letters: LetterBoard::open(store),
            timeline: Timeline::new(),
            flight_started: None,
            rng,
            haptics: None,
            shown: Overlay::Sky,
            message_widget: MessageWidget::None,
            panel_widget: PanelWidget::None,
            audio: AudioStatus::default(),
            collected: None,
            photo_count: options.photo_count,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn set_haptics(&mut self, haptics: Box<dyn Haptics>) {
        self.haptics = Some(haptics);
    }

    pub fn set_photo_count(&mut self, count: usize) {
        self.photo_count = count;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        if let MessageWidget::Fireworks(burst) = &mut self.message_widget {
            burst.resize(width, height);
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn letters(&self) -> &LetterBoard {
        &self.letters
    }

    pub fn visible(&self) -> Overlay {
        self.scene.visible()
    }

    pub fn message_widget(&self) -> &MessageWidget {
        &self.message_widget
    }

    pub fn panel_widget(&self) -> &PanelWidget {
        &self.panel_widget
    }

    pub fn audio(&self) -> AudioStatus {
        self.audio
    }

    /// The sky dims while a recording plays.
    pub fn is_dimmed(&self) -> bool {
        self.audio.is_playing()
    }

    /// The letter in the air and how far along its flight is, `0..=1`.
    pub fn flight(&self) -> Option<(&Flight, f64)> {
        let flight = self.letters.flight()?;
        let started = self.flight_started?;
        let elapsed = self.timeline.now().saturating_sub(started).as_secs_f64();
        Some((flight, (elapsed / FLIGHT_DURATION.as_secs_f64()).min(1.0)))
    }

    /// One frame. Fireworks move one step per call.
    pub fn advance(&mut self, dt: Duration) {
        self.highlighter.advance(dt);

        let until = self.timeline.now() + dt;
        while let Some(event) = self.timeline.poll(until) {
            self.handle(event);
        }
        self.timeline.settle(until);

        if let MessageWidget::Fireworks(burst) = &mut self.message_widget {
            burst.step(&mut self.rng);
        }
        match &mut self.panel_widget {
            PanelWidget::Breathing(pacer) => pacer.advance(dt),
            PanelWidget::Hug(hug) => {
                let pulses = hug.advance(dt);
                if let Some(haptics) = &self.haptics {
                    for _ in 0..pulses {
                        haptics.vibrate(&VIBRATION);
                    }
                }
            }
            PanelWidget::Diagnosis(diagnosis) => diagnosis.advance(dt),
            _ => {}
        }
    }

    /// Stars respond only on the open sky.
    pub fn is_clickable(&self, id: StarId) -> bool {
        self.scene.is_idle() && self.highlighter.is_clickable(id)
    }

    pub fn star_at(&self, x: f64, y: f64) -> Option<StarId> {
        let point = Position::from_pixels(x, y, self.width, self.height);
        self.catalog
            .nearest(point, self.width, self.height, HIT_RADIUS, |s| {
                self.is_clickable(s.id)
            })
    }

    /// The letter star under a pixel point. Letters answer in any scene.
    pub fn letter_at(&self, x: f64, y: f64) -> Option<&UserStar> {
        let point = Position::from_pixels(x, y, self.width, self.height);
        self.letters
            .star_at(point, self.width, self.height, HIT_RADIUS)
    }

    pub fn click_star(&mut self, id: StarId, origin: Position) -> bool {
        if !self.is_clickable(id) || !self.scene.select(id, origin) {
            return false;
        }
        if let Highlighter::Cycling(cycler) = &mut self.highlighter {
            cycler.select(id);
        }
        self.sync();
        true
    }

    pub fn show_guide(&mut self) -> bool {
        let shown = self.scene.show_guide();
        self.sync();
        shown
    }

    /// The moon control.
    pub fn reset(&mut self) -> ResetOutcome {
        if self.letters.is_flying() {
            return ResetOutcome::Ignored;
        }
        let has_secret = self
            .scene
            .selected()
            .and_then(|id| self.catalog.get(id))
            .and_then(|star| star.feature())
            == Some(Feature::Secret);
        let outcome = self.scene.reset(has_secret);
        self.sync();
        outcome
    }

    /// A panel's own close button.
    pub fn dismiss(&mut self) -> Option<Panel> {
        if self.letters.is_flying() {
            return None;
        }
        let popped = self.scene.dismiss();
        if popped == Some(Panel::StarLetter) {
            self.letters.close_composer();
        }
        self.sync();
        popped
    }

    /// Opens a panel from a button, checked against the selected star.
    pub fn open(&mut self, panel: Panel) -> bool {
        let feature = self
            .scene
            .selected()
            .and_then(|id| self.catalog.get(id))
            .and_then(|star| star.feature());
        let allowed = match panel.anchor() {
            Anchor::Message => feature.and_then(Panel::for_feature) == Some(panel),
            Anchor::Replaces(Panel::BoredMenu) => feature == Some(Feature::Bored),
            Anchor::Replaces(_) | Anchor::Internal => false,
        };
        if !allowed || !self.scene.open(panel) {
            return false;
        }
        self.sync();
        true
    }

    pub fn answer_question(&mut self) -> bool {
        let answered = self.scene.answer_question();
        self.sync();
        answered
    }

    pub fn confirm_collect(&mut self) -> Option<usize> {
        let star = self.scene.selected()?;
        if self.scene.top() != Some(Panel::CollectConfirm) {
            return None;
        }
        let count = self.letters.collect();
        self.scene.finish_collect();
        self.timeline
            .after(COLLECT_NOTICE_DELAY, SkyEvent::ShowCollected { star, count });
        self.sync();
        Some(count)
    }

    /// A collect count whose star was closed before the notice was due.
    pub fn collected_notice(&self) -> Option<usize> {
        self.collected
    }

    pub fn take_collected_notice(&mut self) -> Option<usize> {
        self.collected.take()
    }

    pub fn edit_letter(&mut self, text: &str, measure: &dyn TextMeasure) -> bool {
        self.scene.top() == Some(Panel::StarLetter) && self.letters.edit(text, measure)
    }

    /// Sends the composed letter. Blank letters are ignored.
    pub fn send_letter(&mut self) -> bool {
        if self.scene.top() != Some(Panel::StarLetter) {
            return false;
        }
        if self.letters.submit(&mut self.rng).is_none() {
            return false;
        }
        self.flight_started = Some(self.timeline.now());
        self.timeline.after(FLIGHT_DURATION, SkyEvent::LandLetter);
        true
    }

    pub fn hug_press(&mut self) {
        if let PanelWidget::Hug(hug) = &mut self.panel_widget {
            hug.press();
        }
    }

    pub fn hug_release(&mut self) {
        if let PanelWidget::Hug(hug) = &mut self.panel_widget {
            hug.release();
        }
    }

    pub fn scratch_press(&mut self, x: f64, y: f64) {
        if let PanelWidget::Scratch(card) = &mut self.panel_widget {
            card.press(x, y);
        }
    }

    pub fn scratch_drag(&mut self, x: f64, y: f64) {
        if let PanelWidget::Scratch(card) = &mut self.panel_widget {
            card.drag(x, y);
        }
    }

    pub fn scratch_release(&mut self) {
        if let PanelWidget::Scratch(card) = &mut self.panel_widget {
            card.release();
        }
    }

    pub fn diagnosis_press(&mut self, mic: &dyn Microphone) -> Result<(), DiagnosisError> {
        match &mut self.panel_widget {
            PanelWidget::Diagnosis(diagnosis) => diagnosis.press(mic),
            _ => Ok(()),
        }
    }

    pub fn diagnosis_release(&mut self) {
        if let PanelWidget::Diagnosis(diagnosis) = &mut self.panel_widget {
            diagnosis.release(&mut self.rng);
        }
    }

    pub fn photo_next(&mut self) {
        if let PanelWidget::Photos(carousel) = &mut self.panel_widget {
            carousel.next();
        }
    }

    pub fn photo_previous(&mut self) {
        if let PanelWidget::Photos(carousel) = &mut self.panel_widget {
            carousel.previous();
        }
    }

    pub fn photo_touch_start(&mut self, x: f64) {
        if let PanelWidget::Photos(carousel) = &mut self.panel_widget {
            carousel.touch_start(x);
        }
    }

    pub fn photo_touch_move(&mut self, x: f64) {
        if let PanelWidget::Photos(carousel) = &mut self.panel_widget {
            carousel.touch_move(x);
        }
    }

    pub fn photo_touch_end(&mut self) -> Option<Swipe> {
        match &mut self.panel_widget {
            PanelWidget::Photos(carousel) => carousel.touch_end(),
            _ => None,
        }
    }

    pub fn balance_pick(&mut self, question: u32, side: Side) -> bool {
        match &mut self.panel_widget {
            PanelWidget::Balance(game) => game.pick(question, side),
            _ => false,
        }
    }

    pub fn praise_toggle(&mut self, topic: PraiseTopic) {
        if let MessageWidget::Praise(picker) = &mut self.message_widget {
            picker.toggle(topic);
        }
    }

    pub fn set_audio_playing(&mut self, playing: bool) {
        let audible = matches!(
            self.shown,
            Overlay::Message(_)
                | Overlay::Panel {
                    panel: Panel::Karaoke,
                    ..
                }
        );
        if audible && self.audio.set_playing(playing) {
            log::debug!("Audio playing: {}", playing);
        }
    }

    fn handle(&mut self, event: SkyEvent) {
        match event {
            SkyEvent::LandLetter => {
                let id = chrono::Utc::now().timestamp_millis();
                self.flight_started = None;
                if let Some(star) = self.letters.land(id) {
                    log::info!("Star letter {} landed", star.id);
                }
                self.scene.close();
            }
            SkyEvent::ShowCollected { star, count } => {
                let shown = self.scene.selected() == Some(star)
                    && self.scene.top().is_none()
                    && self.scene.notify_collected(count);
                if !shown {
                    self.collected = Some(count);
                }
            }
        }
        self.sync();
    }

    /// Rebuilds widgets for a new overlay and parks or wakes the cycler.
    fn sync(&mut self) {
        if let Highlighter::Cycling(cycler) = &mut self.highlighter {
            if self.scene.is_idle() {
                cycler.resume();
            } else {
                cycler.suspend();
            }
        }

        let visible = self.scene.visible();
        if visible == self.shown {
            return;
        }
        self.shown = visible;
        self.audio = AudioStatus::default();

        self.message_widget = match visible {
            Overlay::Message(id) => match self.catalog.get(id).and_then(|s| s.feature()) {
                Some(Feature::Fireworks) => {
                    MessageWidget::Fireworks(ParticleBurst::new(self.width, self.height))
                }
                Some(Feature::Praise) => MessageWidget::Praise(PraisePicker::default()),
                _ => MessageWidget::None,
            },
            _ => MessageWidget::None,
        };

        self.panel_widget = match visible {
            Overlay::Panel { panel, .. } => match panel {
                Panel::PhotoViewer => PanelWidget::Photos(Carousel::new(self.photo_count)),
                Panel::BalanceGame => PanelWidget::Balance(BalanceGame::default()),
                Panel::Breathing => PanelWidget::Breathing(BreathingPacer::new()),
                Panel::Hugging => PanelWidget::Hug(HoldGesture::new()),
                Panel::ScratchCard => PanelWidget::Scratch(ScratchCard::new(&mut self.rng)),
                Panel::Diagnosis => PanelWidget::Diagnosis(Diagnosis::new()),
                _ => PanelWidget::None,
            },
            _ => PanelWidget::None,
        };
    }
}
