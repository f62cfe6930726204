use crate::stars::{Feature, Position, StarId};
use strum::{Display as StrumDisplay, IntoStaticStr};

/// One overlay on top of a selected star's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Panel {
    ConfirmQuestion,
    PhotoViewer,
    BoredMenu,
    BalanceGame,
    TmiList,
    Karaoke,
    Breathing,
    Hugging,
    ScratchCard,
    Diagnosis,
    StarLetter,
    CollectConfirm,
    CollectionComplete { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A button on the star's message panel.
    Message,
    /// Takes the place of the given panel.
    Replaces(Panel),
    /// Only reachable through a dedicated transition.
    Internal,
}

impl Panel {
    pub fn anchor(&self) -> Anchor {
        match self {
            Self::BoredMenu
            | Self::Breathing
            | Self::Hugging
            | Self::ScratchCard
            | Self::Diagnosis
            | Self::StarLetter => Anchor::Message,
            Self::BalanceGame | Self::TmiList | Self::Karaoke => Anchor::Replaces(Self::BoredMenu),
            Self::PhotoViewer => Anchor::Replaces(Self::ConfirmQuestion),
            Self::ConfirmQuestion | Self::CollectConfirm | Self::CollectionComplete { .. } => {
                Anchor::Internal
            }
        }
    }

    pub fn for_feature(feature: Feature) -> Option<Self> {
        match feature {
            Feature::Bored => Some(Self::BoredMenu),
            Feature::Hug => Some(Self::Hugging),
            Feature::Breathing => Some(Self::Breathing),
            Feature::Scratch => Some(Self::ScratchCard),
            Feature::Diagnosis => Some(Self::Diagnosis),
            Feature::Letter => Some(Self::StarLetter),
            Feature::Plain
            | Feature::Fireworks
            | Feature::Secret
            | Feature::CourageAudio
            | Feature::Praise => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarView {
    pub star: StarId,
    /// Click point in viewport percent; seeds the radial transition.
    pub origin: Position,
    secret_shown: bool,
    panels: Vec<Panel>,
}

impl StarView {
    fn new(star: StarId, origin: Position) -> Self {
        Self {
            star,
            origin,
            secret_shown: false,
            panels: Vec::new(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn top(&self) -> Option<Panel> {
        self.panels.last().copied()
    }

    pub fn secret_shown(&self) -> bool {
        self.secret_shown
    }
}

/// The whole modal state of the window. Exactly one overlay is visible for
/// any value of this type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scene {
    #[default]
    Idle,
    Guide,
    Star(StarView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Sky,
    Guide,
    Message(StarId),
    Panel { star: StarId, panel: Panel },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// A prompt was pushed instead of closing.
    Prompted(Panel),
    Popped(Panel),
    Closed,
    Ignored,
}

impl Scene {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn selected(&self) -> Option<StarId> {
        match self {
            Self::Star(view) => Some(view.star),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&StarView> {
        match self {
            Self::Star(view) => Some(view),
            _ => None,
        }
    }

    pub fn top(&self) -> Option<Panel> {
        self.view().and_then(StarView::top)
    }

    pub fn visible(&self) -> Overlay {
        match self {
            Self::Idle => Overlay::Sky,
            Self::Guide => Overlay::Guide,
            Self::Star(view) => match view.top() {
                Some(panel) => Overlay::Panel {
                    star: view.star,
                    panel,
                },
                None => Overlay::Message(view.star),
            },
        }
    }

    pub fn select(&mut self, star: StarId, origin: Position) -> bool {
        if !self.is_idle() {
            return false;
        }
        log::debug!("Star {} selected", star);
        *self = Self::Star(StarView::new(star, origin));
        true
    }

    pub fn show_guide(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Self::Guide;
        true
    }

    pub fn open(&mut self, panel: Panel) -> bool {
        let Self::Star(view) = self else {
            return false;
        };
        match (panel.anchor(), view.top()) {
            (Anchor::Message, None) => view.panels.push(panel),
            (Anchor::Replaces(parent), Some(top)) if top == parent => {
                view.panels.pop();
                view.panels.push(panel);
            }
            _ => return false,
        }
        log::debug!("Panel {} opened", panel);
        true
    }

    /// The "close me" path used by a panel's own button.
    pub fn dismiss(&mut self) -> Option<Panel> {
        match self {
            Self::Guide => {
                *self = Self::Idle;
                None
            }
            Self::Star(view) => view.panels.pop(),
            Self::Idle => None,
        }
    }

    /// The moon control. `has_secret` tells whether the selected star hides a
    /// question that must be asked before it closes.
    pub fn reset(&mut self, has_secret: bool) -> ResetOutcome {
        let view = match self {
            Self::Idle => return ResetOutcome::Ignored,
            Self::Guide => {
                *self = Self::Idle;
                return ResetOutcome::Closed;
            }
            Self::Star(view) => view,
        };

        match view.top() {
            Some(Panel::StarLetter) => {
                view.panels.push(Panel::CollectConfirm);
                ResetOutcome::Prompted(Panel::CollectConfirm)
            }
            Some(panel) => {
                view.panels.pop();
                ResetOutcome::Popped(panel)
            }
            None if has_secret && !view.secret_shown => {
                view.secret_shown = true;
                view.panels.push(Panel::ConfirmQuestion);
                ResetOutcome::Prompted(Panel::ConfirmQuestion)
            }
            None => {
                *self = Self::Idle;
                ResetOutcome::Closed
            }
        }
    }

    /// Either answer to the secret question leads to the photos.
    pub fn answer_question(&mut self) -> bool {
        self.open(Panel::PhotoViewer)
    }

    /// Drops the collect prompt and the letter composer underneath it.
    pub fn finish_collect(&mut self) -> bool {
        let Self::Star(view) = self else {
            return false;
        };
        if view.top() != Some(Panel::CollectConfirm) {
            return false;
        }
        view.panels.pop();
        if view.top() == Some(Panel::StarLetter) {
            view.panels.pop();
        }
        true
    }

    pub fn notify_collected(&mut self, count: usize) -> bool {
        let Self::Star(view) = self else {
            return false;
        };
        view.panels.push(Panel::CollectionComplete { count });
        true
    }

    pub fn close(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(id: u32) -> Scene {
        let mut scene = Scene::default();
        assert!(scene.select(StarId::new(id), Position::new(20.0, 30.0)));
        scene
    }

    #[test]
    fn test_select_only_from_idle() {
        let mut scene = selected(5);
        assert!(!scene.select(StarId::new(6), Position::default()));
        assert_eq!(scene.selected(), Some(StarId::new(5)));
        assert_eq!(scene.visible(), Overlay::Message(StarId::new(5)));
    }

    #[test]
    fn test_reset_pops_innermost_then_closes() {
        let mut scene = selected(11);
        assert!(scene.open(Panel::Breathing));
        assert_eq!(scene.reset(false), ResetOutcome::Popped(Panel::Breathing));
        assert_eq!(scene.visible(), Overlay::Message(StarId::new(11)));
        assert_eq!(scene.reset(false), ResetOutcome::Closed);
        assert!(scene.is_idle());
        assert_eq!(scene.reset(false), ResetOutcome::Ignored);
    }

    #[test]
    fn test_secret_star_asks_before_closing() {
        let mut scene = selected(9);
        assert_eq!(
            scene.reset(true),
            ResetOutcome::Prompted(Panel::ConfirmQuestion)
        );
        assert!(scene.answer_question());
        assert_eq!(scene.top(), Some(Panel::PhotoViewer));
        assert_eq!(scene.reset(true), ResetOutcome::Popped(Panel::PhotoViewer));
        // The question is asked only once per selection.
        assert_eq!(scene.reset(true), ResetOutcome::Closed);
    }

    #[test]
    fn test_letter_reset_prompts_collect() {
        let mut scene = selected(17);
        assert!(scene.open(Panel::StarLetter));
        assert_eq!(
            scene.reset(false),
            ResetOutcome::Prompted(Panel::CollectConfirm)
        );
        assert_eq!(scene.dismiss(), Some(Panel::CollectConfirm));
        assert_eq!(scene.top(), Some(Panel::StarLetter));

        scene.reset(false);
        assert!(scene.finish_collect());
        assert_eq!(scene.top(), None);
        assert!(scene.notify_collected(3));
        assert_eq!(
            scene.visible(),
            Overlay::Panel {
                star: StarId::new(17),
                panel: Panel::CollectionComplete { count: 3 }
            }
        );
    }

    #[test]
    fn test_bored_games_replace_the_menu() {
        let mut scene = selected(6);
        assert!(!scene.open(Panel::TmiList));
        assert!(scene.open(Panel::BoredMenu));
        assert!(!scene.open(Panel::Hugging));
        assert!(scene.open(Panel::BalanceGame));
        assert_eq!(scene.view().unwrap().panels(), &[Panel::BalanceGame]);
        assert_eq!(scene.dismiss(), Some(Panel::BalanceGame));
        assert_eq!(scene.visible(), Overlay::Message(StarId::new(6)));
    }

    #[test]
    fn test_internal_panels_cannot_be_opened_directly() {
        let mut scene = selected(17);
        assert!(!scene.open(Panel::CollectConfirm));
        assert!(!scene.open(Panel::ConfirmQuestion));
        assert!(!scene.answer_question());
    }

    #[test]
    fn test_guide_only_from_idle() {
        let mut scene = Scene::default();
        assert!(scene.show_guide());
        assert_eq!(scene.visible(), Overlay::Guide);
        assert!(!scene.select(StarId::new(5), Position::default()));
        assert_eq!(scene.reset(false), ResetOutcome::Closed);
        assert!(scene.is_idle());

        let mut scene = selected(5);
        assert!(!scene.show_guide());
    }

    #[test]
    fn test_panel_names() {
        assert_eq!(Panel::StarLetter.to_string(), "star-letter");
        assert_eq!(Panel::for_feature(Feature::Scratch), Some(Panel::ScratchCard));
        assert_eq!(Panel::for_feature(Feature::Praise), None);
    }
}
