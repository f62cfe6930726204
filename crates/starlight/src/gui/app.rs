use crate::config::{self, Config, MediaConfig};
use crate::events::AppEvent;
use crate::gui::canvas;
use crate::gui::measure::PangoMeasure;
use crate::gui::panels::{self, PanelKey, PanelView};
use crate::gui::theme::{self, ThemeColors};
use crate::sys::microphone::SystemMicrophone;
use gtk::prelude::*;
use gtk4 as gtk;
use nightsky::content::daily_greeting;
use nightsky::widgets::{PraiseTopic, Side};
use nightsky::{Panel, Position, Sky};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

const MIC_DENIED: &str = "마이크 권한이 필요해요!";

pub struct AppModel {
    sky: Rc<RefCell<Sky>>,
    media: MediaConfig,
    microphone: SystemMicrophone,
    size: (f64, f64),
    idle: bool,
    notice: Option<String>,
    greeting: &'static str,
    sky_area: gtk::DrawingArea,
    panel_host: gtk::Box,
    panel: Option<PanelView>,
    panel_key: Option<PanelKey>,
}

#[derive(Debug, Clone)]
pub enum AppMsg {
    Frame(Duration),
    Resize(i32, i32),
    SkyClick(f64, f64),
    Moon,
    ShowGuide,
    Open(Panel),
    Dismiss,
    AnswerQuestion,
    ConfirmCollect,
    EditLetter(String),
    SendLetter,
    HugPress,
    HugRelease,
    ScratchPress(f64, f64),
    ScratchDrag(f64, f64),
    ScratchRelease,
    DiagnosisPress,
    DiagnosisRelease,
    PhotoNext,
    PhotoPrevious,
    PhotoTouchStart(f64),
    PhotoTouchMove(f64),
    PhotoTouchEnd,
    BalancePick(u32, Side),
    PraiseToggle(PraiseTopic),
    AudioPlaying(bool),
    CloseNotice,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Sky, Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Starlight"),
            set_default_size: (430, 860),
            add_css_class: "starlight-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Moon);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Overlay {
                #[name = "sky_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "sky-area",

                    connect_resize[sender] => move |_, w, h| {
                        sender.input(AppMsg::Resize(w, h));
                    },

                    add_controller = gtk::GestureClick {
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::SkyClick(x, y));
                        }
                    }
                },

                add_overlay = &gtk::Label {
                    add_css_class: "greeting",
                    set_label: model.greeting,
                    set_justify: gtk::Justification::Center,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 48,
                    set_can_target: false,
                    #[watch]
                    set_visible: model.idle,
                },

                #[name = "panel_host"]
                add_overlay = &gtk::Box {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Center,
                    #[watch]
                    set_visible: !model.idle,
                },

                add_overlay = &gtk::Button {
                    add_css_class: "moon-button",
                    set_label: "🌙",
                    set_halign: gtk::Align::End,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 16,
                    set_margin_end: 16,
                    #[watch]
                    set_visible: !model.idle,
                    connect_clicked => AppMsg::Moon,
                },

                add_overlay = &gtk::Button {
                    add_css_class: "guide-button",
                    set_label: "?",
                    set_halign: gtk::Align::End,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 16,
                    set_margin_end: 16,
                    #[watch]
                    set_visible: model.idle,
                    connect_clicked => AppMsg::ShowGuide,
                },

                add_overlay = &gtk::Revealer {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 72,
                    set_transition_type: gtk::RevealerTransitionType::SlideDown,
                    #[watch]
                    set_reveal_child: model.notice.is_some(),

                    gtk::Box {
                        add_css_class: "notice",
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 10,

                        gtk::Label {
                            set_wrap: true,
                            set_max_width_chars: 28,
                            set_justify: gtk::Justification::Center,
                            #[watch]
                            set_label: model.notice.as_deref().unwrap_or_default(),
                        },
                        gtk::Button {
                            set_label: "확인",
                            connect_clicked => AppMsg::CloseNotice,
                        },
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (sky, config, rx) = init;

        theme::load_css();
        root.add_css_class(&theme::platform_class());

        let model = AppModel {
            sky: Rc::new(RefCell::new(sky)),
            media: config.media,
            microphone: SystemMicrophone,
            size: (0.0, 0.0),
            idle: true,
            notice: None,
            greeting: daily_greeting(chrono::Local::now().date_naive()),
            sky_area: gtk::DrawingArea::default(),
            panel_host: gtk::Box::default(),
            panel: None,
            panel_key: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.sky_area = widgets.sky_area.clone();
        model.panel_host = widgets.panel_host.clone();

        let sky_draw = model.sky.clone();
        widgets.sky_area.set_draw_func(move |area, cr, w, h| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) = canvas::draw_sky(cr, &sky_draw.borrow(), &colors, w as f64, h as f64) {
                log::error!("Drawing error: {}", e);
            }
        });

        let last_frame = Cell::new(None::<i64>);
        let tick_sender = sender.clone();
        widgets.sky_area.add_tick_callback(move |_, clock| {
            let now = clock.frame_time();
            let dt = last_frame
                .replace(Some(now))
                .map_or(0, |prev| (now - prev).max(0) as u64);
            tick_sender.input(AppMsg::Frame(Duration::from_micros(dt)));
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Frame(dt) => self.sky.borrow_mut().advance(dt),
            AppMsg::Resize(w, h) => {
                self.size = (w as f64, h as f64);
                self.sky.borrow_mut().resize(self.size.0, self.size.1);
            }
            AppMsg::SkyClick(x, y) => self.click(x, y),
            AppMsg::Moon => {
                let outcome = self.sky.borrow_mut().reset();
                log::debug!("Moon pressed: {:?}", outcome);
            }
            AppMsg::ShowGuide => {
                self.sky.borrow_mut().show_guide();
            }
            AppMsg::Open(panel) => {
                if !self.sky.borrow_mut().open(panel) {
                    log::warn!("Panel {} is not reachable from here", panel);
                }
            }
            AppMsg::Dismiss => {
                self.sky.borrow_mut().dismiss();
            }
            AppMsg::AnswerQuestion => {
                self.sky.borrow_mut().answer_question();
            }
            AppMsg::ConfirmCollect => {
                if let Some(count) = self.sky.borrow_mut().confirm_collect() {
                    log::debug!("Collecting {} star letters", count);
                }
            }
            AppMsg::EditLetter(text) => self.edit_letter(&text),
            AppMsg::SendLetter => {
                self.sky.borrow_mut().send_letter();
            }
            AppMsg::HugPress => self.sky.borrow_mut().hug_press(),
            AppMsg::HugRelease => self.sky.borrow_mut().hug_release(),
            AppMsg::ScratchPress(x, y) => self.sky.borrow_mut().scratch_press(x, y),
            AppMsg::ScratchDrag(x, y) => self.sky.borrow_mut().scratch_drag(x, y),
            AppMsg::ScratchRelease => self.sky.borrow_mut().scratch_release(),
            AppMsg::DiagnosisPress => {
                if let Err(e) = self.sky.borrow_mut().diagnosis_press(&self.microphone) {
                    log::warn!("{}", e);
                    self.notice = Some(MIC_DENIED.to_string());
                }
            }
            AppMsg::DiagnosisRelease => self.sky.borrow_mut().diagnosis_release(),
            AppMsg::PhotoNext => self.sky.borrow_mut().photo_next(),
            AppMsg::PhotoPrevious => self.sky.borrow_mut().photo_previous(),
            AppMsg::PhotoTouchStart(x) => self.sky.borrow_mut().photo_touch_start(x),
            AppMsg::PhotoTouchMove(x) => self.sky.borrow_mut().photo_touch_move(x),
            AppMsg::PhotoTouchEnd => {
                if let Some(swipe) = self.sky.borrow_mut().photo_touch_end() {
                    log::trace!("Photo swipe: {:?}", swipe);
                }
            }
            AppMsg::BalancePick(question, side) => {
                self.sky.borrow_mut().balance_pick(question, side);
            }
            AppMsg::PraiseToggle(topic) => self.sky.borrow_mut().praise_toggle(topic),
            AppMsg::AudioPlaying(playing) => self.sky.borrow_mut().set_audio_playing(playing),
            AppMsg::CloseNotice => self.notice = None,
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.sky
                        .borrow_mut()
                        .set_photo_count(new_config.media.photos.len());
                    self.media = new_config.media;
                    self.panel_key = None;
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
        self.refresh(&sender);
    }
}

impl AppModel {
    fn click(&mut self, x: f64, y: f64) {
        let mut sky = self.sky.borrow_mut();
        if let Some(letter) = sky.letter_at(x, y) {
            self.notice = Some(format!("별의 기억: {}", letter.message));
            return;
        }
        if let Some(id) = sky.star_at(x, y) {
            let origin = Position::from_pixels(x, y, self.size.0, self.size.1);
            sky.click_star(id, origin);
        }
    }

    /// Refused edits put the last accepted text back into the view.
    fn edit_letter(&mut self, text: &str) {
        let Some(view) = self.panel.as_ref().and_then(|p| p.composer.clone()) else {
            return;
        };
        let measure = PangoMeasure::for_view(&view);
        let accepted = self.sky.borrow_mut().edit_letter(text, &measure);
        if !accepted {
            let previous = self.sky.borrow().letters().composer().text().to_string();
            view.buffer().set_text(&previous);
        }
    }

    fn refresh(&mut self, sender: &ComponentSender<Self>) {
        let key = {
            let mut sky = self.sky.borrow_mut();
            if let Some(count) = sky.take_collected_notice() {
                self.notice = Some(panels::collected_text(count));
            }
            self.idle = sky.scene().is_idle();
            panels::panel_key(&sky)
        };
        if self.panel_key.as_ref() != Some(&key) {
            while let Some(child) = self.panel_host.first_child() {
                self.panel_host.remove(&child);
            }
            self.panel = panels::build(&self.sky, &self.media, sender);
            if let Some(panel) = &self.panel {
                self.panel_host.append(&panel.root);
            }
            self.panel_key = Some(key);
        }
        if let Some(panel) = &self.panel {
            panel.sync(&self.sky.borrow());
            if let Some(canvas) = &panel.canvas {
                canvas.queue_draw();
            }
        }
        self.sky_area.queue_draw();
    }
}
