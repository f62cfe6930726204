//! GTK widgets for the overlay above the sky. A panel is rebuilt whenever its
//! [`PanelKey`] changes; smaller updates go through [`PanelView::sync`].

use crate::config::MediaConfig;
use crate::gui::app::{AppModel, AppMsg};
use crate::gui::canvas;
use crate::gui::theme::ThemeColors;
use gtk::prelude::*;
use gtk4 as gtk;
use nightsky::content::{BALANCE_QUESTIONS, GUIDE_EXTRAS, GUIDE_STEPS, TMI_LIST};
use nightsky::widgets::{
    BreathPhase, DiagnosisPhase, HoldState, IntroFade, PraiseTopic, Side,
};
use nightsky::{Feature, MessageWidget, Overlay, Panel, PanelWidget, Sky};
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use strum::IntoEnumIterator;

const PANEL_WIDTH: i32 = 320;
const PHOTO_HEIGHT: i32 = 420;
const CANVAS_SIZE: i32 = 260;

const HUG_HINT: &str = "3초간 꾹 눌러봐";
const DIAGNOSIS_IDLE: &str = "버튼을 누르고 어디가 아픈지 말해줘";
const DIAGNOSIS_RECORDING: &str = "가은쌤이 듣고 있어... (말하는 중)";

/// Identity of the panel currently on screen. Changes only on transitions
/// that need a different widget tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelKey {
    overlay: Overlay,
    detail: String,
}

pub fn panel_key(sky: &Sky) -> PanelKey {
    let overlay = sky.visible();
    let detail = match (sky.message_widget(), sky.panel_widget()) {
        (MessageWidget::Praise(picker), _) => format!("{:?}", picker.active()),
        (_, PanelWidget::Photos(carousel)) => carousel.index().to_string(),
        (_, PanelWidget::Breathing(pacer)) => pacer.phase().to_string(),
        // Press and release must reach the same widget, so holding does not rebuild.
        (_, PanelWidget::Hug(hug)) => match hug.state() {
            HoldState::Waiting | HoldState::Holding => "hold".to_string(),
            state => format!("{:?}", state),
        },
        (_, PanelWidget::Diagnosis(diagnosis)) => match diagnosis.phase() {
            DiagnosisPhase::Idle | DiagnosisPhase::Recording => "listen".to_string(),
            phase => format!("{:?}", phase),
        },
        (_, PanelWidget::Scratch(card)) => card.is_revealed().to_string(),
        _ => match overlay {
            Overlay::Panel {
                panel: Panel::StarLetter,
                ..
            } => sky.letters().is_flying().to_string(),
            _ => String::new(),
        },
    };
    PanelKey { overlay, detail }
}

pub fn collected_text(count: usize) -> String {
    format!("별을 안전하게 수거하였습니다.\n(수거한 별: {}개)", count)
}

pub struct PanelView {
    pub root: gtk::Widget,
    pub canvas: Option<gtk::DrawingArea>,
    pub composer: Option<gtk::TextView>,
    status: Option<gtk::Label>,
    balance: Vec<(u32, gtk::Button, gtk::Button)>,
}

impl PanelView {
    fn new(root: impl IsA<gtk::Widget>) -> Self {
        Self {
            root: root.upcast(),
            canvas: None,
            composer: None,
            status: None,
            balance: Vec::new(),
        }
    }

    pub fn sync(&self, sky: &Sky) {
        match sky.panel_widget() {
            PanelWidget::Hug(hug) => {
                if let Some(status) = &self.status {
                    status.set_opacity(if hug.state() == HoldState::Waiting { 0.8 } else { 0.0 });
                }
            }
            PanelWidget::Diagnosis(diagnosis) => {
                if let Some(status) = &self.status {
                    status.set_label(match diagnosis.phase() {
                        DiagnosisPhase::Recording => DIAGNOSIS_RECORDING,
                        _ => DIAGNOSIS_IDLE,
                    });
                }
            }
            PanelWidget::Balance(game) => {
                for (id, left, right) in &self.balance {
                    let choice = game.choice(*id);
                    set_picked(left, choice == Some(Side::Left));
                    set_picked(right, choice == Some(Side::Right));
                }
            }
            _ => {}
        }
    }
}

fn set_picked(button: &gtk::Button, picked: bool) {
    if picked {
        button.add_css_class("picked");
    } else {
        button.remove_css_class("picked");
    }
}

fn card() -> gtk::Box {
    let card = gtk::Box::new(gtk::Orientation::Vertical, 14);
    card.add_css_class("panel");
    card.set_width_request(PANEL_WIDTH);
    card
}

fn title(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("panel-title");
    label.set_wrap(true);
    label.set_justify(gtk::Justification::Center);
    label
}

fn body(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("panel-body");
    label.set_wrap(true);
    label.set_wrap_mode(gtk::pango::WrapMode::WordChar);
    label.set_justify(gtk::Justification::Center);
    label.set_max_width_chars(28);
    label
}

fn button(label: &str, sender: &ComponentSender<AppModel>, msg: AppMsg) -> gtk::Button {
    let button = gtk::Button::with_label(label);
    let sender = sender.clone();
    button.connect_clicked(move |_| sender.input(msg.clone()));
    button
}

fn row(children: &[&gtk::Button]) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    row.set_halign(gtk::Align::Center);
    row.set_homogeneous(true);
    for child in children {
        row.append(*child);
    }
    row
}

fn media_controls(path: &Path, sender: &ComponentSender<AppModel>) -> gtk::MediaControls {
    let media = gtk::MediaFile::for_filename(path);
    let sender = sender.clone();
    media.connect_playing_notify(move |m| sender.input(AppMsg::AudioPlaying(m.is_playing())));
    gtk::MediaControls::new(Some(&media))
}

fn audio_or_note(
    path: Option<&Path>,
    sender: &ComponentSender<AppModel>,
) -> gtk::Widget {
    match path {
        Some(path) => media_controls(path, sender).upcast(),
        None => body("오디오 파일이 설정되지 않았어요.").upcast(),
    }
}

fn photo(path: &Path) -> gtk::Widget {
    match gdk_pixbuf::Pixbuf::from_file_at_scale(path, PANEL_WIDTH, PHOTO_HEIGHT, true) {
        Ok(pixbuf) => {
            let texture = gtk::gdk::Texture::for_pixbuf(&pixbuf);
            let picture = gtk::Picture::for_paintable(&texture);
            picture.set_content_fit(gtk::ContentFit::Contain);
            picture.set_size_request(PANEL_WIDTH, PHOTO_HEIGHT);
            picture.upcast()
        }
        Err(e) => {
            log::warn!("Failed to load photo {}: {}", path.display(), e);
            body("사진을 불러오지 못했어요.").upcast()
        }
    }
}

/// A drawing area repainted from the current panel widget on every frame.
fn canvas_for(
    sky: &Rc<RefCell<Sky>>,
    width: i32,
    height: i32,
    draw: fn(&cairo::Context, &PanelWidget, &ThemeColors, f64, f64) -> Result<(), cairo::Error>,
) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::new();
    area.set_content_width(width);
    area.set_content_height(height);
    area.set_halign(gtk::Align::Center);
    let sky = sky.clone();
    area.set_draw_func(move |area, cr, w, h| {
        let colors = ThemeColors::from_context(&area.style_context());
        if let Err(e) = draw(cr, sky.borrow().panel_widget(), &colors, w as f64, h as f64) {
            log::error!("Drawing error: {}", e);
        }
    });
    area
}

fn draw_hug(
    cr: &cairo::Context,
    widget: &PanelWidget,
    colors: &ThemeColors,
    w: f64,
    h: f64,
) -> Result<(), cairo::Error> {
    match widget {
        PanelWidget::Hug(hug) => canvas::draw_hug(cr, hug, colors, w, h),
        _ => Ok(()),
    }
}

fn draw_scratch(
    cr: &cairo::Context,
    widget: &PanelWidget,
    colors: &ThemeColors,
    _w: f64,
    _h: f64,
) -> Result<(), cairo::Error> {
    match widget {
        PanelWidget::Scratch(card) => canvas::draw_scratch(cr, card, colors),
        _ => Ok(()),
    }
}

fn draw_breathing(
    cr: &cairo::Context,
    widget: &PanelWidget,
    colors: &ThemeColors,
    w: f64,
    h: f64,
) -> Result<(), cairo::Error> {
    match widget {
        PanelWidget::Breathing(pacer) => canvas::draw_breathing(cr, pacer, colors, w, h),
        _ => Ok(()),
    }
}

fn draw_diagnosis(
    cr: &cairo::Context,
    widget: &PanelWidget,
    colors: &ThemeColors,
    w: f64,
    h: f64,
) -> Result<(), cairo::Error> {
    match widget {
        PanelWidget::Diagnosis(diagnosis) => canvas::draw_diagnosis(cr, diagnosis, colors, w, h),
        _ => Ok(()),
    }
}

/// Press and release on `area` become the two given messages.
fn hold_gesture(
    area: &impl IsA<gtk::Widget>,
    sender: &ComponentSender<AppModel>,
    press: AppMsg,
    release: AppMsg,
) {
    let drag = gtk::GestureDrag::new();
    {
        let sender = sender.clone();
        drag.connect_drag_begin(move |_, _, _| sender.input(press.clone()));
    }
    {
        let sender = sender.clone();
        let release = release.clone();
        drag.connect_drag_end(move |_, _, _| sender.input(release.clone()));
    }
    {
        let sender = sender.clone();
        drag.connect_cancel(move |_, _| sender.input(release.clone()));
    }
    area.add_controller(drag);
}

pub fn build(
    sky_cell: &Rc<RefCell<Sky>>,
    media: &MediaConfig,
    sender: &ComponentSender<AppModel>,
) -> Option<PanelView> {
    let sky = sky_cell.borrow();
    match sky.visible() {
        Overlay::Sky => None,
        Overlay::Guide => Some(guide(sender)),
        Overlay::Message(id) => {
            let star = sky.catalog().get(id)?;
            let message = star.message.as_ref()?;
            Some(message_panel(
                &sky,
                message.label,
                message.body,
                message.feature,
                media,
                sender,
            ))
        }
        Overlay::Panel { panel, .. } => Some(widget_panel(&sky, sky_cell, panel, media, sender)),
    }
}

fn guide(sender: &ComponentSender<AppModel>) -> PanelView {
    let card = card();
    card.append(&title("밤하늘 이용 가이드"));
    for (i, step) in GUIDE_STEPS.iter().enumerate() {
        card.append(&body(&format!("{}. {}", i + 1, step)));
    }
    for (heading, text) in GUIDE_EXTRAS {
        card.append(&title(heading));
        card.append(&body(text));
    }
    card.append(&button("닫기", sender, AppMsg::Dismiss));
    PanelView::new(card)
}

fn message_panel(
    sky: &Sky,
    label: &str,
    text: &str,
    feature: Feature,
    media: &MediaConfig,
    sender: &ComponentSender<AppModel>,
) -> PanelView {
    let card = card();
    card.append(&title(label));

    let open = |label: &str, panel: Panel| button(label, sender, AppMsg::Open(panel));
    match feature {
        Feature::Praise => {
            let active = match sky.message_widget() {
                MessageWidget::Praise(picker) => picker.active(),
                _ => None,
            };
            match active {
                Some(topic) => card.append(&body(topic.message())),
                None => card.append(&body("아래 키워드 중 하나를 선택해봐!")),
            }
            let grid = gtk::FlowBox::new();
            grid.set_selection_mode(gtk::SelectionMode::None);
            grid.set_max_children_per_line(3);
            for topic in PraiseTopic::iter() {
                let b = button(&topic.to_string(), sender, AppMsg::PraiseToggle(topic));
                set_picked(&b, active == Some(topic));
                grid.insert(&b, -1);
            }
            card.append(&grid);
        }
        _ => card.append(&body(text)),
    }

    match feature {
        Feature::CourageAudio => {
            card.append(&audio_or_note(media.courage_audio.as_deref(), sender));
        }
        Feature::Scratch => card.append(&open("행운의 스크래치 카드 🍀", Panel::ScratchCard)),
        Feature::Diagnosis => card.append(&open("🚑 가은쌤한테 진단 받기", Panel::Diagnosis)),
        Feature::Letter => card.append(&open("✨ 별과 얘기하기", Panel::StarLetter)),
        Feature::Bored => card.append(&open("여전히 심심하다면?", Panel::BoredMenu)),
        Feature::Breathing => card.append(&open("함께 숨 고르기 🌬️", Panel::Breathing)),
        Feature::Hug => card.append(&open("포옹 보내기 💝", Panel::Hugging)),
        Feature::Plain | Feature::Fireworks | Feature::Secret | Feature::Praise => {}
    }
    PanelView::new(card)
}

fn widget_panel(
    sky: &Sky,
    sky_cell: &Rc<RefCell<Sky>>,
    panel: Panel,
    media: &MediaConfig,
    sender: &ComponentSender<AppModel>,
) -> PanelView {
    let card = card();
    let mut view = PanelView::new(card.clone());
    let close = |label: &str| button(label, sender, AppMsg::Dismiss);

    match panel {
        Panel::ConfirmQuestion => {
            card.append(&title("혹시 가은이가 보고 싶으신가요?"));
            card.append(&row(&[
                &button("YES", sender, AppMsg::AnswerQuestion),
                &button("NO", sender, AppMsg::AnswerQuestion),
            ]));
        }
        Panel::PhotoViewer => {
            let index = match sky.panel_widget() {
                PanelWidget::Photos(carousel) => carousel.index(),
                _ => 0,
            };
            let frame = gtk::Box::new(gtk::Orientation::Vertical, 0);
            match media.photos.get(index) {
                Some(path) => frame.append(&photo(path)),
                None => frame.append(&body("보여줄 사진이 없어요.")),
            }
            swipe_gesture(&frame, sender);
            card.append(&frame);
            card.append(&body("보고 싶었지?"));
            if media.photos.len() > 1 {
                card.append(&body(&format!("{} / {}", index + 1, media.photos.len())));
                card.append(&row(&[
                    &button("◀", sender, AppMsg::PhotoPrevious),
                    &button("▶", sender, AppMsg::PhotoNext),
                ]));
            }
            card.append(&close("닫기"));
        }
        Panel::BoredMenu => {
            card.append(&title("뭐 하고 놀까?"));
            card.append(&button(
                "N의 상상력을 자극하라! 밸런스 게임",
                sender,
                AppMsg::Open(Panel::BalanceGame),
            ));
            card.append(&button(
                "가으니의 누구도 궁금해 하지 않은 TMI",
                sender,
                AppMsg::Open(Panel::TmiList),
            ));
            card.append(&button(
                "여기가 바로 퀸크루즈 노래연습장",
                sender,
                AppMsg::Open(Panel::Karaoke),
            ));
            card.append(&close("닫기"));
        }
        Panel::BalanceGame => {
            card.append(&title("밸런스 게임"));
            let list = gtk::Box::new(gtk::Orientation::Vertical, 12);
            for q in BALANCE_QUESTIONS {
                list.append(&body(&format!("Q{}", q.id)));
                let left = button(q.left, sender, AppMsg::BalancePick(q.id, Side::Left));
                let right = button(q.right, sender, AppMsg::BalancePick(q.id, Side::Right));
                for b in [&left, &right] {
                    if let Some(label) = b.child().and_downcast::<gtk::Label>() {
                        label.set_wrap(true);
                    }
                }
                list.append(&row(&[&left, &right]));
                view.balance.push((q.id, left, right));
            }
            card.append(&scrolled(&list));
            card.append(&close("완료!"));
        }
        Panel::TmiList => {
            card.append(&title("가으니의 TMI"));
            let list = gtk::Box::new(gtk::Orientation::Vertical, 12);
            for item in TMI_LIST {
                list.append(&body(item));
            }
            card.append(&scrolled(&list));
            card.append(&close("다 읽었어!"));
        }
        Panel::Karaoke => {
            card.append(&title("🎤 퀸크루즈 노래연습장"));
            card.append(&audio_or_note(media.karaoke_audio.as_deref(), sender));
            card.append(&body("우리의 특별한 노래를 들어봐 🎵"));
            card.append(&close("나가기"));
        }
        Panel::Breathing => {
            let phase = match sky.panel_widget() {
                PanelWidget::Breathing(pacer) => pacer.phase(),
                _ => BreathPhase::Inhale,
            };
            let canvas = canvas_for(sky_cell, CANVAS_SIZE, CANVAS_SIZE, draw_breathing);
            card.append(&canvas);
            card.append(&title(match phase {
                BreathPhase::Inhale => "들이마시기",
                BreathPhase::Exhale => "내쉬기",
            }));
            card.append(&body("원을 따라 천천히 호흡해 보세요."));
            card.append(&close("닫기"));
            view.canvas = Some(canvas);
        }
        Panel::Hugging => {
            let state = match sky.panel_widget() {
                PanelWidget::Hug(hug) => hug.state(),
                _ => HoldState::Waiting,
            };
            if state == HoldState::Finished {
                card.append(&title("포옹 에너지 전달 완료!"));
            } else {
                let status = body(HUG_HINT);
                card.append(&status);
                view.status = Some(status);
            }
            let canvas = canvas_for(sky_cell, CANVAS_SIZE, CANVAS_SIZE, draw_hug);
            hold_gesture(&canvas, sender, AppMsg::HugPress, AppMsg::HugRelease);
            card.append(&canvas);
            card.append(&close("닫기"));
            view.canvas = Some(canvas);
        }
        Panel::ScratchCard => {
            let (width, height, revealed) = match sky.panel_widget() {
                PanelWidget::Scratch(card) => {
                    (card.width() as i32, card.height() as i32, card.is_revealed())
                }
                _ => (0, 0, false),
            };
            card.append(&body(if revealed { "💝" } else { "손가락으로 문질러봐!" }));
            let canvas = canvas_for(sky_cell, width, height, draw_scratch);
            scratch_gesture(&canvas, sender);
            card.append(&canvas);
            card.append(&close("닫기"));
            view.canvas = Some(canvas);
        }
        Panel::Diagnosis => {
            let phase = match sky.panel_widget() {
                PanelWidget::Diagnosis(diagnosis) => diagnosis.phase(),
                _ => DiagnosisPhase::Idle,
            };
            match phase {
                DiagnosisPhase::Intro(fade) => {
                    let intro = body(
                        "안녕하세요\n가은쌤의 마음클리닉입니다.\n\n버튼을 누르고 증상을 얘기해 주세요.",
                    );
                    intro.set_opacity(match fade {
                        IntroFade::FadingIn => 1.0,
                        IntroFade::Hidden | IntroFade::FadingOut => 0.0,
                    });
                    card.append(&intro);
                }
                DiagnosisPhase::Idle | DiagnosisPhase::Recording => {
                    let status = body(DIAGNOSIS_IDLE);
                    card.append(&status);
                    let canvas = canvas_for(sky_cell, CANVAS_SIZE, CANVAS_SIZE, draw_diagnosis);
                    hold_gesture(
                        &canvas,
                        sender,
                        AppMsg::DiagnosisPress,
                        AppMsg::DiagnosisRelease,
                    );
                    card.append(&canvas);
                    view.status = Some(status);
                    view.canvas = Some(canvas);
                }
                DiagnosisPhase::Processing => {
                    card.append(&body("진단 중... 가은쌤 분석 중..."));
                }
                DiagnosisPhase::Result(verdict) => {
                    card.append(&title("진단 결과"));
                    card.append(&body(verdict));
                }
            }
            card.append(&close("돌아가기"));
        }
        Panel::StarLetter => {
            let flying = sky.letters().is_flying();
            card.append(&body("밤하늘에 보낼 메시지를\n적어보세요"));
            let composer = gtk::TextView::new();
            composer.add_css_class("composer");
            composer.set_wrap_mode(gtk::WrapMode::WordChar);
            composer.set_sensitive(!flying);
            composer.set_size_request(PANEL_WIDTH - 40, -1);
            let buffer = composer.buffer();
            buffer.set_text(sky.letters().composer().text());
            {
                let sender = sender.clone();
                buffer.connect_changed(move |b| {
                    let text = b.text(&b.start_iter(), &b.end_iter(), false);
                    sender.input(AppMsg::EditLetter(text.to_string()));
                });
            }
            card.append(&composer);
            if !flying {
                card.append(&row(&[
                    &button("별 띄우기 ✨", sender, AppMsg::SendLetter),
                    &close("닫기"),
                ]));
            }
            view.composer = Some(composer);
        }
        Panel::CollectConfirm => {
            card.append(&title("별을 수거하시겠습니까?"));
            card.append(&row(&[
                &button("YES", sender, AppMsg::ConfirmCollect),
                &close("NO"),
            ]));
        }
        Panel::CollectionComplete { count } => {
            card.append(&body(&collected_text(count)));
            card.append(&close("확인"));
        }
    }
    view
}

fn scrolled(child: &impl IsA<gtk::Widget>) -> gtk::ScrolledWindow {
    let window = gtk::ScrolledWindow::new();
    window.set_policy(gtk::PolicyType::Never, gtk::PolicyType::Automatic);
    window.set_min_content_height(360);
    window.set_child(Some(child));
    window
}

fn swipe_gesture(area: &impl IsA<gtk::Widget>, sender: &ComponentSender<AppModel>) {
    let drag = gtk::GestureDrag::new();
    {
        let sender = sender.clone();
        drag.connect_drag_begin(move |_, x, _| sender.input(AppMsg::PhotoTouchStart(x)));
    }
    {
        let sender = sender.clone();
        drag.connect_drag_update(move |gesture, dx, _| {
            if let Some((x, _)) = gesture.start_point() {
                sender.input(AppMsg::PhotoTouchMove(x + dx));
            }
        });
    }
    {
        let sender = sender.clone();
        drag.connect_drag_end(move |_, _, _| sender.input(AppMsg::PhotoTouchEnd));
    }
    area.add_controller(drag);
}

fn scratch_gesture(area: &gtk::DrawingArea, sender: &ComponentSender<AppModel>) {
    let drag = gtk::GestureDrag::new();
    {
        let sender = sender.clone();
        drag.connect_drag_begin(move |_, x, y| sender.input(AppMsg::ScratchPress(x, y)));
    }
    {
        let sender = sender.clone();
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some((x, y)) = gesture.start_point() {
                sender.input(AppMsg::ScratchDrag(x + dx, y + dy));
            }
        });
    }
    {
        let sender = sender.clone();
        drag.connect_drag_end(move |_, _, _| sender.input(AppMsg::ScratchRelease));
    }
    area.add_controller(drag);
}
