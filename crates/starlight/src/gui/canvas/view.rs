use super::{
    BREATH_MAX_RADIUS, BREATH_MIN_RADIUS, DIAGNOSIS_RADIUS, FADING_GLOW_RADIUS, FLIGHT_ORIGIN,
    HEART_SIZE, LETTER_GLOW_RADIUS, LETTER_RADIUS, LIT_GLOW_RADIUS, MESSAGE_STAR_RADIUS,
    PATH_WIDTH, STAR_RADIUS,
};
use crate::gui::theme::ThemeColors;
use cairo::{Context, LinearGradient, RadialGradient};
use nightsky::widgets::fireworks::TRAIL_ALPHA;
use nightsky::widgets::{
    BreathPhase, BreathingPacer, Diagnosis, DiagnosisPhase, HoldGesture, HoldState, ParticleBurst,
    ScratchCard,
};
use nightsky::{Highlighter, MessageWidget, Overlay, Position, Sky};
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn with_alpha(color: Srgba<f64>, alpha: f64) -> Srgba<f64> {
    Srgba::new(color.red, color.green, color.blue, color.alpha * alpha)
}

fn glow(cr: &Context, x: f64, y: f64, radius: f64, color: Srgba<f64>) -> Result<(), cairo::Error> {
    let gradient = RadialGradient::new(x, y, 0.0, x, y, radius);
    let (r, g, b, a) = color.into_components();
    gradient.add_color_stop_rgba(0.0, r, g, b, a);
    gradient.add_color_stop_rgba(0.4, r, g, b, a * 0.35);
    gradient.add_color_stop_rgba(1.0, r, g, b, 0.0);
    cr.set_source(&gradient)?;
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

fn dot(cr: &Context, x: f64, y: f64, radius: f64, color: Srgba<f64>) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

fn centered_text(
    cr: &Context,
    text: &str,
    x: f64,
    y: f64,
    size: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(x - ext.width() / 2.0, y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}

pub fn draw_sky(
    cr: &Context,
    sky: &Sky,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    draw_background(cr, colors, width, height)?;
    if let Highlighter::Seasonal(constellation) = sky.highlighter() {
        let points = sky.catalog().path(&constellation.path());
        draw_path(cr, &points, constellation.path_progress(), colors, width, height)?;
    }
    draw_stars(cr, sky, colors, width, height)?;
    draw_letters(cr, sky, colors, width, height)?;
    draw_veil(cr, sky, colors, width, height)?;
    if let MessageWidget::Fireworks(burst) = sky.message_widget() {
        draw_fireworks(cr, burst, colors, width, height)?;
    }
    Ok(())
}

fn draw_background(
    cr: &Context,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let gradient = LinearGradient::new(0.0, 0.0, 0.0, height);
    let (r, g, b, a) = colors.sky_top.into_components();
    gradient.add_color_stop_rgba(0.0, r, g, b, a);
    let (r, g, b, a) = colors.sky_bottom.into_components();
    gradient.add_color_stop_rgba(1.0, r, g, b, a);
    cr.set_source(&gradient)?;
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()
}

/// Strokes the first `progress` share of the polyline's length.
fn draw_path(
    cr: &Context,
    points: &[Position],
    progress: f64,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let pixels: Vec<(f64, f64)> = points.iter().map(|p| p.to_pixels(width, height)).collect();
    let total: f64 = pixels
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .sum();
    if pixels.len() < 2 || total <= 0.0 || progress <= 0.0 {
        return Ok(());
    }

    let mut remaining = total * progress;
    cr.move_to(pixels[0].0, pixels[0].1);
    for w in pixels.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = (b.0 - a.0).hypot(b.1 - a.1);
        if remaining >= len {
            cr.line_to(b.0, b.1);
            remaining -= len;
        } else {
            let t = remaining / len;
            cr.line_to(a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
            break;
        }
    }
    set_color(cr, colors.path);
    cr.set_line_width(PATH_WIDTH);
    cr.set_line_cap(cairo::LineCap::Round);
    cr.stroke()
}

fn draw_stars(
    cr: &Context,
    sky: &Sky,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let highlighter = sky.highlighter();
    for star in sky.catalog().stars() {
        let (x, y) = star.position.to_pixels(width, height);
        if highlighter.is_lit(star.id) {
            glow(cr, x, y, LIT_GLOW_RADIUS, colors.star_lit)?;
            dot(cr, x, y, MESSAGE_STAR_RADIUS, colors.star_lit)?;
        } else if highlighter.is_fading(star.id) {
            glow(cr, x, y, FADING_GLOW_RADIUS, with_alpha(colors.star_lit, 0.5))?;
            dot(cr, x, y, MESSAGE_STAR_RADIUS, colors.star)?;
        } else if star.is_message_bearing() {
            dot(cr, x, y, MESSAGE_STAR_RADIUS, colors.star)?;
        } else {
            dot(cr, x, y, STAR_RADIUS, with_alpha(colors.star, 0.7))?;
        }
    }
    Ok(())
}

fn draw_letters(
    cr: &Context,
    sky: &Sky,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    for letter in sky.letters().stars() {
        let (x, y) = letter.position().to_pixels(width, height);
        glow(cr, x, y, LETTER_GLOW_RADIUS, with_alpha(colors.letter, 0.6))?;
        dot(cr, x, y, LETTER_RADIUS, colors.letter)?;
    }

    if let Some((flight, progress)) = sky.flight() {
        let (sx, sy) = Position::new(FLIGHT_ORIGIN.0, FLIGHT_ORIGIN.1).to_pixels(width, height);
        let (tx, ty) = flight.target.to_pixels(width, height);
        // Ease out: fast launch, soft arrival.
        let t = 1.0 - (1.0 - progress).powi(3);
        let (x, y) = (sx + (tx - sx) * t, sy + (ty - sy) * t);
        glow(cr, x, y, LETTER_GLOW_RADIUS * 1.5, colors.letter)?;
        dot(cr, x, y, LETTER_RADIUS * 1.5, colors.letter)?;
    }
    Ok(())
}

/// Darkens the sky behind an open star, spreading from where it was clicked.
fn draw_veil(
    cr: &Context,
    sky: &Sky,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let strength = match sky.visible() {
        Overlay::Sky => 0.0,
        Overlay::Guide | Overlay::Message(_) => 0.75,
        Overlay::Panel { .. } => 0.9,
    };
    let strength = if sky.is_dimmed() { 1.0 } else { strength };
    if strength <= 0.0 {
        return Ok(());
    }

    let origin = sky
        .scene()
        .view()
        .map(|v| v.origin)
        .unwrap_or(Position::new(50.0, 50.0));
    let (ox, oy) = origin.to_pixels(width, height);
    let reach = width.hypot(height);
    let gradient = RadialGradient::new(ox, oy, 0.0, ox, oy, reach);
    let (r, g, b, a) = colors.veil.into_components();
    gradient.add_color_stop_rgba(0.0, r, g, b, a * strength * 0.8);
    gradient.add_color_stop_rgba(1.0, r, g, b, (a * strength).min(1.0));
    cr.set_source(&gradient)?;
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()
}

fn draw_fireworks(
    cr: &Context,
    burst: &ParticleBurst,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    // Trail wash.
    set_color(cr, with_alpha(colors.sky_top, TRAIL_ALPHA));
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()?;

    for p in burst.particles() {
        let (r, g, b) = (
            f64::from((p.color >> 16) & 0xff) / 255.0,
            f64::from((p.color >> 8) & 0xff) / 255.0,
            f64::from(p.color & 0xff) / 255.0,
        );
        cr.set_source_rgba(r, g, b, p.alpha.clamp(0.0, 1.0));
        cr.arc(p.x, p.y, p.radius, 0.0, 2.0 * PI);
        cr.fill()?;
    }
    Ok(())
}

fn heart_path(cr: &Context, cx: f64, cy: f64, size: f64) {
    let s = size / 2.0;
    cr.move_to(cx, cy + s * 0.9);
    cr.curve_to(cx - s * 1.6, cy - s * 0.1, cx - s * 0.6, cy - s * 1.3, cx, cy - s * 0.45);
    cr.curve_to(cx + s * 0.6, cy - s * 1.3, cx + s * 1.6, cy - s * 0.1, cx, cy + s * 0.9);
    cr.close_path();
}

pub fn draw_hug(
    cr: &Context,
    hug: &HoldGesture,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    match hug.state() {
        HoldState::Completed => {
            glow(cr, cx, cy, width.min(height) / 2.0, colors.heart)?;
        }
        HoldState::Finished => {
            heart_path(cr, cx, cy, HEART_SIZE);
            set_color(cr, colors.heart);
            cr.fill()?;
        }
        HoldState::Waiting | HoldState::Holding => {
            let size = HEART_SIZE * hug.scale();
            if hug.state() == HoldState::Holding {
                glow(cr, cx, cy, size, with_alpha(colors.heart, 0.4))?;
            }
            heart_path(cr, cx, cy, size);
            set_color(cr, colors.heart);
            cr.fill()?;
        }
    }
    Ok(())
}

pub fn draw_scratch(
    cr: &Context,
    card: &ScratchCard,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (w, h) = (card.width() as f64, card.height() as f64);
    set_color(cr, with_alpha(colors.star_lit, 0.2));
    cr.rectangle(0.0, 0.0, w, h);
    cr.fill()?;

    let message = card.message();
    centered_text(cr, message.text, w / 2.0, h / 2.0 - 12.0, 17.0, colors.star_lit)?;
    centered_text(cr, message.sub, w / 2.0, h / 2.0 + 18.0, 12.0, colors.star)?;

    if card.is_revealed() {
        return Ok(());
    }
    set_color(cr, colors.coating);
    for (y, start, end) in card.covered_runs() {
        cr.rectangle(start as f64, y as f64, (end - start) as f64, 1.0);
    }
    cr.fill()?;
    if card.fraction() == 0.0 {
        centered_text(cr, "문질러서 확인하세요!", w / 2.0, h / 2.0, 20.0, colors.ink)?;
    }
    Ok(())
}

pub fn draw_breathing(
    cr: &Context,
    pacer: &BreathingPacer,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    // Smooth in and out of each phase.
    let t = (1.0 - (pacer.phase_progress() * PI).cos()) / 2.0;
    let share = match pacer.phase() {
        BreathPhase::Inhale => t,
        BreathPhase::Exhale => 1.0 - t,
    };
    let radius = BREATH_MIN_RADIUS + (BREATH_MAX_RADIUS - BREATH_MIN_RADIUS) * share;
    let (cx, cy) = (width / 2.0, height / 2.0);
    glow(cr, cx, cy, radius * 1.4, with_alpha(colors.letter, 0.5))?;
    dot(cr, cx, cy, radius, with_alpha(colors.letter, 0.35))
}

pub fn draw_diagnosis(
    cr: &Context,
    diagnosis: &Diagnosis,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let color = match diagnosis.phase() {
        DiagnosisPhase::Recording => colors.heart,
        DiagnosisPhase::Processing => colors.letter,
        _ => colors.star_lit,
    };
    let radius = DIAGNOSIS_RADIUS * diagnosis.scale();
    glow(cr, cx, cy, radius * 1.5, with_alpha(color, 0.5))?;
    dot(cr, cx, cy, radius, with_alpha(color, 0.8))?;
    let icon = match diagnosis.phase() {
        DiagnosisPhase::Recording => "🎙️",
        _ => "🎤",
    };
    centered_text(cr, icon, cx, cy, DIAGNOSIS_RADIUS * 0.8, colors.ink)
}
