use gtk::pango;
use gtk::prelude::*;
use gtk4 as gtk;
use nightsky::letters::TextMeasure;

/// Vertical padding of the composer box around its text.
const COMPOSER_PADDING: f64 = 16.0;

/// Measures text with the composer's own font and wrap width.
pub struct PangoMeasure {
    layout: pango::Layout,
}

impl PangoMeasure {
    pub fn for_view(view: &gtk::TextView) -> Self {
        let layout = view.create_pango_layout(None);
        let width = view.width().max(1);
        layout.set_width(width * pango::SCALE);
        layout.set_wrap(pango::WrapMode::WordChar);
        Self { layout }
    }
}

impl TextMeasure for PangoMeasure {
    fn height(&self, text: &str) -> f64 {
        // An empty layout still occupies one line.
        self.layout.set_text(if text.is_empty() { " " } else { text });
        f64::from(self.layout.pixel_size().1) + COMPOSER_PADDING
    }
}
