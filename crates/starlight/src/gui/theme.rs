use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub sky_top: Srgba<f64>,
    pub sky_bottom: Srgba<f64>,
    pub star: Srgba<f64>,
    pub star_lit: Srgba<f64>,
    pub path: Srgba<f64>,
    pub letter: Srgba<f64>,
    pub veil: Srgba<f64>,
    pub heart: Srgba<f64>,
    pub coating: Srgba<f64>,
    pub ink: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            sky_top: Self::lookup_color(context, "sky_top", Srgba::new(0.02, 0.03, 0.08, 1.0), None),
            sky_bottom: Self::lookup_color(
                context,
                "sky_bottom",
                Srgba::new(0.07, 0.09, 0.2, 1.0),
                None,
            ),
            star: Self::lookup_color(context, "star_color", Srgba::new(1.0, 1.0, 1.0, 0.7), None),
            star_lit: Self::lookup_color(
                context,
                "star_lit_color",
                Srgba::new(1.0, 0.91, 0.5, 1.0),
                None,
            ),
            path: Self::lookup_color(
                context,
                "star_lit_color",
                Srgba::new(1.0, 0.91, 0.5, 0.6),
                Some(0.6),
            ),
            letter: Self::lookup_color(
                context,
                "letter_color",
                Srgba::new(0.66, 0.85, 1.0, 0.95),
                None,
            ),
            veil: Self::lookup_color(context, "veil_color", Srgba::new(0.02, 0.03, 0.05, 0.7), None),
            heart: Self::lookup_color(context, "heart_color", Srgba::new(1.0, 0.48, 0.56, 0.95), None),
            coating: Self::lookup_color(
                context,
                "coating_color",
                Srgba::new(0.75, 0.75, 0.75, 1.0),
                None,
            ),
            ink: Self::lookup_color(context, "theme_fg_color", Srgba::new(0.4, 0.4, 0.4, 1.0), None),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// CSS class naming the host OS, e.g. `platform-linux`.
pub fn platform_class() -> String {
    format!("platform-{}", std::env::consts::OS)
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
@define-color sky_top #05070d;
@define-color sky_bottom #121733;
@define-color star_lit_color #ffe87f;
@define-color letter_color #a8d8ff;
@define-color heart_color #ff7a90;

.starlight-window, .sky-area {
    background: none;
    background-color: #05070d;
}

.greeting {
    color: rgba(255, 232, 127, 0.85);
    font-size: 15px;
}

.panel {
    background-color: rgba(10, 14, 30, 0.88);
    border: 1px solid rgba(255, 232, 127, 0.35);
    border-radius: 18px;
    padding: 20px;
    color: #f4f1e6;
}

.panel-title {
    color: #ffe87f;
    font-weight: bold;
    font-size: 18px;
}

.panel-body {
    font-size: 14px;
}

.panel button {
    border-radius: 14px;
}

button.picked {
    background: rgba(255, 232, 127, 0.35);
    color: #ffe87f;
}

.moon-button, .guide-button {
    background: none;
    border: none;
    font-size: 26px;
}

.notice {
    background-color: rgba(20, 24, 48, 0.95);
    border-radius: 14px;
    padding: 14px;
    color: #f4f1e6;
}

.composer {
    background-color: rgba(255, 255, 255, 0.06);
    border-radius: 10px;
    padding: 8px;
}

.platform-windows .panel-body, .platform-macos .panel-body {
    font-size: 15px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_class() {
        let class = platform_class();
        assert!(class.starts_with("platform-"));
        assert!(class.len() > "platform-".len());
    }
}
