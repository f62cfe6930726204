use derive_more::{AsRef, Deref, Display, From, Into};

pub const MAX_COMPOSER_HEIGHT: f64 = 140.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Display, Deref, From, Into, AsRef)]
pub struct LetterText(String);

crate::impl_string_newtype!(LetterText);

pub trait TextMeasure {
    fn height(&self, text: &str) -> f64;
}

/// A fixed-width line model: every `chars_per_line` characters wrap.
#[derive(Debug, Clone, Copy)]
pub struct LineModel {
    pub chars_per_line: usize,
    pub line_height: f64,
    pub padding: f64,
}

impl Default for LineModel {
    fn default() -> Self {
        Self {
            chars_per_line: 12,
            line_height: 24.0,
            padding: 16.0,
        }
    }
}

impl TextMeasure for LineModel {
    fn height(&self, text: &str) -> f64 {
        let per_line = self.chars_per_line.max(1);
        let lines: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        lines as f64 * self.line_height + self.padding
    }
}

/// The letter being written. Grows with its content until it would pass
/// [`MAX_COMPOSER_HEIGHT`], after which edits are refused.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    text: LetterText,
}

impl Composer {
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replaces the text if it still fits. Returns whether it was accepted.
    pub fn edit(&mut self, text: &str, measure: &dyn TextMeasure) -> bool {
        if measure.height(text) > MAX_COMPOSER_HEIGHT {
            return false;
        }
        self.text = LetterText::new(text);
        true
    }

    pub fn clear(&mut self) {
        self.text = LetterText::default();
    }

    pub fn take(&mut self) -> LetterText {
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_model_wraps() {
        let model = LineModel::default();
        assert_eq!(model.height(""), 40.0);
        assert_eq!(model.height("123456789012"), 40.0);
        assert_eq!(model.height("1234567890123"), 64.0);
        assert_eq!(model.height("a\nb"), 64.0);
    }

    #[test]
    fn test_edit_refuses_text_past_ceiling() {
        let model = LineModel::default();
        let mut composer = Composer::default();

        // Five lines of 24 px plus padding is 136 px; a sixth line is 160 px.
        let fits = "가".repeat(12 * 5);
        assert!(composer.edit(&fits, &model));
        let too_long = format!("{fits}나");
        assert!(!composer.edit(&too_long, &model));
        assert_eq!(composer.text(), fits);
    }

    #[test]
    fn test_blank_detection() {
        let model = LineModel::default();
        let mut composer = Composer::default();
        assert!(composer.is_blank());
        composer.edit(" \n\t ", &model);
        assert!(composer.is_blank());
        composer.edit(" hi ", &model);
        assert!(!composer.is_blank());
        assert_eq!(composer.take().as_str(), " hi ");
        assert!(composer.is_blank());
    }
}
