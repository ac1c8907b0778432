//! Text measurement used by the document layout.
//!
//! The document never shapes text itself; it asks a [`TextMeasurer`] for the size of a run
//! of text at a font size, optionally wrapped at a maximum width. The default
//! [`FixedAdvanceMeasurer`] is deterministic and font-free, which keeps layout reproducible
//! in tests and headless hosts. With the `cosmic` feature, [`CosmicTextMeasurer`] shapes
//! text with real system fonts.

use crate::style::Size;

pub trait TextMeasurer {
    /// Measure `text` at `font_size`, wrapping at `max_width` when given.
    fn measure(&self, text: &str, font_size: f32, max_width: Option<f32>) -> Size;
}

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Measures text as if every character had the same advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMeasurer {
    /// Advance of one character as a fraction of the font size
    pub advance_ratio: f32,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font_size: f32, max_width: Option<f32>) -> Size {
        let advance = font_size * self.advance_ratio;
        let line_height = font_size * LINE_HEIGHT_FACTOR;

        let max_chars = max_width
            .map(|w| ((w / advance).floor() as usize).max(1))
            .unwrap_or(usize::MAX);

        let mut widest = 0usize;
        let mut lines = 0usize;
        for paragraph in text.split('\n') {
            for line_len in wrap_line(paragraph, max_chars) {
                widest = widest.max(line_len);
                lines += 1;
            }
        }

        // Ensure minimum height for empty text
        let lines = lines.max(1);
        Size::new(widest as f32 * advance, lines as f32 * line_height)
    }
}

/// Greedy word wrap; yields the character count of each produced line.
fn wrap_line(paragraph: &str, max_chars: usize) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut current = 0usize;

    for word in paragraph.split_whitespace() {
        let mut word_len = word.chars().count();

        if current > 0 && current + 1 + word_len <= max_chars {
            current += 1 + word_len;
            continue;
        }
        if current > 0 {
            lines.push(current);
            current = 0;
        }
        // Words longer than a line break anywhere
        while word_len > max_chars {
            lines.push(max_chars);
            word_len -= max_chars;
        }
        current = word_len;
    }

    if current > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Visible text of a markup fragment: tags are dropped, common entities decoded.
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(feature = "cosmic")]
pub use cosmic::CosmicTextMeasurer;

#[cfg(feature = "cosmic")]
mod cosmic {
    use std::cell::RefCell;

    use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};

    use super::{TextMeasurer, LINE_HEIGHT_FACTOR};
    use crate::style::Size;

    /// Shapes text with system fonts through cosmic-text.
    pub struct CosmicTextMeasurer {
        font_system: RefCell<FontSystem>,
    }

    impl CosmicTextMeasurer {
        pub fn new() -> Self {
            Self {
                font_system: RefCell::new(FontSystem::new()),
            }
        }
    }

    impl Default for CosmicTextMeasurer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TextMeasurer for CosmicTextMeasurer {
        fn measure(&self, text: &str, font_size: f32, max_width: Option<f32>) -> Size {
            let mut font_system = self.font_system.borrow_mut();
            let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR);
            let mut buffer = Buffer::new(&mut font_system, metrics);

            buffer.set_size(&mut font_system, max_width, None);
            buffer.set_text(
                &mut font_system,
                text,
                &Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
                None,
            );
            buffer.shape_until_scroll(&mut font_system, true);

            let mut width = 0.0f32;
            let mut height = 0.0f32;
            for run in buffer.layout_runs() {
                width = width.max(run.line_w);
                height += run.line_height;
            }

            // Ensure minimum height for empty text
            if height == 0.0 {
                height = font_size * LINE_HEIGHT_FACTOR;
            }

            Size::new(width, height)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_width() {
        let m = FixedAdvanceMeasurer::new(0.5);
        let size = m.measure("hello", 10.0, None);
        assert_eq!(size.width, 25.0);
        assert_eq!(size.height, 12.0);
    }

    #[test]
    fn test_wraps_on_word_boundaries() {
        let m = FixedAdvanceMeasurer::new(0.5);
        // 5 chars per line at 25px
        let size = m.measure("aaa bbb ccc", 10.0, Some(25.0));
        assert_eq!(size.height, 36.0);
        assert_eq!(size.width, 15.0);
    }

    #[test]
    fn test_long_word_breaks() {
        assert_eq!(wrap_line("abcdefghij", 4), vec![4, 4, 2]);
        assert_eq!(wrap_line("", 4), vec![0]);
    }

    #[test]
    fn test_empty_text_keeps_one_line() {
        let m = FixedAdvanceMeasurer::default();
        assert_eq!(m.measure("", 10.0, Some(100.0)).height, 12.0);
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>hi</b>&amp;yo").trim(), "hi &yo");
    }
}
