//! Text Measurement
//!
//! Measures how tall a piece of text is once wrapped into a container.
//!
//! The platform primitive is the [`TextMeasurer`] trait. [`CellTextMeasurer`]
//! implements it for a monospace cell grid:
//! - ASCII characters: 1 cell
//! - CJK ideographs and fullwidth forms: 2 cells
//! - Emoji sequences (ZWJ, skin tones, flags, keycaps): 2 cells
//! - Combining marks and control characters: 0 cells
//!
//! Lines break at Unicode word boundaries, words wider than the container
//! break at grapheme boundaries, and `\n` always starts a new line.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use super::bounds::LineMetrics;
use crate::types::{EdgeInsets, Font};

// =============================================================================
// Widths
// =============================================================================

/// Display width of a grapheme cluster in cells.
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };

    let trailing_emoji_marker = chars.any(|c| {
        matches!(c as u32, 0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF)
    });
    if trailing_emoji_marker || (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }

    match first as u32 {
        0x2600..=0x27BF | 0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1FAFF => 2,
        _ => first.width().unwrap_or(0),
    }
}

/// Display width of a string in cells.
pub fn string_width(s: &str) -> usize {
    if s.is_ascii() {
        return s.bytes().filter(|b| (0x20..0x7F).contains(b)).count();
    }
    s.graphemes(true).map(grapheme_width).sum()
}

// =============================================================================
// Wrapping
// =============================================================================

/// Number of lines `text` occupies when wrapped at `columns` cells.
///
/// Empty text is one line. A trailing newline opens a new, empty line.
pub fn wrap_line_count(text: &str, columns: usize) -> usize {
    let columns = columns.max(1);
    text.split('\n').map(|line| wrapped_lines(line, columns)).sum()
}

/// Lines for a single hard line (no `\n` inside).
fn wrapped_lines(line: &str, columns: usize) -> usize {
    let mut lines = 1;
    let mut width = 0usize;

    for segment in line.split_word_bounds() {
        let seg_width = string_width(segment);

        if width + seg_width > columns {
            // Whitespace hangs past the edge instead of opening a line.
            if segment.chars().all(char::is_whitespace) {
                continue;
            }
            if width > 0 {
                lines += 1;
                width = 0;
            }
            if seg_width > columns {
                for grapheme in segment.graphemes(true) {
                    let gw = grapheme_width(grapheme);
                    if width + gw > columns && width > 0 {
                        lines += 1;
                        width = 0;
                    }
                    width += gw;
                }
                continue;
            }
        }

        width += seg_width;
    }

    lines
}

// =============================================================================
// Measurer
// =============================================================================

/// Platform text-measurement primitive.
///
/// Implementations must be pure: same input, same output, no shared layout
/// state touched. The growth engine calls them on every keystroke.
pub trait TextMeasurer {
    /// Height of `text` laid out in `font` within `width`.
    fn measure_text(&self, text: &str, font: &Font, width: f32) -> f32;

    /// Number of laid-out lines.
    fn line_count(&self, text: &str, font: &Font, width: f32) -> usize {
        let line_height = LineMetrics::effective_line_height(font.line_height);
        (self.measure_text(text, font, width) / line_height)
            .round()
            .max(1.0) as usize
    }
}

/// Unicode-aware monospace measurer for terminal cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellTextMeasurer;

impl CellTextMeasurer {
    /// Whole cells that fit in `width`, at least one.
    pub fn columns(font: &Font, width: f32) -> usize {
        let advance = if font.advance.is_finite() && font.advance > 0.0 {
            font.advance
        } else {
            1.0
        };
        if width.is_nan() {
            return 1;
        }
        ((width / advance).floor() as usize).max(1)
    }
}

impl TextMeasurer for CellTextMeasurer {
    fn measure_text(&self, text: &str, font: &Font, width: f32) -> f32 {
        let line_height = LineMetrics::effective_line_height(font.line_height);
        self.line_count(text, font, width) as f32 * line_height
    }

    fn line_count(&self, text: &str, font: &Font, width: f32) -> usize {
        wrap_line_count(text, Self::columns(font, width))
    }
}

/// Ideal content height of `text` in a container `container_width` wide.
///
/// Wraps at the width left after horizontal insets and adds the vertical
/// insets. Empty text measures to one line.
pub fn measure_content(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: &Font,
    container_width: f32,
    insets: &EdgeInsets,
) -> f32 {
    let line_height = LineMetrics::effective_line_height(font.line_height);
    let available = (container_width - insets.horizontal()).max(0.0);

    let text_height = if text.is_empty() {
        line_height
    } else {
        let measured = measurer.measure_text(text, font, available);
        if measured.is_finite() {
            measured.max(line_height)
        } else {
            line_height
        }
    };

    text_height + LineMetrics::effective_inset(insets.vertical())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a\tb"), 2);
    }

    #[test]
    fn test_string_width_wide() {
        assert_eq!(string_width("你好"), 4);
        assert_eq!(string_width("🚀"), 2);
        assert_eq!(string_width("👍🏽"), 2);
        assert_eq!(string_width("e\u{301}"), 1);
    }

    #[test]
    fn test_wrap_empty_is_one_line() {
        assert_eq!(wrap_line_count("", 10), 1);
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_line_count("hello world", 11), 1);
        assert_eq!(wrap_line_count("hello world", 5), 2);
        assert_eq!(wrap_line_count("hello world", 8), 2);
    }

    #[test]
    fn test_wrap_long_word_breaks_by_grapheme() {
        assert_eq!(wrap_line_count("abcdefghij", 4), 3);
    }

    #[test]
    fn test_wrap_cjk() {
        assert_eq!(wrap_line_count("你好世界", 4), 2);
    }

    #[test]
    fn test_wrap_newlines() {
        assert_eq!(wrap_line_count("a\nb\nc", 10), 3);
        assert_eq!(wrap_line_count("a\n", 10), 2);
        assert_eq!(wrap_line_count("\n\n", 10), 3);
    }

    #[test]
    fn test_columns() {
        let font = Font::monospace(20.0, 10.0);
        assert_eq!(CellTextMeasurer::columns(&font, 100.0), 10);
        assert_eq!(CellTextMeasurer::columns(&font, 5.0), 1);
        assert_eq!(CellTextMeasurer::columns(&font, f32::NAN), 1);
        assert_eq!(CellTextMeasurer::columns(&Font::monospace(1.0, 0.0), 7.0), 7);
    }

    #[test]
    fn test_cell_measurer_height() {
        let font = Font::monospace(20.0, 1.0);
        assert_eq!(CellTextMeasurer.measure_text("hello world", &font, 5.0), 40.0);
        assert_eq!(CellTextMeasurer.line_count("hello world", &font, 5.0), 2);
    }

    #[test]
    fn test_measure_content_empty_is_one_line() {
        let font = Font::monospace(20.0, 1.0);
        let insets = EdgeInsets::vertical_only(1.0, 1.0);
        assert_eq!(measure_content(&CellTextMeasurer, "", &font, 40.0, &insets), 22.0);
    }

    #[test]
    fn test_measure_content_subtracts_horizontal_insets() {
        let font = Font::monospace(1.0, 1.0);
        let insets = EdgeInsets::new(0.0, 3.0, 0.0, 2.0);
        // 10 wide minus 5 of insets leaves 5 columns.
        assert_eq!(measure_content(&CellTextMeasurer, "hello world", &font, 10.0, &insets), 2.0);
        assert_eq!(measure_content(&CellTextMeasurer, "hello world", &font, 16.0, &insets), 1.0);
    }

    #[test]
    fn test_measure_content_zero_line_height_falls_back() {
        let font = Font::monospace(0.0, 1.0);
        let h = measure_content(&CellTextMeasurer, "abc", &font, 10.0, &EdgeInsets::ZERO);
        assert_eq!(h, LineMetrics::NOMINAL_LINE_HEIGHT);
    }

    #[test]
    fn test_measure_content_is_pure() {
        let font = Font::monospace(18.0, 8.0);
        let text = "some longer text here";
        let a = measure_content(&CellTextMeasurer, text, &font, 80.0, &EdgeInsets::ZERO);
        let b = measure_content(&CellTextMeasurer, text, &font, 80.0, &EdgeInsets::ZERO);
        assert_eq!(a, b);
    }
}
