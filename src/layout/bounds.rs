//! Line bounds.
//!
//! Turns a min/max number of lines into a pixel (or cell) range and clamps a
//! measured content height into it.

use crate::error::{GrowError, Result};
use crate::types::{EdgeInsets, Font};

// =============================================================================
// Growth Config
// =============================================================================

/// Line-count limits of a growing text. `0` disables a bound.
///
/// `min_number_of_lines > max_number_of_lines` is accepted as-is; the clamp
/// raises the maximum to the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthConfig {
    pub min_number_of_lines: usize,
    pub max_number_of_lines: usize,
}

impl GrowthConfig {
    pub const fn new(min_number_of_lines: usize, max_number_of_lines: usize) -> Self {
        Self {
            min_number_of_lines,
            max_number_of_lines,
        }
    }

    /// No bounds at all: the widget grows with its content.
    pub const UNCONSTRAINED: Self = Self::new(0, 0);
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

// =============================================================================
// Line Metrics
// =============================================================================

/// Height of one line and the fixed vertical inset around the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub line_height: f32,
    pub vertical_inset: f32,
}

impl LineMetrics {
    /// Line height used when a font reports an unusable one.
    pub const NOMINAL_LINE_HEIGHT: f32 = 1.0;

    /// Strict constructor.
    pub fn try_new(line_height: f32, vertical_inset: f32) -> Result<Self> {
        if !(line_height.is_finite() && line_height > 0.0) {
            return Err(GrowError::InvalidLineHeight(line_height));
        }
        if !(vertical_inset.is_finite() && vertical_inset >= 0.0) {
            return Err(GrowError::InvalidInset(vertical_inset));
        }
        Ok(Self {
            line_height,
            vertical_inset,
        })
    }

    /// Sanitizing constructor: bad values fall back instead of failing.
    pub fn new(line_height: f32, vertical_inset: f32) -> Self {
        Self::try_new(line_height, vertical_inset).unwrap_or_else(|err| {
            log::debug!("sanitizing line metrics: {err}");
            Self {
                line_height: Self::effective_line_height(line_height),
                vertical_inset: Self::effective_inset(vertical_inset),
            }
        })
    }

    /// Metrics for `font` inside `insets`.
    pub fn from_font(font: &Font, insets: &EdgeInsets) -> Self {
        Self::new(font.line_height, insets.vertical())
    }

    /// `line_height` if usable, else one nominal line.
    #[inline]
    pub fn effective_line_height(line_height: f32) -> f32 {
        if line_height.is_finite() && line_height > 0.0 {
            line_height
        } else {
            Self::NOMINAL_LINE_HEIGHT
        }
    }

    /// `inset` if usable, else zero.
    #[inline]
    pub fn effective_inset(inset: f32) -> f32 {
        if inset.is_finite() && inset > 0.0 { inset } else { 0.0 }
    }

    /// Height of exactly `lines` lines including the inset.
    pub fn height_for_lines(&self, lines: usize) -> f32 {
        lines as f32 * self.line_height + self.vertical_inset
    }
}

// =============================================================================
// Height Bounds
// =============================================================================

/// Inclusive height range a growing text may take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBounds {
    pub min_height: f32,
    pub max_height: f32,
}

impl HeightBounds {
    pub const UNBOUNDED: Self = Self {
        min_height: 0.0,
        max_height: f32::INFINITY,
    };

    /// Bounds for `config` under `metrics`. The minimum always wins.
    pub fn from_config(config: &GrowthConfig, metrics: &LineMetrics) -> Self {
        let min_height = if config.min_number_of_lines > 0 {
            metrics.height_for_lines(config.min_number_of_lines)
        } else {
            0.0
        };
        let mut max_height = if config.max_number_of_lines > 0 {
            metrics.height_for_lines(config.max_number_of_lines)
        } else {
            f32::INFINITY
        };

        if min_height > max_height {
            log::debug!(
                "min lines {} exceed max lines {}, raising max height to {min_height}",
                config.min_number_of_lines,
                config.max_number_of_lines
            );
            max_height = min_height;
        }

        Self {
            min_height,
            max_height,
        }
    }

    /// Clamp `raw` into the range. NaN clamps to the minimum.
    pub fn clamp(&self, raw: f32) -> f32 {
        if raw.is_nan() {
            return self.min_height;
        }
        raw.min(self.max_height).max(self.min_height)
    }

    #[inline]
    pub fn contains(&self, height: f32) -> bool {
        height >= self.min_height && height <= self.max_height
    }

    /// True when content of `raw` height overflows the maximum.
    #[inline]
    pub fn overflows(&self, raw: f32) -> bool {
        raw > self.max_height
    }
}

/// Clamp a measured content height into the bounds of `config`.
pub fn clamp_height(raw: f32, config: &GrowthConfig, metrics: &LineMetrics) -> (f32, HeightBounds) {
    let bounds = HeightBounds::from_config(config, metrics);
    (bounds.clamp(raw), bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> LineMetrics {
        LineMetrics::new(20.0, 0.0)
    }

    #[test]
    fn test_one_to_three_lines() {
        let config = GrowthConfig::new(1, 3);
        let (_, bounds) = clamp_height(0.0, &config, &metrics());
        assert_eq!(bounds, HeightBounds { min_height: 20.0, max_height: 60.0 });

        assert_eq!(clamp_height(10.0, &config, &metrics()).0, 20.0);
        assert_eq!(clamp_height(45.0, &config, &metrics()).0, 45.0);
        assert_eq!(clamp_height(90.0, &config, &metrics()).0, 60.0);
    }

    #[test]
    fn test_inset_added_to_both_bounds() {
        let m = LineMetrics::new(20.0, 2.0);
        let bounds = HeightBounds::from_config(&GrowthConfig::new(1, 3), &m);
        assert_eq!(bounds.min_height, 22.0);
        assert_eq!(bounds.max_height, 62.0);
    }

    #[test]
    fn test_unconstrained_is_noop() {
        let config = GrowthConfig::UNCONSTRAINED;
        let (clamped, bounds) = clamp_height(1234.5, &config, &metrics());
        assert_eq!(clamped, 1234.5);
        assert_eq!(bounds, HeightBounds::UNBOUNDED);
        assert_eq!(clamp_height(0.0, &config, &metrics()).0, 0.0);
    }

    #[test]
    fn test_min_only_and_max_only() {
        let (clamped, bounds) = clamp_height(5.0, &GrowthConfig::new(2, 0), &metrics());
        assert_eq!(clamped, 40.0);
        assert!(bounds.max_height.is_infinite());

        let (clamped, bounds) = clamp_height(500.0, &GrowthConfig::new(0, 2), &metrics());
        assert_eq!(clamped, 40.0);
        assert_eq!(bounds.min_height, 0.0);
    }

    #[test]
    fn test_min_greater_than_max_raises_max() {
        let (clamped, bounds) = clamp_height(200.0, &GrowthConfig::new(4, 2), &metrics());
        assert_eq!(bounds.min_height, 80.0);
        assert_eq!(bounds.max_height, 80.0);
        assert_eq!(clamped, 80.0);
    }

    #[test]
    fn test_nan_clamps_to_min() {
        let bounds = HeightBounds::from_config(&GrowthConfig::new(1, 0), &metrics());
        assert_eq!(bounds.clamp(f32::NAN), 20.0);
    }

    #[test]
    fn test_overflow() {
        let bounds = HeightBounds::from_config(&GrowthConfig::new(1, 3), &metrics());
        assert!(bounds.overflows(61.0));
        assert!(!bounds.overflows(60.0));
        assert!(bounds.contains(60.0));
    }

    #[test]
    fn test_try_new_rejects_bad_metrics() {
        assert_eq!(LineMetrics::try_new(0.0, 0.0), Err(GrowError::InvalidLineHeight(0.0)));
        assert_eq!(LineMetrics::try_new(10.0, -1.0), Err(GrowError::InvalidInset(-1.0)));
        assert!(LineMetrics::try_new(f32::NAN, 0.0).is_err());
        assert!(LineMetrics::try_new(10.0, 0.0).is_ok());
    }

    #[test]
    fn test_new_falls_back_to_nominal_line() {
        let m = LineMetrics::new(0.0, -3.0);
        assert_eq!(m.line_height, LineMetrics::NOMINAL_LINE_HEIGHT);
        assert_eq!(m.vertical_inset, 0.0);
    }

    #[test]
    fn test_from_font() {
        let m = LineMetrics::from_font(
            &Font::monospace(18.0, 9.0),
            &EdgeInsets::new(1.0, 4.0, 1.0, 4.0),
        );
        assert_eq!(m, LineMetrics { line_height: 18.0, vertical_inset: 2.0 });
    }
}
