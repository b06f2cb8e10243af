//! Layout Module - measuring and bounding text height
//!
//! Contains:
//! - `text_measure`: the [`TextMeasurer`] seam, a unicode-aware cell measurer
//!   and [`measure_content`]
//! - `bounds`: [`GrowthConfig`], [`LineMetrics`], [`HeightBounds`] and
//!   [`clamp_height`]
//!
//! # Example
//!
//! ```ignore
//! use spark_grow::layout::{clamp_height, measure_content, CellTextMeasurer, GrowthConfig, LineMetrics};
//! use spark_grow::{EdgeInsets, Font};
//!
//! let font = Font::monospace(1.0, 1.0);
//! let raw = measure_content(&CellTextMeasurer, "hello world", &font, 5.0, &EdgeInsets::ZERO);
//! let (height, _bounds) = clamp_height(raw, &GrowthConfig::new(1, 3), &LineMetrics::new(1.0, 0.0));
//! assert_eq!(height, 2.0);
//! ```

mod bounds;
mod text_measure;

pub use bounds::*;
pub use text_measure::*;
