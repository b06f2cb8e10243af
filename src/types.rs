//! Core value types for spark-grow.
//!
//! Plain `Copy` records that flow between the measurer, the clamp, the growth
//! engine and the keyboard observer. Geometry is in abstract layout units:
//! terminal cells for the built-in measurer, points or pixels for a host
//! that plugs in its own.

// =============================================================================
// Geometry
// =============================================================================

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge.
    #[inline]
    pub fn min_y(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rectangle covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Insets applied on each edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self { top, left, bottom, right }
    }

    /// Same inset on all four edges.
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Top and bottom only.
    pub const fn vertical_only(top: f32, bottom: f32) -> Self {
        Self::new(top, 0.0, bottom, 0.0)
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

// =============================================================================
// Font
// =============================================================================

/// Font metrics the measurer and the line bounds need.
///
/// Terminal text is monospace, so a font is just the height of one line and
/// the width of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Height of one laid-out line.
    pub line_height: f32,
    /// Width of one single-width cell.
    pub advance: f32,
}

impl Font {
    pub const fn monospace(line_height: f32, advance: f32) -> Self {
        Self { line_height, advance }
    }
}

impl Default for Font {
    /// One terminal cell.
    fn default() -> Self {
        Self::monospace(1.0, 1.0)
    }
}

// =============================================================================
// Animation Curve
// =============================================================================

/// Timing curve of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AnimationCurve {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Whatever curve the platform picked (the keyboard uses a private one).
    #[default]
    Default,
}

impl AnimationCurve {
    /// Map a platform curve code.
    ///
    /// Codes follow the common mobile convention: 0 ease-in-out, 1 ease-in,
    /// 2 ease-out, 3 linear. Anything else, including the keyboard's private
    /// code 7, is `Default`.
    pub fn from_raw(code: i64) -> Self {
        match code {
            0 => Self::EaseInOut,
            1 => Self::EaseIn,
            2 => Self::EaseOut,
            3 => Self::Linear,
            _ => Self::Default,
        }
    }

    /// Eased progress for linear progress `t` in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut | Self::Default => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

// =============================================================================
// Growth Event
// =============================================================================

/// One detected height change of a growing text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthEvent {
    pub old_height: f32,
    pub new_height: f32,
}

impl GrowthEvent {
    pub const fn new(old_height: f32, new_height: f32) -> Self {
        Self { old_height, new_height }
    }

    /// Positive when the widget grows.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.new_height - self.old_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(0.0, 500.0, 320.0, 216.0);
        assert_eq!(r.min_y(), 500.0);
        assert_eq!(r.max_y(), 716.0);
        assert!(!r.is_empty());
        assert!(Rect::ZERO.is_empty());
    }

    #[test]
    fn test_insets_sums() {
        let i = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(i.vertical(), 4.0);
        assert_eq!(i.horizontal(), 6.0);
        assert_eq!(EdgeInsets::vertical_only(1.0, 1.0).horizontal(), 0.0);
    }

    #[test]
    fn test_curve_from_raw() {
        assert_eq!(AnimationCurve::from_raw(0), AnimationCurve::EaseInOut);
        assert_eq!(AnimationCurve::from_raw(1), AnimationCurve::EaseIn);
        assert_eq!(AnimationCurve::from_raw(2), AnimationCurve::EaseOut);
        assert_eq!(AnimationCurve::from_raw(3), AnimationCurve::Linear);
        assert_eq!(AnimationCurve::from_raw(7), AnimationCurve::Default);
        assert_eq!(AnimationCurve::from_raw(-1), AnimationCurve::Default);
    }

    #[test]
    fn test_curve_endpoints() {
        for curve in [
            AnimationCurve::Linear,
            AnimationCurve::EaseIn,
            AnimationCurve::EaseOut,
            AnimationCurve::EaseInOut,
            AnimationCurve::Default,
        ] {
            assert_eq!(curve.apply(0.0), 0.0);
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6);
            assert_eq!(curve.apply(2.0), curve.apply(1.0));
        }
        assert_eq!(AnimationCurve::Linear.apply(0.25), 0.25);
        assert!(AnimationCurve::EaseIn.apply(0.5) < 0.5);
        assert!(AnimationCurve::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_growth_event_delta() {
        assert_eq!(GrowthEvent::new(20.0, 40.0).delta(), 20.0);
        assert_eq!(GrowthEvent::new(40.0, 20.0).delta(), -20.0);
    }
}
