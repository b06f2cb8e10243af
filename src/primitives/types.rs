//! Primitive types - Props and callbacks.

use std::rc::Rc;
use std::time::Duration;

use crate::layout::GrowthConfig;
use crate::types::{EdgeInsets, Font, GrowthEvent};

// =============================================================================
// Callback Types
// =============================================================================

/// Height change callback. Rc so the widget can clone it out of its state
/// before calling, which lets the callback touch the widget again.
pub type HeightChangeCallback = Rc<dyn Fn(GrowthEvent)>;

// =============================================================================
// Growing Text Props
// =============================================================================

/// Properties for a [`GrowingText`](super::GrowingText).
///
/// ```ignore
/// let props = GrowingTextProps {
///     width: 60.0,
///     config: GrowthConfig::new(1, 8),
///     ..Default::default()
/// };
/// ```
pub struct GrowingTextProps {
    // =========================================================================
    // Content
    // =========================================================================

    /// Initial text.
    pub text: String,

    /// Shown while the text is empty. Never measured.
    pub placeholder: Option<String>,

    // =========================================================================
    // Metrics
    // =========================================================================

    pub font: Font,

    /// Space between the widget edge and the text. The vertical part is added
    /// to every measured height and both line bounds.
    pub insets: EdgeInsets,

    /// Width of the widget, insets included.
    pub width: f32,

    /// Min / max number of lines.
    pub config: GrowthConfig,

    // =========================================================================
    // Animation
    // =========================================================================

    /// Animate height changes caused by typing while focused (default: true).
    pub animate_height_change: bool,

    /// Duration of the height animation (default: 350ms).
    pub height_change_animation_duration: Duration,

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Fires before the height changes, outside the animation.
    pub on_height_change: Option<HeightChangeCallback>,

    /// Fires inside the animation, after the new height is applied. Put
    /// layout that must move with the widget here.
    pub height_change_actions: Option<HeightChangeCallback>,

    /// Fires once the height change (and its animation) has completed.
    pub on_did_change_height: Option<HeightChangeCallback>,
}

impl Default for GrowingTextProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            placeholder: None,
            font: Font::default(),
            insets: EdgeInsets::ZERO,
            width: 40.0,
            config: GrowthConfig::default(),
            animate_height_change: true,
            height_change_animation_duration: Duration::from_millis(350),
            on_height_change: None,
            height_change_actions: None,
            on_did_change_height: None,
        }
    }
}
