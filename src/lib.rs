//! # spark-grow
//!
//! Self-resizing text input and keyboard-synchronized layout animations.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Two independent pieces share one animation runtime:
//!
//! ```text
//! text edit → measure → clamp to line bounds → on_height_change → animate(height) → on_did_change_height
//! keyboard notification → normalize → before → animate(layout) → completion
//! ```
//!
//! Neither piece interpolates anything itself. Both hand their layout changes to an
//! [`Animator`](state::Animator); [`Timeline`](state::Timeline) is the built-in one,
//! advanced from the host's frame loop.
//!
//! Everything is single-threaded (`Rc`/`RefCell`). Callbacks are never called
//! while internal state is borrowed, so they may freely call back in.
//!
//! ## Modules
//!
//! - [`types`] - Geometry, fonts, curves, growth events
//! - [`layout`] - Text measurement and line bounds
//! - [`primitives`] - [`GrowingText`](primitives::GrowingText)
//! - [`state`] - Animation runtime, keyboard events and the keyboard observer
//! - [`error`] - Error type

pub mod error;
pub mod layout;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{GrowError, Result};

pub use layout::{
    clamp_height, measure_content, string_width, wrap_line_count, CellTextMeasurer,
    GrowthConfig, HeightBounds, LineMetrics, TextMeasurer,
};

pub use primitives::{
    GrowingText, GrowingTextProps, GrowthPhase, HeightChangeCallback, HEIGHT_EPSILON,
};

pub use state::{
    // Animation
    AnimationId, AnimationOptions, AnimationParams, Animator, Timeline,
    // Keyboard
    KeyboardEventSource, KeyboardEvents, KeyboardNotification, KeyboardNormalizer,
    KeyboardTransition, NotificationKind, SourceSubscription,
    // Observer
    KeyboardAnimationCallbacks, KeyboardAnimationObserver,
};
