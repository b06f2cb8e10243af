//! Primitives - widget building blocks.
//!
//! - [`GrowingText`] - multi-line text input that grows with its content
//!   between a minimum and a maximum number of lines
//!
//! # Reactivity
//!
//! The height lives in a signal. Bind the surrounding layout to
//! [`GrowingText::height_signal`] instead of reading [`GrowingText::height`]
//! once:
//!
//! ```ignore
//! // CORRECT - follows every height change
//! let height = composer.height_signal();
//!
//! // WRONG - a snapshot, goes stale on the next edit
//! let height = composer.height();
//! ```

mod growing_text;
mod types;

pub use growing_text::*;
pub use types::*;
