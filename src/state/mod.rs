//! State Module - runtime systems behind the widgets
//!
//! - **Animate** - the [`Animator`] seam and the frame-driven [`Timeline`]
//! - **Keyboard** - keyboard notifications, the event source and the
//!   normalizer that turns raw notifications into transitions
//! - **Keyboard observer** - runs caller layout changes in lockstep with the
//!   keyboard animation

pub mod animate;
pub mod keyboard;
pub mod keyboard_observer;

pub use animate::*;
pub use keyboard::*;
pub use keyboard_observer::*;
