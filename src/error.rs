//! Error type for the strict constructors.
//!
//! The public widget and observer operations never fail: bad input is clamped
//! or defaulted. These variants surface only from the `try_*` style entry
//! points and are otherwise turned into log lines.

use thiserror::Error;

use crate::state::keyboard::NotificationKind;

pub type Result<T> = std::result::Result<T, GrowError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowError {
    #[error("line height must be positive and finite, got {0}")]
    InvalidLineHeight(f32),

    #[error("vertical inset must be non-negative and finite, got {0}")]
    InvalidInset(f32),

    #[error("{kind:?} notification carries no end frame")]
    MissingEndFrame { kind: NotificationKind },
}
