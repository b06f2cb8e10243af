//! Keyboard Module - on-screen keyboard transitions
//!
//! Raw keyboard notifications, the source that delivers them and the
//! normalizer that turns them into [`KeyboardTransition`] records.
//!
//! # API
//!
//! - [`KeyboardEventSource::subscribe`] - register a raw handler, get a handle
//! - [`KeyboardEventSource::post`] - deliver a platform notification
//! - [`SourceSubscription::dispose`] - detach (dropping the handle does too)
//! - [`KeyboardNormalizer::normalize`] - raw notification → transition
//!
//! # Example
//!
//! ```ignore
//! use spark_grow::state::keyboard::{KeyboardEventSource, KeyboardNotification, NotificationKind};
//! use spark_grow::Rect;
//!
//! let source = KeyboardEventSource::new();
//! let handle = source.subscribe(|n| println!("{:?}", n.kind));
//!
//! source.post(KeyboardNotification::new(NotificationKind::WillShow, Rect::new(0.0, 500.0, 320.0, 216.0)));
//!
//! handle.dispose();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use bitflags::bitflags;

use crate::error::{GrowError, Result};
use crate::types::{AnimationCurve, Rect};

// =============================================================================
// RAW NOTIFICATIONS
// =============================================================================

/// Which platform notification was delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    WillShow,
    WillHide,
    WillChangeFrame,
    /// Unified frame-change signal, for platforms that do not split
    /// show and hide.
    ChangeFrame,
}

impl NotificationKind {
    /// Event set this kind belongs to.
    pub fn events(self) -> KeyboardEvents {
        match self {
            Self::WillShow => KeyboardEvents::SHOW,
            Self::WillHide => KeyboardEvents::HIDE,
            Self::WillChangeFrame | Self::ChangeFrame => KeyboardEvents::CHANGE_FRAME,
        }
    }
}

bitflags! {
    /// Set of notification kinds a subscription listens to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyboardEvents: u8 {
        const SHOW = 1 << 0;
        const HIDE = 1 << 1;
        const CHANGE_FRAME = 1 << 2;

        const SHOW_HIDE = Self::SHOW.bits() | Self::HIDE.bits();
    }
}

/// A keyboard notification as the platform delivers it.
///
/// Every field but `kind` may be missing.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardNotification {
    pub kind: NotificationKind,
    pub frame_begin: Option<Rect>,
    pub frame_end: Option<Rect>,
    /// Seconds.
    pub animation_duration: Option<f64>,
    /// Platform curve code, see [`AnimationCurve::from_raw`].
    pub animation_curve: Option<i64>,
}

impl KeyboardNotification {
    /// Notification with an end frame and nothing else.
    pub fn new(kind: NotificationKind, frame_end: Rect) -> Self {
        Self {
            kind,
            frame_begin: None,
            frame_end: Some(frame_end),
            animation_duration: None,
            animation_curve: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.animation_duration = Some(seconds);
        self
    }

    pub fn with_curve(mut self, code: i64) -> Self {
        self.animation_curve = Some(code);
        self
    }

    pub fn with_frame_begin(mut self, frame: Rect) -> Self {
        self.frame_begin = Some(frame);
        self
    }

    /// The end frame, required to build a transition.
    pub fn end_frame(&self) -> Result<Rect> {
        self.frame_end
            .ok_or(GrowError::MissingEndFrame { kind: self.kind })
    }

    /// Animation duration, zero when missing or unusable.
    pub fn duration(&self) -> Duration {
        match self.animation_duration {
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
            _ => Duration::ZERO,
        }
    }

    pub fn curve(&self) -> AnimationCurve {
        self.animation_curve
            .map(AnimationCurve::from_raw)
            .unwrap_or_default()
    }
}

// =============================================================================
// EVENT SOURCE
// =============================================================================

/// Handler for raw notifications.
pub type NotificationHandler = Rc<dyn Fn(&KeyboardNotification)>;

#[derive(Default)]
struct HandlerRegistry {
    handlers: Vec<(usize, NotificationHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn contains(&self, id: usize) -> bool {
        self.handlers.iter().any(|(handler_id, _)| *handler_id == id)
    }
}

/// Delivers keyboard notifications to subscribed handlers.
///
/// Cheap to clone; clones share the same handler set. Handlers are invoked
/// with no borrow held, so a handler may subscribe or dispose while it runs.
#[derive(Clone, Default)]
pub struct KeyboardEventSource {
    registry: Rc<RefCell<HandlerRegistry>>,
}

impl KeyboardEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered until the returned handle is
    /// disposed or dropped.
    #[must_use = "dropping the handle detaches the handler immediately"]
    pub fn subscribe<F>(&self, handler: F) -> SourceSubscription
    where
        F: Fn(&KeyboardNotification) + 'static,
    {
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id();
            reg.handlers.push((id, Rc::new(handler)));
            id
        };

        SourceSubscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver `notification` to every handler registered when the call
    /// starts and still registered when its turn comes.
    pub fn post(&self, notification: KeyboardNotification) {
        let handlers: Vec<(usize, NotificationHandler)> = self.registry.borrow().handlers.clone();
        log::trace!(
            "posting {:?} to {} handler(s)",
            notification.kind,
            handlers.len()
        );

        for (id, handler) in handlers {
            if self.registry.borrow().contains(id) {
                handler(&notification);
            }
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

/// Handle to one registered handler. Detaches on [`dispose`](Self::dispose)
/// or drop.
pub struct SourceSubscription {
    id: usize,
    registry: Weak<RefCell<HandlerRegistry>>,
}

impl SourceSubscription {
    /// Detach the handler now.
    pub fn dispose(self) {
        drop(self);
    }

    /// True while the handler is registered with a live source.
    pub fn is_attached(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|reg| reg.borrow().contains(self.id))
    }
}

impl Drop for SourceSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .handlers
                .retain(|(handler_id, _)| *handler_id != self.id);
        }
    }
}

impl std::fmt::Debug for SourceSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSubscription")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}

// =============================================================================
// NORMALIZED TRANSITION
// =============================================================================

/// One keyboard show / hide / resize, platform independent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardTransition {
    pub kind: NotificationKind,
    pub end_frame: Rect,
    pub duration: Duration,
    pub curve: AnimationCurve,
    pub is_showing: bool,
}

/// Turns raw notifications into transitions.
///
/// Drops notifications without an end frame and notifications whose end
/// frame equals the last emitted one.
#[derive(Clone, Debug, Default)]
pub struct KeyboardNormalizer {
    screen_bounds: Rect,
    last_end_frame: Option<Rect>,
}

impl KeyboardNormalizer {
    /// `screen_bounds` decides whether a frame change shows or hides the
    /// keyboard. `Rect::ZERO` means unknown.
    pub fn new(screen_bounds: Rect) -> Self {
        Self {
            screen_bounds,
            last_end_frame: None,
        }
    }

    pub fn screen_bounds(&self) -> Rect {
        self.screen_bounds
    }

    pub fn set_screen_bounds(&mut self, screen_bounds: Rect) {
        self.screen_bounds = screen_bounds;
    }

    /// Forget the last emitted frame.
    pub fn reset(&mut self) {
        self.last_end_frame = None;
    }

    pub fn normalize(&mut self, notification: &KeyboardNotification) -> Option<KeyboardTransition> {
        let end_frame = match notification.end_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("dropping keyboard notification: {err}");
                return None;
            }
        };

        if self.last_end_frame == Some(end_frame) {
            log::trace!("suppressing duplicate {:?} at {end_frame:?}", notification.kind);
            return None;
        }
        self.last_end_frame = Some(end_frame);

        let is_showing = match notification.kind {
            NotificationKind::WillShow => true,
            NotificationKind::WillHide => false,
            NotificationKind::WillChangeFrame | NotificationKind::ChangeFrame => {
                self.is_on_screen(&end_frame)
            }
        };

        Some(KeyboardTransition {
            kind: notification.kind,
            end_frame,
            duration: notification.duration(),
            curve: notification.curve(),
            is_showing,
        })
    }

    /// Heuristic: a keyboard frame is on screen when it has height and its
    /// top edge is above the bottom of the screen. Split and external
    /// keyboards can defeat it.
    fn is_on_screen(&self, frame: &Rect) -> bool {
        if frame.height <= 0.0 {
            return false;
        }
        if self.screen_bounds.is_empty() {
            return true;
        }
        frame.min_y() < self.screen_bounds.max_y()
    }
}

// =============================================================================
// TESTS
// =============================================================================
