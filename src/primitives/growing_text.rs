//! Growing Text - multi-line input that sizes itself to its content.
//!
//! The widget keeps its height equal to the measured height of its text,
//! clamped between a minimum and a maximum number of lines. Past the maximum
//! the content scrolls instead of growing.
//!
//! # Height changes
//!
//! On every content change the text is measured and clamped. When the result
//! differs from the current height:
//!
//! 1. `on_height_change(old, new)` fires, before anything moves
//! 2. inside the animator the height signal is set and
//!    `height_change_actions` runs
//! 3. `on_did_change_height` fires when the animation completes
//!
//! Only typing into a focused widget animates. Programmatic text, line
//! bounds, font, inset and width changes apply at once.
//!
//! Text changes that arrive while an animation runs are coalesced: when it
//! ends the latest text is measured once and the intermediate heights are
//! never shown. A line bound, font, inset or width change interrupts the
//! running animation instead, so the height never sits outside the bounds.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_grow::primitives::{GrowingText, GrowingTextProps};
//! use spark_grow::state::Timeline;
//! use spark_grow::layout::GrowthConfig;
//!
//! let timeline = Rc::new(Timeline::new());
//! let composer = GrowingText::cells(
//!     GrowingTextProps {
//!         width: 40.0,
//!         config: GrowthConfig::new(1, 4),
//!         placeholder: Some("Message".to_string()),
//!         ..Default::default()
//!     },
//!     timeline.clone(),
//! );
//!
//! // Bind the surrounding layout to the reactive height.
//! let height = composer.height_signal();
//!
//! composer.set_focused(true);
//! composer.edit("first line\nsecond line");
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use super::types::{GrowingTextProps, HeightChangeCallback};
use crate::layout::{
    measure_content, CellTextMeasurer, GrowthConfig, HeightBounds, LineMetrics, TextMeasurer,
};
use crate::state::animate::{AnimationId, AnimationOptions, AnimationParams, Animator};
use crate::types::{AnimationCurve, EdgeInsets, Font, GrowthEvent};

/// Height differences at or below this are treated as no change.
pub const HEIGHT_EPSILON: f32 = 0.001;

/// Whether a height change is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPhase {
    Idle,
    Animating,
}

// =============================================================================
// STATE
// =============================================================================

struct GrowingState {
    text: String,
    placeholder: Option<String>,
    font: Font,
    insets: EdgeInsets,
    width: f32,
    config: GrowthConfig,
    animate_height_change: bool,
    animation_duration: Duration,
    focused: bool,
    phase: GrowthPhase,
    /// Refresh requested while animating; `true` if any request animates.
    pending: Option<bool>,
    in_flight: Option<InFlight>,
    next_seq: u64,
    on_height_change: Option<HeightChangeCallback>,
    height_change_actions: Option<HeightChangeCallback>,
    on_did_change_height: Option<HeightChangeCallback>,
}

/// The height change currently animating. `id` is unknown until `animate()`
/// returns, and stays unknown for changes applied without the animator.
struct InFlight {
    seq: u64,
    id: Option<AnimationId>,
}

impl GrowingState {
    fn line_metrics(&self) -> LineMetrics {
        LineMetrics::from_font(&self.font, &self.insets)
    }

    fn bounds(&self) -> HeightBounds {
        HeightBounds::from_config(&self.config, &self.line_metrics())
    }

    /// Unclamped content height at `width`.
    fn content_height(&self, measurer: &dyn TextMeasurer, width: f32) -> f32 {
        measure_content(measurer, &self.text, &self.font, width, &self.insets)
    }

    /// Clamped height at `width`.
    fn fitted_height(&self, measurer: &dyn TextMeasurer, width: f32) -> f32 {
        self.bounds().clamp(self.content_height(measurer, width))
    }
}

struct GrowingCore {
    state: RefCell<GrowingState>,
    height: Signal<f32>,
    measurer: Rc<dyn TextMeasurer>,
    animator: Rc<dyn Animator>,
}

// =============================================================================
// GROWING TEXT
// =============================================================================

/// Self-resizing multi-line text input.
///
/// Single-threaded. No borrow is held while callbacks run, so a callback may
/// read or change the widget.
pub struct GrowingText {
    core: Rc<GrowingCore>,
}

impl GrowingText {
    /// Create a widget measured by `measurer` and animated by `animator`.
    ///
    /// The initial height is applied directly, without callbacks.
    pub fn new(
        props: GrowingTextProps,
        measurer: Rc<dyn TextMeasurer>,
        animator: Rc<dyn Animator>,
    ) -> Self {
        warn_unusable_metrics(&props.font, &props.insets);
        let state = GrowingState {
            text: props.text,
            placeholder: props.placeholder,
            font: props.font,
            insets: props.insets,
            width: props.width,
            config: props.config,
            animate_height_change: props.animate_height_change,
            animation_duration: props.height_change_animation_duration,
            focused: false,
            phase: GrowthPhase::Idle,
            pending: None,
            in_flight: None,
            next_seq: 0,
            on_height_change: props.on_height_change,
            height_change_actions: props.height_change_actions,
            on_did_change_height: props.on_did_change_height,
        };
        let initial = state.fitted_height(measurer.as_ref(), state.width);

        Self {
            core: Rc::new(GrowingCore {
                state: RefCell::new(state),
                height: signal(initial),
                measurer,
                animator,
            }),
        }
    }

    /// Widget measured in terminal cells.
    pub fn cells(props: GrowingTextProps, animator: Rc<dyn Animator>) -> Self {
        Self::new(props, Rc::new(CellTextMeasurer), animator)
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn text(&self) -> String {
        self.core.state.borrow().text.clone()
    }

    /// Replace the text from code. The height follows without animation.
    pub fn set_text(&self, text: impl Into<String>) {
        self.core.state.borrow_mut().text = text.into();
        refresh(&self.core, false);
    }

    /// Replace the text as the result of user input. Animates when focused
    /// and `animate_height_change` is on.
    pub fn edit(&self, text: impl Into<String>) {
        let animated = {
            let mut state = self.core.state.borrow_mut();
            state.text = text.into();
            state.animate_height_change && state.focused
        };
        refresh(&self.core, animated);
    }

    pub fn placeholder(&self) -> Option<String> {
        self.core.state.borrow().placeholder.clone()
    }

    /// Change the placeholder. Display only: the height is not touched.
    pub fn set_placeholder(&self, placeholder: Option<String>) {
        self.core.state.borrow_mut().placeholder = placeholder;
    }

    /// What to draw: the text, or the placeholder while the text is empty.
    pub fn display_text(&self) -> String {
        let state = self.core.state.borrow();
        match (&state.placeholder, state.text.is_empty()) {
            (Some(placeholder), true) => placeholder.clone(),
            _ => state.text.clone(),
        }
    }

    // =========================================================================
    // Line bounds
    // =========================================================================

    pub fn config(&self) -> GrowthConfig {
        self.core.state.borrow().config
    }

    pub fn set_config(&self, config: GrowthConfig) {
        self.core.state.borrow_mut().config = config;
        reclamp(&self.core);
    }

    pub fn min_number_of_lines(&self) -> usize {
        self.config().min_number_of_lines
    }

    /// `0` removes the minimum.
    pub fn set_min_number_of_lines(&self, lines: usize) {
        self.core.state.borrow_mut().config.min_number_of_lines = lines;
        reclamp(&self.core);
    }

    pub fn max_number_of_lines(&self) -> usize {
        self.config().max_number_of_lines
    }

    /// `0` removes the maximum.
    pub fn set_max_number_of_lines(&self, lines: usize) {
        self.core.state.borrow_mut().config.max_number_of_lines = lines;
        reclamp(&self.core);
    }

    // =========================================================================
    // Metrics
    // =========================================================================

    pub fn font(&self) -> Font {
        self.core.state.borrow().font
    }

    pub fn set_font(&self, font: Font) {
        warn_unusable_metrics(&font, &self.insets());
        self.core.state.borrow_mut().font = font;
        reclamp(&self.core);
    }

    pub fn insets(&self) -> EdgeInsets {
        self.core.state.borrow().insets
    }

    pub fn set_insets(&self, insets: EdgeInsets) {
        warn_unusable_metrics(&self.font(), &insets);
        self.core.state.borrow_mut().insets = insets;
        reclamp(&self.core);
    }

    pub fn width(&self) -> f32 {
        self.core.state.borrow().width
    }

    pub fn set_width(&self, width: f32) {
        self.core.state.borrow_mut().width = width;
        reclamp(&self.core);
    }

    pub fn line_metrics(&self) -> LineMetrics {
        self.core.state.borrow().line_metrics()
    }

    pub fn bounds(&self) -> HeightBounds {
        self.core.state.borrow().bounds()
    }

    // =========================================================================
    // Focus & animation
    // =========================================================================

    pub fn is_focused(&self) -> bool {
        self.core.state.borrow().focused
    }

    pub fn set_focused(&self, focused: bool) {
        self.core.state.borrow_mut().focused = focused;
    }

    pub fn animate_height_change(&self) -> bool {
        self.core.state.borrow().animate_height_change
    }

    pub fn set_animate_height_change(&self, animate: bool) {
        self.core.state.borrow_mut().animate_height_change = animate;
    }

    pub fn height_change_animation_duration(&self) -> Duration {
        self.core.state.borrow().animation_duration
    }

    pub fn set_height_change_animation_duration(&self, duration: Duration) {
        self.core.state.borrow_mut().animation_duration = duration;
    }

    pub fn phase(&self) -> GrowthPhase {
        self.core.state.borrow().phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase() == GrowthPhase::Animating
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    pub fn set_on_height_change<F>(&self, f: F)
    where
        F: Fn(GrowthEvent) + 'static,
    {
        self.core.state.borrow_mut().on_height_change = Some(Rc::new(f));
    }

    pub fn set_height_change_actions<F>(&self, f: F)
    where
        F: Fn(GrowthEvent) + 'static,
    {
        self.core.state.borrow_mut().height_change_actions = Some(Rc::new(f));
    }

    pub fn set_on_did_change_height<F>(&self, f: F)
    where
        F: Fn(GrowthEvent) + 'static,
    {
        self.core.state.borrow_mut().on_did_change_height = Some(Rc::new(f));
    }

    // =========================================================================
    // Size
    // =========================================================================

    /// Current height.
    pub fn height(&self) -> f32 {
        self.core.height.get()
    }

    /// Reactive height, for binding the surrounding layout.
    pub fn height_signal(&self) -> Signal<f32> {
        self.core.height.clone()
    }

    /// Laid-out lines of the current text. Zero when empty.
    pub fn number_of_lines(&self) -> usize {
        let state = self.core.state.borrow();
        if state.text.is_empty() {
            return 0;
        }
        let available = (state.width - state.insets.horizontal()).max(0.0);
        self.core
            .measurer
            .line_count(&state.text, &state.font, available)
    }

    /// Height the widget would take at `width`. Changes nothing.
    pub fn size_that_fits(&self, width: f32) -> f32 {
        let state = self.core.state.borrow();
        state.fitted_height(self.core.measurer.as_ref(), width)
    }

    /// True when the content is taller than the maximum and scrolls.
    pub fn is_scroll_enabled(&self) -> bool {
        let state = self.core.state.borrow();
        let content = state.content_height(self.core.measurer.as_ref(), state.width);
        state.bounds().overflows(content - HEIGHT_EPSILON)
    }
}

// =============================================================================
// GROWTH ENGINE
// =============================================================================

/// Re-measure and, when the clamped height changed, resize.
fn refresh(core: &Rc<GrowingCore>, animated: bool) {
    let (event, duration, seq, callbacks) = {
        let mut state = core.state.borrow_mut();
        if state.phase == GrowthPhase::Animating {
            state.pending = Some(state.pending.unwrap_or(false) || animated);
            return;
        }

        let target = state.fitted_height(core.measurer.as_ref(), state.width);
        let current = core.height.get();
        if (target - current).abs() <= HEIGHT_EPSILON {
            return;
        }

        state.phase = GrowthPhase::Animating;
        state.next_seq += 1;
        let seq = state.next_seq;
        state.in_flight = Some(InFlight { seq, id: None });
        let duration = if animated {
            state.animation_duration
        } else {
            Duration::ZERO
        };
        let callbacks = (
            state.on_height_change.clone(),
            state.height_change_actions.clone(),
            state.on_did_change_height.clone(),
        );
        (GrowthEvent::new(current, target), duration, seq, callbacks)
    };
    let (on_height_change, actions, on_did_change) = callbacks;

    log::debug!(
        "growing text height {} -> {} ({:?})",
        event.old_height,
        event.new_height,
        duration
    );

    if let Some(on_height_change) = on_height_change {
        on_height_change(event);
    }

    let height = core.height.clone();
    let apply = move || {
        height.set(event.new_height);
        if let Some(actions) = actions {
            actions(event);
        }
    };

    let weak = Rc::downgrade(core);
    let complete = move |_finished: bool| {
        if let Some(core) = weak.upgrade() {
            finish(&core, seq, event, on_did_change);
        }
    };

    if duration.is_zero() {
        apply();
        complete(true);
    } else {
        let params = AnimationParams::new(duration, AnimationCurve::EaseInOut).with_options(
            AnimationOptions::ALLOW_USER_INTERACTION | AnimationOptions::BEGIN_FROM_CURRENT_STATE,
        );
        let id = core
            .animator
            .animate(params, Box::new(apply), Box::new(complete));

        if let Some(in_flight) = core.state.borrow_mut().in_flight.as_mut() {
            if in_flight.seq == seq {
                in_flight.id = Some(id);
            }
        }
    }
}

/// Re-clamp after a line bound or metrics change.
///
/// A running height animation is interrupted and the new height applies
/// without animation. While the animator is still starting it (no id yet)
/// the change waits for the completion like a text edit.
fn reclamp(core: &Rc<GrowingCore>) {
    let running = {
        let mut state = core.state.borrow_mut();
        let id = match state.phase {
            GrowthPhase::Idle => None,
            GrowthPhase::Animating => state.in_flight.as_ref().and_then(|f| f.id),
        };
        if id.is_some() {
            state.pending = Some(false);
        }
        id
    };

    match running {
        Some(id) if core.animator.interrupt(id) => {
            log::debug!("interrupted height animation {id:?} to re-clamp");
        }
        _ => refresh(core, false),
    }
}

/// Warn once per font or inset change instead of on every measurement.
fn warn_unusable_metrics(font: &Font, insets: &EdgeInsets) {
    if let Err(err) = LineMetrics::try_new(font.line_height, insets.vertical()) {
        log::warn!("growing text metrics fall back to defaults: {err}");
    }
}

/// Back to idle, notify, then run the coalesced refresh if one is pending.
fn finish(
    core: &Rc<GrowingCore>,
    seq: u64,
    event: GrowthEvent,
    on_did_change: Option<HeightChangeCallback>,
) {
    let pending = {
        let mut state = core.state.borrow_mut();
        state.phase = GrowthPhase::Idle;
        if state.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
            state.in_flight = None;
        }
        state.pending.take()
    };

    if let Some(on_did_change) = on_did_change {
        on_did_change(event);
    }

    if let Some(animated) = pending {
        log::trace!("running coalesced height refresh");
        refresh(core, animated);
    }
}

// =============================================================================
// TESTS
// =============================================================================
