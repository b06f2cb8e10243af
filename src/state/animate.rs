//! Animation Runtime - timed layout transactions
//!
//! The growth engine and the keyboard observer never interpolate anything
//! themselves. They hand a block of layout changes to an [`Animator`], the
//! same way a view runtime takes `animate(duration, curve, block, completion)`.
//!
//! # Pattern
//!
//! - The animation block runs synchronously inside `animate()`: it sets the
//!   *target* state, the runtime moves the presentation towards it
//! - The completion runs exactly once: `true` when the animation ran to its
//!   end, `false` when it was interrupted
//! - Zero duration completes before `animate()` returns
//!
//! [`Timeline`] is the built-in runtime. It is driven by [`Timeline::advance`]
//! from the host's frame loop, which also makes it deterministic under test.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_grow::state::animate::{Animator, AnimationParams, Timeline};
//! use spark_grow::AnimationCurve;
//!
//! let timeline = Timeline::new();
//! timeline.animate(
//!     AnimationParams::new(Duration::from_millis(250), AnimationCurve::EaseOut),
//!     Box::new(|| { /* move things */ }),
//!     Box::new(|finished| assert!(finished)),
//! );
//! timeline.advance(Duration::from_millis(250));
//! ```

use std::cell::RefCell;
use std::time::Duration;

use bitflags::bitflags;

use crate::types::AnimationCurve;

// =============================================================================
// TYPES
// =============================================================================

bitflags! {
    /// Hints passed along with an animation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AnimationOptions: u8 {
        /// Input stays enabled while the animation runs.
        const ALLOW_USER_INTERACTION = 1 << 0;
        /// Start from the on-screen state of whatever is in flight.
        const BEGIN_FROM_CURRENT_STATE = 1 << 1;
    }
}

/// Layout changes to run inside an animated transaction.
pub type AnimationBlock = Box<dyn FnOnce()>;

/// Completion of an animation. `true` when it finished, `false` when it was
/// interrupted.
pub type CompletionBlock = Box<dyn FnOnce(bool)>;

/// Identifies one started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

/// Duration, curve and options of one animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParams {
    pub duration: Duration,
    pub curve: AnimationCurve,
    pub options: AnimationOptions,
}

impl AnimationParams {
    pub fn new(duration: Duration, curve: AnimationCurve) -> Self {
        Self {
            duration,
            curve,
            options: AnimationOptions::empty(),
        }
    }

    pub fn with_options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Platform animation runtime.
pub trait Animator {
    /// Run `animations` as one animated transaction and call `completion`
    /// exactly once when it ends.
    fn animate(
        &self,
        params: AnimationParams,
        animations: AnimationBlock,
        completion: CompletionBlock,
    ) -> AnimationId;

    /// Stop an animation early. Its completion runs with `false`.
    ///
    /// Returns false when `id` is not running (already finished or unknown).
    fn interrupt(&self, id: AnimationId) -> bool;

    /// True while `id` has not completed.
    fn is_running(&self, id: AnimationId) -> bool;
}

// =============================================================================
// TIMELINE
// =============================================================================

struct Running {
    id: AnimationId,
    params: AnimationParams,
    elapsed: Duration,
    completion: CompletionBlock,
}

#[derive(Default)]
struct TimelineState {
    running: Vec<Running>,
    next_id: u64,
}

/// Frame-driven [`Animator`].
///
/// Single-threaded. No borrow is held while blocks run, so a completion may
/// start the next animation.
#[derive(Default)]
pub struct Timeline {
    state: RefCell<TimelineState>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `dt` and complete every animation that reached
    /// its end. Returns how many completed.
    pub fn advance(&self, dt: Duration) -> usize {
        let done: Vec<Running> = {
            let mut state = self.state.borrow_mut();
            for running in &mut state.running {
                running.elapsed = running.elapsed.saturating_add(dt);
            }
            let (done, keep): (Vec<Running>, Vec<Running>) = std::mem::take(&mut state.running)
                .into_iter()
                .partition(|r| r.elapsed >= r.params.duration);
            state.running = keep;
            done
        };

        let count = done.len();
        for running in done {
            log::trace!("animation {:?} finished", running.id);
            (running.completion)(true);
        }
        count
    }

    /// Run every in-flight animation to its end.
    ///
    /// Animations started by the completions themselves stay in flight.
    pub fn finish_all(&self) -> usize {
        let done = std::mem::take(&mut self.state.borrow_mut().running);
        let count = done.len();
        for running in done {
            (running.completion)(true);
        }
        count
    }

    /// Eased progress of `id` in `[0, 1]`, or `None` when not running.
    pub fn progress(&self, id: AnimationId) -> Option<f32> {
        let state = self.state.borrow();
        state.running.iter().find(|r| r.id == id).map(|r| {
            let t = r.elapsed.as_secs_f32() / r.params.duration.as_secs_f32();
            r.params.curve.apply(t)
        })
    }

    /// Parameters `id` was started with, while it runs.
    pub fn params(&self, id: AnimationId) -> Option<AnimationParams> {
        let state = self.state.borrow();
        state.running.iter().find(|r| r.id == id).map(|r| r.params)
    }

    /// Number of animations in flight.
    pub fn running_count(&self) -> usize {
        self.state.borrow().running.len()
    }
}

impl Animator for Timeline {
    fn animate(
        &self,
        params: AnimationParams,
        animations: AnimationBlock,
        completion: CompletionBlock,
    ) -> AnimationId {
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            AnimationId(state.next_id)
        };

        animations();

        if params.duration.is_zero() {
            completion(true);
            return id;
        }

        log::trace!("animation {id:?} started for {:?}", params.duration);
        self.state.borrow_mut().running.push(Running {
            id,
            params,
            elapsed: Duration::ZERO,
            completion,
        });
        id
    }

    fn interrupt(&self, id: AnimationId) -> bool {
        let taken = {
            let mut state = self.state.borrow_mut();
            let index = state.running.iter().position(|r| r.id == id);
            index.map(|index| state.running.remove(index))
        };

        match taken {
            Some(running) => {
                log::trace!("animation {id:?} interrupted");
                (running.completion)(false);
                true
            }
            None => false,
        }
    }

    fn is_running(&self, id: AnimationId) -> bool {
        self.state.borrow().running.iter().any(|r| r.id == id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
