//! Keyboard Animation Observer - keyboard-synchronized layout changes
//!
//! A host screen owns one [`KeyboardAnimationObserver`]. While subscribed,
//! every keyboard transition runs three phases in order:
//!
//! 1. `before(&transition)` - bookkeeping, before anything moves
//! 2. `animation(&transition)` - layout changes, inside the animator with the
//!    keyboard's own duration and curve so both move in lock-step
//! 3. `completion(finished, is_showing)` - once, when the animation ends;
//!    `finished` is false when a newer transition interrupted it
//!
//! A new transition interrupts the one in flight before its `before` runs, so
//! the phases of two transitions never interleave.
//!
//! # Lifetimes
//!
//! Callbacks live as long as the subscription. A callback that strongly
//! captures the host that owns the observer keeps both alive forever:
//! capture a `Weak` instead.
//!
//! After `unsubscribe()` (or a re-subscribe) the animation already in flight
//! keeps running in the animator, but its completion is dropped rather than
//! delivered.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_grow::state::{KeyboardAnimationCallbacks, KeyboardAnimationObserver, KeyboardEventSource, Timeline};
//! use spark_grow::Rect;
//!
//! let source = KeyboardEventSource::new();
//! let observer = KeyboardAnimationObserver::new(&source, Rc::new(Timeline::new()), Rect::new(0.0, 0.0, 80.0, 24.0));
//!
//! observer.subscribe(
//!     KeyboardAnimationCallbacks::new()
//!         .animation(|t| println!("move composer above {:?}", t.end_frame))
//!         .on_complete(|finished, shown| println!("done={finished} shown={shown}")),
//! );
//!
//! // Later, when the screen goes away
//! observer.unsubscribe();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::animate::{AnimationId, AnimationOptions, AnimationParams, Animator};
use super::keyboard::{
    KeyboardEventSource, KeyboardEvents, KeyboardNormalizer, KeyboardNotification,
    KeyboardTransition, SourceSubscription,
};
use crate::types::Rect;

// =============================================================================
// CALLBACKS
// =============================================================================

/// Runs before the keyboard animation starts.
pub type KeyboardBeforeCallback = Rc<dyn Fn(&KeyboardTransition)>;

/// Runs inside the keyboard animation.
pub type KeyboardAnimationCallback = Rc<dyn Fn(&KeyboardTransition)>;

/// Runs when the keyboard animation ends: `(finished, is_showing)`.
pub type KeyboardCompletionCallback = Rc<dyn Fn(bool, bool)>;

/// The three optional phases of a subscription. A missing phase is skipped.
#[derive(Clone, Default)]
pub struct KeyboardAnimationCallbacks {
    pub before: Option<KeyboardBeforeCallback>,
    pub animation: Option<KeyboardAnimationCallback>,
    pub completion: Option<KeyboardCompletionCallback>,
}

impl KeyboardAnimationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<F>(mut self, f: F) -> Self
    where
        F: Fn(&KeyboardTransition) + 'static,
    {
        self.before = Some(Rc::new(f));
        self
    }

    pub fn animation<F>(mut self, f: F) -> Self
    where
        F: Fn(&KeyboardTransition) + 'static,
    {
        self.animation = Some(Rc::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(bool, bool) + 'static,
    {
        self.completion = Some(Rc::new(f));
        self
    }
}

// =============================================================================
// STATE
// =============================================================================

struct Subscription {
    events: KeyboardEvents,
    callbacks: KeyboardAnimationCallbacks,
}

/// The transition currently animating. `id` is unknown until `animate()`
/// returns.
struct InFlight {
    seq: u64,
    id: Option<AnimationId>,
}

struct ObserverState {
    subscription: Option<Subscription>,
    /// Bumped on every subscribe / unsubscribe; completions from an older
    /// generation are dropped.
    generation: u64,
    attachment: Option<SourceSubscription>,
    in_flight: Option<InFlight>,
    next_seq: u64,
    normalizer: KeyboardNormalizer,
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Per-host subscription to keyboard transitions.
pub struct KeyboardAnimationObserver {
    state: Rc<RefCell<ObserverState>>,
    source: KeyboardEventSource,
    animator: Rc<dyn Animator>,
}

impl KeyboardAnimationObserver {
    /// Observer on `source`, animating with `animator`. Nothing is delivered
    /// until one of the `subscribe*` calls.
    pub fn new(
        source: &KeyboardEventSource,
        animator: Rc<dyn Animator>,
        screen_bounds: Rect,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(ObserverState {
                subscription: None,
                generation: 0,
                attachment: None,
                in_flight: None,
                next_seq: 0,
                normalizer: KeyboardNormalizer::new(screen_bounds),
            })),
            source: source.clone(),
            animator,
        }
    }

    /// React to every transition: show, hide and frame changes.
    pub fn subscribe(&self, callbacks: KeyboardAnimationCallbacks) {
        self.register(KeyboardEvents::all(), callbacks);
    }

    /// React to show and hide only.
    pub fn subscribe_show_hide(&self, callbacks: KeyboardAnimationCallbacks) {
        self.register(KeyboardEvents::SHOW_HIDE, callbacks);
    }

    /// React to frame changes only (e.g. switching to an emoji keyboard).
    pub fn subscribe_frame_changes(&self, callbacks: KeyboardAnimationCallbacks) {
        self.register(KeyboardEvents::CHANGE_FRAME, callbacks);
    }

    /// Replace the current registration with one for `events`.
    fn register(&self, events: KeyboardEvents, callbacks: KeyboardAnimationCallbacks) {
        let needs_attach = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.subscription = Some(Subscription { events, callbacks });
            state.normalizer.reset();
            state.attachment.is_none()
        };

        if needs_attach {
            let weak = Rc::downgrade(&self.state);
            let animator = self.animator.clone();
            let handle = self.source.subscribe(move |notification| {
                if let Some(state) = weak.upgrade() {
                    deliver(&state, &animator, notification);
                }
            });
            self.state.borrow_mut().attachment = Some(handle);
        }

        log::debug!("keyboard observer subscribed to {events:?}");
    }

    /// Drop the registration and detach from the source. Safe to call any
    /// number of times.
    pub fn unsubscribe(&self) {
        let handle = {
            let mut state = self.state.borrow_mut();
            if state.subscription.is_none() && state.attachment.is_none() {
                return;
            }
            state.subscription = None;
            state.generation += 1;
            state.normalizer.reset();
            state.attachment.take()
        };

        drop(handle);
        log::debug!("keyboard observer unsubscribed");
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().subscription.is_some()
    }

    /// Events the current registration listens to.
    pub fn events(&self) -> Option<KeyboardEvents> {
        self.state.borrow().subscription.as_ref().map(|s| s.events)
    }

    /// Screen bounds used to tell whether a frame change shows the keyboard.
    pub fn set_screen_bounds(&self, screen_bounds: Rect) {
        self.state.borrow_mut().normalizer.set_screen_bounds(screen_bounds);
    }

    /// True while a transition's animation is running.
    pub fn is_animating(&self) -> bool {
        let id = self
            .state
            .borrow()
            .in_flight
            .as_ref()
            .and_then(|in_flight| in_flight.id);
        id.is_some_and(|id| self.animator.is_running(id))
    }
}

/// Run one raw notification through the current subscription.
fn deliver(
    state: &Rc<RefCell<ObserverState>>,
    animator: &Rc<dyn Animator>,
    notification: &KeyboardNotification,
) {
    let (transition, callbacks, generation, seq, interrupted) = {
        let mut s = state.borrow_mut();
        let (events, callbacks) = match s.subscription.as_ref() {
            Some(sub) => (sub.events, sub.callbacks.clone()),
            None => return,
        };
        if !events.contains(notification.kind.events()) {
            return;
        }
        let Some(transition) = s.normalizer.normalize(notification) else {
            return;
        };

        s.next_seq += 1;
        let seq = s.next_seq;
        let interrupted = s
            .in_flight
            .replace(InFlight { seq, id: None })
            .and_then(|in_flight| in_flight.id);
        (transition, callbacks, s.generation, seq, interrupted)
    };

    if let Some(id) = interrupted {
        animator.interrupt(id);
    }

    log::debug!(
        "keyboard {:?} showing={} over {:?}",
        transition.kind,
        transition.is_showing,
        transition.duration
    );

    if let Some(before) = &callbacks.before {
        before(&transition);
    }
    if state.borrow().generation != generation {
        // `before` unsubscribed or replaced the registration.
        return;
    }

    let params = AnimationParams::new(transition.duration, transition.curve).with_options(
        AnimationOptions::BEGIN_FROM_CURRENT_STATE | AnimationOptions::ALLOW_USER_INTERACTION,
    );

    let animation = callbacks.animation.clone();
    let completion = callbacks.completion.clone();
    let is_showing = transition.is_showing;
    let weak = Rc::downgrade(state);

    let id = animator.animate(
        params,
        Box::new(move || {
            if let Some(animation) = animation {
                animation(&transition);
            }
        }),
        Box::new(move |finished| {
            let current = weak.upgrade().is_some_and(|state| {
                let mut s = state.borrow_mut();
                if s.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
                    s.in_flight = None;
                }
                s.generation == generation
            });

            if !current {
                log::debug!("dropping completion of a stale keyboard subscription");
                return;
            }
            if let Some(completion) = completion {
                completion(finished, is_showing);
            }
        }),
    );

    if let Some(in_flight) = state.borrow_mut().in_flight.as_mut() {
        if in_flight.seq == seq {
            in_flight.id = Some(id);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::animate::Timeline;
    use crate::state::keyboard::NotificationKind;
    use std::time::Duration;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 320.0, 568.0);
    const SHOWN: Rect = Rect::new(0.0, 352.0, 320.0, 216.0);
    const HIDDEN: Rect = Rect::new(0.0, 568.0, 320.0, 216.0);

    type Log = Rc<RefCell<Vec<String>>>;

    fn setup() -> (KeyboardEventSource, Rc<Timeline>, KeyboardAnimationObserver) {
        let source = KeyboardEventSource::new();
        let timeline = Rc::new(Timeline::new());
        let observer = KeyboardAnimationObserver::new(&source, timeline.clone(), SCREEN);
        (source, timeline, observer)
    }

    fn recording(log: &Log, tag: &str) -> KeyboardAnimationCallbacks {
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let (t1, t2, t3) = (tag.to_string(), tag.to_string(), tag.to_string());
        KeyboardAnimationCallbacks::new()
            .before(move |t| l1.borrow_mut().push(format!("{t1}:before:{}", t.is_showing)))
            .animation(move |t| l2.borrow_mut().push(format!("{t2}:animation:{}", t.is_showing)))
            .on_complete(move |finished, shown| {
                l3.borrow_mut().push(format!("{t3}:complete:{finished}:{shown}"))
            })
    }

    fn show() -> KeyboardNotification {
        KeyboardNotification::new(NotificationKind::WillShow, SHOWN).with_duration(0.25)
    }

    fn hide() -> KeyboardNotification {
        KeyboardNotification::new(NotificationKind::WillHide, HIDDEN).with_duration(0.25)
    }

    #[test]
    fn test_phases_run_in_order() {
        let (source, timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "a"));

        source.post(show());
        assert_eq!(*log.borrow(), vec!["a:before:true", "a:animation:true"]);
        assert!(observer.is_animating());

        timeline.advance(Duration::from_millis(250));
        assert_eq!(
            *log.borrow(),
            vec!["a:before:true", "a:animation:true", "a:complete:true:true"]
        );
        assert!(!observer.is_animating());
    }

    #[test]
    fn test_zero_duration_completes_inline() {
        let (source, _timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "a"));

        source.post(KeyboardNotification::new(NotificationKind::WillHide, HIDDEN));
        assert_eq!(
            *log.borrow(),
            vec!["a:before:false", "a:animation:false", "a:complete:true:false"]
        );
    }

    #[test]
    fn test_missing_phases_are_skipped() {
        let (source, timeline, observer) = setup();
        let done = Rc::new(RefCell::new(Vec::new()));
        let done_clone = done.clone();
        observer.subscribe(
            KeyboardAnimationCallbacks::new()
                .on_complete(move |f, s| done_clone.borrow_mut().push((f, s))),
        );

        source.post(show());
        timeline.advance(Duration::from_secs(1));
        assert_eq!(*done.borrow(), vec![(true, true)]);

        observer.subscribe(KeyboardAnimationCallbacks::new());
        source.post(hide());
        timeline.advance(Duration::from_secs(1));
        assert_eq!(done.borrow().len(), 1);
    }

    #[test]
    fn test_resubscribe_replaces_registration() {
        let (source, timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "first"));
        observer.subscribe(recording(&log, "second"));
        assert_eq!(source.handler_count(), 1);

        source.post(show());
        timeline.advance(Duration::from_secs(1));
        assert!(log.borrow().iter().all(|entry| entry.starts_with("second:")));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_hide_then_show_interrupts_first() {
        let (source, timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "a"));

        source.post(KeyboardNotification::new(NotificationKind::WillShow, SHOWN));
        log.borrow_mut().clear();

        source.post(hide());
        timeline.advance(Duration::from_millis(100));
        source.post(show());

        assert_eq!(
            *log.borrow(),
            vec![
                "a:before:false",
                "a:animation:false",
                "a:complete:false:false",
                "a:before:true",
                "a:animation:true",
            ]
        );

        timeline.advance(Duration::from_millis(250));
        assert_eq!(log.borrow().last().unwrap(), "a:complete:true:true");
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let (source, _timeline, observer) = setup();
        observer.unsubscribe();
        assert!(!observer.is_subscribed());

        observer.subscribe(KeyboardAnimationCallbacks::new());
        assert_eq!(source.handler_count(), 1);

        observer.unsubscribe();
        observer.unsubscribe();
        assert!(!observer.is_subscribed());
        assert_eq!(source.handler_count(), 0);
    }

    #[test]
    fn test_unsubscribe_mid_flight_drops_completion() {
        let (source, timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "a"));

        source.post(show());
        observer.unsubscribe();
        assert_eq!(timeline.running_count(), 1);

        timeline.advance(Duration::from_secs(1));
        assert_eq!(timeline.running_count(), 0);
        assert_eq!(*log.borrow(), vec!["a:before:true", "a:animation:true"]);

        source.post(hide());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_resubscribe_mid_flight_drops_old_completion() {
        let (source, timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "old"));
        source.post(show());

        observer.subscribe(recording(&log, "new"));
        timeline.advance(Duration::from_secs(1));

        assert_eq!(*log.borrow(), vec!["old:before:true", "old:animation:true"]);
    }

    #[test]
    fn test_show_hide_filter() {
        let (source, _timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe_show_hide(recording(&log, "a"));
        assert_eq!(observer.events(), Some(KeyboardEvents::SHOW_HIDE));

        source.post(KeyboardNotification::new(NotificationKind::WillChangeFrame, SHOWN));
        assert!(log.borrow().is_empty());

        source.post(KeyboardNotification::new(NotificationKind::WillShow, SHOWN));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_frame_change_filter() {
        let (source, _timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe_frame_changes(recording(&log, "a"));

        source.post(KeyboardNotification::new(NotificationKind::WillShow, SHOWN));
        assert!(log.borrow().is_empty());

        source.post(KeyboardNotification::new(NotificationKind::WillChangeFrame, SHOWN));
        assert_eq!(
            *log.borrow(),
            vec!["a:before:true", "a:animation:true", "a:complete:true:true"]
        );
    }

    #[test]
    fn test_duplicate_frames_are_suppressed() {
        let (source, _timeline, observer) = setup();
        let log: Log = Rc::default();
        observer.subscribe(recording(&log, "a"));

        let n = KeyboardNotification::new(NotificationKind::ChangeFrame, SHOWN);
        source.post(n.clone());
        source.post(n.clone());
        assert_eq!(log.borrow().len(), 3);

        // A fresh registration sees the frame again.
        observer.subscribe(recording(&log, "b"));
        source.post(n);
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn test_before_can_unsubscribe() {
        let (source, timeline, observer) = setup();
        let observer = Rc::new(observer);
        let weak = Rc::downgrade(&observer);
        let animated = Rc::new(RefCell::new(false));
        let animated_clone = animated.clone();

        observer.subscribe(
            KeyboardAnimationCallbacks::new()
                .before(move |_| {
                    if let Some(observer) = weak.upgrade() {
                        observer.unsubscribe();
                    }
                })
                .animation(move |_| *animated_clone.borrow_mut() = true),
        );

        source.post(show());
        assert!(!*animated.borrow());
        assert_eq!(timeline.running_count(), 0);
        assert_eq!(source.handler_count(), 0);
    }

    #[test]
    fn test_drop_detaches_from_source() {
        let (source, _timeline, observer) = setup();
        observer.subscribe(KeyboardAnimationCallbacks::new());
        assert_eq!(source.handler_count(), 1);

        drop(observer);
        assert_eq!(source.handler_count(), 0);
        source.post(show());
    }

    #[test]
    fn test_animation_uses_keyboard_timing() {
        let (source, timeline, observer) = setup();
        observer.subscribe(KeyboardAnimationCallbacks::new());

        source.post(show().with_curve(2));
        assert_eq!(timeline.running_count(), 1);

        // 0.25s at ease-out: not done at 0.2s, done at 0.25s.
        assert_eq!(timeline.advance(Duration::from_millis(200)), 0);
        assert_eq!(timeline.advance(Duration::from_millis(50)), 1);
    }
}
