//! Navigation-event sink.
//!
//! The navigator reports every committed stack change to one injected
//! [`NavigationEventSink`]. Notifications are fire-and-forget: the sink
//! cannot veto or fail them, and it is told only *after* the stack and
//! visibility changes are final.
//!
//! | Notification                | Fired when                               |
//! |-----------------------------|------------------------------------------|
//! | `on_controller_pushed`      | a push finishes (with or without animation) |
//! | `on_controller_popped`      | a pop finishes; the controller is already off the stack |
//! | `on_controller_swiped_from` | a swipe commits, for the controller swiped away |
//! | `on_controller_swiped_to`   | a swipe commits, for the controller revealed |
//!
//! # Creating a sink
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`NavigationEventSink`] | Full control over each notification |
//! | [`sink_fn`] | One closure receiving a [`NavigationEvent`] |
//! | [`EventLog`] | Record events for later inspection |
//!
//! ```
//! use controller_navigator::{sink_fn, NavigationEvent};
//!
//! let sink = sink_fn(|event: &NavigationEvent| {
//!     println!("{} {}", event.kind(), event.controller());
//! });
//! # drop(sink);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::controller::Controller;
use crate::error::ControllerLabel;

// ============================================================================
// NavigationEventSink trait
// ============================================================================

/// Receiver of committed navigation events.
pub trait NavigationEventSink: 'static {
    fn on_controller_pushed(&self, _controller: &dyn Controller) {}

    fn on_controller_popped(&self, _controller: &dyn Controller) {}

    fn on_controller_swiped_from(&self, _controller: &dyn Controller) {}

    fn on_controller_swiped_to(&self, _controller: &dyn Controller) {}

    /// Sink name for debugging.
    fn name(&self) -> &'static str {
        "NavigationEventSink"
    }
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NavigationEventSink for NoopSink {
    fn name(&self) -> &'static str {
        "NoopSink"
    }
}

// ============================================================================
// NavigationEvent
// ============================================================================

/// A committed navigation event, as recorded by [`EventLog`] and passed to
/// [`sink_fn`] closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Pushed(ControllerLabel),
    Popped(ControllerLabel),
    SwipedFrom(ControllerLabel),
    SwipedTo(ControllerLabel),
}

impl NavigationEvent {
    pub fn controller(&self) -> ControllerLabel {
        match self {
            Self::Pushed(label)
            | Self::Popped(label)
            | Self::SwipedFrom(label)
            | Self::SwipedTo(label) => *label,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pushed(_) => "pushed",
            Self::Popped(_) => "popped",
            Self::SwipedFrom(_) => "swiped_from",
            Self::SwipedTo(_) => "swiped_to",
        }
    }
}

impl fmt::Display for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.controller())
    }
}

// ============================================================================
// sink_fn helper
// ============================================================================

/// Create a sink from one closure that receives every event.
pub fn sink_fn<F>(callback: F) -> FnSink<F>
where
    F: Fn(&NavigationEvent) + 'static,
{
    FnSink { callback }
}

/// Sink created from a closure via [`sink_fn`].
pub struct FnSink<F> {
    callback: F,
}

impl<F> NavigationEventSink for FnSink<F>
where
    F: Fn(&NavigationEvent) + 'static,
{
    fn on_controller_pushed(&self, controller: &dyn Controller) {
        (self.callback)(&NavigationEvent::Pushed(ControllerLabel::of(controller)));
    }

    fn on_controller_popped(&self, controller: &dyn Controller) {
        (self.callback)(&NavigationEvent::Popped(ControllerLabel::of(controller)));
    }

    fn on_controller_swiped_from(&self, controller: &dyn Controller) {
        (self.callback)(&NavigationEvent::SwipedFrom(ControllerLabel::of(
            controller,
        )));
    }

    fn on_controller_swiped_to(&self, controller: &dyn Controller) {
        (self.callback)(&NavigationEvent::SwipedTo(ControllerLabel::of(controller)));
    }

    fn name(&self) -> &'static str {
        "FnSink"
    }
}

// ============================================================================
// EventLog
// ============================================================================

/// Recording sink. Clones share the same log, so keep one clone and hand
/// the other to the navigator.
///
/// ```
/// use controller_navigator::{EventLog, NavigationController};
///
/// let log = EventLog::new();
/// let navigator = NavigationController::new(log.clone());
/// assert!(log.is_empty());
/// # drop(navigator);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<NavigationEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.borrow().clone()
    }

    pub fn last(&self) -> Option<NavigationEvent> {
        self.events.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<NavigationEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    fn record(&self, event: NavigationEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl NavigationEventSink for EventLog {
    fn on_controller_pushed(&self, controller: &dyn Controller) {
        self.record(NavigationEvent::Pushed(ControllerLabel::of(controller)));
    }

    fn on_controller_popped(&self, controller: &dyn Controller) {
        self.record(NavigationEvent::Popped(ControllerLabel::of(controller)));
    }

    fn on_controller_swiped_from(&self, controller: &dyn Controller) {
        self.record(NavigationEvent::SwipedFrom(ControllerLabel::of(controller)));
    }

    fn on_controller_swiped_to(&self, controller: &dyn Controller) {
        self.record(NavigationEvent::SwipedTo(ControllerLabel::of(controller)));
    }

    fn name(&self) -> &'static str {
        "EventLog"
    }
}

// ============================================================================
// Tests
// ============================================================================
