//! Controller transitions.
//!
//! A [`Transition`] describes one move from an outgoing controller to an
//! incoming one. It pairs a visual [`TransitionStyle`] with a
//! [`TransitionDriver`] that actually runs it, and is consumed by value when
//! the navigator commits it, so an instance can never be started twice.
//!
//! Completion is reported through a [`TransitionCompletion`], a single-shot
//! handle the driver receives from the navigator. Calling
//! [`complete`](TransitionCompletion::complete) consumes it; there is no way
//! to signal the same transition twice.
//!
//! Built-in drivers:
//!
//! | Driver             | Completes                                         |
//! |--------------------|---------------------------------------------------|
//! | [`ImmediateDriver`] | inside `perform`                                 |
//! | [`DeferredDriver`]  | when the host calls [`PendingCompletion::complete`] |
//! | [`TimerDriver`]     | after the style's duration, on the tokio runtime |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::controller::ControllerId;
use crate::{debug_log, warn_log};

// ============================================================================
// TransitionStyle
// ============================================================================

/// Direction for slide transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Slide from left to right
    Left,
    /// Slide from right to left
    Right,
    /// Slide from top to bottom
    Up,
    /// Slide from bottom to top
    Down,
}

/// Visual shape of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionStyle {
    /// No animation; the driver should complete right away.
    #[default]
    None,

    Fade {
        /// Duration in milliseconds
        duration_ms: u64,
    },

    Slide {
        direction: SlideDirection,
        /// Duration in milliseconds
        duration_ms: u64,
    },
}

impl TransitionStyle {
    pub fn fade(duration_ms: u64) -> Self {
        Self::Fade { duration_ms }
    }

    pub fn slide_left(duration_ms: u64) -> Self {
        Self::Slide {
            direction: SlideDirection::Left,
            duration_ms,
        }
    }

    pub fn slide_right(duration_ms: u64) -> Self {
        Self::Slide {
            direction: SlideDirection::Right,
            duration_ms,
        }
    }

    pub fn slide_up(duration_ms: u64) -> Self {
        Self::Slide {
            direction: SlideDirection::Up,
            duration_ms,
        }
    }

    pub fn slide_down(duration_ms: u64) -> Self {
        Self::Slide {
            direction: SlideDirection::Down,
            duration_ms,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fade { duration_ms } | Self::Slide { duration_ms, .. } => {
                Duration::from_millis(*duration_ms)
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Where the incoming controller sits at `progress` (0.0 to 1.0).
    ///
    /// Offsets are percentages of the container size. Progress is clamped
    /// and eased before it is applied.
    pub fn frame(&self, progress: f32) -> TransitionFrame {
        let eased = apply_easing(progress);
        match self {
            Self::None => TransitionFrame::SETTLED,
            Self::Fade { .. } => TransitionFrame {
                offset_x: 0.0,
                offset_y: 0.0,
                opacity: eased,
            },
            Self::Slide { direction, .. } => {
                let offset = (1.0 - eased) * 100.0;
                let (offset_x, offset_y) = match direction {
                    SlideDirection::Left => (offset, 0.0),
                    SlideDirection::Right => (-offset, 0.0),
                    SlideDirection::Up => (0.0, offset),
                    SlideDirection::Down => (0.0, -offset),
                };
                TransitionFrame {
                    offset_x,
                    offset_y,
                    opacity: eased,
                }
            }
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Fade { duration_ms } => write!(f, "Fade({}ms)", duration_ms),
            Self::Slide {
                direction,
                duration_ms,
            } => write!(f, "Slide({:?}, {}ms)", direction, duration_ms),
        }
    }
}

/// Position and opacity of the incoming controller at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    /// Horizontal offset in percent of the container width.
    pub offset_x: f32,
    /// Vertical offset in percent of the container height.
    pub offset_y: f32,
    pub opacity: f32,
}

impl TransitionFrame {
    /// Fully in place and opaque.
    pub const SETTLED: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        opacity: 1.0,
    };
}

/// Easing function - ease in out cubic
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Apply easing to progress
pub fn apply_easing(progress: f32) -> f32 {
    ease_in_out_cubic(progress.clamp(0.0, 1.0))
}

// ============================================================================
// Completion handle
// ============================================================================

/// Single-shot completion signal handed to a [`TransitionDriver`].
///
/// Dropping the handle without calling [`complete`](Self::complete) also
/// releases the navigator, which logs it as an abandoned transition.
#[derive(Debug)]
pub struct TransitionCompletion {
    sender: oneshot::Sender<()>,
}

impl TransitionCompletion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Signal that the animation has finished.
    pub fn complete(self) {
        // The navigator may already be gone; nothing left to notify then.
        let _ = self.sender.send(());
    }
}

// ============================================================================
// TransitionDriver
// ============================================================================

/// Whether the navigator is pushing or popping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Push,
    Pop,
}

/// Everything a driver needs to know to run one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    pub from: Option<ControllerId>,
    pub to: Option<ControllerId>,
    pub style: TransitionStyle,
    pub direction: TransitionDirection,
}

/// Runs a transition's animation.
///
/// `perform` is called exactly once per [`Transition`]. It may complete
/// synchronously or hand the completion off to whatever drives the host's
/// animation clock; either way the completion must fire eventually or the
/// navigator stays blocked.
pub trait TransitionDriver: 'static {
    fn perform(&mut self, context: TransitionContext, completion: TransitionCompletion);

    /// Name used in diagnostics.
    fn describe(&self) -> String {
        "TransitionDriver".to_string()
    }
}

/// Completes every transition as soon as it starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateDriver;

impl TransitionDriver for ImmediateDriver {
    fn perform(&mut self, _context: TransitionContext, completion: TransitionCompletion) {
        completion.complete();
    }

    fn describe(&self) -> String {
        "ImmediateDriver".to_string()
    }
}

/// Parks the completion until the host finishes the animation itself.
///
/// ```
/// use controller_navigator::{DeferredDriver, Transition, TransitionStyle};
///
/// let (driver, pending) = DeferredDriver::new();
/// let transition = Transition::new(TransitionStyle::fade(150), driver);
/// assert!(!pending.is_armed());
/// # drop(transition);
/// ```
#[derive(Debug)]
pub struct DeferredDriver {
    slot: PendingCompletion,
}

impl DeferredDriver {
    /// Create a driver and the handle the host uses to finish it.
    pub fn new() -> (Self, PendingCompletion) {
        let slot = PendingCompletion::default();
        (Self { slot: slot.clone() }, slot)
    }
}

impl TransitionDriver for DeferredDriver {
    fn perform(&mut self, context: TransitionContext, completion: TransitionCompletion) {
        debug_log!(
            "Deferring {:?} transition {:?} -> {:?}",
            context.direction,
            context.from,
            context.to
        );
        *self.slot.inner.borrow_mut() = Some((context, completion));
    }

    fn describe(&self) -> String {
        "DeferredDriver".to_string()
    }
}

/// Host-side end of a [`DeferredDriver`].
#[derive(Debug, Clone, Default)]
pub struct PendingCompletion {
    inner: Rc<RefCell<Option<(TransitionContext, TransitionCompletion)>>>,
}

impl PendingCompletion {
    /// Whether `perform` has run and the completion is waiting.
    pub fn is_armed(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// The context the driver was started with, once armed.
    pub fn context(&self) -> Option<TransitionContext> {
        self.inner.borrow().as_ref().map(|(context, _)| *context)
    }

    /// Fire the completion. Returns `false` if it was not armed or has
    /// already fired.
    pub fn complete(&self) -> bool {
        let taken = self.inner.borrow_mut().take();
        match taken {
            Some((_, completion)) => {
                completion.complete();
                true
            }
            None => false,
        }
    }
}

/// Completes after the style's duration on the ambient tokio runtime.
///
/// Without a runtime on the current thread the transition completes
/// immediately, so the navigator never wedges on a missing clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerDriver;

impl TransitionDriver for TimerDriver {
    fn perform(&mut self, context: TransitionContext, completion: TransitionCompletion) {
        let duration = context.style.duration();
        if duration.is_zero() {
            completion.complete();
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    completion.complete();
                });
            }
            Err(_) => {
                warn_log!(
                    "No tokio runtime for {} transition; completing immediately",
                    context.style
                );
                completion.complete();
            }
        }
    }

    fn describe(&self) -> String {
        "TimerDriver".to_string()
    }
}

// ============================================================================
// Transition
// ============================================================================

/// One animated (or instant) move between two controllers.
pub struct Transition {
    style: TransitionStyle,
    driver: Box<dyn TransitionDriver>,
    from: Option<ControllerId>,
    to: Option<ControllerId>,
}

impl Transition {
    pub fn new(style: TransitionStyle, driver: impl TransitionDriver) -> Self {
        Self {
            style,
            driver: Box::new(driver),
            from: None,
            to: None,
        }
    }

    /// A transition that finishes as soon as it starts.
    pub fn immediate(style: TransitionStyle) -> Self {
        Self::new(style, ImmediateDriver)
    }

    pub fn style(&self) -> TransitionStyle {
        self.style
    }

    /// Outgoing controller, set when the navigator commits the transition.
    pub fn from(&self) -> Option<ControllerId> {
        self.from
    }

    /// Incoming controller, set when the navigator commits the transition.
    pub fn to(&self) -> Option<ControllerId> {
        self.to
    }

    pub fn debug_info(&self) -> String {
        format!("{} via {}", self.style, self.driver.describe())
    }

    pub(crate) fn perform(
        &mut self,
        from: Option<ControllerId>,
        to: Option<ControllerId>,
        direction: TransitionDirection,
        completion: TransitionCompletion,
    ) {
        self.from = from;
        self.to = to;
        let context = TransitionContext {
            from,
            to,
            style: self.style,
            direction,
        };
        self.driver.perform(context, completion);
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("style", &self.style)
            .field("driver", &self.driver.describe())
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
