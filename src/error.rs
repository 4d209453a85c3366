//! Error handling for the navigation engine.
//!
//! Every fallible engine call returns `Result<bool, NavigationError>`:
//!
//! - `Ok(true)`: the operation was accepted (a push or pop may still be
//!   animating; acceptance, not completion, is what is reported).
//! - `Ok(false)`: the operation was rejected without touching the stack.
//!   This is the hardened answer to a push/pop issued while input is
//!   blocked, see [`ViolationPolicy`](crate::ViolationPolicy).
//! - `Err(NavigationError)`: a protocol violation. The stack is left
//!   exactly as it was before the call.
//!
//! # Examples
//!
//! ```
//! use controller_navigator::NavigationError;
//!
//! let err = NavigationError::EmptyStack { operation: "pop_controller" };
//! assert!(err.is_protocol_violation());
//! assert_eq!(err.operation(), "pop_controller");
//! assert_eq!(err.to_string(), "pop_controller: cannot pop with no controllers left");
//! ```

use crate::controller::{Controller, ControllerId};
use std::fmt;

// ============================================================================
// ControllerLabel
// ============================================================================

/// Diagnostic identity of a controller: its id plus its type name.
///
/// Errors carry labels rather than references so they can outlive the
/// controllers they describe (a popped controller is dropped right after
/// the pop finishes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerLabel {
    /// Id of the controller.
    pub id: ControllerId,
    /// Short type name, as reported by [`Controller::name`].
    pub name: &'static str,
}

impl ControllerLabel {
    /// Label a live controller.
    pub fn of(controller: &dyn Controller) -> Self {
        Self {
            id: controller.id(),
            name: controller.name(),
        }
    }
}

impl fmt::Display for ControllerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

struct OptionalLabel<'a>(&'a Option<ControllerLabel>);

impl fmt::Display for OptionalLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(label) => label.fmt(f),
            None => f.write_str("null"),
        }
    }
}

struct OptionalId<'a>(&'a Option<ControllerId>);

impl fmt::Display for OptionalId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => id.fmt(f),
            None => f.write_str("null"),
        }
    }
}

// ============================================================================
// NavigationError
// ============================================================================

/// Protocol violations raised by the navigation engine.
///
/// These are programmer errors, never user-facing conditions. Each variant
/// names the operation that raised it and the controllers involved so the
/// race or corruption can be traced back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// A push, pop or transition start was issued while another
    /// transition or a swipe gesture still holds the input lock.
    TransitionInProgress {
        operation: &'static str,
        from: Option<ControllerLabel>,
        to: Option<ControllerLabel>,
        /// Debug description of the transition that was requested, if any.
        transition: Option<String>,
    },

    /// Pop was requested on a stack with no controllers.
    EmptyStack { operation: &'static str },

    /// A swipe gesture was started while a formal transition is recorded.
    SwipeWhileTransitioning {
        from: ControllerLabel,
        to: ControllerLabel,
        transition: String,
    },

    /// A swipe operation was issued with no gesture in progress.
    NoSwipeInProgress { operation: &'static str },

    /// A swipe was ended with controllers other than the ones it began with.
    SwipeMismatch {
        expected_from: ControllerId,
        expected_to: ControllerId,
        from: ControllerId,
        to: ControllerId,
    },

    /// A swipe was started between controllers other than the top and the
    /// one directly below it.
    NotBackSwipe {
        from: ControllerId,
        to: ControllerId,
        top: Option<ControllerId>,
        below: Option<ControllerId>,
    },

    /// The named controller is not on this navigator's stack.
    UnknownController {
        operation: &'static str,
        id: ControllerId,
    },
}

impl NavigationError {
    /// Name of the engine operation that raised this error.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::TransitionInProgress { operation, .. }
            | Self::EmptyStack { operation }
            | Self::NoSwipeInProgress { operation }
            | Self::UnknownController { operation, .. } => operation,
            Self::SwipeWhileTransitioning { .. } | Self::NotBackSwipe { .. } => "begin_swipe",
            Self::SwipeMismatch { .. } => "end_swipe",
        }
    }

    /// Every variant is a caller bug; kept as a predicate so hosts can
    /// match on it without enumerating variants.
    pub fn is_protocol_violation(&self) -> bool {
        true
    }

    /// Whether this error reports a race with an in-flight transition, as
    /// opposed to stack corruption.
    pub fn is_race(&self) -> bool {
        matches!(self, Self::TransitionInProgress { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::TransitionInProgress {
                operation,
                from,
                to,
                transition,
            } => {
                write!(
                    f,
                    "{}: to={}, from={}, transition={}",
                    operation,
                    OptionalLabel(to),
                    OptionalLabel(from),
                    transition.as_deref().unwrap_or("null")
                )
            }
            NavigationError::EmptyStack { operation } => {
                write!(f, "{}: cannot pop with no controllers left", operation)
            }
            NavigationError::SwipeWhileTransitioning {
                from,
                to,
                transition,
            } => {
                write!(
                    f,
                    "begin_swipe: cannot swipe from {} to {} while {} is in progress",
                    from, to, transition
                )
            }
            NavigationError::NoSwipeInProgress { operation } => {
                write!(f, "{}: no swipe gesture in progress", operation)
            }
            NavigationError::SwipeMismatch {
                expected_from,
                expected_to,
                from,
                to,
            } => {
                write!(
                    f,
                    "end_swipe: gesture began {} -> {} but was ended {} -> {}",
                    expected_from, expected_to, from, to
                )
            }
            NavigationError::NotBackSwipe {
                from,
                to,
                top,
                below,
            } => {
                write!(
                    f,
                    "begin_swipe: can only swipe from the top {} back to {}, got {} -> {}",
                    OptionalId(top),
                    OptionalId(below),
                    from,
                    to
                )
            }
            NavigationError::UnknownController { operation, id } => {
                write!(f, "{}: controller {} is not on the stack", operation, id)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// Result of an engine operation: `Ok(accepted)` or a protocol violation.
pub type NavigationResult = Result<bool, NavigationError>;

// ============================================================================
// Tests
// ============================================================================
