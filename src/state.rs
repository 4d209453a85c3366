//! Navigator state machine.
//!
//! A navigator is always in one of three states, derived from its
//! transition slot and its input lock:
//!
//! ```text
//!            push/pop with transition            completion fires
//!   Idle ─────────────────────────────▶ Transitioning ───────────────▶ Idle
//!    │                                                                  ▲
//!    │ begin_swipe                          end_swipe (commit or cancel) │
//!    └──────────────────────────▶ SwipeInProgress ──────────────────────┘
//! ```
//!
//! Pushes and pops without a transition go straight from `Idle` back to
//! `Idle`.

use tokio::sync::oneshot;

use crate::controller::ControllerId;
use crate::transition::Transition;

/// Observable state of a [`NavigationController`](crate::NavigationController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// No transition, input unlocked.
    Idle,
    /// A formal transition is running; input is locked.
    Transitioning,
    /// A swipe gesture is live; input is locked but no transition is
    /// recorded.
    SwipeInProgress,
}

impl NavState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// The transition currently holding the navigator, plus what to do when
/// it completes.
pub(crate) struct ActiveTransition {
    pub(crate) transition: Transition,
    pub(crate) from: Option<ControllerId>,
    pub(crate) to: Option<ControllerId>,
    pub(crate) pushing: bool,
    pub(crate) completion: oneshot::Receiver<()>,
}

/// Outcome of checking an active transition's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompletionStatus {
    Pending,
    Completed,
    /// The driver dropped its completion handle without firing it.
    Abandoned,
}

impl ActiveTransition {
    pub(crate) fn check(&mut self) -> CompletionStatus {
        match self.completion.try_recv() {
            Ok(()) => CompletionStatus::Completed,
            Err(oneshot::error::TryRecvError::Empty) => CompletionStatus::Pending,
            Err(oneshot::error::TryRecvError::Closed) => CompletionStatus::Abandoned,
        }
    }
}
