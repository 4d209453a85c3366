//! Navigator configuration.
//!
//! [`NavigatorConfig`] is a small builder covering the three knobs the
//! engine has:
//!
//! - how a push/pop issued while input is blocked is reported
//!   ([`ViolationPolicy`]),
//! - which [`TransitionStyle`] the `*_animated` convenience calls use,
//! - how far a swipe must travel before releasing it commits.
//!
//! ```
//! use controller_navigator::{NavigatorConfig, TransitionStyle, ViolationPolicy};
//!
//! let config = NavigatorConfig::new()
//!     .violation_policy(ViolationPolicy::Lenient)
//!     .push_style(TransitionStyle::slide_left(250))
//!     .swipe_commit_threshold(0.4);
//!
//! assert_eq!(config.policy(), ViolationPolicy::Lenient);
//! assert_eq!(config.threshold(), 0.4);
//! ```

use crate::transition::TransitionStyle;

/// Default push animation.
pub const DEFAULT_PUSH_STYLE: TransitionStyle = TransitionStyle::Slide {
    direction: crate::transition::SlideDirection::Left,
    duration_ms: 250,
};

/// Default pop animation.
pub const DEFAULT_POP_STYLE: TransitionStyle = TransitionStyle::Slide {
    direction: crate::transition::SlideDirection::Right,
    duration_ms: 250,
};

/// Default fraction of the swipe distance that commits on release.
pub const DEFAULT_SWIPE_COMMIT_THRESHOLD: f32 = 0.5;

// ============================================================================
// ViolationPolicy
// ============================================================================

/// How a push or pop issued while input is blocked is reported.
///
/// Only that race consults the policy. Popping an empty stack is an error
/// under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationPolicy {
    /// Return [`NavigationError::TransitionInProgress`](crate::NavigationError::TransitionInProgress).
    FailFast,
    /// Return `Ok(false)`; the caller's tap silently does nothing.
    Lenient,
}

impl ViolationPolicy {
    /// `FailFast` in debug builds or with the `strict` feature, `Lenient`
    /// otherwise.
    pub const fn for_build() -> Self {
        if cfg!(any(debug_assertions, feature = "strict")) {
            Self::FailFast
        } else {
            Self::Lenient
        }
    }

    /// Whether blocked pushes and pops return an error.
    pub fn is_fail_fast(&self) -> bool {
        matches!(self, Self::FailFast)
    }
}

impl Default for ViolationPolicy {
    fn default() -> Self {
        Self::for_build()
    }
}

// ============================================================================
// NavigatorConfig
// ============================================================================

/// Configuration for a [`NavigationController`](crate::NavigationController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorConfig {
    violation_policy: ViolationPolicy,
    push_style: TransitionStyle,
    pop_style: TransitionStyle,
    swipe_commit_threshold: f32,
}

impl NavigatorConfig {
    /// Build-dependent policy, slide transitions, threshold 0.5.
    pub fn new() -> Self {
        Self {
            violation_policy: ViolationPolicy::for_build(),
            push_style: DEFAULT_PUSH_STYLE,
            pop_style: DEFAULT_POP_STYLE,
            swipe_commit_threshold: DEFAULT_SWIPE_COMMIT_THRESHOLD,
        }
    }

    /// Override the build-dependent [`ViolationPolicy`].
    pub fn violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.violation_policy = policy;
        self
    }

    /// Style used by `push_animated(_, true)`.
    pub fn push_style(mut self, style: TransitionStyle) -> Self {
        self.push_style = style;
        self
    }

    /// Style used by `pop_animated(true)`.
    pub fn pop_style(mut self, style: TransitionStyle) -> Self {
        self.pop_style = style;
        self
    }

    /// Progress at or beyond which a released swipe commits. Clamped into
    /// `[0, 1]`; NaN falls back to the default.
    pub fn swipe_commit_threshold(mut self, threshold: f32) -> Self {
        self.swipe_commit_threshold = if threshold.is_nan() {
            DEFAULT_SWIPE_COMMIT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    /// Policy for pushes and pops issued while input is blocked.
    pub fn policy(&self) -> ViolationPolicy {
        self.violation_policy
    }

    /// Style handed to the transition factory on animated pushes.
    pub fn push_transition_style(&self) -> TransitionStyle {
        self.push_style
    }

    /// Style handed to the transition factory on animated pops.
    pub fn pop_transition_style(&self) -> TransitionStyle {
        self.pop_style
    }

    /// Swipe commit threshold in `[0, 1]`.
    pub fn threshold(&self) -> f32 {
        self.swipe_commit_threshold
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
