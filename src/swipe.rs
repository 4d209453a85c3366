//! Swipe-gesture bookkeeping.
//!
//! A swipe is the one navigation the user can abandon halfway. While it is
//! live the navigator holds a [`SwipeSession`] instead of a formal
//! transition: the incoming controller is already shown so it can be
//! dragged into view, and the outgoing one stays on the stack until the
//! gesture commits.

use crate::controller::ControllerId;
use crate::transition::{TransitionFrame, TransitionStyle};

/// A live swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSession {
    from: ControllerId,
    to: ControllerId,
    progress: f32,
}

impl SwipeSession {
    pub(crate) fn new(from: ControllerId, to: ControllerId) -> Self {
        Self {
            from,
            to,
            progress: 0.0,
        }
    }

    /// Controller being swiped away.
    pub fn from(&self) -> ControllerId {
        self.from
    }

    /// Controller being revealed.
    pub fn to(&self) -> ControllerId {
        self.to
    }

    /// Last reported progress, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub(crate) fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    /// Whether releasing now should commit the gesture.
    pub fn should_commit(&self, threshold: f32) -> bool {
        self.progress >= threshold
    }

    pub(crate) fn matches(&self, from: ControllerId, to: ControllerId) -> bool {
        self.from == from && self.to == to
    }

    /// Where the revealed controller should be drawn for the current
    /// progress.
    pub fn frame(&self, style: TransitionStyle) -> TransitionFrame {
        style.frame(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerNode;

    fn session() -> SwipeSession {
        SwipeSession::new(ControllerNode::new().id(), ControllerNode::new().id())
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut swipe = session();
        swipe.set_progress(1.7);
        assert_eq!(swipe.progress(), 1.0);
        swipe.set_progress(-3.0);
        assert_eq!(swipe.progress(), 0.0);
        swipe.set_progress(f32::NAN);
        assert_eq!(swipe.progress(), 0.0);
    }

    #[test]
    fn test_commit_threshold() {
        let mut swipe = session();
        swipe.set_progress(0.49);
        assert!(!swipe.should_commit(0.5));
        swipe.set_progress(0.5);
        assert!(swipe.should_commit(0.5));
    }

    #[test]
    fn test_matches_endpoints() {
        let swipe = session();
        assert!(swipe.matches(swipe.from(), swipe.to()));
        assert!(!swipe.matches(swipe.to(), swipe.from()));
    }

    #[test]
    fn test_frame_follows_progress() {
        let mut swipe = session();
        let style = TransitionStyle::slide_right(200);
        assert_eq!(swipe.frame(style).offset_x, -100.0);
        swipe.set_progress(1.0);
        assert_eq!(swipe.frame(style), TransitionFrame::SETTLED);
    }
}
