//! The controller stack and its transition engine.
//!
//! [`NavigationController`] owns an ordered stack of child controllers; the
//! last one is the visible top. Every stack change runs through one path:
//!
//! 1. Validate: no transition in flight, input not blocked, and for pops a
//!    non-empty stack.
//! 2. Mutate: a pushed controller is adopted, linked to the previous top
//!    and mounted; the incoming controller is shown.
//! 3. Animate (optional): the [`Transition`] is recorded, input is locked
//!    and the driver is started.
//! 4. Finish: once the driver's completion fires, the outgoing controller
//!    is hidden (and, for a pop, removed and unmounted), the lock is
//!    released and the [`NavigationEventSink`] is notified.
//!
//! Between 3 and 4 the navigator rejects every other push, pop or swipe.
//! That lock is the only concurrency control there is: all calls are
//! expected on one UI thread.
//!
//! # Example
//!
//! ```
//! use controller_navigator::{Controller, ControllerNode, EventLog, NavigationController};
//!
//! struct Board {
//!     node: ControllerNode,
//! }
//!
//! impl Controller for Board {
//!     fn node(&self) -> &ControllerNode {
//!         &self.node
//!     }
//!     fn node_mut(&mut self) -> &mut ControllerNode {
//!         &mut self.node
//!     }
//! }
//!
//! let log = EventLog::new();
//! let mut navigator = NavigationController::new(log.clone());
//!
//! navigator
//!     .push_controller(Box::new(Board { node: ControllerNode::new() }), None)
//!     .unwrap();
//! navigator
//!     .push_controller(Box::new(Board { node: ControllerNode::new() }), None)
//!     .unwrap();
//! assert_eq!(navigator.len(), 2);
//!
//! // The top board does not handle back, so the navigator pops it.
//! assert!(navigator.on_back());
//! assert_eq!(navigator.len(), 1);
//! assert_eq!(log.len(), 3);
//! ```


use std::fmt;

use crate::config::{NavigatorConfig, ViolationPolicy};
use crate::controller::{Controller, ControllerId, ControllerNode, KeyEvent, ViewContainer};
use crate::error::{ControllerLabel, NavigationError, NavigationResult};
use crate::sink::NavigationEventSink;
use crate::state::{ActiveTransition, CompletionStatus, NavState};
use crate::swipe::SwipeSession;
use crate::transition::{
    Transition, TransitionCompletion, TransitionDirection, TransitionFrame, TransitionStyle,
};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};

/// Builds the transition used by [`NavigationController::push_animated`] and
/// [`NavigationController::pop_animated`] from the configured style.
pub type TransitionFactory = Box<dyn Fn(TransitionStyle) -> Transition>;

/// What arrives on top when a transition commits.
enum Incoming {
    /// A new controller, adopted by the stack.
    Push(Box<dyn Controller>),
    /// The controller already below the top, if any.
    Reveal(Option<ControllerId>),
}

fn find(stack: &[Box<dyn Controller>], id: ControllerId) -> Option<&dyn Controller> {
    stack
        .iter()
        .find(|child| child.id() == id)
        .map(|child| child.as_ref())
}

fn find_mut(
    stack: &mut [Box<dyn Controller>],
    id: ControllerId,
) -> Option<&mut (dyn Controller + 'static)> {
    stack
        .iter_mut()
        .find(|child| child.id() == id)
        .map(|child| child.as_mut())
}

// ============================================================================
// NavigationController
// ============================================================================

/// A controller that manages a stack of child controllers.
///
/// The stack lives outside the embedded [`ControllerNode`]: children added
/// through [`Controller::node_mut`] are never part of it, so only push, pop
/// and swipe commits can change what is on screen.
pub struct NavigationController {
    node: ControllerNode,
    /// Bottom first; the last entry is the visible top.
    stack: Vec<Box<dyn Controller>>,
    container: Option<Box<dyn ViewContainer>>,
    sink: Box<dyn NavigationEventSink>,
    config: NavigatorConfig,
    transition_factory: TransitionFactory,
    current_transition: Option<ActiveTransition>,
    blocking_input: bool,
    swipe: Option<SwipeSession>,
}

impl NavigationController {
    /// Create an empty navigator reporting to `sink`.
    pub fn new(sink: impl NavigationEventSink) -> Self {
        Self {
            node: ControllerNode::new(),
            stack: Vec::new(),
            container: None,
            sink: Box::new(sink),
            config: NavigatorConfig::default(),
            transition_factory: Box::new(Transition::immediate),
            current_transition: None,
            blocking_input: false,
            swipe: None,
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Mount pushed controllers into `container`. Without one, pushed
    /// controllers stay unattached.
    pub fn with_container(mut self, container: impl ViewContainer + 'static) -> Self {
        self.container = Some(Box::new(container));
        self
    }

    /// Replace the default (immediate) transition factory.
    pub fn with_transition_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(TransitionStyle) -> Transition + 'static,
    {
        self.transition_factory = Box::new(factory);
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Number of controllers on the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack holds no controllers.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Controllers on the stack, bottom first.
    pub fn stack(&self) -> &[Box<dyn Controller>] {
        &self.stack
    }

    /// The visible top of the stack.
    pub fn top(&self) -> Option<&dyn Controller> {
        self.stack.last().map(|top| top.as_ref())
    }

    /// Id of the visible top of the stack.
    pub fn top_id(&self) -> Option<ControllerId> {
        self.top().map(|top| top.id())
    }

    /// Look up a controller on the stack by id.
    pub fn controller(&self, id: ControllerId) -> Option<&dyn Controller> {
        find(&self.stack, id)
    }

    /// Mutable lookup of a controller on the stack by id.
    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut (dyn Controller + 'static)> {
        find_mut(&mut self.stack, id)
    }

    /// Ids on the stack, bottom first.
    pub fn controller_ids(&self) -> Vec<ControllerId> {
        self.stack.iter().map(|child| child.id()).collect()
    }

    /// Whether a transition or swipe currently holds the input lock.
    pub fn is_blocking_input(&self) -> bool {
        self.blocking_input
    }

    /// State derived from the transition slot and the input lock.
    pub fn state(&self) -> NavState {
        if self.current_transition.is_some() {
            NavState::Transitioning
        } else if self.blocking_input {
            NavState::SwipeInProgress
        } else {
            NavState::Idle
        }
    }

    /// The transition currently holding the input lock.
    pub fn current_transition(&self) -> Option<&Transition> {
        self.current_transition
            .as_ref()
            .map(|active| &active.transition)
    }

    /// The live swipe gesture, if any.
    pub fn swipe(&self) -> Option<&SwipeSession> {
        self.swipe.as_ref()
    }

    fn second_from_top(&self) -> Option<ControllerId> {
        let len = self.stack.len();
        if len > 1 {
            Some(self.stack[len - 2].id())
        } else {
            None
        }
    }

    fn label(&self, id: Option<ControllerId>) -> Option<ControllerLabel> {
        id.and_then(|id| find(&self.stack, id))
            .map(ControllerLabel::of)
    }

    fn release(&mut self, id: ControllerId) -> Option<Box<dyn Controller>> {
        let index = self.stack.iter().position(|child| child.id() == id)?;
        let mut child = self.stack.remove(index);
        child.node_mut().set_parent(None);
        Some(child)
    }

    // ========================================================================
    // Push / pop
    // ========================================================================

    /// Push `to` on top of the stack, optionally animated by `transition`.
    ///
    /// Returns `Ok(true)` once the push is accepted; an animated push is
    /// still running at that point. Pushing onto an empty stack never
    /// animates, since there is nothing to animate from.
    pub fn push_controller(
        &mut self,
        to: Box<dyn Controller>,
        transition: Option<Transition>,
    ) -> NavigationResult {
        let from = self.top_id();

        if self.blocking_input {
            let to_label = ControllerLabel::of(&*to);
            return self.reject_blocked("push_controller", from, Some(to_label), transition.as_ref());
        }

        let transition = match transition {
            Some(transition) if from.is_none() => {
                debug_log!(
                    "Demoting {} push of {}: nothing to animate from",
                    transition.style(),
                    ControllerLabel::of(&*to)
                );
                None
            }
            other => other,
        };

        self.transition("push_controller", from, Incoming::Push(to), transition);
        Ok(true)
    }

    /// Push with the configured push style, or without animation.
    pub fn push_animated(&mut self, to: Box<dyn Controller>, animated: bool) -> NavigationResult {
        let transition =
            animated.then(|| (self.transition_factory)(self.config.push_transition_style()));
        self.push_controller(to, transition)
    }

    /// Pop the top controller, optionally animated by `transition`.
    ///
    /// Popping the last controller leaves the stack empty; popping an empty
    /// stack is an error under every [`ViolationPolicy`].
    pub fn pop_controller(&mut self, transition: Option<Transition>) -> NavigationResult {
        let from = self.top_id();
        let to = self.second_from_top();

        if from.is_none() {
            let error = NavigationError::EmptyStack {
                operation: "pop_controller",
            };
            error_log!("{}", error);
            return Err(error);
        }

        if self.blocking_input {
            let to_label = self.label(to);
            return self.reject_blocked("pop_controller", from, to_label, transition.as_ref());
        }

        self.transition("pop_controller", from, Incoming::Reveal(to), transition);
        Ok(true)
    }

    /// Pop with the configured pop style, or without animation.
    pub fn pop_animated(&mut self, animated: bool) -> NavigationResult {
        let transition =
            animated.then(|| (self.transition_factory)(self.config.pop_transition_style()));
        self.pop_controller(transition)
    }

    fn reject_blocked(
        &self,
        operation: &'static str,
        from: Option<ControllerId>,
        to: Option<ControllerLabel>,
        transition: Option<&Transition>,
    ) -> NavigationResult {
        let error = NavigationError::TransitionInProgress {
            operation,
            from: self.label(from),
            to,
            transition: transition.map(Transition::debug_info),
        };
        match self.config.policy() {
            ViolationPolicy::FailFast => {
                error_log!("{}", error);
                Err(error)
            }
            ViolationPolicy::Lenient => {
                warn_log!("Rejected while input is blocked: {}", error);
                Ok(false)
            }
        }
    }

    /// Commit a validated push or pop. Callers have already rejected
    /// blocked input and empty-stack pops.
    fn transition(
        &mut self,
        operation: &'static str,
        from: Option<ControllerId>,
        incoming: Incoming,
        transition: Option<Transition>,
    ) {
        let pushing = matches!(incoming, Incoming::Push(_));
        debug_assert!(
            self.current_transition.is_none() && !self.blocking_input,
            "{}: transition started while input is blocked",
            operation
        );
        debug_assert!(
            pushing || !self.stack.is_empty(),
            "{}: pop reached an empty stack",
            operation
        );

        let to = match incoming {
            Incoming::Push(mut controller) => {
                controller.node_mut().set_previous_sibling(from);
                controller.node_mut().set_parent(Some(self.node.id()));
                let id = controller.id();
                trace_log!("Navigator {} adopted {}", self.node.id(), id);
                self.stack.push(controller);
                if let Some(container) = self.container.as_deref_mut() {
                    if let Some(child) = find_mut(&mut self.stack, id) {
                        child.attach_to_parent_view(container);
                    }
                }
                Some(id)
            }
            Incoming::Reveal(to) => to,
        };

        if let Some(id) = to {
            if let Some(child) = find_mut(&mut self.stack, id) {
                child.on_show();
            }
        }

        match transition {
            Some(mut transition) => {
                let direction = if pushing {
                    TransitionDirection::Push
                } else {
                    TransitionDirection::Pop
                };
                debug_log!(
                    "{}: starting {} ({:?} -> {:?})",
                    operation,
                    transition.debug_info(),
                    from,
                    to
                );

                let (completion, receiver) = TransitionCompletion::channel();
                self.blocking_input = true;
                transition.perform(from, to, direction, completion);
                self.current_transition = Some(ActiveTransition {
                    transition,
                    from,
                    to,
                    pushing,
                    completion: receiver,
                });
                self.check_invariants();

                // Drivers that complete inside `perform` finish right here.
                self.poll_transition();
            }
            None => self.finish_transition(from, to, pushing),
        }
    }

    fn finish_transition(
        &mut self,
        from: Option<ControllerId>,
        to: Option<ControllerId>,
        pushing: bool,
    ) {
        if let Some(id) = from {
            if let Some(child) = find_mut(&mut self.stack, id) {
                child.on_hide();
            }
        }

        let mut removed = if pushing {
            None
        } else {
            from.and_then(|id| self.release(id))
        };
        if let (Some(controller), Some(container)) =
            (removed.as_mut(), self.container.as_deref_mut())
        {
            controller.detach_from_parent_view(container);
        }

        self.current_transition = None;
        self.blocking_input = false;
        self.check_invariants();

        if pushing {
            if let Some(controller) = to.and_then(|id| find(&self.stack, id)) {
                info_log!(
                    "Pushed {} (stack depth: {})",
                    ControllerLabel::of(controller),
                    self.stack.len()
                );
                self.sink.on_controller_pushed(controller);
            }
        } else if let Some(controller) = removed.as_deref() {
            info_log!(
                "Popped {} (stack depth: {})",
                ControllerLabel::of(controller),
                self.stack.len()
            );
            self.sink.on_controller_popped(controller);
        }
    }

    // ========================================================================
    // Transition completion
    // ========================================================================

    /// Finish the active transition if its completion has fired.
    ///
    /// Returns whether a transition was finished by this call. Hosts whose
    /// drivers complete asynchronously call this from their event loop.
    pub fn poll_transition(&mut self) -> bool {
        let status = match self.current_transition.as_mut() {
            Some(active) => active.check(),
            None => return false,
        };

        match status {
            CompletionStatus::Pending => {
                trace_log!("Transition still running");
                false
            }
            CompletionStatus::Completed | CompletionStatus::Abandoned => {
                if status == CompletionStatus::Abandoned {
                    warn_log!("Transition driver dropped its completion; finishing anyway");
                }
                self.complete_active();
                true
            }
        }
    }

    /// Wait for the active transition's completion and finish it.
    ///
    /// Returns `false` immediately when nothing is running.
    pub async fn transition_finished(&mut self) -> bool {
        let Some(active) = self.current_transition.as_mut() else {
            return false;
        };

        if (&mut active.completion).await.is_err() {
            warn_log!("Transition driver dropped its completion; finishing anyway");
        }
        self.complete_active();
        true
    }

    fn complete_active(&mut self) {
        if let Some(active) = self.current_transition.take() {
            debug_log!("Finished {}", active.transition.debug_info());
            self.finish_transition(active.from, active.to, active.pushing);
        }
    }

    // ========================================================================
    // Swipe gestures
    // ========================================================================

    /// Start a swipe from the top `from` back to `to`, the controller
    /// directly below it.
    ///
    /// `to` is shown immediately so it can be dragged into view; `from`
    /// stays visible and on the stack until [`end_swipe`](Self::end_swipe).
    /// Returns `Ok(false)` if a swipe is already live.
    pub fn begin_swipe(&mut self, from: ControllerId, to: ControllerId) -> NavigationResult {
        if let Some(active) = &self.current_transition {
            let error = NavigationError::SwipeWhileTransitioning {
                from: self.label(Some(from)).unwrap_or(ControllerLabel {
                    id: from,
                    name: "?",
                }),
                to: self.label(Some(to)).unwrap_or(ControllerLabel { id: to, name: "?" }),
                transition: active.transition.debug_info(),
            };
            error_log!("{}", error);
            return Err(error);
        }

        if self.blocking_input {
            debug_log!("begin_swipe ignored: input is blocked");
            return Ok(false);
        }

        for id in [from, to] {
            if find(&self.stack, id).is_none() {
                let error = NavigationError::UnknownController {
                    operation: "begin_swipe",
                    id,
                };
                error_log!("{}", error);
                return Err(error);
            }
        }

        let top = self.top_id();
        let below = self.second_from_top();
        if top != Some(from) || below != Some(to) {
            let error = NavigationError::NotBackSwipe {
                from,
                to,
                top,
                below,
            };
            error_log!("{}", error);
            return Err(error);
        }

        self.blocking_input = true;
        self.swipe = Some(SwipeSession::new(from, to));
        if let Some(child) = find_mut(&mut self.stack, to) {
            child.on_show();
        }
        debug_log!("Swipe started {} -> {}", from, to);
        Ok(true)
    }

    /// Report gesture progress. Purely visual: the stack is never touched.
    pub fn swipe_progress(&mut self, progress: f32) {
        match self.swipe.as_mut() {
            Some(swipe) => {
                swipe.set_progress(progress);
                trace_log!("Swipe progress {:.3}", swipe.progress());
            }
            None => trace_log!("Swipe progress {} with no swipe in progress", progress),
        }
    }

    /// Frame for the revealed controller at the current swipe progress.
    pub fn swipe_frame(&self, style: TransitionStyle) -> Option<TransitionFrame> {
        self.swipe.as_ref().map(|swipe| swipe.frame(style))
    }

    /// End the live swipe.
    ///
    /// On commit `from` is hidden and removed and the sink hears a
    /// swiped-from/swiped-to pair. On cancel `to` is hidden again and the
    /// stack is untouched. Either way the navigator returns to idle.
    pub fn end_swipe(
        &mut self,
        from: ControllerId,
        to: ControllerId,
        commit: bool,
    ) -> Result<(), NavigationError> {
        let Some(session) = self.swipe else {
            let error = NavigationError::NoSwipeInProgress {
                operation: "end_swipe",
            };
            error_log!("{}", error);
            return Err(error);
        };

        if !session.matches(from, to) {
            let error = NavigationError::SwipeMismatch {
                expected_from: session.from(),
                expected_to: session.to(),
                from,
                to,
            };
            error_log!("{}", error);
            return Err(error);
        }

        let mut removed = None;
        if commit {
            if let Some(child) = find_mut(&mut self.stack, from) {
                child.on_hide();
            }
            removed = self.release(from);
            if let (Some(controller), Some(container)) =
                (removed.as_mut(), self.container.as_deref_mut())
            {
                controller.detach_from_parent_view(container);
            }
        } else if let Some(child) = find_mut(&mut self.stack, to) {
            child.on_hide();
        }

        self.current_transition = None;
        self.blocking_input = false;
        self.swipe = None;
        self.check_invariants();

        if let Some(controller) = removed.as_deref() {
            info_log!("Swiped away {}", ControllerLabel::of(controller));
            self.sink.on_controller_swiped_from(controller);
            if let Some(revealed) = find(&self.stack, to) {
                self.sink.on_controller_swiped_to(revealed);
            }
        } else {
            debug_log!("Swipe {} -> {} cancelled", from, to);
        }

        Ok(())
    }

    /// Let go of the live swipe: commit if its progress reached the
    /// configured threshold, cancel otherwise. Returns whether it committed.
    pub fn release_swipe(&mut self) -> NavigationResult {
        let Some(session) = self.swipe else {
            let error = NavigationError::NoSwipeInProgress {
                operation: "release_swipe",
            };
            error_log!("{}", error);
            return Err(error);
        };

        let commit = session.should_commit(self.config.threshold());
        self.end_swipe(session.from(), session.to(), commit)?;
        Ok(commit)
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.current_transition.is_none() || self.blocking_input,
            "transition recorded without blocking input"
        );
        debug_assert!(
            !(self.current_transition.is_some() && self.swipe.is_some()),
            "swipe and transition live at the same time"
        );
    }
}

// ============================================================================
// Controller impl
// ============================================================================

impl Controller for NavigationController {
    fn node(&self) -> &ControllerNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ControllerNode {
        &mut self.node
    }

    /// Swallow back while blocked; otherwise let the top handle it and fall
    /// back to an unanimated pop when more than one controller remains.
    fn on_back(&mut self) -> bool {
        if self.blocking_input {
            debug_log!("Back swallowed: input is blocked");
            return true;
        }

        let Some(top) = self.stack.last_mut() else {
            return false;
        };
        if top.on_back() {
            return true;
        }

        if self.stack.len() > 1 {
            if let Err(error) = self.pop_controller(None) {
                error_log!("Back fallback pop failed: {}", error);
            }
            true
        } else {
            false
        }
    }

    /// Key events go to the top of the stack.
    fn dispatch_event(&mut self, event: &KeyEvent) -> bool {
        self.stack
            .last_mut()
            .map_or(false, |top| top.dispatch_event(event))
    }
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack: Vec<String> = self
            .stack
            .iter()
            .map(|child| ControllerLabel::of(child.as_ref()).to_string())
            .collect();
        f.debug_struct("NavigationController")
            .field("node", &self.node)
            .field("stack", &stack)
            .field("sink", &self.sink.name())
            .field("config", &self.config)
            .field("current_transition", &self.current_transition())
            .field("blocking_input", &self.blocking_input)
            .field("swipe", &self.swipe)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
