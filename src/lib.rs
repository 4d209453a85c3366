//! # controller-navigator
//!
//! Stack navigation for applications built from composable controllers.
//!
//! A [`NavigationController`] owns a stack of [`Controller`]s and moves
//! between them with pushes, pops and swipe gestures. At most one
//! transition runs at a time: while one is in flight (or a swipe is live)
//! input is blocked and every other stack change is rejected, never
//! queued. Back presses travel down the active controller tree and fall
//! back to popping the stack.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`controller`] | [`Controller`] trait, [`ControllerNode`], input events, [`ViewContainer`] |
//! | [`navigation`] | [`NavigationController`], the stack and transition engine |
//! | [`transition`] | [`Transition`], styles, drivers, the single-shot completion handle |
//! | [`swipe`] | [`SwipeSession`] bookkeeping for gesture-driven pops |
//! | [`sink`] | [`NavigationEventSink`] and ready-made sinks |
//! | [`state`] | [`NavState`] |
//! | [`config`] | [`NavigatorConfig`], [`ViolationPolicy`] |
//! | [`error`] | [`NavigationError`] |
//! | `context` | GPUI global integration (feature `gpui`) |
//!
//! ## Cargo features
//!
//! | Feature   | Default | Effect |
//! |-----------|---------|--------|
//! | `log`     | yes     | log through the `log` crate |
//! | `tracing` | no      | log through the `tracing` crate |
//! | `strict`  | no      | fail fast on push/pop while blocked in release builds too |
//! | `gpui`    | no      | install the navigator as a GPUI global |
//!
//! ## Quick start
//!
//! ```
//! use controller_navigator::{
//!     Controller, ControllerNode, DeferredDriver, EventLog, NavState, NavigationController,
//!     Transition, TransitionStyle,
//! };
//!
//! struct Screen {
//!     node: ControllerNode,
//! }
//!
//! impl Controller for Screen {
//!     fn node(&self) -> &ControllerNode {
//!         &self.node
//!     }
//!     fn node_mut(&mut self) -> &mut ControllerNode {
//!         &mut self.node
//!     }
//! }
//!
//! let screen = || Box::new(Screen { node: ControllerNode::new() });
//! let mut navigator = NavigationController::new(EventLog::new());
//! navigator.push_controller(screen(), None).unwrap();
//!
//! let (driver, pending) = DeferredDriver::new();
//! let slide = Transition::new(TransitionStyle::slide_left(250), driver);
//! assert_eq!(navigator.push_controller(screen(), Some(slide)), Ok(true));
//! assert_eq!(navigator.state(), NavState::Transitioning);
//!
//! // Later, when the host's animation ends:
//! pending.complete();
//! assert!(navigator.poll_transition());
//! assert_eq!(navigator.state(), NavState::Idle);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod sink;
pub mod state;
pub mod swipe;
pub mod transition;

#[cfg(feature = "gpui")]
pub mod context;

pub use config::{NavigatorConfig, ViolationPolicy};
pub use controller::{
    Controller, ControllerId, ControllerNode, KeyAction, KeyCode, KeyEvent, MountList,
    ViewContainer,
};
pub use error::{ControllerLabel, NavigationError, NavigationResult};
pub use navigation::{NavigationController, TransitionFactory};
pub use sink::{sink_fn, EventLog, FnSink, NavigationEvent, NavigationEventSink, NoopSink};
pub use state::NavState;
pub use swipe::SwipeSession;
pub use transition::{
    DeferredDriver, ImmediateDriver, PendingCompletion, SlideDirection, TimerDriver, Transition,
    TransitionCompletion, TransitionContext, TransitionDirection, TransitionDriver,
    TransitionFrame, TransitionStyle,
};

#[cfg(feature = "gpui")]
pub use context::{init_navigation, Navigation, UseNavigation};
