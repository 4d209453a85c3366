//! Test utilities for navigation tests
//!
//! Provides probe controllers that journal every hook call, navigator
//! fixtures for both violation policies, and logging setup.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use controller_navigator::*;

/// Shared, ordered record of hook calls: `"show:A"`, `"hide:B"`, `"back:A"`, …
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Take everything recorded so far.
pub fn drain(journal: &Journal) -> Vec<String> {
    journal.borrow_mut().drain(..).collect()
}

/// Controller that records its hooks and can be told to consume back/keys.
pub struct Probe {
    node: ControllerNode,
    label: &'static str,
    journal: Journal,
    pub consumes_back: bool,
    pub consumes_keys: bool,
}

impl Controller for Probe {
    fn node(&self) -> &ControllerNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ControllerNode {
        &mut self.node
    }

    fn name(&self) -> &'static str {
        self.label
    }

    fn on_show(&mut self) {
        self.journal.borrow_mut().push(format!("show:{}", self.label));
        self.node.set_shown(true);
    }

    fn on_hide(&mut self) {
        self.journal.borrow_mut().push(format!("hide:{}", self.label));
        self.node.set_shown(false);
    }

    fn on_back(&mut self) -> bool {
        self.journal.borrow_mut().push(format!("back:{}", self.label));
        if self.consumes_back {
            return true;
        }
        self.node
            .last_child_mut()
            .map_or(false, |child| child.on_back())
    }

    fn dispatch_event(&mut self, event: &KeyEvent) -> bool {
        if self.consumes_keys {
            self.journal
                .borrow_mut()
                .push(format!("key:{}:{:?}", self.label, event.code));
            return true;
        }
        self.node
            .last_child_mut()
            .map_or(false, |child| child.dispatch_event(event))
    }
}

/// A probe that does not consume anything.
pub fn probe(label: &'static str, journal: &Journal) -> Box<Probe> {
    Box::new(Probe {
        node: ControllerNode::new(),
        label,
        journal: Rc::clone(journal),
        consumes_back: false,
        consumes_keys: false,
    })
}

/// A probe whose `on_back` always consumes.
pub fn back_consumer(label: &'static str, journal: &Journal) -> Box<Probe> {
    let mut probe = probe(label, journal);
    probe.consumes_back = true;
    probe
}

/// Navigator that fails fast on push/pop while blocked.
pub fn strict_navigator(log: &EventLog) -> NavigationController {
    NavigationController::new(log.clone())
        .with_config(NavigatorConfig::new().violation_policy(ViolationPolicy::FailFast))
}

/// Navigator that silently rejects push/pop while blocked.
pub fn lenient_navigator(log: &EventLog) -> NavigationController {
    NavigationController::new(log.clone())
        .with_config(NavigatorConfig::new().violation_policy(ViolationPolicy::Lenient))
}

/// Push `controller` without animation and return its id.
pub fn push(navigator: &mut NavigationController, controller: Box<Probe>) -> ControllerId {
    let id = controller.id();
    assert_eq!(navigator.push_controller(controller, None), Ok(true));
    id
}

/// A transition the test finishes by hand.
pub fn deferred(style: TransitionStyle) -> (Transition, PendingCompletion) {
    let (driver, pending) = DeferredDriver::new();
    (Transition::new(style, driver), pending)
}

/// `Pushed`/`Popped`/… rendered as `"pushed:A"` with the id stripped.
pub fn event_names(log: &EventLog) -> Vec<String> {
    log.events()
        .iter()
        .map(|event| format!("{}:{}", event.kind(), event.controller().name))
        .collect()
}

/// The single invariant every observable state must satisfy.
pub fn assert_invariants(navigator: &NavigationController) {
    if navigator.current_transition().is_some() {
        assert!(
            navigator.is_blocking_input(),
            "transition recorded without blocking input"
        );
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
