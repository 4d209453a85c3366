//! Integration tests for push/pop sequencing and transition serialization

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use controller_navigator::*;

#[test]
fn test_push_onto_empty_stack_demotes_transition() {
    init_logging();
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let (transition, pending) = deferred(TransitionStyle::slide_left(300));
    let a = probe("A", &journal);
    let a_id = a.id();

    assert_eq!(nav.push_controller(a, Some(transition)), Ok(true));

    // The driver never ran: there was nothing to animate from.
    assert!(!pending.is_armed());
    assert_eq!(nav.controller_ids(), vec![a_id]);
    assert_eq!(drain(&journal), vec!["show:A"]);
    assert!(!nav.is_blocking_input());
    assert!(nav.current_transition().is_none());
    assert_eq!(event_names(&log), vec!["pushed:A"]);
}

#[test]
fn test_push_pop_sequence_tracks_top() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let a = push(&mut nav, probe("A", &journal));
    assert_eq!((nav.len(), nav.top_id()), (1, Some(a)));

    let b = push(&mut nav, probe("B", &journal));
    assert_eq!((nav.len(), nav.top_id()), (2, Some(b)));

    let c = push(&mut nav, probe("C", &journal));
    assert_eq!((nav.len(), nav.top_id()), (3, Some(c)));

    assert_eq!(nav.pop_controller(None), Ok(true));
    assert_eq!((nav.len(), nav.top_id()), (2, Some(b)));

    let d = push(&mut nav, probe("D", &journal));
    assert_eq!(nav.controller_ids(), vec![a, b, d]);

    assert_eq!(nav.pop_controller(None), Ok(true));
    assert_eq!(nav.pop_controller(None), Ok(true));
    assert_eq!(nav.controller_ids(), vec![a]);

    assert_eq!(
        event_names(&log),
        vec![
            "pushed:A", "pushed:B", "pushed:C", "popped:C", "pushed:D", "popped:D", "popped:B",
        ]
    );
}

#[test]
fn test_push_hides_previous_top_and_shows_new_one() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let a = push(&mut nav, probe("A", &journal));
    let b = push(&mut nav, probe("B", &journal));

    assert_eq!(drain(&journal), vec!["show:A", "show:B", "hide:A"]);
    assert!(!nav.controller(a).unwrap().node().is_shown());
    assert!(nav.controller(b).unwrap().node().is_shown());
    assert_eq!(nav.controller(b).unwrap().node().previous_sibling(), Some(a));
}

#[test]
fn test_pop_reveals_and_destroys() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let a = push(&mut nav, probe("A", &journal));
    let b = push(&mut nav, probe("B", &journal));
    drain(&journal);

    assert_eq!(nav.pop_controller(None), Ok(true));
    assert_eq!(drain(&journal), vec!["show:A", "hide:B"]);
    assert!(nav.controller(b).is_none());
    assert_eq!(nav.top_id(), Some(a));
    // Popping does not rewrite the revealed controller's back link.
    assert_eq!(nav.controller(a).unwrap().node().previous_sibling(), None);
}

#[test]
fn test_pop_last_controller_empties_stack() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);
    push(&mut nav, probe("A", &journal));

    assert_eq!(nav.pop_controller(None), Ok(true));
    assert!(nav.is_empty());
    assert_eq!(nav.top_id(), None);
    assert_eq!(event_names(&log), vec!["pushed:A", "popped:A"]);
}

#[test]
fn test_pop_empty_stack_fails_under_both_policies() {
    for mut nav in [
        strict_navigator(&EventLog::new()),
        lenient_navigator(&EventLog::new()),
    ] {
        let result = nav.pop_controller(None);
        assert!(matches!(
            result,
            Err(NavigationError::EmptyStack {
                operation: "pop_controller"
            })
        ));

        let (transition, pending) = deferred(TransitionStyle::fade(100));
        assert!(nav.pop_controller(Some(transition)).is_err());
        assert!(!pending.is_armed());
        assert_eq!(nav.state(), NavState::Idle);
    }
}

#[test]
fn test_second_push_during_transition_fails_fast() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let root = push(&mut nav, probe("Root", &journal));
    let (first, pending) = deferred(TransitionStyle::slide_left(300));
    let a = probe("A", &journal);
    let a_id = a.id();
    assert_eq!(nav.push_controller(a, Some(first)), Ok(true));
    assert_eq!(nav.state(), NavState::Transitioning);
    assert_invariants(&nav);

    let (second, second_pending) = deferred(TransitionStyle::slide_left(300));
    let error = nav
        .push_controller(probe("B", &journal), Some(second))
        .unwrap_err();

    match &error {
        NavigationError::TransitionInProgress {
            operation,
            from,
            to,
            transition,
        } => {
            assert_eq!(*operation, "push_controller");
            assert_eq!(from.map(|label| label.name), Some("A"));
            assert_eq!(to.map(|label| label.name), Some("B"));
            assert_eq!(
                transition.as_deref(),
                Some("Slide(Left, 300ms) via DeferredDriver")
            );
        }
        other => panic!("Expected TransitionInProgress, got {:?}", other),
    }
    assert!(error.is_race());
    assert!(!second_pending.is_armed());
    assert_eq!(nav.controller_ids(), vec![root, a_id]);

    // The first transition is unaffected and still completes normally.
    assert!(pending.complete());
    assert!(nav.poll_transition());
    assert_eq!(nav.state(), NavState::Idle);
    assert_eq!(event_names(&log), vec!["pushed:Root", "pushed:A"]);
}

#[test]
fn test_push_and_pop_during_transition_rejected_when_lenient() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = lenient_navigator(&log);

    push(&mut nav, probe("Root", &journal));
    let (transition, pending) = deferred(TransitionStyle::fade(200));
    assert_eq!(
        nav.push_controller(probe("A", &journal), Some(transition)),
        Ok(true)
    );
    let before = nav.controller_ids();
    drain(&journal);

    assert_eq!(nav.push_controller(probe("B", &journal), None), Ok(false));
    assert_eq!(nav.pop_controller(None), Ok(false));
    assert_eq!(nav.pop_animated(true), Ok(false));

    assert_eq!(nav.controller_ids(), before);
    assert!(drain(&journal).is_empty());
    assert_invariants(&nav);

    pending.complete();
    assert!(nav.poll_transition());
    assert_eq!(nav.push_controller(probe("B", &journal), None), Ok(true));
}

#[test]
fn test_animated_pop_keeps_outgoing_until_completion() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let a = push(&mut nav, probe("A", &journal));
    let b = push(&mut nav, probe("B", &journal));
    drain(&journal);

    let (transition, pending) = deferred(TransitionStyle::slide_right(250));
    assert_eq!(nav.pop_controller(Some(transition)), Ok(true));

    // Incoming is shown immediately, outgoing stays until the animation ends.
    assert_eq!(drain(&journal), vec!["show:A"]);
    assert_eq!(nav.controller_ids(), vec![a, b]);
    let context = pending.context().unwrap();
    assert_eq!(context.from, Some(b));
    assert_eq!(context.to, Some(a));
    assert_eq!(context.direction, TransitionDirection::Pop);
    assert_eq!(nav.current_transition().unwrap().from(), Some(b));
    assert_eq!(nav.current_transition().unwrap().to(), Some(a));
    assert_eq!(event_names(&log), vec!["pushed:A", "pushed:B"]);

    pending.complete();
    assert!(nav.poll_transition());
    assert_eq!(drain(&journal), vec!["hide:B"]);
    assert_eq!(nav.controller_ids(), vec![a]);
    assert_eq!(event_names(&log).last().map(String::as_str), Some("popped:B"));
    assert!(!nav.poll_transition());
}

#[test]
fn test_immediate_transition_finishes_synchronously() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);
    push(&mut nav, probe("A", &journal));

    let transition = Transition::immediate(TransitionStyle::fade(150));
    assert_eq!(
        nav.push_controller(probe("B", &journal), Some(transition)),
        Ok(true)
    );
    assert_eq!(nav.state(), NavState::Idle);
    assert_eq!(event_names(&log), vec!["pushed:A", "pushed:B"]);
}

#[test]
fn test_animated_helpers_use_configured_styles() {
    let log = EventLog::new();
    let journal = journal();
    let started: Rc<RefCell<Vec<PendingCompletion>>> = Rc::new(RefCell::new(Vec::new()));
    let started_clone = Rc::clone(&started);

    let mut nav = NavigationController::new(log.clone())
        .with_config(
            NavigatorConfig::new()
                .violation_policy(ViolationPolicy::FailFast)
                .push_style(TransitionStyle::fade(120))
                .pop_style(TransitionStyle::slide_down(80)),
        )
        .with_transition_factory(move |style| {
            let (driver, pending) = DeferredDriver::new();
            started_clone.borrow_mut().push(pending);
            Transition::new(style, driver)
        });

    // First push is demoted, the factory is still consulted.
    assert_eq!(nav.push_animated(probe("A", &journal), true), Ok(true));
    assert_eq!(nav.state(), NavState::Idle);

    assert_eq!(nav.push_animated(probe("B", &journal), true), Ok(true));
    assert_eq!(
        nav.current_transition().map(Transition::style),
        Some(TransitionStyle::fade(120))
    );
    assert!(started.borrow().last().unwrap().complete());
    assert!(nav.poll_transition());

    assert_eq!(nav.pop_animated(true), Ok(true));
    assert_eq!(
        nav.current_transition().map(Transition::style),
        Some(TransitionStyle::slide_down(80))
    );
    assert!(started.borrow().last().unwrap().complete());
    assert!(nav.poll_transition());

    assert_eq!(nav.push_animated(probe("C", &journal), false), Ok(true));
    assert_eq!(started.borrow().len(), 3);
    assert_eq!(nav.len(), 2);
}

#[test]
fn test_container_mounts_and_unmounts() {
    let log = EventLog::new();
    let journal = journal();
    let container = Rc::new(RefCell::new(MountList::new()));
    let mut nav = strict_navigator(&log).with_container(Rc::clone(&container));

    let a = push(&mut nav, probe("A", &journal));
    let b = push(&mut nav, probe("B", &journal));
    assert_eq!(container.borrow().mounted(), &[a, b]);
    assert!(nav.controller(b).unwrap().node().is_attached());

    nav.pop_controller(None).unwrap();
    assert_eq!(container.borrow().mounted(), &[a]);
}

#[test]
fn test_without_container_nothing_is_attached() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);

    let a = push(&mut nav, probe("A", &journal));
    assert!(!nav.controller(a).unwrap().node().is_attached());
    assert_eq!(nav.controller(a).unwrap().node().parent(), Some(nav.id()));
}

#[test]
fn test_transition_finished_with_pollster() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);
    push(&mut nav, probe("A", &journal));

    assert!(!pollster::block_on(nav.transition_finished()));

    let (transition, pending) = deferred(TransitionStyle::fade(100));
    nav.push_controller(probe("B", &journal), Some(transition))
        .unwrap();
    pending.complete();

    assert!(pollster::block_on(nav.transition_finished()));
    assert_eq!(nav.state(), NavState::Idle);
    assert_eq!(nav.len(), 2);
}

#[tokio::test]
async fn test_timer_driver_on_tokio_runtime() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);
    push(&mut nav, probe("A", &journal));

    let transition = Transition::new(TransitionStyle::fade(10), TimerDriver);
    nav.push_controller(probe("B", &journal), Some(transition))
        .unwrap();
    assert!(nav.is_blocking_input());

    assert!(nav.transition_finished().await);
    assert!(!nav.is_blocking_input());
    assert_eq!(event_names(&log), vec!["pushed:A", "pushed:B"]);
}

#[test]
fn test_sink_fn_sees_committed_events() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let journal = journal();
    let mut nav = NavigationController::new(sink_fn(move |event: &NavigationEvent| {
        seen_clone.borrow_mut().push(event.kind());
    }));

    push(&mut nav, probe("A", &journal));
    push(&mut nav, probe("B", &journal));
    nav.pop_controller(None).unwrap();

    assert_eq!(*seen.borrow(), vec!["pushed", "pushed", "popped"]);
}

#[test]
fn test_node_children_never_join_the_stack() {
    let log = EventLog::new();
    let journal = journal();
    let container = Rc::new(RefCell::new(MountList::new()));
    let mut nav = strict_navigator(&log).with_container(Rc::clone(&container));

    let a = push(&mut nav, probe("A", &journal));
    let (transition, pending) = deferred(TransitionStyle::slide_left(250));
    let b = probe("B", &journal);
    let b_id = b.id();
    nav.push_controller(b, Some(transition)).unwrap();
    assert!(nav.is_blocking_input());
    drain(&journal);

    // Children added through the embedded node are not navigation.
    let stray = nav.node_mut().add_child(probe("C", &journal));
    assert_eq!(nav.controller_ids(), vec![a, b_id]);
    assert_eq!(nav.len(), 2);
    assert!(nav.controller(stray).is_none());

    pending.complete();
    assert!(nav.poll_transition());

    assert_eq!(nav.top_id(), Some(b_id));
    assert_eq!(nav.top().map(|top| top.name()), Some("B"));
    assert!(!container.borrow().is_mounted(stray));
    assert_eq!(drain(&journal), vec!["hide:A"]);
    assert_eq!(event_names(&log), vec!["pushed:A", "pushed:B"]);
}

#[test]
fn test_stack_view_lists_controllers_bottom_first() {
    let log = EventLog::new();
    let journal = journal();
    let mut nav = strict_navigator(&log);
    push(&mut nav, probe("A", &journal));
    push(&mut nav, probe("B", &journal));

    let names: Vec<&str> = nav.stack().iter().map(|child| child.name()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!(nav.node().children().is_empty());
}
