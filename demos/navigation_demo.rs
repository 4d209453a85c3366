//! Console walk-through of the navigation engine.
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --example navigation_demo
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use controller_navigator::{
    sink_fn, Controller, ControllerNode, DeferredDriver, KeyCode, KeyEvent, MountList,
    NavigationController, NavigationEvent, NavigatorConfig, Transition, TransitionStyle,
};

struct Screen {
    node: ControllerNode,
    title: &'static str,
}

impl Screen {
    fn boxed(title: &'static str) -> Box<Self> {
        Box::new(Self {
            node: ControllerNode::new(),
            title,
        })
    }
}

impl Controller for Screen {
    fn node(&self) -> &ControllerNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ControllerNode {
        &mut self.node
    }

    fn name(&self) -> &'static str {
        self.title
    }

    fn dispatch_event(&mut self, event: &KeyEvent) -> bool {
        if event.code == KeyCode::Char('r') {
            println!("  {} refreshes", self.title);
            return true;
        }
        false
    }
}

fn print_stack(navigator: &NavigationController) {
    let names: Vec<&str> = navigator
        .stack()
        .iter()
        .map(|child| child.name())
        .collect();
    println!(
        "  stack: [{}]  state: {:?}",
        names.join(", "),
        navigator.state()
    );
}

fn main() {
    env_logger::init();

    let container = Rc::new(RefCell::new(MountList::new()));
    let mut navigator = NavigationController::new(sink_fn(|event: &NavigationEvent| {
        println!("  event: {}", event);
    }))
    .with_config(NavigatorConfig::new().swipe_commit_threshold(0.4))
    .with_container(Rc::clone(&container));

    println!("Push the board list (first push never animates)");
    navigator
        .push_controller(
            Screen::boxed("Boards"),
            Some(Transition::immediate(TransitionStyle::fade(150))),
        )
        .ok();
    print_stack(&navigator);

    println!("Push a thread with a slide the host finishes later");
    let (driver, pending) = DeferredDriver::new();
    let slide = Transition::new(TransitionStyle::slide_left(250), driver);
    navigator.push_controller(Screen::boxed("Thread"), Some(slide)).ok();
    print_stack(&navigator);

    println!("Push again while sliding");
    match navigator.push_controller(Screen::boxed("Gallery"), None) {
        Ok(accepted) => println!("  accepted: {}", accepted),
        Err(error) => println!("  rejected: {}", error),
    }

    println!("Animation ends");
    pending.complete();
    navigator.poll_transition();
    print_stack(&navigator);

    println!("Press 'r'");
    navigator.dispatch_event(&KeyEvent::down(KeyCode::Char('r')));

    println!("Push replies, then swipe back halfway and let go");
    navigator.push_animated(Screen::boxed("Replies"), true).ok();
    let ids = navigator.controller_ids();
    if let [.., below, top] = ids[..] {
        navigator.begin_swipe(top, below).ok();
        for progress in [0.1, 0.25, 0.3] {
            navigator.swipe_progress(progress);
        }
        println!("  committed: {:?}", navigator.release_swipe());
        print_stack(&navigator);

        println!("Swipe again, past the threshold");
        navigator.begin_swipe(top, below).ok();
        navigator.swipe_progress(0.8);
        println!("  committed: {:?}", navigator.release_swipe());
        print_stack(&navigator);
    }

    println!("Back");
    println!("  consumed: {}", navigator.on_back());
    print_stack(&navigator);
    println!("Back on the last screen");
    println!("  consumed: {}", navigator.on_back());
    println!("  mounted: {:?}", container.borrow().mounted());
}
