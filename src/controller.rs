//! The controller contract.
//!
//! A controller is one unit of screen content. It owns an ordered list of
//! child controllers and exposes the hooks the navigation engine drives:
//!
//! - [`on_show`](Controller::on_show) / [`on_hide`](Controller::on_hide):
//!   activation and deactivation.
//! - [`on_back`](Controller::on_back): back-navigation, routed to the
//!   deepest active child first.
//! - [`attach_to_parent_view`](Controller::attach_to_parent_view): mount into
//!   a host [`ViewContainer`].
//! - [`dispatch_event`](Controller::dispatch_event): raw key input, routed
//!   to the topmost descendant.
//!
//! Implementors embed a [`ControllerNode`] and return it from
//! [`node`](Controller::node) / [`node_mut`](Controller::node_mut); every other
//! method has a default.
//!
//! # Ownership
//!
//! Ownership runs strictly parent → children: a node owns its children as
//! `Box<dyn Controller>`. The back-references (`parent`, `previous_sibling`)
//! are plain [`ControllerId`]s used for lookup only. Because a boxed
//! controller can only live in one `children` list at a time, a controller
//! can never sit on two stacks at once.
//!
//! # Example
//!
//! ```
//! use controller_navigator::{Controller, ControllerNode};
//!
//! struct ThreadController {
//!     node: ControllerNode,
//!     thread_no: u64,
//! }
//!
//! impl Controller for ThreadController {
//!     fn node(&self) -> &ControllerNode {
//!         &self.node
//!     }
//!
//!     fn node_mut(&mut self) -> &mut ControllerNode {
//!         &mut self.node
//!     }
//! }
//!
//! let mut thread = ThreadController { node: ControllerNode::new(), thread_no: 42 };
//! assert_eq!(thread.name(), "ThreadController");
//! assert!(!thread.on_back());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::trace_log;

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// ControllerId
// ============================================================================

/// Opaque identity of a controller, stable for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    fn next() -> Self {
        Self(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Input events
// ============================================================================

/// Key identity carried by a [`KeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Hardware or gesture back.
    Back,
    Escape,
    Enter,
    Menu,
    Char(char),
    /// Platform key code with no dedicated variant.
    Other(u32),
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// Raw key input delivered by the host into the top of the controller tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
}

impl KeyEvent {
    pub const fn down(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    pub const fn up(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Up,
        }
    }
}

// ============================================================================
// ViewContainer
// ============================================================================

/// Mount point that controllers attach their visual representation to.
///
/// The engine only ever tells the container *which* controller to mount or
/// unmount; how a controller is actually drawn is the host's business.
pub trait ViewContainer {
    /// Mount the controller's view.
    fn mount(&mut self, controller: ControllerId);

    /// Remove the controller's view.
    fn unmount(&mut self, controller: ControllerId);
}

/// In-memory [`ViewContainer`] that records mounted controllers in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountList {
    mounted: Vec<ControllerId>,
}

impl MountList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounted controllers, bottom first.
    pub fn mounted(&self) -> &[ControllerId] {
        &self.mounted
    }

    pub fn is_mounted(&self, id: ControllerId) -> bool {
        self.mounted.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}

impl ViewContainer for MountList {
    fn mount(&mut self, controller: ControllerId) {
        if !self.is_mounted(controller) {
            self.mounted.push(controller);
        }
    }

    fn unmount(&mut self, controller: ControllerId) {
        self.mounted.retain(|id| *id != controller);
    }
}

/// A shared container: the navigator mounts into it while the host keeps a
/// handle for rendering.
impl<C: ViewContainer + ?Sized> ViewContainer for Rc<RefCell<C>> {
    fn mount(&mut self, controller: ControllerId) {
        self.borrow_mut().mount(controller);
    }

    fn unmount(&mut self, controller: ControllerId) {
        self.borrow_mut().unmount(controller);
    }
}

// ============================================================================
// ControllerNode
// ============================================================================

/// Base state every controller embeds.
pub struct ControllerNode {
    id: ControllerId,
    parent: Option<ControllerId>,
    previous_sibling: Option<ControllerId>,
    children: Vec<Box<dyn Controller>>,
    attached: bool,
    shown: bool,
}

impl ControllerNode {
    /// Create a detached, hidden node with a fresh id.
    pub fn new() -> Self {
        Self {
            id: ControllerId::next(),
            parent: None,
            previous_sibling: None,
            children: Vec::new(),
            attached: false,
            shown: false,
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// The controller whose `children` contain this one, if any.
    pub fn parent(&self) -> Option<ControllerId> {
        self.parent
    }

    /// The controller this one was pushed on top of.
    pub fn previous_sibling(&self) -> Option<ControllerId> {
        self.previous_sibling
    }

    pub(crate) fn set_previous_sibling(&mut self, previous: Option<ControllerId>) {
        self.previous_sibling = previous;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ControllerId>) {
        self.parent = parent;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub fn children(&self) -> &[Box<dyn Controller>] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn last_child(&self) -> Option<&dyn Controller> {
        self.children.last().map(|child| child.as_ref())
    }

    pub fn last_child_mut(&mut self) -> Option<&mut (dyn Controller + 'static)> {
        self.children.last_mut().map(|child| child.as_mut())
    }

    /// Index of the child with the given id.
    pub fn position(&self, id: ControllerId) -> Option<usize> {
        self.children.iter().position(|child| child.id() == id)
    }

    pub fn contains(&self, id: ControllerId) -> bool {
        self.position(id).is_some()
    }

    pub fn child(&self, id: ControllerId) -> Option<&dyn Controller> {
        self.children
            .iter()
            .find(|child| child.id() == id)
            .map(|child| child.as_ref())
    }

    pub fn child_mut(&mut self, id: ControllerId) -> Option<&mut (dyn Controller + 'static)> {
        self.children
            .iter_mut()
            .find(|child| child.id() == id)
            .map(|child| child.as_mut())
    }

    /// Take ownership of `child`, appending it after the existing children.
    pub fn add_child(&mut self, mut child: Box<dyn Controller>) -> ControllerId {
        child.node_mut().parent = Some(self.id);
        let id = child.id();
        trace_log!("Controller {} adopted child {}", self.id, id);
        self.children.push(child);
        id
    }

    /// Release the child with the given id, clearing its parent link.
    pub fn remove_child(&mut self, id: ControllerId) -> Option<Box<dyn Controller>> {
        let index = self.position(id)?;
        let mut child = self.children.remove(index);
        child.node_mut().parent = None;
        trace_log!("Controller {} released child {}", self.id, id);
        Some(child)
    }
}

impl Default for ControllerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ControllerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self
            .children
            .iter()
            .map(|child| format!("{}#{}", child.name(), child.id()))
            .collect();
        f.debug_struct("ControllerNode")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("previous_sibling", &self.previous_sibling)
            .field("children", &children)
            .field("attached", &self.attached)
            .field("shown", &self.shown)
            .finish()
    }
}

// ============================================================================
// Controller trait
// ============================================================================

/// Capability set every navigable screen implements.
///
/// The navigation engine is polymorphic over this trait only; it never
/// inspects concrete controller types.
pub trait Controller: 'static {
    fn node(&self) -> &ControllerNode;

    fn node_mut(&mut self) -> &mut ControllerNode;

    fn id(&self) -> ControllerId {
        self.node().id()
    }

    /// Short type name used in diagnostics.
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Called once per activation. Calling it on an already shown
    /// controller is harmless.
    fn on_show(&mut self) {
        if self.node().is_shown() {
            trace_log!("{}#{} shown while already visible", self.name(), self.id());
        }
        self.node_mut().set_shown(true);
    }

    /// Called once per deactivation.
    fn on_hide(&mut self) {
        self.node_mut().set_shown(false);
    }

    /// Handle a back request. Returns whether this controller or one of its
    /// descendants consumed it; the default asks the last child.
    fn on_back(&mut self) -> bool {
        self.node_mut()
            .last_child_mut()
            .map_or(false, |child| child.on_back())
    }

    fn attach_to_parent_view(&mut self, container: &mut dyn ViewContainer) {
        container.mount(self.id());
        self.node_mut().set_attached(true);
    }

    fn detach_from_parent_view(&mut self, container: &mut dyn ViewContainer) {
        container.unmount(self.id());
        self.node_mut().set_attached(false);
    }

    /// Route a key event to the topmost descendant. Returns whether it was
    /// consumed.
    fn dispatch_event(&mut self, event: &KeyEvent) -> bool {
        self.node_mut()
            .last_child_mut()
            .map_or(false, |child| child.dispatch_event(event))
    }
}

/// `crate::screens::ThreadController<T>` → `ThreadController`.
fn short_type_name(full: &'static str) -> &'static str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

// ============================================================================
// Tests
// ============================================================================
