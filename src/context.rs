//! GPUI integration.
//!
//! Installs a [`NavigationController`] as a GPUI `Global` so any view can
//! reach the application's root navigator through `cx`:
//!
//! - [`init_navigation`]: store the navigator in the app.
//! - [`UseNavigation`]: read or update it from an `App`.
//! - [`Navigation`]: static shortcuts (`Navigation::push`, `Navigation::back`,
//!   …) that refresh all windows after every stack change.
//!
//! ```ignore
//! use controller_navigator::{init_navigation, EventLog, Navigation, NavigationController};
//!
//! init_navigation(cx, NavigationController::new(EventLog::new()));
//! Navigation::push(cx, Box::new(BoardController::new()), true)?;
//! Navigation::back(cx);
//! ```

use gpui::{App, BorrowAppContext, Global};

use crate::controller::{Controller, ControllerId};
use crate::debug_log;
use crate::error::NavigationResult;
use crate::navigation::NavigationController;

impl Global for NavigationController {}

// ============================================================================
// UseNavigation trait
// ============================================================================

/// Access to the global navigator.
pub trait UseNavigation {
    fn navigation(&self) -> &NavigationController;

    fn update_navigation<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut NavigationController, &mut App) -> R;
}

impl UseNavigation for App {
    fn navigation(&self) -> &NavigationController {
        self.global::<NavigationController>()
    }

    fn update_navigation<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut NavigationController, &mut App) -> R,
    {
        self.update_global(f)
    }
}

/// Install `navigator` as the app's root navigator.
pub fn init_navigation(cx: &mut App, navigator: NavigationController) {
    debug_log!("Installing global navigator {}", navigator.id());
    cx.set_global(navigator);
}

// ============================================================================
// Navigation
// ============================================================================

/// Static shortcuts over the global navigator.
pub struct Navigation;

impl Navigation {
    /// Push a controller, animated with the configured push style.
    pub fn push(cx: &mut App, to: Box<dyn Controller>, animated: bool) -> NavigationResult {
        let result = cx.update_navigation(|navigator, _| navigator.push_animated(to, animated));
        cx.refresh_windows();
        result
    }

    /// Pop the top controller.
    pub fn pop(cx: &mut App, animated: bool) -> NavigationResult {
        let result = cx.update_navigation(|navigator, _| navigator.pop_animated(animated));
        cx.refresh_windows();
        result
    }

    /// Route a back press. Returns whether the navigator consumed it.
    pub fn back(cx: &mut App) -> bool {
        let consumed = cx.update_navigation(|navigator, _| navigator.on_back());
        cx.refresh_windows();
        consumed
    }

    /// Finish the active transition if its completion has fired.
    pub fn poll(cx: &mut App) -> bool {
        let finished = cx.update_navigation(|navigator, _| navigator.poll_transition());
        if finished {
            cx.refresh_windows();
        }
        finished
    }

    /// Number of controllers on the global stack.
    pub fn depth(cx: &App) -> usize {
        cx.navigation().len()
    }

    /// Id of the visible top controller.
    pub fn top_id(cx: &App) -> Option<ControllerId> {
        cx.navigation().top_id()
    }

    /// Whether a transition or swipe holds the input lock.
    pub fn is_blocking_input(cx: &App) -> bool {
        cx.navigation().is_blocking_input()
    }
}

// ============================================================================
// Tests
// ============================================================================
