//! Logging facade for the navigation engine.
//!
//! Every log line the engine emits goes through the macros below, which
//! forward to the [`log`](https://docs.rs/log) crate or the
//! [`tracing`](https://docs.rs/tracing) crate depending on the enabled
//! cargo feature. Enable at most one of them; with neither enabled the
//! macros expand to nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! What the engine reports at each level:
//!
//! | Level   | Events                                                   |
//! |---------|----------------------------------------------------------|
//! | `trace` | swipe progress, completion polling                       |
//! | `debug` | demoted animations, transition start/finish, back routing |
//! | `info`  | committed push, pop and swipe                            |
//! | `warn`  | operations rejected while input is blocked               |
//! | `error` | protocol violations                                      |
//!
//! ```ignore
//! use controller_navigator::{debug_log, warn_log};
//!
//! debug_log!("Demoting animated push of {} (no controller to animate from)", to);
//! warn_log!("push_controller rejected: input is blocked");
//! ```

/// Forward one record to whichever backend is compiled in.
#[doc(hidden)]
#[macro_export]
macro_rules! __nav_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    }};
}

/// Emit a **trace**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__nav_log!(trace, $($arg)*) };
}

/// Emit a **debug**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__nav_log!(debug, $($arg)*) };
}

/// Emit an **info**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__nav_log!(info, $($arg)*) };
}

/// Emit a **warn**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__nav_log!(warn, $($arg)*) };
}

/// Emit an **error**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__nav_log!(error, $($arg)*) };
}
