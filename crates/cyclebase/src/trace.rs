//! Indented function entry/exit trace lines, and event logging.
//!
//! A [`TraceScope`] logs `name (args) {` when created and `} // name` when
//! dropped, indented by the current [`TraceDepth`]. Because the closing line
//! comes from `Drop`, every exit path (early return, `?`, panic unwinding)
//! keeps the depth balanced.

use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

pub use log::Level;

use crate::constants::TRACE_INDENT_WIDTH;

/// Log target of the [`notice_event!`](crate::notice_event) and
/// [`error_event!`](crate::error_event) event copies.
pub const EVENT_TARGET: &str = "cyclebase::event";

/// The process-wide trace depth used by [`trace_scope!`](crate::trace_scope).
pub static TRACE_DEPTH: TraceDepth = TraceDepth::new();

/// Nesting depth of live [`TraceScope`]s.
#[derive(Debug, Default)]
pub struct TraceDepth(AtomicI32);

impl TraceDepth {
    pub const fn new() -> Self {
        TraceDepth(AtomicI32::new(0))
    }

    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Enter a scope named `func`, logging at `level`.
    pub fn enter(
        &self,
        level: Level,
        func: &'static str,
        args: fmt::Arguments<'_>,
    ) -> TraceScope<'_> {
        let depth = self.0.fetch_add(1, Ordering::Relaxed);
        log::log!(level, "{:indent$}{func} ({args}) {{", "", indent = indent(depth));
        TraceScope {
            depth: self,
            level,
            func,
        }
    }
}

fn indent(depth: i32) -> usize {
    usize::try_from(depth).unwrap_or(0) * TRACE_INDENT_WIDTH
}

/// Guard returned by [`TraceDepth::enter`].
#[must_use = "the scope ends when the guard is dropped"]
#[derive(Debug)]
pub struct TraceScope<'a> {
    depth: &'a TraceDepth,
    level: Level,
    func: &'static str,
}

impl Drop for TraceScope<'_> {
    fn drop(&mut self) {
        let depth = self.depth.0.fetch_sub(1, Ordering::Relaxed) - 1;
        log::log!(self.level, "{:indent$}}} // {}", "", self.func, indent = indent(depth));
    }
}

/// Trace entry into the current scope at [`Level::Trace`]. The returned guard
/// traces the exit.
///
/// ```
/// fn resize(len: usize) {
///     let _t = cyclebase::trace_scope!("resize", "len={}", len);
///     // ...
/// }
/// # resize(3);
/// ```
#[macro_export]
macro_rules! trace_scope {
    ($func:expr) => {
        $crate::trace::TRACE_DEPTH.enter($crate::trace::Level::Trace, $func, format_args!(""))
    };
    ($func:expr, $($arg:tt)+) => {
        $crate::trace::TRACE_DEPTH.enter($crate::trace::Level::Trace, $func, format_args!($($arg)+))
    };
}

/// Log a notice both to the event target and the regular log.
#[macro_export]
macro_rules! notice_event {
    ($($arg:tt)+) => {{
        $crate::__log::info!(target: $crate::trace::EVENT_TARGET, $($arg)+);
        $crate::__log::info!($($arg)+);
    }};
}

/// Log an error both to the event target and the regular log.
#[macro_export]
macro_rules! error_event {
    ($($arg:tt)+) => {{
        $crate::__log::error!(target: $crate::trace::EVENT_TARGET, $($arg)+);
        $crate::__log::error!($($arg)+);
    }};
}
