//! Helpers for attaching a debugger to a running process.

use log::warn;
use std::thread;
use std::time::Duration;

use crate::constants::HANG_SLEEP_MS;

/// Park the calling thread forever, waking once a second.
///
/// Meant as a place to attach a debugger to; the only way out is from
/// outside the process (for example by jumping past the loop).
pub fn hang() -> ! {
    warn!(
        "thread {:?} hanging in process {}, attach a debugger",
        thread::current().id(),
        std::process::id()
    );
    loop {
        thread::sleep(Duration::from_millis(HANG_SLEEP_MS));
    }
}

/// Does nothing. Set a breakpoint on this function.
#[inline(never)]
pub fn gdb_cut_point() {
    std::hint::black_box(());
}
