//! Cycle counter calibration and the small helpers built on it.
//!
//! At process start, build a [`Platform`] (or just a [`Calibration`]) once.
//! After that:
//!
//! - read raw ticks with [`poll_clock`] on hot paths, and convert them with
//!   the constants of the [`Calibration`],
//! - force debug logging for a while with [`LogBurst::burst_log`], and call
//!   [`LogBurst::pull`] regularly to end the burst when it expires,
//! - turn pre-decoded protocol codes into names with the functions in
//!   [`names`],
//! - trace function entry and exit with [`trace_scope!`].
//!
//! ## Example usage
//! ```
//! use cyclebase::{Calibration, LogBurst, poll_clock};
//!
//! let cal = Calibration::init();
//! // the sub-second constants are rounded up
//! assert!(cal.tick_ms * 1000 >= cal.tick_s);
//!
//! let start = poll_clock();
//! let elapsed_us = cal.ticks_to_us(poll_clock().saturating_sub(start));
//! # let _ = elapsed_us;
//!
//! let burst = LogBurst::host(&cal);
//! burst.burst_log(30);
//! assert!(burst.is_active());
//! // somewhere in the main loop
//! burst.pull();
//!
//! assert_eq!(cyclebase::names::return_code_name(0), "OK");
//! ```
//!
//! Calibration reads the CPU speed from `/proc/cpuinfo` when the counter is
//! the time stamp counter. If that fails, the default of
//! [`DEFAULT_TICKS_PER_SEC`](constants::DEFAULT_TICKS_PER_SEC) is used and
//! [`Calibration::source`] says so.

pub mod burst;
pub mod calibrate;
pub mod clock;
pub mod constants;
mod error;
pub mod hang;
pub mod names;
pub mod platform;
pub mod trace;

pub use crate::burst::{GlobalLevel, LevelControl, LocalLevel, LogBurst};
pub use crate::calibrate::{Calibration, CpuSpeed, SpeedSource};
pub use crate::clock::{CycleCounter, HostCounter, ManualCounter, MonotonicCounter, poll_clock};
pub use crate::error::Error;
pub use crate::hang::{gdb_cut_point, hang};
pub use crate::platform::Platform;

#[doc(hidden)]
pub use log as __log;

#[cfg(test)]
mod tests {
    #[test]
    fn constants_set() {
        assert_eq!(crate::constants::DEFAULT_TICKS_PER_SEC, 2999);
        assert_eq!(crate::constants::CPUINFO_PATH, "/proc/cpuinfo");
    }

    #[test]
    fn init_then_poll() {
        let cal = crate::Calibration::init();
        assert!(cal.tick_s > 0);
        let a = crate::poll_clock();
        let b = crate::poll_clock();
        assert!(b >= a);
    }
}
