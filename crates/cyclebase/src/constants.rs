//! Global constants for calibration and burst logging.

/// Where the host CPU speed is read from.
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// The line marker that carries the CPU speed in [`CPUINFO_PATH`].
pub const CPU_MHZ_MARKER: &str = "cpu MHz";

/// Ticks per second used when the CPU speed cannot be detected.
///
/// Note that this is the raw value 2999, not 2999 MHz worth of ticks. Hosts
/// that end up on this fallback convert time very coarsely, check
/// [`SpeedSource`](crate::calibrate::SpeedSource) if that matters.
pub const DEFAULT_TICKS_PER_SEC: u64 = 2999;

pub const MS_PER_SEC: u64 = 1_000;
pub const US_PER_SEC: u64 = 1_000_000;
pub const NS_PER_SEC: u64 = 1_000_000_000;
pub const SECS_PER_MINUTE: u64 = 60;

/// Length of the 28 second window, in seconds.
pub const WINDOW_28S_SECS: u64 = 28;

/// How long [`hang`](crate::hang::hang) sleeps between checks, in milliseconds.
pub const HANG_SLEEP_MS: u64 = 1_000;

/// Number of spaces per trace depth level.
pub const TRACE_INDENT_WIDTH: usize = 2;
