//! Temporarily forcing debug logging for a bounded window of time.
//!
//! A [`LogBurst`] is either idle or active. [`LogBurst::burst_log`] moves it
//! from idle to active, or extends an active window. Only [`LogBurst::pull`]
//! ends a window: call it often (once per log call or main loop iteration),
//! it is cheap when nothing has expired.

use log::{LevelFilter, debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::calibrate::Calibration;
use crate::clock::{CycleCounter, HostCounter};

/// Owner of the log level that a [`LogBurst`] raises and restores.
pub trait LevelControl {
    fn level(&self) -> LevelFilter;
    fn set_level(&self, level: LevelFilter);
}

impl<L: LevelControl + ?Sized> LevelControl for &L {
    fn level(&self) -> LevelFilter {
        (**self).level()
    }

    fn set_level(&self, level: LevelFilter) {
        (**self).set_level(level)
    }
}

/// The global maximum level of the `log` crate.
///
/// Raising it only helps if the installed logger does not filter on its own.
/// A logger with its own level (a default `env_logger` set to `info`, say)
/// still drops the debug records of a burst, so install one that accepts
/// every level and leaves filtering to `log::max_level()`, as the
/// `cyclebase` binary does.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalLevel;

impl LevelControl for GlobalLevel {
    fn level(&self) -> LevelFilter {
        log::max_level()
    }

    fn set_level(&self, level: LevelFilter) {
        log::set_max_level(level)
    }
}

/// A level that is not connected to any logger.
#[derive(Debug)]
pub struct LocalLevel(Mutex<LevelFilter>);

impl LocalLevel {
    pub fn new(level: LevelFilter) -> Self {
        LocalLevel(Mutex::new(level))
    }
}

impl LevelControl for LocalLevel {
    fn level(&self) -> LevelFilter {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_level(&self, level: LevelFilter) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = level;
    }
}

/// Forces [`LevelFilter::Debug`] until an absolute expiry tick.
#[derive(Debug)]
pub struct LogBurst<C = HostCounter, L = GlobalLevel>
where
    C: CycleCounter,
    L: LevelControl,
{
    counter: C,
    levels: L,
    tick_s: u64,
    // absolute tick at which the burst ends, 0 when idle
    expiry: AtomicU64,
    // the level to restore; also serializes save/force against restore
    saved: Mutex<LevelFilter>,
}

impl LogBurst {
    /// A burst controller for the host counter and the global `log` level.
    pub fn host(calibration: &Calibration) -> Self {
        Self::new(calibration, HostCounter::default(), GlobalLevel)
    }
}

impl<C, L> LogBurst<C, L>
where
    C: CycleCounter,
    L: LevelControl,
{
    /// Create an idle controller. `counter` must tick at the rate
    /// `calibration` was derived for.
    pub fn new(calibration: &Calibration, counter: C, levels: L) -> Self {
        LogBurst {
            counter,
            levels,
            tick_s: calibration.tick_s,
            expiry: AtomicU64::new(0),
            saved: Mutex::new(LevelFilter::Debug),
        }
    }

    /// Force debug logging for at least `seconds` from now.
    ///
    /// An active window is only ever extended, a shorter request leaves the
    /// current expiry in place.
    pub fn burst_log(&self, seconds: u32) {
        let mut saved = self.lock_saved();

        if self.expiry.load(Ordering::Acquire) == 0 {
            let current = self.levels.level();
            *saved = current;
            if current < LevelFilter::Debug {
                self.levels.set_level(LevelFilter::Debug);
            }
        }

        let now = self.counter.now();
        // a zero expiry would read as idle
        let expiry = now
            .saturating_add(u64::from(seconds).saturating_mul(self.tick_s))
            .max(1);
        let previous = self.expiry.fetch_max(expiry, Ordering::AcqRel);
        if previous == 0 {
            info!("log burst for {seconds}s, saved level {}", *saved);
        } else if expiry > previous {
            debug!("log burst extended by {} ticks", expiry - previous);
        }
    }

    /// End the window if it has expired, restoring the saved level. Returns
    /// true if this call ended the window.
    pub fn pull(&self) -> bool {
        let expiry = self.expiry.load(Ordering::Acquire);
        if expiry == 0 || self.counter.now() <= expiry {
            return false;
        }

        let saved = self.lock_saved();
        // a concurrent burst_log may have extended the window meanwhile
        if self
            .expiry
            .compare_exchange(expiry, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.levels.set_level(*saved);
        debug!("log burst over, restored level {}", *saved);
        true
    }

    /// Return to idle without touching the current level, saved level is
    /// reset to debug.
    pub fn reset(&self) {
        let mut saved = self.lock_saved();
        *saved = LevelFilter::Debug;
        self.expiry.store(0, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.expiry.load(Ordering::Acquire) != 0
    }

    /// The absolute expiry tick, 0 when idle.
    pub fn expiry(&self) -> u64 {
        self.expiry.load(Ordering::Acquire)
    }

    /// The level restored by [`LogBurst::pull`].
    pub fn saved_level(&self) -> LevelFilter {
        *self.lock_saved()
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    pub fn levels(&self) -> &L {
        &self.levels
    }

    fn lock_saved(&self) -> MutexGuard<'_, LevelFilter> {
        self.saved.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
