//! The state owned by a process's startup sequence.

use log::{LevelFilter, info, warn};
use std::sync::OnceLock;

use crate::Error;
use crate::burst::{GlobalLevel, LevelControl, LogBurst};
use crate::calibrate::{Calibration, SpeedSource};
use crate::clock::{CycleCounter, HostCounter};
use crate::trace::TraceDepth;

static GLOBAL: OnceLock<Calibration> = OnceLock::new();

/// Install the process-wide calibration. Fails if one is installed already.
pub fn install(calibration: Calibration) -> Result<&'static Calibration, Error> {
    GLOBAL
        .set(calibration)
        .map_err(|_| Error::AlreadyInitialized)?;
    Ok(global_or_init())
}

/// The process-wide calibration, if installed.
pub fn global() -> Option<&'static Calibration> {
    GLOBAL.get()
}

/// The process-wide calibration, calibrating the host on first use.
pub fn global_or_init() -> &'static Calibration {
    GLOBAL.get_or_init(Calibration::init)
}

/// Calibration, burst controller and trace depth for one process (or one
/// test).
#[derive(Debug)]
pub struct Platform<C = HostCounter, L = GlobalLevel>
where
    C: CycleCounter,
    L: LevelControl,
{
    calibration: Calibration,
    burst: LogBurst<C, L>,
    trace: TraceDepth,
}

impl Platform {
    /// Calibrate the host and control the global `log` level.
    pub fn init() -> Self {
        let platform = Self::new(Calibration::init(), HostCounter::default(), GlobalLevel);
        let cal = platform.calibration();
        match cal.source {
            SpeedSource::Default => warn!(
                "cpu speed unknown, using default of {} ticks/s",
                cal.tick_s
            ),
            _ => info!("cpu clock at {} ticks/s ({})", cal.tick_s, cal.source),
        }
        platform
    }
}

impl<C, L> Platform<C, L>
where
    C: CycleCounter,
    L: LevelControl,
{
    pub fn new(calibration: Calibration, counter: C, levels: L) -> Self {
        Platform {
            burst: LogBurst::new(&calibration, counter, levels),
            calibration,
            trace: TraceDepth::new(),
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn burst(&self) -> &LogBurst<C, L> {
        &self.burst
    }

    pub fn trace(&self) -> &TraceDepth {
        &self.trace
    }

    /// Current tick of the platform's counter.
    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.burst.counter().now()
    }

    /// Ticks elapsed since `start`, zero if `start` is in the future.
    pub fn elapsed(&self, start: u64) -> u64 {
        self.now().saturating_sub(start)
    }

    pub fn burst_log(&self, seconds: u32) {
        self.burst.burst_log(seconds)
    }

    pub fn pull(&self) -> bool {
        self.burst.pull()
    }

    /// The level currently in effect.
    pub fn level(&self) -> LevelFilter {
        self.burst.levels().level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burst::LocalLevel;
    use crate::clock::ManualCounter;

    #[test]
    fn platform_wires_burst_to_calibration() {
        let p = Platform::new(
            Calibration::from_ticks_per_sec(1_000),
            ManualCounter::new(50),
            LocalLevel::new(LevelFilter::Info),
        );
        assert_eq!(p.now(), 50);
        p.burst_log(2);
        assert_eq!(p.burst().expiry(), 2_050);
        assert_eq!(p.level(), LevelFilter::Debug);

        p.burst().counter().advance(2_001);
        assert_eq!(p.elapsed(50), 2_001);
        assert!(p.pull());
        assert_eq!(p.level(), LevelFilter::Info);
        assert_eq!(p.trace().get(), 0);
    }

    #[test]
    fn init_calibrates_host_with_global_level() {
        let p = Platform::init();
        let cal = p.calibration();
        assert!(cal.tick_s > 0);
        assert_ne!(cal.source, SpeedSource::Override);
        assert!(cal.tick_ms * 1_000 >= cal.tick_s);
        assert_eq!(p.level(), log::max_level());
        assert!(!p.burst().is_active());
        assert!(!p.pull());
        assert!(p.elapsed(p.now()) < cal.tick_s.saturating_mul(60));
    }

    #[test]
    fn global_calibration_installs_once() {
        let first = global_or_init();
        assert_eq!(global(), Some(first));
        assert_eq!(
            install(Calibration::from_ticks_per_sec(1)),
            Err(Error::AlreadyInitialized)
        );
        assert!(first.tick_s > 0);
    }
}
