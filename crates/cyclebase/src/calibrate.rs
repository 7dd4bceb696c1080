//! CPU speed detection and the tick conversion constants derived from it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use crate::Error;
use crate::clock::{CycleCounter, HostCounter};
use crate::constants::*;

/// Where a tick rate came from.
#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum SpeedSource {
    /// Parsed from the host CPU information.
    Detected,
    /// The CPU information was unavailable or unparseable, the rate is
    /// [`DEFAULT_TICKS_PER_SEC`].
    Default,
    /// The counter has a known rate and needs no detection.
    Fixed,
    /// Set explicitly by the caller.
    Override,
}

impl fmt::Display for SpeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A tick rate together with its [`SpeedSource`].
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CpuSpeed {
    pub ticks_per_sec: u64,
    pub source: SpeedSource,
}

impl CpuSpeed {
    pub fn fallback() -> Self {
        CpuSpeed {
            ticks_per_sec: DEFAULT_TICKS_PER_SEC,
            source: SpeedSource::Default,
        }
    }

    /// True if detection failed and the default rate is in use.
    pub fn is_default(&self) -> bool {
        self.source == SpeedSource::Default
    }
}

/// Detect the CPU speed from a cpuinfo style file. Never fails: any problem
/// opening or parsing the file results in [`CpuSpeed::fallback`].
pub fn detect_cpu_speed<P: AsRef<Path>>(path: P) -> CpuSpeed {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(
                "cannot open {}: {e}, using default speed {DEFAULT_TICKS_PER_SEC}",
                path.display()
            );
            return CpuSpeed::fallback();
        }
    };

    // a rate that rounds down to zero ticks is as useless as no rate
    match parse_cpu_mhz(BufReader::new(file)).filter(|&ticks| ticks > 0) {
        Some(ticks_per_sec) => {
            debug!("detected {ticks_per_sec} ticks/s from {}", path.display());
            CpuSpeed {
                ticks_per_sec,
                source: SpeedSource::Detected,
            }
        }
        None => {
            warn!(
                "no usable '{CPU_MHZ_MARKER}' line in {}, using default speed {DEFAULT_TICKS_PER_SEC}",
                path.display()
            );
            CpuSpeed::fallback()
        }
    }
}

/// Parse the first `cpu MHz` line of cpuinfo style text and return the speed
/// in ticks per second. Only the first matching line is considered.
///
/// Lines are not required to be UTF-8. The result may be zero for a CPU that
/// reports a speed below one tick per second.
pub fn parse_cpu_mhz<R: BufRead>(mut reader: R) -> Option<u64> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        // a read error ends the scan like EOF does
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let line = String::from_utf8_lossy(&buf);
        if line.contains(CPU_MHZ_MARKER) {
            return leading_decimal(&line).map(mhz_to_ticks);
        }
    }
}

// The first decimal number on the line, starting at the first digit.
fn leading_decimal(line: &str) -> Option<f64> {
    let start = line.find(|c: char| c.is_ascii_digit())?;
    let rest = &line[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let number = &rest[..end];
    // "1.2.3" style garbage: keep the longest valid prefix
    number.parse::<f64>().ok().or_else(|| {
        let mut parts = number.splitn(3, '.');
        let int = parts.next()?;
        let frac = parts.next().unwrap_or("");
        format!("{int}.{frac}").parse::<f64>().ok()
    })
}

fn mhz_to_ticks(mhz: f64) -> u64 {
    let ticks = mhz * US_PER_SEC as f64;
    if !ticks.is_finite() || ticks < 0.0 {
        0
    } else if ticks >= u64::MAX as f64 {
        u64::MAX
    } else {
        ticks as u64
    }
}

/// Conversion constants between ticks and wall-clock units.
///
/// The sub-second constants are rounded up, so converting a number of
/// milliseconds or microseconds to ticks never under-reports elapsed time.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Calibration {
    /// Ticks per second.
    pub tick_s: u64,
    /// Ticks per minute.
    pub tick_m: u64,
    /// Ticks per 28 seconds.
    pub tick_28s: u64,
    /// Ticks per millisecond, rounded up.
    pub tick_ms: u64,
    /// Ticks per microsecond, rounded up.
    pub tick_us: u64,
    /// Where `tick_s` came from.
    pub source: SpeedSource,
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source:   {}", self.source)?;
        writeln!(f, "tick_s:   {}", self.tick_s)?;
        writeln!(f, "tick_m:   {}", self.tick_m)?;
        writeln!(f, "tick_28s: {}", self.tick_28s)?;
        writeln!(f, "tick_ms:  {}", self.tick_ms)?;
        write!(f, "tick_us:  {}", self.tick_us)
    }
}

impl Calibration {
    /// Calibrate the [`HostCounter`] against the host CPU information.
    pub fn init() -> Self {
        Self::init_with(&HostCounter::default(), CPUINFO_PATH)
    }

    /// Calibrate `counter`. Counters with a fixed rate skip detection,
    /// otherwise the speed is read from `cpuinfo`.
    pub fn init_with<C: CycleCounter, P: AsRef<Path>>(counter: &C, cpuinfo: P) -> Self {
        let speed = match counter.fixed_rate() {
            Some(ticks_per_sec) => CpuSpeed {
                ticks_per_sec,
                source: SpeedSource::Fixed,
            },
            None => detect_cpu_speed(cpuinfo),
        };
        let cal = Self::from_speed(speed);
        debug!(
            "calibrated: {} ticks/s ({}), {} ticks/ms, {} ticks/us",
            cal.tick_s, cal.source, cal.tick_ms, cal.tick_us
        );
        cal
    }

    /// Derive all constants from a tick rate.
    pub fn from_speed(speed: CpuSpeed) -> Self {
        let tick_s = speed.ticks_per_sec;
        Calibration {
            tick_s,
            tick_m: tick_s.saturating_mul(SECS_PER_MINUTE),
            tick_28s: tick_s.saturating_mul(WINDOW_28S_SECS),
            tick_ms: tick_s.div_ceil(MS_PER_SEC),
            tick_us: tick_s.div_ceil(US_PER_SEC),
            source: speed.source,
        }
    }

    /// Derive all constants from an explicitly chosen tick rate.
    pub fn from_ticks_per_sec(ticks_per_sec: u64) -> Self {
        Self::from_speed(CpuSpeed {
            ticks_per_sec,
            source: SpeedSource::Override,
        })
    }

    /// Like [`Calibration::from_ticks_per_sec`], but rejects a zero rate.
    pub fn try_from_ticks_per_sec(ticks_per_sec: u64) -> Result<Self, Error> {
        if ticks_per_sec == 0 {
            return Err(Error::ZeroTickRate);
        }
        Ok(Self::from_ticks_per_sec(ticks_per_sec))
    }

    pub fn speed(&self) -> CpuSpeed {
        CpuSpeed {
            ticks_per_sec: self.tick_s,
            source: self.source,
        }
    }

    pub fn secs_to_ticks(&self, secs: u64) -> u64 {
        secs.saturating_mul(self.tick_s)
    }

    pub fn minutes_to_ticks(&self, minutes: u64) -> u64 {
        minutes.saturating_mul(self.tick_m)
    }

    pub fn ms_to_ticks(&self, ms: u64) -> u64 {
        ms.saturating_mul(self.tick_ms)
    }

    pub fn us_to_ticks(&self, us: u64) -> u64 {
        us.saturating_mul(self.tick_us)
    }

    /// Whole seconds in `ticks`. Zero for a zero tick rate.
    pub fn ticks_to_secs(&self, ticks: u64) -> u64 {
        ticks.checked_div(self.tick_s).unwrap_or(0)
    }

    pub fn ticks_to_ms(&self, ticks: u64) -> u64 {
        ticks.checked_div(self.tick_ms).unwrap_or(0)
    }

    pub fn ticks_to_us(&self, ticks: u64) -> u64 {
        ticks.checked_div(self.tick_us).unwrap_or(0)
    }

    pub fn ticks_to_duration(&self, ticks: u64) -> Duration {
        if self.tick_s == 0 {
            return Duration::ZERO;
        }
        let nanos = u128::from(ticks) * u128::from(NS_PER_SEC) / u128::from(self.tick_s);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn duration_to_ticks(&self, duration: Duration) -> u64 {
        let ticks = duration.as_nanos().saturating_mul(u128::from(self.tick_s)) / u128::from(NS_PER_SEC);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}
