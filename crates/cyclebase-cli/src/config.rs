use anyhow::Result;
use cyclebase::constants::CPUINFO_PATH;
use cyclebase::{Calibration, HostCounter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete configuration for the cyclebase CLI. Parsed to/from TOML. All
/// sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub calibration: Option<CalibrationConfig>,
    pub burst: Option<BurstConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// Where to read the CPU speed from, defaults to /proc/cpuinfo.
    pub cpuinfo_path: Option<PathBuf>,
    /// Skip detection and use this tick rate.
    pub ticks_per_sec: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BurstConfig {
    /// Length of the burst window in seconds.
    pub seconds: Option<u32>,
    /// How often to check if the window is over, in milliseconds.
    pub poll_ms: Option<u64>,
}

pub const DEFAULT_BURST_SECONDS: u32 = 5;
pub const DEFAULT_POLL_MS: u64 = 100;

// a simple loader that reads the config from a file
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// The config at `path`, or the defaults if no path is given.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    #[allow(dead_code)]
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Calibrate the host counter as configured.
    pub fn calibrate(&self) -> Result<Calibration> {
        let cfg = self.calibration.clone().unwrap_or_default();
        if let Some(ticks_per_sec) = cfg.ticks_per_sec {
            return Ok(Calibration::try_from_ticks_per_sec(ticks_per_sec)?);
        }
        let path = cfg
            .cpuinfo_path
            .unwrap_or_else(|| PathBuf::from(CPUINFO_PATH));
        Ok(Calibration::init_with(&HostCounter::default(), path))
    }

    pub fn burst_seconds(&self) -> u32 {
        self.burst
            .as_ref()
            .and_then(|b| b.seconds)
            .unwrap_or(DEFAULT_BURST_SECONDS)
    }

    pub fn poll_ms(&self) -> u64 {
        self.burst
            .as_ref()
            .and_then(|b| b.poll_ms)
            .unwrap_or(DEFAULT_POLL_MS)
    }
}
