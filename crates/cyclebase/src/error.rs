use thiserror::Error;

/// Specific error types for cyclebase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A calibration needs at least one tick per second.
    #[error("ticks per second has to be non-zero")]
    ZeroTickRate,

    /// The process-wide calibration was already installed.
    #[error("the global calibration is already initialized")]
    AlreadyInitialized,
}
