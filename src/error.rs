//! Configuration errors, raised once at construction time.
//!
//! Only invalid parameters are fatal. Statistical degeneracies that show up
//! mid-run (a chain too short for a batch-means estimate, a zero target
//! density at the current state) are handled locally by the estimator and
//! sampler and never surface as errors.

use std::error::Error;
use std::fmt;

/// Invalid construction parameters for a process or stopping criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `|rho| >= 1` (or non-finite): the AR(1) recursion has no stationary
    /// distribution.
    NonStationaryRho(f64),
    /// Innovation standard deviation `tau <= 0` or non-finite.
    InvalidInnovationStd(f64),
    /// Proposal `step_size <= 0` or non-finite.
    InvalidStepSize(f64),
    /// `target_half_width <= 0` or non-finite.
    InvalidTargetHalfWidth(f64),
    /// `confidence_level` outside the open interval (0, 1).
    InvalidConfidenceLevel(f64),
    /// A run-length knob (`initial_run_length`, `growth_increment`,
    /// `max_iterations`) was zero. Carries the offending parameter name.
    ZeroRunLength(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonStationaryRho(rho) => write!(
                f,
                "AR(1) coefficient rho must satisfy |rho| < 1 for stationarity, got {rho}"
            ),
            ConfigError::InvalidInnovationStd(tau) => {
                write!(f, "innovation standard deviation tau must be > 0, got {tau}")
            }
            ConfigError::InvalidStepSize(s) => {
                write!(f, "proposal step_size must be > 0, got {s}")
            }
            ConfigError::InvalidTargetHalfWidth(eps) => {
                write!(f, "target_half_width must be > 0, got {eps}")
            }
            ConfigError::InvalidConfidenceLevel(c) => {
                write!(f, "confidence_level must lie in (0, 1), got {c}")
            }
            ConfigError::ZeroRunLength(name) => write!(f, "{name} must be > 0"),
        }
    }
}

impl Error for ConfigError {}
