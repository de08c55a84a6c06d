use crate::units::*;
use serde::{Deserialize, Serialize};

/// Process-wide simulation constants.
///
/// Immutable for the lifetime of a solver; handed to it at construction instead of living in globals.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rest_density: Real, // kg/m² for the resting fluid (ρ0, rho0)
    pub gravity: Real,      // magnitude of gravitational accelleration in m/s², acts along -y
    pub timestep: Real,     // fixed timestep in seconds
    // Hard bound for each velocity component in m/s. Keeps stiff pressure responses from blowing up.
    pub max_velocity_component: Real,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            rest_density: 1000.0,
            gravity: 9.8,
            timestep: 4.0e-4,
            max_velocity_component: 100.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("rest_density", self.rest_density)?;
        require_positive("timestep", self.timestep)?;
        require_positive("max_velocity_component", self.max_velocity_component)?;
        require_finite("gravity", self.gravity)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NotPositive { name: &'static str, value: Real },
    Negative { name: &'static str, value: Real },
    NotFinite { name: &'static str },
    // The domain inset by the support radius on each side is empty.
    DomainTooSmall { lower_bound: Point, upper_bound: Point, support_radius: Real },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotPositive { name, value } => write!(f, "{} must be positive, got {}", name, value),
            ConfigError::Negative { name, value } => write!(f, "{} must not be negative, got {}", name, value),
            ConfigError::NotFinite { name } => write!(f, "{} must be finite", name),
            ConfigError::DomainTooSmall {
                lower_bound,
                upper_bound,
                support_radius,
            } => write!(
                f,
                "domain ({}, {})..({}, {}) leaves no room once inset by support radius {}",
                lower_bound.x, lower_bound.y, upper_bound.x, upper_bound.y, support_radius
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub(super) fn require_finite(name: &'static str, value: Real) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name })
    }
}

pub(super) fn require_positive(name: &'static str, value: Real) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(super) fn require_non_negative(name: &'static str, value: Real) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
