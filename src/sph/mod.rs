pub use self::particles::{NeighborInfo, ParticleSystem, ParticleSystemProperties};
pub use self::simulation_config::{ConfigError, SimulationConfig};
pub use self::solver::*;

mod particles;
mod simulation_config;
pub mod smoothing_kernel;
mod solver;
