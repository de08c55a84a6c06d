pub use wcsph::WCSPHSolver;

mod wcsph;

// ------------------------------------------------------

use super::particles::ParticleSystem;

pub trait Solver {
    // drops scratch buffers, they are rebuilt on the next step
    fn clear_cached_data(&mut self);

    // performs a single simulation step.
    // Neighbor lists in `particles` have to be up to date.
    fn simulation_step(&mut self, particles: &mut ParticleSystem);
}
