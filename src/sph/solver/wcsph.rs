use super::super::particles::{ParticleSystem, ParticleSystemProperties};
use super::super::simulation_config::SimulationConfig;
use super::super::smoothing_kernel;
use super::super::smoothing_kernel::Kernel;
use super::Solver;
use crate::units::*;
use cgmath::prelude::*;
use microprofile::scope;
use rayon::prelude::*;

// Weakly compressible SPH with a polytropic (Tait/Cole) equation of state,
// symmetric pressure gradient and a Laplacian based viscosity term.
// Fixed timestep, symplectic Euler.
//
// Pipeline per step, each stage reading what the previous one wrote:
// density & pressure -> accelleration reset -> viscosity -> pressure -> integration -> domain boundary
pub struct WCSPHSolver<TKernel: Kernel = smoothing_kernel::CubicSpline> {
    config: SimulationConfig,
    kernel: TKernel,

    // p / ρ², recomputed every step
    pressure_over_density_sq: Vec<Real>,

    // velocity clamping is reported only once until clear_cached_data
    velocity_clamp_reported: bool,
}

// Denominator of the viscosity term is r² + VISCOSITY_REGULARIZATION * h²
const VISCOSITY_REGULARIZATION: Real = 0.01;
const SPATIAL_DIMENSION: Real = 2.0;

impl WCSPHSolver<smoothing_kernel::CubicSpline> {
    pub fn new(config: SimulationConfig, properties: &ParticleSystemProperties) -> Self {
        if let Err(err) = properties.validate() {
            panic!("invalid particle system properties: {}", err);
        }
        Self::with_kernel(config, smoothing_kernel::CubicSpline::new(properties.support_radius))
    }
}

impl<TKernel: Kernel> WCSPHSolver<TKernel> {
    pub fn with_kernel(config: SimulationConfig, kernel: TKernel) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid simulation config: {}", err);
        }
        WCSPHSolver {
            config,
            kernel,
            pressure_over_density_sq: Vec::new(),
            velocity_clamp_reported: false,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn kernel(&self) -> &TKernel {
        &self.kernel
    }

    // Equation of State (EOS)
    // Zero at rest density, positive under compression.
    #[inline]
    pub fn pressure(stiffness: Real, exponent: Real, rest_density: Real, local_density: Real) -> Real {
        stiffness * ((local_density / rest_density).powf(exponent) - 1.0)
    }

    /// Recomputes density and pressure of all particles, boundary particles included.
    ///
    /// Densities are clamped to the rest density from below, under-dense regions would otherwise pull particles together.
    pub(crate) fn update_density_and_pressure(&self, particles: &mut ParticleSystem) {
        microprofile::scope!("WCSPHSolver", "update_density_and_pressure");
        let num_particles = particles.num_particles();
        particles.densities.resize(num_particles, 0.0);
        particles.pressures.resize(num_particles, 0.0);

        let properties = particles.properties;
        let rest_density = self.config.rest_density;
        let kernel = self.kernel;
        let neighbors = &particles.neighbors;

        particles
            .densities
            .par_iter_mut()
            .zip(particles.pressures.par_iter_mut())
            .zip(neighbors.par_iter())
            .for_each(|((density, pressure), neighbors_i)| {
                *density = if neighbors_i.is_empty() {
                    rest_density
                } else {
                    let kernel_sum: Real = neighbors_i.iter().map(|n| kernel.evaluate(n.distance_sq, n.distance)).sum();
                    properties.particle_volume * rest_density * kernel_sum
                };
                *density = density.max(rest_density);
                *pressure = Self::pressure(properties.stiffness, properties.exponent, rest_density, *density);
            });
    }

    /// Resets fluid accellerations to gravity. Boundary accellerations are left as they are.
    pub(crate) fn init_accelerations(&self, particles: &mut ParticleSystem) {
        microprofile::scope!("WCSPHSolver", "init_accelerations");
        let gravity = Vector::new(0.0, -self.config.gravity);
        let start_index = particles.properties.start_index;
        particles.accelerations[start_index..].par_iter_mut().for_each(|a| *a = gravity);
    }

    /// Adds viscous accelleration to all fluid particles.
    ///
    /// SPH discretization of the velocity Laplacian:
    /// 2(d+2) ν Σ_j m/ρj (vij · xij) / (|xij|² + 0.01h²) ∇Wij
    pub(crate) fn accumulate_viscosity(&self, particles: &mut ParticleSystem) {
        microprofile::scope!("WCSPHSolver", "accumulate_viscosity");
        let properties = particles.properties;
        let const_factor = 2.0 * (SPATIAL_DIMENSION + 2.0) * properties.viscosity;
        let regularization = VISCOSITY_REGULARIZATION * properties.support_radius_sq();
        let mass = properties.particle_mass;
        let start_index = properties.start_index;
        let kernel = self.kernel;

        let velocities = &particles.velocities;
        let densities = &particles.densities;
        let neighbors = &particles.neighbors;

        particles.accelerations[start_index..]
            .par_iter_mut()
            .enumerate()
            .for_each(|(offset, accelleration)| {
                let i = start_index + offset;
                let vi = velocities[i];
                let mut viscosity_force = Vector::zero();
                for n in neighbors[i].iter() {
                    let j = n.index;
                    let dot_dv_to_r = (vi - velocities[j]).dot(n.rj_to_ri);
                    let denom = n.distance_sq + regularization;
                    viscosity_force += (mass / densities[j]) * dot_dv_to_r / denom * kernel.gradient(n.rj_to_ri, n.distance_sq, n.distance);
                }
                *accelleration += const_factor * viscosity_force;
            });
    }

    /// Adds pressure accelleration to all fluid particles.
    ///
    /// Symmetric form -V Σ_j ρj (pi/ρi² + pj/ρj²) ∇Wij, pairwise contributions are equal and opposite.
    pub(crate) fn accumulate_pressure(&mut self, particles: &mut ParticleSystem) {
        microprofile::scope!("WCSPHSolver", "accumulate_pressure");
        let num_particles = particles.num_particles();
        self.pressure_over_density_sq.resize(num_particles, 0.0);
        self.pressure_over_density_sq
            .par_iter_mut()
            .zip((&particles.pressures, &particles.densities).into_par_iter())
            .for_each(|(p_over_rho_sq, (&p, &rho))| {
                *p_over_rho_sq = p / (rho * rho);
            });

        let pressure_over_density_sq = &self.pressure_over_density_sq;
        let volume = particles.properties.particle_volume;
        let start_index = particles.properties.start_index;
        let kernel = self.kernel;
        let densities = &particles.densities;
        let neighbors = &particles.neighbors;

        particles.accelerations[start_index..]
            .par_iter_mut()
            .enumerate()
            .for_each(|(offset, accelleration)| {
                let i = start_index + offset;
                let p_over_rho_sq_i = pressure_over_density_sq[i];
                let mut pressure_force = Vector::zero();
                for n in neighbors[i].iter() {
                    let j = n.index;
                    pressure_force +=
                        densities[j] * (p_over_rho_sq_i + pressure_over_density_sq[j]) * kernel.gradient(n.rj_to_ri, n.distance_sq, n.distance);
                }
                *accelleration -= volume * pressure_force;
            });
    }

    /// Symplectic Euler for fluid particles. Returns the number of particles whose velocity had to be clamped.
    pub(crate) fn integrate(&self, particles: &mut ParticleSystem) -> usize {
        microprofile::scope!("WCSPHSolver", "integrate");
        let dt = self.config.timestep;
        let max_velocity = self.config.max_velocity_component;
        let start_index = particles.properties.start_index;

        particles.positions[start_index..]
            .par_iter_mut()
            .zip(particles.velocities[start_index..].par_iter_mut())
            .zip(particles.accelerations[start_index..].par_iter())
            .map(|((position, velocity), &accelleration)| {
                *velocity += dt * accelleration;
                let clamped = clamp_velocity(velocity, max_velocity);
                *position += dt * *velocity;
                clamped as usize
            })
            .sum()
    }

    /// Keeps fluid particles inside the domain inset by the support radius.
    ///
    /// Violating velocity components are reflected inwards, then the particle is moved once more with the reflected velocity.
    /// Boundary particles are never moved. Returns the number of reflected particles whose velocity had to be clamped.
    pub(crate) fn enforce_boundary(&self, particles: &mut ParticleSystem) -> usize {
        microprofile::scope!("WCSPHSolver", "enforce_boundary");
        let dt = self.config.timestep;
        let max_velocity = self.config.max_velocity_component;
        let lower = particles.properties.inner_lower_bound();
        let upper = particles.properties.inner_upper_bound();
        let start_index = particles.properties.start_index;

        particles.positions[start_index..]
            .par_iter_mut()
            .zip(particles.velocities[start_index..].par_iter_mut())
            .map(|(position, velocity)| {
                let mut reflected = false;
                if position.y < lower.y {
                    velocity.y = velocity.y.abs();
                    reflected = true;
                }
                if position.y > upper.y {
                    velocity.y = -velocity.y.abs();
                    reflected = true;
                }
                if position.x < lower.x {
                    velocity.x = velocity.x.abs();
                    reflected = true;
                }
                if position.x > upper.x {
                    velocity.x = -velocity.x.abs();
                    reflected = true;
                }

                if !reflected {
                    return 0;
                }
                *position += dt * *velocity;
                clamp_velocity(velocity, max_velocity) as usize
            })
            .sum()
    }
}

// Clamps each component to [-max, max]. Returns true if anything changed.
#[inline]
fn clamp_velocity(velocity: &mut Vector, max_velocity: Real) -> bool {
    let clamped = Vector::new(velocity.x.clamp(-max_velocity, max_velocity), velocity.y.clamp(-max_velocity, max_velocity));
    let changed = clamped != *velocity;
    *velocity = clamped;
    changed
}

impl<TKernel: Kernel> Solver for WCSPHSolver<TKernel> {
    fn clear_cached_data(&mut self) {
        self.pressure_over_density_sq = Vec::new();
        self.velocity_clamp_reported = false;
    }

    fn simulation_step(&mut self, particles: &mut ParticleSystem) {
        microprofile::scope!("WCSPHSolver", "simulation_step");
        particles.check_consistency();
        assert_eq!(
            self.kernel.support_radius(),
            particles.properties.support_radius,
            "kernel was built for a different support radius"
        );

        self.update_density_and_pressure(particles);
        self.init_accelerations(particles);
        self.accumulate_viscosity(particles);
        self.accumulate_pressure(particles);
        let num_clamped = self.integrate(particles) + self.enforce_boundary(particles);

        if num_clamped > 0 && !self.velocity_clamp_reported {
            println!(
                "WCSPHSolver: velocity of {} particles exceeded {} m/s per component and was clamped",
                num_clamped, self.config.max_velocity_component
            );
            self.velocity_clamp_reported = true;
        }
    }
}
