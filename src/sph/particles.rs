use crate::units::*;
use cgmath::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::simulation_config::{require_finite, require_non_negative, require_positive, ConfigError};

/// A single neighbor of particle i, as produced by a neighborhood search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeighborInfo {
    pub index: usize,
    pub distance: Real,
    pub distance_sq: Real,
    pub rj_to_ri: Vector, // ri - rj, points from the neighbor to the particle
}

impl NeighborInfo {
    pub fn new(index: usize, rj_to_ri: Vector) -> NeighborInfo {
        let distance_sq = rj_to_ri.magnitude2();
        NeighborInfo {
            index,
            distance: distance_sq.sqrt(),
            distance_sq,
            rj_to_ri,
        }
    }
}

/// Per system constants. Fixed once particles are placed.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemProperties {
    pub support_radius: Real,  // typically expressed as 'h'
    pub particle_volume: Real, // m² per particle for resting fluid
    pub particle_mass: Real,   // kg
    pub stiffness: Real,       // scales the equation of state, denoted as B
    pub exponent: Real,        // γ of the equation of state
    pub viscosity: Real,       // kinematic viscosity (ν, nu)

    // Particles before this index are boundary particles, all others are fluid.
    pub start_index: usize,

    // Corners of the simulation domain. Particles are kept one support radius away from them.
    pub lower_bound: Point,
    pub upper_bound: Point,
}

impl Default for ParticleSystemProperties {
    fn default() -> Self {
        const PARTICLE_DIAMETER: Real = 0.01;
        const REST_DENSITY: Real = 1000.0;
        let particle_volume = 0.8 * PARTICLE_DIAMETER * PARTICLE_DIAMETER;
        ParticleSystemProperties {
            support_radius: 2.5 * PARTICLE_DIAMETER,
            particle_volume,
            particle_mass: particle_volume * REST_DENSITY,
            stiffness: 70.0,
            exponent: 7.0,
            viscosity: 0.03,
            start_index: 0,
            lower_bound: Point::new(-1.0, -1.0),
            upper_bound: Point::new(1.0, 1.0),
        }
    }
}

impl ParticleSystemProperties {
    pub fn support_radius_sq(&self) -> Real {
        self.support_radius * self.support_radius
    }

    /// Lower corner of the region particles are confined to.
    pub fn inner_lower_bound(&self) -> Point {
        self.lower_bound + Vector::new(self.support_radius, self.support_radius)
    }

    /// Upper corner of the region particles are confined to.
    pub fn inner_upper_bound(&self) -> Point {
        self.upper_bound - Vector::new(self.support_radius, self.support_radius)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("support_radius", self.support_radius)?;
        require_positive("particle_volume", self.particle_volume)?;
        require_positive("particle_mass", self.particle_mass)?;
        require_non_negative("stiffness", self.stiffness)?;
        require_non_negative("exponent", self.exponent)?;
        require_non_negative("viscosity", self.viscosity)?;
        require_finite("lower_bound.x", self.lower_bound.x)?;
        require_finite("lower_bound.y", self.lower_bound.y)?;
        require_finite("upper_bound.x", self.upper_bound.x)?;
        require_finite("upper_bound.y", self.upper_bound.y)?;

        let inner_lower = self.inner_lower_bound();
        let inner_upper = self.inner_upper_bound();
        if inner_lower.x > inner_upper.x || inner_lower.y > inner_upper.y {
            return Err(ConfigError::DomainTooSmall {
                lower_bound: self.lower_bound,
                upper_bound: self.upper_bound,
                support_radius: self.support_radius,
            });
        }
        Ok(())
    }
}

/// Particle state shared between the neighborhood search that fills `neighbors` and the solver.
///
/// All per-particle vectors are index aligned.
/// Boundary particles occupy `[0, start_index)`, fluid particles `[start_index, N)`.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    pub positions: Vec<Point>,
    pub velocities: Vec<Vector>,
    pub accelerations: Vec<Vector>,
    pub densities: Vec<Real>, // Local densities ρ, rebuilt every step
    pub pressures: Vec<Real>, // rebuilt every step

    // Recomputed by the caller before every step. Lists may contain the particle itself.
    pub neighbors: Vec<Vec<NeighborInfo>>,

    pub properties: ParticleSystemProperties,
}

impl ParticleSystem {
    /// Creates an empty system.
    ///
    /// `properties.start_index` is ignored and starts at 0; it is maintained by `add_boundary_particle`.
    /// Callers filling the pub vectors directly have to set it themselves afterwards.
    pub fn new(properties: ParticleSystemProperties) -> ParticleSystem {
        ParticleSystem {
            positions: Vec::new(),
            velocities: Vec::new(),
            accelerations: Vec::new(),
            densities: Vec::new(),
            pressures: Vec::new(),
            neighbors: Vec::new(),
            properties: ParticleSystemProperties { start_index: 0, ..properties },
        }
    }

    pub fn num_particles(&self) -> usize {
        self.positions.len()
    }

    pub fn num_boundary_particles(&self) -> usize {
        self.properties.start_index
    }

    pub fn num_fluid_particles(&self) -> usize {
        self.num_particles() - self.properties.start_index
    }

    pub fn boundary_range(&self) -> Range<usize> {
        0..self.properties.start_index
    }

    pub fn fluid_range(&self) -> Range<usize> {
        self.properties.start_index..self.num_particles()
    }

    fn push_particle(&mut self, position: Point, velocity: Vector) {
        self.positions.push(position);
        self.velocities.push(velocity);
        self.accelerations.push(Vector::zero());
        self.densities.push(0.0);
        self.pressures.push(0.0);
        self.neighbors.push(Vec::new());
    }

    /// Adds a static particle. All boundary particles have to be added before the first fluid particle.
    pub fn add_boundary_particle(&mut self, position: Point) {
        assert_eq!(self.num_fluid_particles(), 0, "boundary particles must be added before fluid particles");
        self.push_particle(position, Vector::zero());
        self.properties.start_index += 1;
    }

    pub fn add_fluid_particle(&mut self, position: Point, velocity: Vector) {
        self.push_particle(position, velocity);
    }

    pub fn clear_neighbors(&mut self) {
        self.neighbors.resize_with(self.num_particles(), Vec::new);
        for list in self.neighbors.iter_mut() {
            list.clear();
        }
    }

    pub fn set_neighbors(&mut self, i: usize, neighbors: Vec<NeighborInfo>) {
        self.neighbors[i] = neighbors;
    }

    /// Reference neighborhood search, O(N²).
    ///
    /// Real scenes are expected to hand in neighbor lists from a spatial data structure,
    /// this one serves small scenes and as ground truth. Includes each particle as its own neighbor.
    pub fn update_neighbors_brute_force(&mut self) {
        let support_radius_sq = self.properties.support_radius_sq();
        self.clear_neighbors();
        let positions = &self.positions;
        for (ri, list) in positions.iter().zip(self.neighbors.iter_mut()) {
            for (j, rj) in positions.iter().enumerate() {
                let rj_to_ri = *ri - *rj;
                if rj_to_ri.magnitude2() <= support_radius_sq {
                    list.push(NeighborInfo::new(j, rj_to_ri));
                }
            }
        }
    }

    /// Panics if the particle state violates the solver's preconditions.
    pub fn check_consistency(&self) {
        if let Err(err) = self.properties.validate() {
            panic!("invalid particle system properties: {}", err);
        }

        let num_particles = self.num_particles();
        assert_eq!(self.velocities.len(), num_particles, "velocities are not index aligned with positions");
        assert_eq!(self.accelerations.len(), num_particles, "accelerations are not index aligned with positions");
        assert_eq!(self.neighbors.len(), num_particles, "neighbor lists are not index aligned with positions");
        assert!(
            self.properties.start_index <= num_particles,
            "start_index {} is beyond particle count {}",
            self.properties.start_index,
            num_particles
        );

        for (i, (position, velocity)) in self.positions.iter().zip(self.velocities.iter()).enumerate() {
            assert!(
                position.x.is_finite() && position.y.is_finite() && velocity.x.is_finite() && velocity.y.is_finite(),
                "particle {} has non-finite state",
                i
            );
        }
        for (i, list) in self.neighbors.iter().enumerate() {
            for neighbor in list.iter() {
                assert!(
                    neighbor.index < num_particles,
                    "particle {} references neighbor {} out of range",
                    i,
                    neighbor.index
                );
            }
        }
    }
}
