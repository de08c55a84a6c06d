use criterion::{black_box, criterion_group, Criterion};
use rand::prelude::*;

use wcsph2d::sph::*;
use wcsph2d::units::*;

fn bench_simulation_step(c: &mut Criterion) {
    const NUM_FLUID_PARTICLES: usize = 2000;
    const NUM_BOUNDARY_PARTICLES: usize = 200;

    let properties = ParticleSystemProperties {
        lower_bound: Point::new(0.0, 0.0),
        upper_bound: Point::new(1.0, 1.0),
        ..Default::default()
    };
    let mut particles = ParticleSystem::new(properties);

    for x in 0..NUM_BOUNDARY_PARTICLES {
        particles.add_boundary_particle(Point::new(x as Real * 0.005, 0.02));
    }
    // Random clutter, heavily compressed in places. Fine for timing.
    let mut rng: rand::rngs::SmallRng = rand::SeedableRng::seed_from_u64(123456789);
    for _ in 0..NUM_FLUID_PARTICLES {
        let position = Point::new(0.05 + rng.gen::<Real>() * 0.45, 0.05 + rng.gen::<Real>() * 0.45);
        particles.add_fluid_particle(position, Vector::new(0.0, 0.0));
    }
    particles.update_neighbors_brute_force();

    let mut solver = WCSPHSolver::new(SimulationConfig::default(), &particles.properties);

    c.bench_function(
        &format!(
            "WCSPHSolver.simulation_step - {} fluid particles and {} boundary particles",
            particles.num_fluid_particles(),
            particles.num_boundary_particles()
        ),
        |b| {
            b.iter(|| {
                // every iteration starts from the same state
                let mut step_particles = particles.clone();
                solver.simulation_step(black_box(&mut step_particles));
                step_particles
            })
        },
    );
}

criterion_group!(simulation_step, bench_simulation_step);
