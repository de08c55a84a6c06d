use more_asserts::*;
use wcsph2d::sph::*;
use wcsph2d::units::*;

const NUM_STEPS: usize = 200;

fn dam_break() -> ParticleSystem {
    let properties = ParticleSystemProperties {
        lower_bound: Point::new(0.0, 0.0),
        upper_bound: Point::new(0.3, 0.3),
        ..Default::default()
    };
    let mut particles = ParticleSystem::new(properties);

    // floor of boundary particles just outside the inset domain
    for x in 0..30 {
        particles.add_boundary_particle(Point::new(0.01 * x as Real, 0.015));
    }
    for y in 0..10 {
        for x in 0..10 {
            particles.add_fluid_particle(Point::new(0.05 + 0.01 * x as Real, 0.1 + 0.01 * y as Real), Vector::new(0.0, 0.0));
        }
    }
    particles
}

fn mean_fluid_height(particles: &ParticleSystem) -> Real {
    let fluid = particles.fluid_range();
    let num_fluid = fluid.len() as Real;
    particles.positions[fluid].iter().map(|p| p.y).sum::<Real>() / num_fluid
}

#[test]
fn dam_break_falls_and_stays_contained() {
    let config = SimulationConfig::default();
    let mut particles = dam_break();
    let mut solver = WCSPHSolver::new(config, &particles.properties);
    let initial_height = mean_fluid_height(&particles);
    let boundary_before = particles.positions[particles.boundary_range()].to_vec();

    for _ in 0..NUM_STEPS {
        particles.update_neighbors_brute_force();
        solver.simulation_step(&mut particles);
    }

    let overshoot = config.timestep * config.max_velocity_component + 1.0e-5;
    let lower = particles.properties.inner_lower_bound();
    let upper = particles.properties.inner_upper_bound();
    for i in particles.fluid_range() {
        let p = particles.positions[i];
        assert!(p.x.is_finite() && p.y.is_finite());
        assert_ge!(p.x, lower.x - overshoot);
        assert_le!(p.x, upper.x + overshoot);
        assert_ge!(p.y, lower.y - overshoot);
        assert_le!(p.y, upper.y + overshoot);
    }
    assert_lt!(mean_fluid_height(&particles), initial_height - 0.01);
    assert_eq!(&particles.positions[particles.boundary_range()], &boundary_before[..]);
}

#[test]
fn solver_can_be_driven_through_trait_object() {
    let config = SimulationConfig::default();
    let mut particles = dam_break();
    let mut solver: Box<dyn Solver> = Box::new(WCSPHSolver::new(config, &particles.properties));

    particles.update_neighbors_brute_force();
    solver.simulation_step(&mut particles);
    solver.clear_cached_data();
    particles.update_neighbors_brute_force();
    solver.simulation_step(&mut particles);

    for i in particles.fluid_range() {
        assert_ge!(particles.densities[i], config.rest_density);
    }
}
