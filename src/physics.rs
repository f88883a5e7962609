// Per-frame physics: integrate, wrap around the viewport edges, push away from
// an active pointer, cap speed, damp.

use crate::config::FieldConfig;
use crate::store::{Bounds, ParticleStore};
use vecmath::Vector2;

/// Toroidal wrap for one coordinate. Leaving past the far edge resets to 0,
/// leaving below 0 resets to just inside the far edge, so the result always
/// lies in `[0, bound)` however far the particle overshot.
pub fn wrap_coordinate(value: f64, bound: f64) -> f64 {
    if value >= bound {
        0.0
    } else if value < 0.0 {
        below(bound)
    } else {
        value
    }
}

// largest f64 strictly below a positive bound
fn below(bound: f64) -> f64 {
    f64::from_bits(bound.to_bits() - 1)
}

/// Velocity change the pointer applies to a particle at `pos`, or `None` when
/// the particle is outside the force radius.
pub fn pointer_impulse(pos: Vector2<f64>, pointer: Vector2<f64>, config: &FieldConfig) -> Option<Vector2<f64>> {
    let offset = vecmath::vec2_sub(pos, pointer);
    let distance = vecmath::vec2_len(offset);
    if distance >= config.force_radius {
        return None;
    }
    let force = (config.force_radius - distance) / config.force_radius;
    Some(vecmath::vec2_scale(offset, force * config.force_gain))
}

pub fn cap_speed(vel: Vector2<f64>, max_speed: f64) -> Vector2<f64> {
    let speed = vecmath::vec2_len(vel);
    if speed > max_speed {
        vecmath::vec2_scale(vel, max_speed / speed)
    } else {
        vel
    }
}

/// Advances every particle by one tick. `pointer` is the pointer position when
/// the pointer is active, `None` otherwise.
pub fn step(store: &mut ParticleStore, pointer: Option<Vector2<f64>>, bounds: Bounds, config: &FieldConfig) {
    if bounds.is_empty() {
        return;
    }
    for particle in store.particles_mut() {
        particle.pos = vecmath::vec2_add(particle.pos, particle.vel);
        particle.pos[0] = wrap_coordinate(particle.pos[0], bounds.width);
        particle.pos[1] = wrap_coordinate(particle.pos[1], bounds.height);

        if let Some(pointer) = pointer {
            if let Some(impulse) = pointer_impulse(particle.pos, pointer, config) {
                particle.vel = cap_speed(vecmath::vec2_add(particle.vel, impulse), config.max_speed);
            }
        }

        particle.vel = vecmath::vec2_scale(particle.vel, config.damping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::particle::Particle;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn single(pos: [f64; 2], vel: [f64; 2]) -> ParticleStore {
        ParticleStore::from(vec![Particle::new(pos, vel, 1.0, Palette::Cyan, 0.5)])
    }

    #[test]
    fn integrates_position() {
        let config = FieldConfig::default();
        let mut store = single([10.0, 20.0], [1.0, -2.0]);
        step(&mut store, None, Bounds::new(100.0, 100.0), &config);
        let p = store.particles()[0];
        assert_eq!(p.pos, [11.0, 18.0]);
        assert_eq!(p.vel, [0.99, -1.98]);
    }

    #[test]
    fn wraps_to_opposite_edge_without_touching_velocity() {
        let config = FieldConfig {
            damping: 0.0,
            ..FieldConfig::default()
        };
        let bounds = Bounds::new(100.0, 50.0);

        let mut store = single([99.5, 10.0], [1.0, 0.0]);
        step(&mut store, None, bounds, &FieldConfig::default());
        assert_eq!(store.particles()[0].pos[0], 0.0);
        assert!(store.particles()[0].vel[0] > 0.0);

        let mut store = single([0.5, 0.2], [-1.0, -1.0]);
        step(&mut store, None, bounds, &config);
        let p = store.particles()[0];
        assert!(p.pos[0] < 100.0 && p.pos[0] > 99.99);
        assert!(p.pos[1] < 50.0 && p.pos[1] > 49.99);
    }

    #[test]
    fn wrap_holds_for_huge_overshoot() {
        let config = FieldConfig::default();
        let bounds = Bounds::new(80.0, 60.0);
        let mut rng = StdRng::seed_from_u64(11);
        let particles = (0..200)
            .map(|_| {
                let vel = [rng.gen::<f64>() * 2000.0 - 1000.0, rng.gen::<f64>() * 2000.0 - 1000.0];
                Particle::new([rng.gen::<f64>() * 80.0, rng.gen::<f64>() * 60.0], vel, 1.0, Palette::Blue, 0.3)
            })
            .collect::<Vec<_>>();
        let mut store = ParticleStore::from(particles);
        for _ in 0..20 {
            step(&mut store, Some([40.0, 30.0]), bounds, &config);
            for p in store.particles() {
                assert!(bounds.contains(p.pos), "{:?}", p.pos);
            }
        }
    }

    #[test]
    fn wrap_coordinate_edges() {
        assert_eq!(wrap_coordinate(100.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(350.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(0.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(42.0, 100.0), 42.0);
        let w = wrap_coordinate(-250.0, 100.0);
        assert!(w < 100.0 && w > 99.999);
    }

    #[test]
    fn speed_capped_inside_force_radius() {
        let config = FieldConfig {
            force_gain: 10.0,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let pointer = [200.0, 200.0];
        let particles = (0..100)
            .map(|_| {
                let pos = [pointer[0] + rng.gen::<f64>() * 200.0 - 100.0, pointer[1] + rng.gen::<f64>() * 200.0 - 100.0];
                Particle::new(pos, [0.0, 0.0], 1.0, Palette::Pink, 0.3)
            })
            .collect::<Vec<_>>();
        let mut store = ParticleStore::from(particles);
        step(&mut store, Some(pointer), Bounds::new(400.0, 400.0), &config);
        for p in store.particles() {
            assert!(p.speed() <= config.max_speed + 1e-12);
        }
    }

    #[test]
    fn no_force_at_or_beyond_radius() {
        let config = FieldConfig::default();
        assert!(pointer_impulse([150.0, 0.0], [0.0, 0.0], &config).is_none());
        assert!(pointer_impulse([0.0, 200.0], [0.0, 0.0], &config).is_none());
        let impulse = pointer_impulse([75.0, 0.0], [0.0, 0.0], &config).unwrap_or([0.0, 0.0]);
        // half strength at half radius: 0.5 * 75 * 0.01
        assert!((impulse[0] - 0.375).abs() < 1e-12);
        assert_eq!(impulse[1], 0.0);
    }

    #[test]
    fn damping_strictly_decreases_speed() {
        let config = FieldConfig::default();
        let mut store = single([50.0, 50.0], [1.5, -0.7]);
        let mut last = store.particles()[0].speed();
        for _ in 0..1000 {
            step(&mut store, None, Bounds::new(100.0, 100.0), &config);
            let speed = store.particles()[0].speed();
            assert!(speed < last);
            last = speed;
        }
        assert!(last < 0.001);
    }

    #[test]
    fn empty_bounds_is_noop() {
        let config = FieldConfig::default();
        let mut store = single([5.0, 5.0], [1.0, 1.0]);
        step(&mut store, None, Bounds::new(0.0, 0.0), &config);
        assert_eq!(store.particles()[0].pos, [5.0, 5.0]);
    }

    #[test]
    fn pointer_pushes_nearby_particles_outward() {
        let config = FieldConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let pointer = [400.0, 300.0];
        let initial = ParticleStore::initialize(bounds, &config, &mut StdRng::seed_from_u64(42));
        assert_eq!(initial.len(), 300);

        let mut pushed = initial.clone();
        step(&mut pushed, Some(pointer), bounds, &config);
        let mut drifting = initial.clone();
        step(&mut drifting, None, bounds, &config);

        let mut checked = 0;
        for (a, b) in pushed.particles().iter().zip(drifting.particles()) {
            let offset = vecmath::vec2_sub(a.pos, pointer);
            let distance = vecmath::vec2_len(offset);
            if distance > 0.0 && distance < config.force_radius {
                let delta = vecmath::vec2_sub(a.vel, b.vel);
                assert!(vecmath::vec2_dot(delta, offset) > 0.0);
                checked += 1;
            } else {
                assert_eq!(a.vel, b.vel);
            }
        }
        assert!(checked > 0);
    }
}
