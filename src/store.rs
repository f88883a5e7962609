// Particle store: the fixed-size particle collection for one viewport size.
// A resize builds a brand new store, nothing is carried over.

use crate::color::Palette;
use crate::config::FieldConfig;
use crate::particle::Particle;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Bounds {
        Bounds {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[cfg(test)]
    pub fn contains(&self, pos: [f64; 2]) -> bool {
        pos[0] >= 0.0 && pos[0] < self.width && pos[1] >= 0.0 && pos[1] < self.height
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Number of particles a viewport of this size holds.
    pub fn capacity_for(bounds: Bounds, config: &FieldConfig) -> usize {
        if bounds.is_empty() {
            return 0;
        }
        (bounds.width.min(bounds.height) * config.density).floor() as usize
    }

    pub fn initialize<R: Rng + ?Sized>(bounds: Bounds, config: &FieldConfig, rng: &mut R) -> ParticleStore {
        let count = ParticleStore::capacity_for(bounds, config);
        let mut particles = Vec::with_capacity(count);
        let v = config.max_initial_speed;
        for _ in 0..count {
            let pos_x = rng.gen::<f64>() * bounds.width;
            let pos_y = rng.gen::<f64>() * bounds.height;
            let vel_x = (rng.gen::<f64>() - 0.5) * 2.0 * v;
            let vel_y = (rng.gen::<f64>() - 0.5) * 2.0 * v;
            let radius = rng.gen::<f64>() * (config.max_radius - config.min_radius) + config.min_radius;
            let color = Palette::random(rng);
            let alpha = rng.gen::<f64>() * (config.max_alpha - config.min_alpha) + config.min_alpha;
            particles.push(Particle::new(
                [pos_x, pos_y],
                [vel_x, vel_y],
                radius,
                color,
                alpha,
            ));
        }
        ParticleStore { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl From<Vec<Particle>> for ParticleStore {
    fn from(particles: Vec<Particle>) -> Self {
        ParticleStore { particles }
    }
}
