// Simple particle struct to keep track of individual position and velocity,
// plus the visual attributes fixed at creation

use crate::color::Palette;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    radius: f64,
    color: Palette,
    alpha: f64,
}

impl Particle {
    pub fn new(pos: [f64; 2], vel: [f64; 2], radius: f64, color: Palette, alpha: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            color,
            alpha,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Palette {
        self.color
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[cfg(test)]
    pub fn speed(&self) -> f64 {
        vecmath::vec2_len(self.vel)
    }
}
