// Tunable constants of the particle field.
//
// The defaults give the page background its intended look. They were
// tuned by eye, so treat them as configuration rather than physical constants.

use crate::error::FieldError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Particles per unit of `min(width, height)`.
    pub density: f64,
    /// Initial velocity components are drawn from `[-v, v)`.
    pub max_initial_speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_alpha: f64,
    pub max_alpha: f64,
    /// Distance within which an active pointer pushes particles away.
    pub force_radius: f64,
    pub force_gain: f64,
    /// Speed cap applied right after the pointer force.
    pub max_speed: f64,
    /// Per-tick velocity multiplier, must be below 1.
    pub damping: f64,
    /// Particles closer than this are joined by an edge.
    pub edge_threshold: f64,
    /// Edge opacity at distance zero.
    pub edge_max_alpha: f64,
    pub edge_line_width: f64,
    /// How long the pointer counts as active after its last move.
    pub pointer_decay_ms: u32,
    /// Find edges with a uniform grid instead of checking every pair.
    pub use_spatial_grid: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: 0.5,
            max_initial_speed: 0.15,
            min_radius: 0.5,
            max_radius: 2.5,
            min_alpha: 0.1,
            max_alpha: 0.6,
            force_radius: 150.0,
            force_gain: 0.01,
            max_speed: 2.0,
            damping: 0.99,
            edge_threshold: 100.0,
            edge_max_alpha: 0.5,
            edge_line_width: 0.3,
            pointer_decay_ms: 100,
            use_spatial_grid: true,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), FieldError> {
        let finite = [
            self.density,
            self.max_initial_speed,
            self.min_radius,
            self.max_radius,
            self.min_alpha,
            self.max_alpha,
            self.force_radius,
            self.force_gain,
            self.max_speed,
            self.damping,
            self.edge_threshold,
            self.edge_max_alpha,
            self.edge_line_width,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::InvalidConfig("all values must be finite"));
        }
        if self.density < 0.0 || self.max_initial_speed < 0.0 {
            return Err(FieldError::InvalidConfig("density and initial speed must not be negative"));
        }
        if self.min_radius <= 0.0 || self.min_radius > self.max_radius {
            return Err(FieldError::InvalidConfig("radius range must be positive and ordered"));
        }
        if self.min_alpha <= 0.0 || self.min_alpha > self.max_alpha || self.max_alpha >= 1.0 {
            return Err(FieldError::InvalidConfig("alpha range must lie inside (0, 1)"));
        }
        if self.force_radius <= 0.0 || self.max_speed <= 0.0 || self.edge_threshold <= 0.0 {
            return Err(FieldError::InvalidConfig("radii, speed cap and edge threshold must be positive"));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(FieldError::InvalidConfig("damping must be in [0, 1)"));
        }
        Ok(())
    }
}
