// Renderer that paints the particle field onto a drawing surface: particles as
// filled circles, then the fading proximity edges between them.
// Keeps the grid and edge buffers around so frames don't reallocate.

use crate::color::{Color, Palette, EDGE_COLOR};
use crate::config::FieldConfig;
use crate::proximity::{edge_alpha, edges_all_pairs, Edge, SpatialGrid};
use crate::store::{Bounds, ParticleStore};
use vecmath::Vector2;

/// Minimal drawing interface the renderer needs. The browser implements it on
/// top of a canvas 2d context; tests record the calls.
pub trait Surface {
    type Error;

    fn clear(&mut self, bounds: Bounds);
    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Palette, alpha: f64) -> Result<(), Self::Error>;
    /// Sets the stroke used by the following `stroke_line` calls. Called once
    /// per frame before its edges, since the surface may have been reset since
    /// the previous frame.
    fn set_stroke(&mut self, color: Color, width: f64);
    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, alpha: f64);
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub edges: usize,
}

#[derive(Debug, Default)]
pub struct Renderer {
    grid: SpatialGrid,
    edges: Vec<Edge>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints one frame. Clears the whole surface first, so a store left empty
    /// by a zero-sized viewport just clears.
    pub fn render_frame<S: Surface>(
        &mut self,
        store: &ParticleStore,
        bounds: Bounds,
        config: &FieldConfig,
        surface: &mut S,
    ) -> Result<FrameStats, S::Error> {
        surface.clear(bounds);

        let particles = store.particles();
        for p in particles {
            surface.fill_circle(p.pos, p.radius(), p.color(), p.alpha())?;
        }

        if config.use_spatial_grid {
            self.grid.rebuild(particles, bounds, config.edge_threshold);
            self.grid.edges(particles, config.edge_threshold, &mut self.edges);
        } else {
            edges_all_pairs(particles, config.edge_threshold, &mut self.edges);
        }

        let mut drawn = 0;
        if !self.edges.is_empty() {
            surface.set_stroke(EDGE_COLOR, config.edge_line_width);
        }
        for edge in &self.edges {
            if let Some(alpha) = edge_alpha(edge.distance, config.edge_threshold, config.edge_max_alpha) {
                surface.stroke_line(particles[edge.from].pos, particles[edge.to].pos, alpha);
                drawn += 1;
            }
        }

        Ok(FrameStats {
            particles: particles.len(),
            edges: drawn,
        })
    }
}
