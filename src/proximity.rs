// Proximity edges between particles.
//
// `edges_all_pairs` is the straightforward O(n²) reference. `SpatialGrid`
// buckets particles into square cells at least one threshold wide so each
// particle only compares against its own and the eight neighbouring cells. The
// cell count stays proportional to the particle count, however small the
// threshold. Both report the same set of edges.

use crate::particle::Particle;
use crate::store::Bounds;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
}

/// Opacity of an edge of length `distance`, `None` when no edge is drawn.
pub fn edge_alpha(distance: f64, threshold: f64, max_alpha: f64) -> Option<f64> {
    if distance < threshold {
        Some(max_alpha * (1.0 - distance / threshold))
    } else {
        None
    }
}

fn distance(a: &Particle, b: &Particle) -> f64 {
    vecmath::vec2_len(vecmath::vec2_sub(a.pos, b.pos))
}

pub fn edges_all_pairs(particles: &[Particle], threshold: f64, out: &mut Vec<Edge>) {
    out.clear();
    for i in 0..particles.len() {
        for j in i + 1..particles.len() {
            let d = distance(&particles[i], &particles[j]);
            if d < threshold {
                out.push(Edge {
                    from: i,
                    to: j,
                    distance: d,
                });
            }
        }
    }
}

/// Uniform grid over the viewport, stored as a counting sort: `cell_start`
/// holds offsets into `indices` for each cell. Buffers are reused across frames.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f64,
    cols: usize,
    rows: usize,
    cell_start: Vec<usize>,
    indices: Vec<usize>,
    cell_of: Vec<usize>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_coord(&self, value: f64, cells: usize) -> usize {
        let c = (value / self.cell_size).floor();
        if c <= 0.0 {
            0
        } else {
            (c as usize).min(cells - 1)
        }
    }

    /// Buckets `particles` into cells no smaller than `threshold`. Cells grow
    /// past the threshold when it would take more than `max_cells` of them to
    /// cover `bounds`.
    pub fn rebuild(&mut self, particles: &[Particle], bounds: Bounds, threshold: f64) {
        let max_cells = SpatialGrid::max_cells(particles.len());
        let area = bounds.width * bounds.height;
        let mut cell_size = threshold.max((area / max_cells as f64).sqrt());
        loop {
            self.cols = ((bounds.width / cell_size).ceil() as usize).max(1);
            self.rows = ((bounds.height / cell_size).ceil() as usize).max(1);
            if self.cols.saturating_mul(self.rows) <= max_cells {
                break;
            }
            cell_size *= 2.0;
        }
        self.cell_size = cell_size;
        let cell_count = self.cols * self.rows;

        self.cell_of.clear();
        for p in particles {
            let cx = self.cell_coord(p.pos[0], self.cols);
            let cy = self.cell_coord(p.pos[1], self.rows);
            self.cell_of.push(cy * self.cols + cx);
        }

        self.cell_start.clear();
        self.cell_start.resize(cell_count + 1, 0);
        for &cell in &self.cell_of {
            self.cell_start[cell + 1] += 1;
        }
        for cell in 0..cell_count {
            self.cell_start[cell + 1] += self.cell_start[cell];
        }

        self.indices.clear();
        self.indices.resize(particles.len(), 0);
        let mut cursor = self.cell_start.clone();
        for (i, &cell) in self.cell_of.iter().enumerate() {
            self.indices[cursor[cell]] = i;
            cursor[cell] += 1;
        }
    }

    fn max_cells(particles: usize) -> usize {
        4 * particles + 16
    }

    fn cell(&self, cx: usize, cy: usize) -> &[usize] {
        let cell = cy * self.cols + cx;
        &self.indices[self.cell_start[cell]..self.cell_start[cell + 1]]
    }

    /// Edges below `threshold`, with `from < to`. The grid must have been
    /// rebuilt for `particles` with the same `threshold`.
    pub fn edges(&self, particles: &[Particle], threshold: f64, out: &mut Vec<Edge>) {
        out.clear();
        for i in 0..particles.len() {
            let cell = self.cell_of[i];
            let (cx, cy) = (cell % self.cols, cell / self.cols);
            for ny in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                    for &j in self.cell(nx, ny) {
                        if j <= i {
                            continue;
                        }
                        let d = distance(&particles[i], &particles[j]);
                        if d < threshold {
                            out.push(Edge {
                                from: i,
                                to: j,
                                distance: d,
                            });
                        }
                    }
                }
            }
        }
    }
}
