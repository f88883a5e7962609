// Viewport monitor: every size report, including the first one at mount,
// counts as a change and leads to a fresh particle store. No debouncing.

use crate::store::Bounds;

#[derive(Debug, Default)]
pub struct ViewportMonitor {
    changes: u64,
}

impl ViewportMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, width: f64, height: f64) -> Bounds {
        self.changes += 1;
        Bounds::new(width, height)
    }

    pub fn changes(&self) -> u64 {
        self.changes
    }
}
