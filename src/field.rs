// The particle field: all animation state behind one owner.
//
// Pointer and resize events only touch the pointer tracker or swap in a new
// store; the frame callback reads both at the start of a tick and then runs
// physics and rendering back to back. Nothing yields mid-tick, so a tick never
// sees a half-updated store.

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::physics;
use crate::pointer::PointerTracker;
use crate::renderer::{FrameStats, Renderer, Surface};
use crate::scheduler::{FrameHost, FrameScheduler};
use crate::store::{Bounds, ParticleStore};
use crate::viewport::ViewportMonitor;
use rand::rngs::StdRng;

pub struct ParticleField<F: FrameHost> {
    config: FieldConfig,
    rng: StdRng,
    bounds: Bounds,
    store: ParticleStore,
    renderer: Renderer,
    viewport: ViewportMonitor,
    pointer: PointerTracker<F::Handle>,
    scheduler: FrameScheduler<F::Handle>,
    last_stats: FrameStats,
}

impl<F: FrameHost> ParticleField<F> {
    pub fn new(config: FieldConfig, rng: StdRng) -> Self {
        ParticleField {
            config,
            rng,
            bounds: Bounds::new(0.0, 0.0),
            store: ParticleStore::default(),
            renderer: Renderer::new(),
            viewport: ViewportMonitor::new(),
            pointer: PointerTracker::new(),
            scheduler: FrameScheduler::new(),
            last_stats: FrameStats::default(),
        }
    }

    /// Sizes the store for the initial viewport and starts the frame loop.
    pub fn mount(&mut self, width: f64, height: f64, host: &mut F) -> Result<(), FieldError> {
        self.resize(width, height);
        self.start(host)
    }

    pub fn start(&mut self, host: &mut F) -> Result<(), FieldError> {
        self.scheduler.start(host)
    }

    /// Replaces the store wholesale with one sized for the new viewport.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = self.viewport.observe(width, height);
        self.store = ParticleStore::initialize(self.bounds, &self.config, &mut self.rng);
        log::debug!(
            "viewport change {}: {}x{}, {} particles",
            self.viewport.changes(),
            self.bounds.width,
            self.bounds.height,
            self.store.len()
        );
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, host: &mut F) -> Result<(), FieldError> {
        self.pointer.on_move([x, y], self.config.pointer_decay_ms, host)
    }

    pub fn pointer_decayed(&mut self) {
        self.pointer.on_decay();
    }

    /// One physics step followed by one painted frame.
    pub fn tick<S: Surface>(&mut self, surface: &mut S) -> Result<FrameStats, S::Error> {
        physics::step(
            &mut self.store,
            self.pointer.active_position(),
            self.bounds,
            &self.config,
        );
        let stats = self
            .renderer
            .render_frame(&self.store, self.bounds, &self.config, surface)?;
        self.last_stats = stats;
        Ok(stats)
    }

    /// Frame callback entry point. Ticks when the loop is running and asks
    /// the host for the next frame. A paint failure skips this frame only.
    pub fn on_frame<S>(&mut self, surface: &mut S, host: &mut F) -> Result<Option<FrameStats>, FieldError>
    where
        S: Surface,
        S::Error: std::fmt::Debug,
    {
        if !self.scheduler.begin_frame() {
            return Ok(None);
        }
        let stats = match self.tick(surface) {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::warn!("frame {} skipped: {:?}", self.scheduler.frames(), e);
                None
            }
        };
        self.scheduler.end_frame(host)?;
        Ok(stats)
    }

    /// Stops the loop, clears the pointer timer and drops the store.
    /// Calling it again does nothing.
    pub fn teardown(&mut self, host: &mut F) {
        self.scheduler.stop(host);
        self.pointer.teardown(host);
        self.store.clear();
    }

    #[cfg(test)]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    #[cfg(test)]
    pub fn pointer(&self) -> &PointerTracker<F::Handle> {
        &self.pointer
    }

    pub fn scheduler(&self) -> &FrameScheduler<F::Handle> {
        &self.scheduler
    }

    #[cfg(test)]
    pub fn viewport(&self) -> &ViewportMonitor {
        &self.viewport
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerState;
    use crate::color::EDGE_COLOR;
    use crate::renderer::tests::{Call, RecordingSurface};
    use crate::scheduler::tests::FakeHost;
    use rand::SeedableRng;

    fn field(seed: u64) -> ParticleField<FakeHost> {
        ParticleField::new(FieldConfig::default(), StdRng::seed_from_u64(seed))
    }

    fn run_frame(field: &mut ParticleField<FakeHost>, surface: &mut RecordingSurface, host: &mut FakeHost) -> Option<FrameStats> {
        host.fire_frame()?;
        field.on_frame(surface, host).unwrap()
    }

    #[test]
    fn stop_before_first_tick_paints_nothing() {
        let mut host = FakeHost::default();
        let mut surface = RecordingSurface::default();
        let mut field = field(1);
        field.mount(800.0, 600.0, &mut host).unwrap();
        field.pointer_moved(10.0, 10.0, &mut host).unwrap();
        field.teardown(&mut host);
        field.teardown(&mut host);

        assert!(host.frames.is_empty());
        assert!(host.timers.is_empty());
        // a callback the browser had already queued is ignored
        assert_eq!(field.on_frame(&mut surface, &mut host).unwrap(), None);
        assert!(surface.calls.is_empty());
        assert!(field.store().is_empty());
    }

    #[test]
    fn running_loop_paints_every_frame() {
        let mut host = FakeHost::default();
        let mut surface = RecordingSurface::default();
        let mut field = field(2);
        field.mount(800.0, 600.0, &mut host).unwrap();
        for _ in 0..3 {
            let stats = run_frame(&mut field, &mut surface, &mut host).unwrap();
            assert_eq!(stats.particles, 300);
        }
        let clears = surface.calls.iter().filter(|c| matches!(c, Call::Clear(..))).count();
        assert_eq!(clears, 3);
        assert_eq!(host.frames.len(), 1);
        assert_eq!(field.scheduler().frames(), 3);
    }

    #[test]
    fn resize_replaces_the_store() {
        let mut host = FakeHost::default();
        let mut field = field(3);
        field.mount(800.0, 600.0, &mut host).unwrap();
        let before = field.store().particles().to_vec();

        field.resize(400.0, 1000.0);
        field.resize(1200.0, 500.0);
        assert_eq!(field.store().len(), 250);
        assert_eq!(field.bounds(), Bounds::new(1200.0, 500.0));
        assert_eq!(field.viewport().changes(), 3);
        for p in field.store().particles() {
            assert!(!before.contains(p));
            assert!(field.bounds().contains(p.pos));
        }
    }

    #[test]
    fn stroke_is_set_again_after_a_resize() {
        let mut host = FakeHost::default();
        let mut surface = RecordingSurface::default();
        let mut field = field(7);
        field.mount(400.0, 300.0, &mut host).unwrap();
        run_frame(&mut field, &mut surface, &mut host).unwrap();
        field.resize(640.0, 480.0);
        run_frame(&mut field, &mut surface, &mut host).unwrap();

        // each frame: clear, circles, then the stroke before its first line
        let frames: Vec<&[Call]> = surface
            .calls
            .split(|c| matches!(c, Call::Clear(..)))
            .skip(1)
            .collect();
        assert_eq!(frames.len(), 2);
        for calls in frames {
            let stroke = calls.iter().position(|c| matches!(c, Call::Stroke(..))).unwrap();
            let first_line = calls.iter().position(|c| matches!(c, Call::Line(..))).unwrap();
            assert_eq!(calls[stroke], Call::Stroke(EDGE_COLOR, 0.3));
            assert!(stroke < first_line);
            assert!(calls[..stroke].iter().all(|c| matches!(c, Call::Circle(..))));
        }
    }

    #[test]
    fn zero_area_viewport_keeps_running_without_particles() {
        let mut host = FakeHost::default();
        let mut surface = RecordingSurface::default();
        let mut field = field(4);
        field.mount(0.0, 0.0, &mut host).unwrap();
        let stats = run_frame(&mut field, &mut surface, &mut host).unwrap();
        assert_eq!(stats.particles, 0);
        assert_eq!(stats.edges, 0);
    }

    #[test]
    fn pointer_decay_disables_the_force() {
        let mut host = FakeHost::default();
        let mut field = field(5);
        field.mount(800.0, 600.0, &mut host).unwrap();
        field.pointer_moved(400.0, 300.0, &mut host).unwrap();
        assert_eq!(field.pointer().state(), PointerState::Active { pos: [400.0, 300.0] });

        assert!(host.fire_timer().is_some());
        field.pointer_decayed();
        assert_eq!(field.pointer().active_position(), None);
    }

    #[test]
    fn failed_paint_skips_the_frame_but_keeps_the_loop() {
        let mut host = FakeHost::default();
        let mut surface = RecordingSurface {
            fail_circles: true,
            ..RecordingSurface::default()
        };
        let mut field = field(6);
        field.mount(200.0, 200.0, &mut host).unwrap();
        assert_eq!(run_frame(&mut field, &mut surface, &mut host), None);
        assert!(field.scheduler().is_running());
        assert_eq!(host.frames.len(), 1);
    }
}
