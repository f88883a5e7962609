// Pointer tracker: a pointer move makes the pointer active and (re)arms a decay
// timer; when that timer elapses without another move the pointer goes idle.
// Only the latest position is kept.

use crate::error::FieldError;
use crate::scheduler::FrameHost;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerState {
    Idle,
    Active { pos: Vector2<f64> },
}

#[derive(Debug)]
pub struct PointerTracker<H> {
    state: PointerState,
    decay_timer: Option<H>,
}

impl<H: Copy + PartialEq> Default for PointerTracker<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + PartialEq> PointerTracker<H> {
    pub fn new() -> Self {
        PointerTracker {
            state: PointerState::Idle,
            decay_timer: None,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Pointer position while active.
    pub fn active_position(&self) -> Option<Vector2<f64>> {
        match self.state {
            PointerState::Active { pos } => Some(pos),
            PointerState::Idle => None,
        }
    }

    #[cfg(test)]
    pub fn has_pending_timer(&self) -> bool {
        self.decay_timer.is_some()
    }

    pub fn on_move<F: FrameHost<Handle = H>>(&mut self, pos: Vector2<f64>, decay_ms: u32, host: &mut F) -> Result<(), FieldError> {
        if let Some(timer) = self.decay_timer.take() {
            host.clear_timeout(timer);
        }
        match host.set_timeout(decay_ms) {
            Ok(timer) => {
                self.decay_timer = Some(timer);
                self.state = PointerState::Active { pos };
                Ok(())
            }
            Err(e) => {
                // without a timer the pointer would never decay
                self.state = PointerState::Idle;
                Err(e)
            }
        }
    }

    /// The decay timer elapsed. Cleared timers never fire, so whichever fires
    /// is the one armed by the latest move.
    pub fn on_decay(&mut self) {
        self.decay_timer = None;
        self.state = PointerState::Idle;
    }

    /// Clears any pending timer and forgets the pointer.
    pub fn teardown<F: FrameHost<Handle = H>>(&mut self, host: &mut F) {
        if let Some(timer) = self.decay_timer.take() {
            host.clear_timeout(timer);
        }
        self.state = PointerState::Idle;
    }
}
