// Frame scheduling.
//
// The host environment owns the repaint loop and one-shot timers; `FrameHost`
// is the seam to it. `FrameScheduler` is the start/stop handle around the
// loop: it remembers the one pending frame request so that stopping can cancel
// it, and a frame callback that still arrives after `stop` is ignored.

use crate::error::FieldError;
use std::fmt::Debug;

pub trait FrameHost {
    type Handle: Copy + Debug + PartialEq;

    /// Ask for a callback before the next repaint.
    fn request_frame(&mut self) -> Result<Self::Handle, FieldError>;
    fn cancel_frame(&mut self, handle: Self::Handle);
    /// Arm a one-shot timer firing after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: u32) -> Result<Self::Handle, FieldError>;
    fn clear_timeout(&mut self, handle: Self::Handle);
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SchedulerState<H> {
    Stopped,
    /// `pending` is `None` only while a frame is being processed.
    Running { pending: Option<H> },
}

#[derive(Debug)]
pub struct FrameScheduler<H> {
    state: SchedulerState<H>,
    frames: u64,
}

impl<H: Copy + Debug + PartialEq> Default for FrameScheduler<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Debug + PartialEq> FrameScheduler<H> {
    pub fn new() -> Self {
        FrameScheduler {
            state: SchedulerState::Stopped,
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState<H> {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// Frames processed since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Requests the first frame. Starting a running loop does nothing.
    pub fn start<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> Result<(), FieldError> {
        if self.is_running() {
            return Ok(());
        }
        let handle = host.request_frame()?;
        self.state = SchedulerState::Running { pending: Some(handle) };
        log::debug!("frame loop started");
        Ok(())
    }

    /// Cancels the pending frame, if any. Safe to call any number of times.
    pub fn stop<F: FrameHost<Handle = H>>(&mut self, host: &mut F) {
        if let SchedulerState::Running { pending } = self.state {
            if let Some(handle) = pending {
                host.cancel_frame(handle);
            }
            self.state = SchedulerState::Stopped;
            log::debug!("frame loop stopped after {} frames", self.frames);
        }
    }

    /// Called when a frame callback fires. Returns whether the frame should be
    /// processed; a callback arriving after `stop` returns false.
    pub fn begin_frame(&mut self) -> bool {
        match self.state {
            SchedulerState::Running { .. } => {
                self.state = SchedulerState::Running { pending: None };
                self.frames += 1;
                true
            }
            SchedulerState::Stopped => false,
        }
    }

    /// Requests the next frame unless the loop was stopped meanwhile.
    pub fn end_frame<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> Result<(), FieldError> {
        if let SchedulerState::Running { pending: None } = self.state {
            match host.request_frame() {
                Ok(handle) => self.state = SchedulerState::Running { pending: Some(handle) },
                Err(e) => {
                    self.state = SchedulerState::Stopped;
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}
