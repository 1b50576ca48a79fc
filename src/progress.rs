//! Cooperative progress reporting and cancellation.

/// Consulted after each scanline (and plane) with a running completion
/// count. Returning `false` requests cancellation; the codec stops at the
/// next safe boundary, abandoning the frame in flight while keeping every
/// frame already completed.
pub trait Progress {
    fn report(&mut self, completed: u64, total: u64) -> bool;
}

/// Progress sink that never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _completed: u64, _total: u64) -> bool {
        true
    }
}

/// Running per-frame completion counter over a [`Progress`] sink. A
/// cancellation surfaces as [`CodecError::Cancelled`] so the frame loops
/// can unwind with `?`.
pub(crate) struct Ticker<'a> {
    progress: &'a mut dyn Progress,
    completed: u64,
    total: u64,
}

impl<'a> Ticker<'a> {
    pub(crate) fn new(progress: &'a mut dyn Progress, total: u64) -> Self {
        Self {
            progress,
            completed: 0,
            total,
        }
    }

    pub(crate) fn tick(&mut self) -> Result<(), crate::error::CodecError> {
        self.completed += 1;
        if self.progress.report(self.completed, self.total) {
            Ok(())
        } else {
            Err(crate::error::CodecError::Cancelled)
        }
    }
}
