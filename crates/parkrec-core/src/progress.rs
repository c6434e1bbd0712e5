//! Advisory progress reporting.

/// Receives `(current, total)` updates while pages are scanned and while the
/// filtered document is assembled. `current` is 0-indexed.
///
/// Implementations must not fail; results never depend on them.
pub trait ProgressSink {
    fn on_progress(&mut self, current: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Sink that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _current: usize, _total: usize) {}
}
