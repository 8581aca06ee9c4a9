//! Cooperative progress reporting and cancellation.
//!
//! The pipelines report after each composed row (decode) or written level
//! (encode) and observe cancellation only at those points; there are no
//! other suspension points inside an invocation.

/// A sink for progress reports.
pub trait ProgressSink {
    /// Called with the number of completed units and the total. Return
    /// `false` to cancel the operation.
    fn on_progress(&mut self, done: u32, total: u32) -> bool;
}

impl<F: FnMut(u32, u32) -> bool> ProgressSink for F {
    fn on_progress(&mut self, done: u32, total: u32) -> bool {
        self(done, total)
    }
}

/// A sink that ignores reports and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _done: u32, _total: u32) -> bool {
        true
    }
}
