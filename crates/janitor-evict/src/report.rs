//! Progress sink injected into the engine.

use crate::search::WindowTrial;

/// Receives everything the engine wants an operator to see.
///
/// All methods default to doing nothing, so implementors only override what
/// they display.
pub trait Reporter {
    /// One window evaluated by the auto-threshold search.
    fn trial(&mut self, _trial: &WindowTrial) {}

    /// Removal checkpoint: about to remove file `index + 1` of `total`.
    fn progress(&mut self, _index: usize, _total: usize) {}

    /// A non-fatal condition the operator should know about.
    fn warning(&mut self, _message: &str) {}
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}
