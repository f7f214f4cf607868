/// A trait for reporting progress of long-running operations.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Analyzing").
    fn set_phase(&self, phase: &str);

    /// Describe the step currently in flight.
    fn set_step(&self, step: &str);

    /// Run `f` with the progress indicator hidden, so it can write to the terminal.
    fn suspend(&self, f: &mut dyn FnMut());

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// A [`Progress`] that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_phase(&self, _phase: &str) {}

    fn set_step(&self, _step: &str) {}

    fn suspend(&self, f: &mut dyn FnMut()) {
        f();
    }

    fn done(&self) {}
}
