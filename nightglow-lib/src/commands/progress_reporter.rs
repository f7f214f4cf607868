use crate::metrics::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Refresh rate for progress updates (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} {spinner:.cyan} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} {spinner} {msg}";

struct DelayedProgressState {
    visible_after: Instant,
    visible: AtomicBool,
    step_start_time: Mutex<Instant>,
    step: Mutex<String>,
}

impl Debug for DelayedProgressState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelayedProgressState")
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

/// A spinner on stderr that stays hidden until a run has lasted longer than a threshold.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedProgressState>,
    refresh_task: Arc<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// Must be called from within a tokio runtime. When `use_colors` is false, the
    /// spinner is rendered without ANSI styling.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_draw_target(ProgressDrawTarget::hidden());

        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }

        let state = Arc::new(DelayedProgressState {
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
            step_start_time: Mutex::new(Instant::now()),
            step: Mutex::new(String::new()),
        });

        Self {
            refresh_task: Arc::new(tokio::spawn(refresh_task(bar.clone(), Arc::clone(&state)))),
            bar,
            state,
        }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    fn set_step(&self, step: &str) {
        *self.state.step.lock().unwrap_or_else(PoisonError::into_inner) = step.to_string();
        *self.state.step_start_time.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn suspend(&self, f: &mut dyn FnMut()) {
        self.bar.suspend(|| f());
    }

    fn done(&self) {
        self.refresh_task.abort();
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("state", &self.state)
            .field("refresh_task", &"<task>")
            .finish()
    }
}

/// Background refresh task that periodically updates the spinner.
async fn refresh_task(bar: ProgressBar, state: Arc<DelayedProgressState>) {
    let mut interval = tokio::time::interval(Duration::from_millis(REFRESH_INTERVAL_MS));
    #[expect(clippy::infinite_loop, reason = "task runs until aborted")]
    loop {
        let _ = interval.tick().await;

        if !state.visible.load(Ordering::Relaxed) && Instant::now() >= state.visible_after {
            state.visible.store(true, Ordering::Relaxed);
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }

        if state.visible.load(Ordering::Relaxed) {
            let elapsed_secs = state.step_start_time.lock().unwrap_or_else(PoisonError::into_inner).elapsed().as_secs();
            let step = state.step.lock().unwrap_or_else(PoisonError::into_inner).clone();
            bar.set_message(format!("{elapsed_secs}s: {step}"));
            bar.tick();
        }
    }
}
