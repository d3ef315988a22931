//! Terminal spinner wired into core as the `LoadingIndicator`.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use exaview_core::LoadingIndicator;

const TICK: Duration = Duration::from_millis(90);

/// Spinner on stderr, shown while any fetch is in flight.
pub struct Spinner {
    enabled: bool,
    state: Mutex<SpinnerState>,
}

#[derive(Default)]
struct SpinnerState {
    depth: usize,
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// A spinner that only draws when stderr is a terminal and output is
    /// not suppressed.
    pub fn new(quiet: bool) -> Self {
        Self {
            enabled: !quiet && io::stderr().is_terminal(),
            state: Mutex::new(SpinnerState::default()),
        }
    }

    fn start(&self) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Loading…");
        bar.enable_steady_tick(TICK);
        bar
    }
}

impl LoadingIndicator for Spinner {
    fn begin(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.depth += 1;
        if self.enabled && state.bar.is_none() {
            state.bar = Some(self.start());
        }
    }

    fn end(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            if let Some(bar) = state.bar.take() {
                bar.finish_and_clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_spinner_tracks_depth_without_drawing() {
        let spinner = Spinner::new(true);
        spinner.begin();
        spinner.begin();
        spinner.end();
        assert!(spinner.state.lock().is_ok_and(|s| s.depth == 1 && s.bar.is_none()));
        spinner.end();
        spinner.end();
        assert!(spinner.state.lock().is_ok_and(|s| s.depth == 0));
    }
}
