// ── Loading indicator ──
//
// Fetches bracket their request with `begin()` / `end()`. The bracket is an
// RAII guard, so the indicator is cleared on the error path too.

use std::sync::Arc;

use tokio::sync::watch;

/// Display-side hook toggled around backend fetches.
pub trait LoadingIndicator: Send + Sync {
    fn begin(&self);
    fn end(&self);
}

/// Indicator that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl LoadingIndicator for NoopIndicator {
    fn begin(&self) {}
    fn end(&self) {}
}

/// Observable in-flight counter.
///
/// Nested or concurrent fetches each hold one count; the state reads as
/// loading while any count is held.
#[derive(Debug)]
pub struct LoadingState {
    in_flight: watch::Sender<usize>,
}

impl LoadingState {
    pub fn new() -> Self {
        let (in_flight, _) = watch::channel(0);
        Self { in_flight }
    }

    pub fn is_loading(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    /// Subscribe to in-flight count changes.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator for LoadingState {
    fn begin(&self) {
        self.in_flight.send_modify(|n| *n += 1);
    }

    fn end(&self) {
        self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Holds the indicator on for as long as it lives.
#[must_use = "the indicator is cleared as soon as the guard is dropped"]
pub struct LoadingGuard {
    indicator: Option<Arc<dyn LoadingIndicator>>,
}

impl LoadingGuard {
    /// Call `begin()` now and `end()` on drop.
    pub fn begin(indicator: Arc<dyn LoadingIndicator>) -> Self {
        indicator.begin();
        Self {
            indicator: Some(indicator),
        }
    }

    /// A guard that touches no indicator (quiet fetches).
    pub fn quiet() -> Self {
        Self { indicator: None }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(indicator) = self.indicator.take() {
            indicator.end();
        }
    }
}
