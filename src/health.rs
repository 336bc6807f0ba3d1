//! Process-wide health flag used to simulate backend outages.
//!
//! The flag starts healthy. `POST /healthcheck/fail` and `POST /healthcheck/ok`
//! flip it; `GET /` and `GET /healthcheck` read it. Every clone of a
//! [`HealthState`] shares the same underlying flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, atomically updated health flag.
#[derive(Debug, Clone)]
pub struct HealthState {
    healthy: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a flag in the healthy state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Overwrite the flag. Last writer wins.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
