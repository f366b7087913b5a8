//! Idle pause to inter-entry spacing.

/// Linear mapping from idle milliseconds to a layout offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseSpacing {
    per_second: f64,
}

impl PauseSpacing {
    pub fn new(per_second: f64) -> Self {
        Self { per_second }
    }

    /// Offset for `elapsed_ms` of idle time. Negative input maps to `0`.
    pub fn offset_for(&self, elapsed_ms: i64) -> f64 {
        elapsed_ms.max(0) as f64 / 1000.0 * self.per_second
    }
}
