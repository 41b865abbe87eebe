use std::sync::Mutex;

/// Counters shown in the dashboard status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub refreshes: usize,
    pub refresh_failures: usize,
    pub submissions: usize,
    pub rejected_inputs: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn bump(&self, update: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            update(&mut *metrics);
        }
    }

    pub fn record_refresh(&self) {
        self.bump(|m| m.refreshes += 1);
    }

    pub fn record_refresh_failure(&self) {
        self.bump(|m| m.refresh_failures += 1);
    }

    pub fn record_submission(&self) {
        self.bump(|m| m.submissions += 1);
    }

    pub fn record_rejected_input(&self) {
        self.bump(|m| m.rejected_inputs += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|m| *m).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
