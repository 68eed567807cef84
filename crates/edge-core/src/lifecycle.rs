//! Request lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Mark section sent.
    pub fn mark_section_sent(&mut self, section: &str) {
        self.mark(&format!("section_{}_sent", section));
    }

    /// Time since the context was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from start to a named mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Time to shell flush.
    pub fn time_to_shell(&self) -> Option<Duration> {
        self.since_start("shell_sent")
    }

    /// Time until a section was sent.
    pub fn section_sent_at(&self, section: &str) -> Option<Duration> {
        self.since_start(&format!("section_{}_sent", section))
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
