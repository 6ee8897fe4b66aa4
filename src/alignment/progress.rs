//! Progress reporting.
use std::{
    fmt,
    time::{Duration, Instant},
};

/// Counts processed groups against an (approximate) expected total.
#[derive(Debug)]
pub struct Progress {
    expected: Option<usize>,
    processed: usize,
    start: Option<Instant>,
}

/// Snapshot of a [Progress], displayed as a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub processed: usize,
    pub expected: Option<usize>,
    pub elapsed: Duration,
    pub remaining: Option<Duration>,
}

impl Progress {
    pub fn new(expected: Option<usize>) -> Self {
        Self {
            expected,
            processed: 0,
            start: None,
        }
    }

    /// Start the clock. Called when the first selected group begins,
    /// so that the time spent skipping leading groups is not accounted for.
    pub fn start(&mut self) {
        if self.start.is_none() {
            self.start = Some(Instant::now());
        }
    }

    /// Record a processed group.
    pub fn tick(&mut self) -> Report {
        self.start();
        self.processed += 1;
        let elapsed = self.start.map(|s| s.elapsed()).unwrap_or_default();
        self.report_at(elapsed)
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    fn report_at(&self, elapsed: Duration) -> Report {
        let remaining = self.expected.map(|expected| {
            let left = expected.saturating_sub(self.processed) as u32;
            if self.processed == 0 {
                Duration::ZERO
            } else {
                elapsed / self.processed as u32 * left
            }
        });
        Report {
            processed: self.processed,
            expected: self.expected,
            elapsed,
            remaining,
        }
    }
}

impl Report {
    /// `true` when the last expected group has been processed.
    pub fn is_last(&self) -> bool {
        self.expected.map_or(false, |e| self.processed >= e)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected {
            Some(expected) if expected > 0 => write!(
                f,
                "Processed {} / {} ({:.2}%)",
                self.processed,
                expected,
                self.processed as f64 / expected as f64 * 100.0
            )?,
            _ => write!(f, "Processed {}", self.processed)?,
        }
        write!(f, ", elapsed: {}", hms(self.elapsed))?;
        if let Some(remaining) = self.remaining {
            write!(f, ", remaining: {}", hms(remaining))?;
        }
        Ok(())
    }
}

fn hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
