use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::Task;

/// Fixed-capacity FIFO of the most recent sub-messages of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRing {
    messages: VecDeque<String>,
    capacity: usize,
}

impl MessageRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `message`, evicting the oldest entry when full.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Bookkeeping the interactive formatter keeps per task to redraw it.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub(crate) started_at: Instant,
    pub(crate) last_sample: Option<Instant>,
    pub(crate) last_printed: usize,
    pub(crate) header: String,
    pub(crate) result: String,
    pub(crate) messages: MessageRing,
    pub(crate) bar_width: usize,
    pub(crate) rate: f64,
    pub(crate) digits: usize,
    pub(crate) unit: String,
}

impl RenderState {
    pub(crate) fn new(task: &Task, max_messages: usize, bar_width: usize) -> Self {
        Self::new_at(task, max_messages, bar_width, Instant::now())
    }

    pub(crate) fn new_at(
        task: &Task, max_messages: usize, bar_width: usize, started_at: Instant,
    ) -> Self {
        Self {
            started_at,
            last_sample: None,
            last_printed: 0,
            header: String::new(),
            result: String::new(),
            messages: MessageRing::new(max_messages),
            bar_width,
            rate: 0.0,
            digits: task.total().map_or(0, digit_width),
            unit: match task.unit() {
                Some(unit) => format!(" {unit}/s"),
                None => "/s".to_string(),
            },
        }
    }

    /// Returns the rate for `progress` at `now`, recomputing it only when a
    /// sample is due.
    ///
    /// The first sample is taken at the first nonzero progress; after that
    /// at most one sample per `threshold`.
    pub(crate) fn sample_rate(&mut self, progress: u64, now: Instant, threshold: Duration) -> f64 {
        let due = match self.last_sample {
            None => progress > 0,
            Some(last) => now.saturating_duration_since(last) >= threshold,
        };
        if due {
            let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
            self.rate = if elapsed > 0.0 {
                (progress as f64 / elapsed * 100.0).round() / 100.0
            } else {
                0.0
            };
            self.last_sample = Some(now);
        }
        self.rate
    }

    /// Styled header text, set on `begin`.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Styled result text; empty until the task finished.
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn messages(&self) -> &MessageRing {
        &self.messages
    }

    /// Lines written for this task by its last render.
    pub fn last_printed(&self) -> usize {
        self.last_printed
    }

    /// Last sampled rate in steps (or units) per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Width the progress counter is zero-padded to.
    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn bar_width(&self) -> usize {
        self.bar_width
    }

    /// Rate suffix, `" <unit>/s"` or `"/s"`.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

fn digit_width(total: u64) -> usize {
    total.checked_ilog10().map_or(1, |log| log as usize + 1)
}
