//! A time-bounded FIFO window over event-time samples, used by feature-engineering consumers
//! that live outside this crate. Provided as structure only, tested in isolation and not wired
//! into any stage.
use std::collections::VecDeque;

/// Holds `(unix_ts_ns, value)` samples whose age (relative to the most recently pushed
/// timestamp) is at most `duration_ns`. Older samples are evicted on every push.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeWindow<T> {
    duration_ns: i64,
    samples: VecDeque<(i64, T)>,
}

impl<T> TimeWindow<T> {
    pub fn new(duration_ns: i64) -> Self {
        Self {
            duration_ns,
            samples: VecDeque::new(),
        }
    }

    /// Pushes a sample and evicts everything older than `duration_ns` relative to `unix_ts_ns`.
    /// Panics if `unix_ts_ns` is older than the most recently pushed timestamp: the window
    /// assumes monotonically non-decreasing event time, as all stages in this crate do.
    pub fn push(&mut self, unix_ts_ns: i64, value: T) {
        if let Some((last_ts, _)) = self.samples.back() {
            assert!(
                unix_ts_ns >= *last_ts,
                "TimeWindow received an out-of-order timestamp"
            );
        }
        self.samples.push_back((unix_ts_ns, value));
        let cutoff = unix_ts_ns - self.duration_ns;
        while matches!(self.samples.front(), Some((ts, _)) if *ts < cutoff) {
            self.samples.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(i64, T)> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Emits a snapshot of the current [`TimeWindow`] contents every `step_ns` of event time,
/// rather than on every sample.
#[derive(Clone, Debug)]
pub struct SlidingWindow<T> {
    window: TimeWindow<T>,
    step_ns: i64,
    next_emit_ts: Option<i64>,
}

impl<T: Clone> SlidingWindow<T> {
    pub fn new(duration_ns: i64, step_ns: i64) -> Self {
        Self {
            window: TimeWindow::new(duration_ns),
            step_ns,
            next_emit_ts: None,
        }
    }

    /// Pushes a sample, returning a snapshot of the window's contents if `step_ns` of event
    /// time has elapsed since the last emission.
    pub fn push(&mut self, unix_ts_ns: i64, value: T) -> Option<Vec<(i64, T)>> {
        self.window.push(unix_ts_ns, value);
        let due = match self.next_emit_ts {
            None => true,
            Some(next) => unix_ts_ns >= next,
        };
        if due {
            self.next_emit_ts = Some(unix_ts_ns + self.step_ns);
            Some(self.window.iter().cloned().collect())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_samples_older_than_duration() {
        let mut window = TimeWindow::new(10);
        window.push(0, "a");
        window.push(5, "b");
        window.push(11, "c");
        let contents: Vec<_> = window.iter().map(|(_, v)| *v).collect();
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[test]
    fn sliding_window_emits_on_step_boundaries() {
        let mut sliding = SlidingWindow::new(100, 10);
        assert!(sliding.push(0, 1).is_some());
        assert!(sliding.push(5, 2).is_none());
        assert!(sliding.push(10, 3).is_some());
    }
}
