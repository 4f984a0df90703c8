/// Receives completion percentages while a search runs.
pub trait ProgressObserver {
    fn on_progress(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressObserver for F {
    fn on_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Estimates completion as explored leaves over `(n - 1)!` rooted circuits.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    total: u128,
    done: u128,
    last: Option<u8>,
}

impl ProgressTracker {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self {
            total: factorial(vertex_count.saturating_sub(1)),
            done: 0,
            last: None,
        }
    }

    pub(crate) fn credit(&mut self, leaves: u128) {
        self.done = self.done.saturating_add(leaves);
    }

    pub(crate) fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let ratio = self.done as f64 / self.total as f64;
        (ratio * 100.0).floor().clamp(0.0, 100.0) as u8
    }

    /// Returns the current percentage only when it moved past the last one reported.
    pub(crate) fn poll(&mut self) -> Option<u8> {
        let percent = self.percent();
        if self.last.is_some_and(|last| percent <= last) {
            return None;
        }
        self.last = Some(percent);
        Some(percent)
    }
}

/// Leaves below a branch with `remaining` vertices still to place.
pub(crate) fn factorial(remaining: usize) -> u128 {
    (1..=remaining as u128).fold(1, |acc, k| acc.saturating_mul(k))
}

#[cfg(test)]
mod tests {
    use super::{ProgressObserver, ProgressTracker, factorial};

    #[test]
    fn factorial_matches_small_values_and_saturates() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(60), u128::MAX);
    }

    #[test]
    fn poll_reports_each_percentage_once() {
        let mut tracker = ProgressTracker::new(5);
        assert_eq!(tracker.poll(), Some(0));
        assert_eq!(tracker.poll(), None);

        tracker.credit(6);
        assert_eq!(tracker.poll(), Some(25));
        tracker.credit(18);
        assert_eq!(tracker.poll(), Some(100));
        assert_eq!(tracker.poll(), None);
    }

    #[test]
    fn percent_is_capped_at_one_hundred() {
        let mut tracker = ProgressTracker::new(3);
        tracker.credit(10);
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn closures_act_as_observers() {
        let mut seen = Vec::new();
        let mut observer = |p: u8| seen.push(p);
        observer.on_progress(3);
        observer.on_progress(7);
        assert_eq!(seen, vec![3, 7]);
    }
}
