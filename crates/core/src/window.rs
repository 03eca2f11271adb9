use crate::sample::Sample;
use std::collections::VecDeque;

/// Samples are only dropped once they sit this far (as a fraction of the time
/// span) past the left edge, so the line never pops at the boundary.
pub const EVICTION_MARGIN: f64 = 0.1;

/// Recency position of `location` within a window of `time_span` seconds ending at `now`.
///
/// 0 is the left edge, 1 is `now`. Not clamped.
#[must_use]
pub fn x_of(now: f64, location: f64, time_span: f64) -> f64 {
    let left = now - time_span;
    (location - left) / time_span
}

/// Rolling, time-ordered history of samples.
#[derive(Debug, Clone, Default)]
pub struct Window {
    samples: VecDeque<Sample>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `sample` at the newest end.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
    }

    /// Drop samples from the oldest end while they are more than
    /// [`EVICTION_MARGIN`] past the left edge of the window ending at `now`.
    ///
    /// Returns the number of samples removed. An empty window is left untouched.
    pub fn evict(&mut self, now: f64, time_span: f64) -> usize {
        let mut evicted = 0;
        while let Some(oldest) = self.samples.front() {
            if x_of(now, oldest.timestamp, time_span) >= -EVICTION_MARGIN {
                break;
            }
            self.samples.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Largest value currently retained, `None` when empty.
    pub fn peak(&self) -> Option<u32> {
        self.samples.iter().map(|s| s.value).max()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(points: &[(f64, u32)]) -> Window {
        let mut w = Window::new();
        for &(t, v) in points {
            w.push(Sample::new(t, v));
        }
        w
    }

    #[test]
    fn x_of_spans_left_edge_to_now() {
        assert_eq!(x_of(10.0, 5.0, 5.0), 0.0);
        assert_eq!(x_of(10.0, 10.0, 5.0), 1.0);
        assert!((x_of(10.0, 4.0, 5.0) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn evict_on_empty_window_is_noop() {
        let mut w = Window::new();
        assert_eq!(w.evict(100.0, 5.0), 0);
        assert!(w.is_empty());
    }

    #[test]
    fn evict_keeps_points_inside_margin() {
        // At now=5.4 the point at t=0 sits at x=-0.08, inside the 10% margin.
        let mut w = window(&[(0.0, 1), (5.4, 1)]);
        assert_eq!(w.evict(5.4, 5.0), 0);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn evict_drops_points_past_margin_in_order() {
        let mut w = window(&[(0.0, 1), (1.0, 2), (6.0, 3)]);
        assert_eq!(w.evict(6.0, 5.0), 1);
        let left: Vec<f64> = w.iter().map(|s| s.timestamp).collect();
        assert_eq!(left, vec![1.0, 6.0]);
    }

    #[test]
    fn evict_never_drops_the_point_just_inserted() {
        let mut w = window(&[(0.0, 1), (1.0, 1), (100.0, 7)]);
        w.evict(100.0, 5.0);
        assert_eq!(w.len(), 1);
        assert_eq!(w.peak(), Some(7));
    }

    #[test]
    fn peak_of_window() {
        assert_eq!(Window::new().peak(), None);
        assert_eq!(window(&[(0.0, 3), (1.0, 9), (2.0, 4)]).peak(), Some(9));
    }
}
