//! Ceiling tracking: decides which value the graph normalizes against, and
//! when it moves from one ceiling to the next.
//!
//! At most one rescale runs at a time. A larger maximum discovered while a
//! rescale is in flight is queued as `pending` (one slot, overwritten only by
//! a strictly larger value) and picked up when the current rescale completes.
//! Independently, if nothing has moved the ceiling for a whole time span the
//! window is rescanned, so a peak that scrolled away lets the graph shrink.

use crate::easing::{blend, ease};
use crate::window::Window;
use tracing::debug;

/// Duration of the very first rescale, toward the first sample's own value.
pub const INITIAL_SETTLE: f64 = 0.1;

/// Current state of the normalization ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ceiling {
    /// No sample has been seen yet.
    Uninitialized,
    /// The ceiling rests at `value`.
    Settled { value: u32 },
    /// Easing from `from` toward `to`, complete at `deadline`.
    Transitioning {
        from: u32,
        to: u32,
        deadline: f64,
        /// Next ceiling to move to once this rescale completes.
        pending: Option<u32>,
    },
}

impl Ceiling {
    /// Queued successor ceiling, if any.
    #[must_use]
    pub fn pending(&self) -> Option<u32> {
        match *self {
            Ceiling::Transitioning { pending, .. } => pending,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaxTracker {
    ceiling: Ceiling,
    /// Last time a rescale was started or a successor was queued.
    last_update: f64,
    time_span: f64,
    readjustment: f64,
}

impl MaxTracker {
    pub fn new(time_span: f64, readjustment: f64) -> Self {
        Self {
            ceiling: Ceiling::Uninitialized,
            last_update: 0.0,
            time_span,
            readjustment,
        }
    }

    pub fn ceiling(&self) -> Ceiling {
        self.ceiling
    }

    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    /// Bring the ceiling up to date at `now`, taking `value` into account.
    ///
    /// A `value` of 0 means "no new sample, just let time pass".
    pub fn advance(&mut self, now: f64, value: u32, window: &Window) {
        if self.ceiling == Ceiling::Uninitialized {
            self.initialize(now, value);
            return;
        }
        let rescanned = self.rescan_stale(now, window);
        self.step(now, value, rescanned);
    }

    /// Peak of `window` if the ceiling has been left alone for longer than a
    /// full time span and nothing is queued yet.
    ///
    /// The result is floored at 1 so it is always usable as a divisor.
    #[must_use]
    pub fn rescan_stale(&self, now: f64, window: &Window) -> Option<u32> {
        if self.last_update >= now - self.time_span || self.ceiling.pending().is_some() {
            return None;
        }
        window.peak().map(|peak| peak.max(1))
    }

    /// Apply one sample to the state machine. `rescanned` is a successor
    /// produced by [`Self::rescan_stale`] for this same instant.
    pub fn step(&mut self, now: f64, value: u32, rescanned: Option<u32>) {
        match self.ceiling {
            Ceiling::Uninitialized => self.initialize(now, value),
            Ceiling::Settled { value: settled } => self.settle(now, value, settled, rescanned),
            Ceiling::Transitioning {
                to,
                deadline,
                pending,
                ..
            } if deadline < now => self.settle(now, value, to, pending.or(rescanned)),
            Ceiling::Transitioning {
                from,
                to,
                deadline,
                pending,
            } => {
                let mut pending = pending.or(rescanned);
                if value > to && pending.map_or(true, |queued| queued < value) {
                    pending = Some(value);
                    self.last_update = now;
                }
                self.ceiling = Ceiling::Transitioning {
                    from,
                    to,
                    deadline,
                    pending,
                };
            }
        }
    }

    /// Normalization factor at `now`, `None` before the first sample.
    #[must_use]
    pub fn factor(&self, now: f64) -> Option<f64> {
        match self.ceiling {
            Ceiling::Uninitialized => None,
            Ceiling::Settled { value } => Some(f64::from(value)),
            Ceiling::Transitioning { to, deadline, .. } if deadline < now => Some(f64::from(to)),
            Ceiling::Transitioning {
                from, to, deadline, ..
            } => Some(blend(
                f64::from(from),
                f64::from(to),
                ease(now, deadline, self.readjustment),
            )),
        }
    }

    fn initialize(&mut self, now: f64, value: u32) {
        let value = value.max(1);
        self.ceiling = Ceiling::Transitioning {
            from: value,
            to: value,
            deadline: now + INITIAL_SETTLE,
            pending: None,
        };
        self.last_update = now;
    }

    /// The ceiling has reached `settled`; start the next rescale if one is due.
    fn settle(&mut self, now: f64, value: u32, settled: u32, pending: Option<u32>) {
        let next = match pending {
            Some(queued) => Some(value.max(queued)),
            None if value > settled => Some(value),
            None => None,
        };

        self.ceiling = match next {
            Some(to) => {
                debug!(from = settled, to, at = now, "ceiling rescale started");
                self.last_update = now;
                Ceiling::Transitioning {
                    from: settled,
                    to,
                    deadline: now + self.readjustment,
                    pending: None,
                }
            }
            None => Ceiling::Settled { value: settled },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;

    const EPS: f64 = 1e-9;

    fn tracker() -> MaxTracker {
        MaxTracker::new(5.0, 1.0)
    }

    fn window(points: &[(f64, u32)]) -> Window {
        let mut w = Window::new();
        for &(t, v) in points {
            w.push(Sample::new(t, v));
        }
        w
    }

    #[test]
    fn first_sample_starts_micro_transition_to_itself() {
        let mut t = tracker();
        t.advance(2.0, 7, &window(&[(2.0, 7)]));
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 7,
                to: 7,
                deadline: 2.0 + INITIAL_SETTLE,
                pending: None
            }
        );
        assert_eq!(t.last_update(), 2.0);
    }

    #[test]
    fn zero_first_sample_is_floored_to_one() {
        let mut t = tracker();
        t.advance(0.0, 0, &window(&[(0.0, 0)]));
        assert_eq!(t.factor(0.0), Some(1.0));
        t.advance(1.0, 0, &window(&[(0.0, 0)]));
        assert_eq!(t.ceiling(), Ceiling::Settled { value: 1 });
    }

    #[test]
    fn factor_is_none_before_any_sample() {
        assert_eq!(tracker().factor(10.0), None);
    }

    #[test]
    fn larger_value_after_settling_starts_rescale() {
        let mut t = tracker();
        t.step(0.0, 2, None);
        t.step(1.0, 2, None);
        assert_eq!(t.ceiling(), Ceiling::Settled { value: 2 });

        t.step(2.0, 6, None);
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 2,
                to: 6,
                deadline: 3.0,
                pending: None
            }
        );
        assert_eq!(t.last_update(), 2.0);

        // Starts at the old ceiling, lands on the new one.
        assert!((t.factor(2.0).unwrap() - 2.0).abs() < EPS);
        assert!((t.factor(3.0).unwrap() - 6.0).abs() < EPS);
        let mid = t.factor(2.5).unwrap();
        assert!(mid > 2.0 && mid < 6.0);
    }

    #[test]
    fn equal_value_does_not_start_rescale() {
        let mut t = tracker();
        t.step(0.0, 4, None);
        t.step(1.0, 4, None);
        t.step(2.0, 4, None);
        assert_eq!(t.ceiling(), Ceiling::Settled { value: 4 });
        assert_eq!(t.last_update(), 0.0);
    }

    #[test]
    fn larger_value_mid_transition_is_queued() {
        let mut t = tracker();
        t.step(0.0, 1, None);
        t.step(1.0, 3, None); // 1 -> 3, deadline 2
        t.step(1.5, 3, None); // tie: ignored
        assert_eq!(t.ceiling().pending(), None);

        t.step(1.6, 5, None);
        assert_eq!(t.ceiling().pending(), Some(5));
        assert_eq!(t.last_update(), 1.6);

        t.step(1.7, 4, None); // smaller than queued: ignored
        assert_eq!(t.ceiling().pending(), Some(5));
        t.step(1.8, 5, None); // tie with queued: ignored
        assert_eq!(t.last_update(), 1.6);
        t.step(1.9, 8, None);
        assert_eq!(t.ceiling().pending(), Some(8));
    }

    #[test]
    fn queued_value_is_promoted_after_deadline() {
        let mut t = tracker();
        t.step(0.0, 1, None);
        t.step(1.0, 3, None);
        t.step(1.5, 5, None);
        t.step(2.5, 4, None);
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 3,
                to: 5,
                deadline: 3.5,
                pending: None
            }
        );
    }

    #[test]
    fn promotion_prefers_incoming_value_over_smaller_queue() {
        let mut t = tracker();
        t.step(0.0, 1, None);
        t.step(1.0, 3, None);
        t.step(1.5, 5, None);
        t.step(2.5, 9, None);
        assert!(matches!(t.ceiling(), Ceiling::Transitioning { to: 9, .. }));
    }

    #[test]
    fn rescan_waits_for_a_full_time_span() {
        let mut t = tracker();
        let w = window(&[(0.0, 9), (4.0, 2)]);
        t.advance(0.0, 9, &w);
        assert_eq!(t.rescan_stale(5.0, &w), None);
        assert_eq!(t.rescan_stale(5.5, &w), Some(9));
    }

    #[test]
    fn rescan_skipped_while_something_is_queued() {
        let mut t = MaxTracker::new(0.5, 1.0);
        t.step(0.0, 1, None);
        t.step(1.0, 3, None); // deadline 2
        t.step(1.2, 6, None); // queued, last_update 1.2
        assert_eq!(t.rescan_stale(1.9, &window(&[(1.9, 2)])), None);
    }

    #[test]
    fn rescan_mid_transition_is_queued_then_promoted() {
        // Readjustment longer than the span: rescans land while still easing.
        let mut t = MaxTracker::new(0.5, 1.0);
        t.step(0.0, 1, None);
        t.step(1.0, 3, None); // 1 -> 3, deadline 2
        t.advance(1.6, 0, &window(&[(1.6, 2)]));
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 1,
                to: 3,
                deadline: 2.0,
                pending: Some(2)
            }
        );
        // Queuing a rescanned peak does not count as an update.
        assert_eq!(t.last_update(), 1.0);

        t.advance(2.5, 0, &window(&[(1.6, 2)]));
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 3,
                to: 2,
                deadline: 3.5,
                pending: None
            }
        );
        assert_eq!(t.last_update(), 2.5);
    }

    #[test]
    fn larger_value_replaces_rescanned_successor() {
        let mut t = MaxTracker::new(0.5, 1.0);
        t.step(0.0, 1, None);
        t.step(1.0, 3, None);
        t.advance(1.6, 5, &window(&[(1.6, 2)]));
        assert_eq!(t.ceiling().pending(), Some(5));
        assert_eq!(t.last_update(), 1.6);

        // Not above the current target: the queued value stays.
        let mut t = MaxTracker::new(0.5, 1.0);
        t.step(0.0, 1, None);
        t.step(1.0, 3, None);
        t.advance(1.6, 3, &window(&[(1.6, 2)]));
        assert_eq!(t.ceiling().pending(), Some(2));
        assert_eq!(t.last_update(), 1.0);
    }

    #[test]
    fn expired_transition_promotes_rescanned_peak() {
        // Nothing touches the tracker between the first sample and a stale gap.
        let mut t = MaxTracker::new(0.5, 1.0);
        t.advance(0.0, 1, &window(&[(0.0, 1)]));
        t.advance(2.0, 0, &window(&[(2.0, 4)]));
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 1,
                to: 4,
                deadline: 3.0,
                pending: None
            }
        );
        assert_eq!(t.last_update(), 2.0);
    }

    #[test]
    fn rescan_floors_an_all_zero_window() {
        let mut t = tracker();
        t.step(0.0, 3, None);
        assert_eq!(t.rescan_stale(10.0, &window(&[(10.0, 0)])), Some(1));
    }

    #[test]
    fn rescan_lets_settled_ceiling_shrink() {
        let mut t = tracker();
        t.step(0.0, 9, None);
        t.step(1.0, 2, None);
        assert_eq!(t.ceiling(), Ceiling::Settled { value: 9 });

        let w = window(&[(6.0, 2)]);
        t.advance(6.0, 2, &w);
        assert_eq!(
            t.ceiling(),
            Ceiling::Transitioning {
                from: 9,
                to: 2,
                deadline: 7.0,
                pending: None
            }
        );
        assert!((t.factor(7.5).unwrap() - 2.0).abs() < EPS);
    }
}
