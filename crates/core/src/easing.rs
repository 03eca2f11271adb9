//! Easing curve used while the graph rescales toward a new ceiling.

use std::f64::consts::FRAC_PI_2;

/// Progress of a rescale that completes at `deadline` and lasts `duration` seconds.
///
/// Sinusoidal ease-out: 0 exactly one `duration` before `deadline`, 1 at
/// `deadline`, non-decreasing in between. Outside that interval the curve is
/// evaluated as-is and callers decide what to do with it.
#[must_use]
pub fn ease(now: f64, deadline: f64, duration: f64) -> f64 {
    let remaining = (deadline - now) / duration;
    ((1.0 - remaining) * FRAC_PI_2).sin()
}

/// Blend between `from` and `to` at the given easing progress.
#[must_use]
pub fn blend(from: f64, to: f64, progress: f64) -> f64 {
    from + progress * (to - from)
}
