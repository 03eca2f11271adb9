use serde::{Deserialize, Serialize};

/// One raw measurement as pushed by the sampling driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds on the caller's clock; expected (not enforced) to be non-decreasing.
    pub timestamp: f64,
    pub value: u32,
}

impl Sample {
    pub fn new(timestamp: f64, value: u32) -> Self {
        Self { timestamp, value }
    }
}

/// A sample projected into graph space.
///
/// Both coordinates are *generally* within `[0, 1]`:
/// - `x` drifts below 0 for samples just past the left edge and slightly above 1
///   for samples stamped after the read time;
/// - `y` overshoots 1 while the graph is still easing toward a new maximum.
///
/// Consumers must not assume clamped values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
