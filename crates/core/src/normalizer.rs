use crate::error::{positive_duration, Result};
use crate::sample::{Point, Sample};
use crate::tracker::{Ceiling, MaxTracker};
use crate::window::{self, Window};
use tracing::trace;

/// How long the graph takes to rescale to a new ceiling, in seconds.
pub const DEFAULT_READJUSTMENT: f64 = 1.0;

/// Rolling window of measurements, normalized for line-graph rendering.
///
/// Samples go in through [`add_point`](Self::add_point); the renderer reads
/// them back through [`normal_values`](Self::normal_values), where `x` is the
/// recency within the last `time_span` seconds and `y` is the value divided by
/// a ceiling that eases smoothly whenever the maximum changes.
///
/// All timestamps come from the caller, so the normalizer never reads a clock.
/// It is not internally synchronized: writers and readers on different tasks
/// must serialize access themselves.
#[derive(Debug, Clone)]
pub struct WindowedNormalizer {
    time_span: f64,
    readjustment: f64,
    window: Window,
    tracker: MaxTracker,
}

impl WindowedNormalizer {
    /// Normalizer showing the last `time_span` seconds, rescaling over
    /// [`DEFAULT_READJUSTMENT`] seconds.
    pub fn new(time_span: f64) -> Result<Self> {
        Self::with_readjustment(time_span, DEFAULT_READJUSTMENT)
    }

    pub fn with_readjustment(time_span: f64, readjustment: f64) -> Result<Self> {
        let time_span = positive_duration("time span", time_span)?;
        let readjustment = positive_duration("readjustment duration", readjustment)?;
        Ok(Self {
            time_span,
            readjustment,
            window: Window::new(),
            tracker: MaxTracker::new(time_span, readjustment),
        })
    }

    /// Record `value` measured at `timestamp`, dropping samples that have
    /// scrolled well past the left edge.
    pub fn add_point(&mut self, timestamp: f64, value: u32) {
        self.window.push(Sample::new(timestamp, value));
        let evicted = self.window.evict(timestamp, self.time_span);
        if evicted > 0 {
            trace!(evicted, retained = self.window.len(), "evicted old samples");
        }
        self.advance(timestamp, value);
    }

    /// Bring the ceiling up to date at `now`. A `value` of 0 only lets time pass.
    ///
    /// Called by both [`add_point`](Self::add_point) and
    /// [`normal_values`](Self::normal_values). Does nothing until the first
    /// sample arrives.
    pub(crate) fn advance(&mut self, now: f64, value: u32) {
        if self.window.is_empty() {
            return;
        }
        self.tracker.advance(now, value, &self.window);
    }

    /// Project every retained sample, oldest first, as seen at `now`.
    ///
    /// Returns an empty vector before the first sample.
    pub fn normal_values(&mut self, now: f64) -> Vec<Point> {
        let Some(factor) = self.normalizing_factor(now) else {
            return Vec::new();
        };
        self.window
            .iter()
            .map(|s| Point {
                x: self.x_of(now, s.timestamp),
                y: f64::from(s.value) / factor,
            })
            .collect()
    }

    /// Divisor applied to raw values at `now`; advances the ceiling first.
    pub fn normalizing_factor(&mut self, now: f64) -> Option<f64> {
        self.advance(now, 0);
        self.tracker.factor(now)
    }

    /// Recency of `location` in the window ending at `now`: 0 at the left edge, 1 at `now`.
    #[must_use]
    pub fn x_of(&self, now: f64, location: f64) -> f64 {
        window::x_of(now, location, self.time_span)
    }

    pub fn ceiling(&self) -> Ceiling {
        self.tracker.ceiling()
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> + '_ {
        self.window.iter()
    }

    pub fn time_span(&self) -> f64 {
        self.time_span
    }

    pub fn readjustment_duration(&self) -> f64 {
        self.readjustment
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
