use chrono::{DateTime, Utc};

/// Session clock: seconds elapsed since the graph started.
///
/// Sampling and redraw share one `Clock` so every timestamp handed to the
/// normalizer lives on the same timebase.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: DateTime<Utc>,
}

impl Clock {
    pub fn start() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self { origin }
    }

    /// Seconds since the origin, right now.
    pub fn now(&self) -> f64 {
        self.seconds_at(Utc::now())
    }

    /// Seconds between the origin and `instant` (negative if before it).
    pub fn seconds_at(&self, instant: DateTime<Utc>) -> f64 {
        let elapsed = instant - self.origin;
        match elapsed.num_microseconds() {
            Some(us) => us as f64 / 1_000_000.0,
            None => elapsed.num_milliseconds() as f64 / 1_000.0,
        }
    }
}
