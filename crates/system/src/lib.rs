pub mod clock;
pub mod source;

pub use clock::Clock;
pub use source::Source;

use graph_core::{error::positive_duration, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Spawn a background Tokio task that takes a measurement from `source`
/// `rate_hz` times per second and forwards the raw value through the
/// returned channel.
///
/// Values are not timestamped here: the consumer stamps each one when it
/// records it, so its own reads and writes stay in time order.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_sampler(mut source: Source, rate_hz: f64) -> Result<mpsc::Receiver<u32>> {
    let rate_hz = positive_duration("sampling rate", rate_hz)?;
    let (tx, rx) = mpsc::channel(16);
    let interval = Duration::from_secs_f64(1.0 / rate_hz);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if tx.send(source.sample()).await.is_err() {
                debug!(source = source.name(), "sampler stopped");
                break; // all receivers dropped
            }
        }
    });

    Ok(rx)
}
