//! Event loop for `graph`.
//!
//! Wires together the background tasks around one [`WindowedNormalizer`]:
//! - Sampler task (measurements at `driver.measurements_per_second`)
//! - Redraw ticker (frames at `driver.frames_per_second`)
//! - Config file watcher (live reload on change)
//! - Ctrl-C (graceful shutdown)
//!
//! Everything runs on a single task, so the normalizer is never shared.

use graph_config::{load as load_config, ConfigWatcher, GraphConfig, OutputKind, SourceKind};
use graph_core::{Point, Result, WindowedNormalizer};
use graph_renderer::{Canvas, TerminalFrame};
use graph_system::{spawn_sampler, Clock, Source};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Cursor home + clear to end of screen.
const REDRAW_PREFIX: &str = "\x1b[H\x1b[J";

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the graph. Returns once Ctrl-C is received.
pub fn run(config_path: PathBuf) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move { Driver::new(config_path)?.run().await })
}

// ── Reload planning ───────────────────────────────────────────────────────────

/// What has to be rebuilt after the config file changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadPlan {
    /// Window or rescale settings changed; history starts over.
    pub rebuild_normalizer: bool,
    /// Source or sampling rate changed.
    pub respawn_sampler: bool,
    /// Frame rate changed.
    pub retime_frames: bool,
}

impl ReloadPlan {
    pub fn between(old: &GraphConfig, new: &GraphConfig) -> Self {
        Self {
            rebuild_normalizer: old.graph != new.graph,
            respawn_sampler: old.driver.source != new.driver.source
                || old.driver.measurements_per_second != new.driver.measurements_per_second,
            retime_frames: old.driver.frames_per_second != new.driver.frames_per_second,
        }
    }
}

/// One JSON output record.
#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    now: f64,
    points: &'a [Point],
    /// The same points in device pixels of the configured canvas.
    pixels: Vec<(f64, f64)>,
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Driver {
    path:       PathBuf,
    config:     GraphConfig,
    clock:      Clock,
    normalizer: WindowedNormalizer,
    samples:    mpsc::Receiver<u32>,
}

impl Driver {
    fn new(path: PathBuf) -> Result<Self> {
        let config = load_config(&path).unwrap_or_else(|e| {
            warn!("{e}; using defaults");
            GraphConfig::default()
        });
        let clock = Clock::start();
        let normalizer = build_normalizer(&config)?;
        let samples = start_sampler(&config)?;

        Ok(Self {
            path,
            config,
            clock,
            normalizer,
            samples,
        })
    }

    async fn run(mut self) -> Result<()> {
        let (watcher, mut reloads) = ConfigWatcher::spawn(&self.path);
        info!(
            config = %watcher.path().display(),
            time_span = self.normalizer.time_span(),
            readjustment = self.normalizer.readjustment_duration(),
            "Graph running"
        );
        let mut frames = frame_ticker(&self.config);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                Some(value) = self.samples.recv() => record(&mut self.normalizer, &self.clock, value),
                _ = frames.tick() => self.draw()?,
                Some(()) = reloads.recv() => {
                    if self.reload()?.retime_frames {
                        frames = frame_ticker(&self.config);
                    }
                }
                result = &mut shutdown => {
                    if let Err(e) = result {
                        warn!("Cannot listen for Ctrl-C: {e}");
                    }
                    info!("Shutting down");
                    break;
                }
            }
        }
        Ok(())
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn reload(&mut self) -> Result<ReloadPlan> {
        let config = match load_config(&self.path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return Ok(ReloadPlan::default());
            }
        };

        let plan = ReloadPlan::between(&self.config, &config);
        info!(?plan, "Config reloaded");

        if plan.rebuild_normalizer {
            self.normalizer = build_normalizer(&config)?;
            info!(
                time_span = config.graph.time_span,
                readjustment = config.graph.readjustment_duration,
                "Graph history reset"
            );
        }
        if plan.respawn_sampler {
            // Dropping the old receiver stops the old sampler task.
            self.samples = start_sampler(&config)?;
        }
        self.config = config;
        Ok(plan)
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn draw(&mut self) -> Result<()> {
        let now = self.clock.now();
        let points = self.normalizer.normal_values(now);
        let mut out = std::io::stdout().lock();

        match self.config.driver.output {
            OutputKind::Terminal => {
                let canvas = &self.config.canvas;
                let frame =
                    TerminalFrame::render(&points, canvas.width as usize, usize::from(canvas.rows));
                writeln!(out, "{REDRAW_PREFIX}{frame}")?;
            }
            OutputKind::Json => {
                let record = FrameRecord {
                    now,
                    points: &points,
                    pixels: Canvas::from_config(&self.config.canvas).polyline(&points),
                };
                serde_json::to_writer(&mut out, &record).map_err(std::io::Error::from)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Stamp `value` on arrival, so it is never older than a frame already drawn.
fn record(normalizer: &mut WindowedNormalizer, clock: &Clock, value: u32) {
    normalizer.add_point(clock.now(), value);
}

fn build_normalizer(config: &GraphConfig) -> Result<WindowedNormalizer> {
    WindowedNormalizer::with_readjustment(
        config.graph.time_span,
        config.graph.readjustment_duration,
    )
}

fn source_for(kind: SourceKind) -> Source {
    match kind {
        SourceKind::Random => Source::random(),
        SourceKind::Cpu    => Source::cpu(),
        SourceKind::Memory => Source::memory(),
    }
}

fn start_sampler(config: &GraphConfig) -> Result<mpsc::Receiver<u32>> {
    let source = source_for(config.driver.source);
    debug!(
        source = source.name(),
        rate = config.driver.measurements_per_second,
        "Starting sampler"
    );
    spawn_sampler(source, config.driver.measurements_per_second)
}

fn frame_interval(frames_per_second: f64) -> Duration {
    Duration::from_secs_f64(1.0 / frames_per_second)
}

fn frame_ticker(config: &GraphConfig) -> Interval {
    let mut ticker = time::interval(frame_interval(config.driver.frames_per_second));
    // A slow terminal should drop frames, not replay them.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
