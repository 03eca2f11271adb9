use graph_core::{error::positive_duration, GraphError, Result};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `graph.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// What the graph shows and how it rescales.
    pub graph: WindowConfig,
    /// Sampling and redraw cadence.
    pub driver: DriverConfig,
    /// Output surface size.
    pub canvas: CanvasConfig,
}

impl GraphConfig {
    /// Reject settings the normalizer or the driver cannot run with.
    pub fn validate(&self) -> Result<()> {
        let check = |name, value| {
            positive_duration(name, value)
                .map(drop)
                .map_err(|e| GraphError::Config(e.to_string()))
        };
        check("graph.time_span", self.graph.time_span)?;
        check("graph.readjustment_duration", self.graph.readjustment_duration)?;
        check("driver.measurements_per_second", self.driver.measurements_per_second)?;
        check("driver.frames_per_second", self.driver.frames_per_second)?;
        check("canvas.scale", self.canvas.scale)?;

        if self.canvas.width == 0 || self.canvas.height == 0 || self.canvas.rows == 0 {
            return Err(GraphError::Config(format!(
                "canvas must be non-empty (width={}, height={}, rows={})",
                self.canvas.width, self.canvas.height, self.canvas.rows
            )));
        }
        Ok(())
    }
}

/// Window and rescale settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Seconds a sample stays on screen before scrolling off the left edge.
    pub time_span: f64,
    /// Seconds the graph takes to squeeze or expand to a new maximum.
    pub readjustment_duration: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            time_span: 5.0,
            readjustment_duration: 1.0,
        }
    }
}

/// Sampling / redraw cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub measurements_per_second: f64,
    pub frames_per_second: f64,
    /// Where measurements come from.
    pub source: SourceKind,
    /// How frames are emitted on stdout.
    pub output: OutputKind,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            measurements_per_second: 3.0,
            frames_per_second: 30.0,
            source: SourceKind::Random,
            output: OutputKind::Terminal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Uniform random integers in `0..100`.
    #[default]
    Random,
    /// Global CPU usage, in whole percent.
    Cpu,
    /// Used RAM, in whole percent.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Redraw a text plot in place.
    #[default]
    Terminal,
    /// One JSON array of `{x, y}` points per frame.
    Json,
}

/// Output surface geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical width; also the number of terminal columns.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// Device pixels per logical pixel.
    pub scale: f64,
    /// Terminal rows used for the text plot.
    pub rows: u16,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width:  78,
            height: 26,
            scale:  2.0,
            rows:   12,
        }
    }
}
