//! Drawing geometry for the graph.
//!
//! Turns normalized points into surface coordinates. Nothing here talks to a
//! display: [`Canvas`] produces pixel-space polylines for any raster backend
//! and [`TerminalFrame`] rasterizes the same geometry into text.

pub mod canvas;
pub mod terminal;

pub use canvas::Canvas;
pub use terminal::TerminalFrame;
