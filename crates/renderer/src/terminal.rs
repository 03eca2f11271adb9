use crate::canvas::Canvas;
use graph_core::Point;
use std::fmt;

const LINE: char = '•';
const AXIS: char = '─';
const EMPTY: char = ' ';

/// A text rendition of the graph: one character per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalFrame {
    cells: Vec<Vec<char>>,
}

impl TerminalFrame {
    /// Rasterize `points` into `columns` × `rows` cells.
    ///
    /// Uses the same geometry as [`Canvas`]; segments between consecutive
    /// points are filled column by column and anything off-grid is clipped.
    pub fn render(points: &[Point], columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let mut cells = vec![vec![EMPTY; columns]; rows];

        let canvas = Canvas::new((columns - 1) as u32, rows as u32, 1.0);
        let [(_, axis_row), _] = canvas.axis();
        if let Some(row) = cells.get_mut(axis_row as usize) {
            row.fill(AXIS);
        }

        let mut plot = |x: f64, y: f64| {
            let (col, row) = (x.round(), y.round());
            if col < 0.0 || row < 0.0 {
                return;
            }
            if let Some(cell) = cells
                .get_mut(row as usize)
                .and_then(|r| r.get_mut(col as usize))
            {
                *cell = LINE;
            }
        };

        let projected = canvas.polyline(points);
        if let [(x, y)] = projected[..] {
            plot(x, y);
        }
        for pair in projected.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            let span = (x1 - x0).abs().ceil().max(1.0);
            let steps = span.min(columns as f64 * 2.0) as usize;
            for step in 0..=steps {
                let t = step as f64 / steps as f64;
                plot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
            }
        }

        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.iter().map(|row| row.iter().collect())
    }
}

impl fmt::Display for TerminalFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}
