use graph_config::CanvasConfig;
use graph_core::Point;

/// Fraction of the height, from the top, where `y = 0` is drawn.
pub const BASELINE_FRACTION: f64 = 0.75;

/// A drawing surface in device pixels.
///
/// `y = 0` sits on a baseline three quarters of the way down and `y = 1`
/// reaches half the height above it, leaving headroom for rescale overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    /// Surface of `width` × `height` logical pixels at `scale` device pixels each.
    pub fn new(width: u32, height: u32, scale: f64) -> Self {
        Self {
            width: f64::from(width) * scale,
            height: f64::from(height) * scale,
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(config.width, config.height, config.scale)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Device row of `y = 0`, kept whole so the axis line stays crisp.
    pub fn baseline(&self) -> f64 {
        (BASELINE_FRACTION * self.height).ceil()
    }

    /// Device coordinates of a normalized point. Not clipped.
    pub fn project(&self, point: Point) -> (f64, f64) {
        (
            point.x * self.width,
            self.baseline() - point.y * self.height / 2.0,
        )
    }

    /// Projected points in drawing order.
    pub fn polyline(&self, points: &[Point]) -> Vec<(f64, f64)> {
        points.iter().map(|&p| self.project(p)).collect()
    }

    /// Endpoints of the horizontal zero axis.
    pub fn axis(&self) -> [(f64, f64); 2] {
        let y = self.baseline();
        [(0.0, y), (self.width, y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_size_applies_scale() {
        let c = Canvas::new(150, 50, 2.0);
        assert_eq!((c.width(), c.height()), (300.0, 100.0));
    }

    #[test]
    fn baseline_rounds_up() {
        assert_eq!(Canvas::new(10, 10, 1.0).baseline(), 8.0);
        assert_eq!(Canvas::new(10, 100, 1.0).baseline(), 75.0);
    }

    #[test]
    fn project_maps_unit_square() {
        let c = Canvas::new(200, 100, 1.0);
        assert_eq!(c.project(Point { x: 0.0, y: 0.0 }), (0.0, 75.0));
        assert_eq!(c.project(Point { x: 1.0, y: 1.0 }), (200.0, 25.0));
        // Overshoot is passed through.
        assert_eq!(c.project(Point { x: -0.1, y: 1.5 }), (-20.0, 0.0));
    }

    #[test]
    fn axis_spans_width_on_baseline() {
        let c = Canvas::from_config(&CanvasConfig {
            width: 100,
            height: 40,
            scale: 2.0,
            rows: 4,
        });
        assert_eq!(c.axis(), [(0.0, 60.0), (200.0, 60.0)]);
    }

    #[test]
    fn polyline_preserves_order() {
        let c = Canvas::new(10, 8, 1.0);
        let pts = [Point { x: 0.5, y: 0.0 }, Point { x: 0.0, y: 0.0 }];
        assert_eq!(c.polyline(&pts), vec![(5.0, 6.0), (0.0, 6.0)]);
    }
}
