//! Fixed-column grid math.
//!
//! All width changes on the canvas are quantized to whole grid columns
//! before they are applied, which eliminates sub-column jitter and
//! keeps patch replay bit-identical: every function here is pure and
//! deterministic for identical inputs.

/// Number of grid columns on a canvas.
pub const COLUMN_COUNT: u32 = 43;

/// Vertical snapping step in pixels. There is no row grid as such,
/// but committed vertical positions snap to this step so a drag that
/// ends in the cell it started in nets to no change.
pub const ROW_HEIGHT_PX: f32 = 10.0;

/// Pixel/grid-unit conversions for a canvas of a known width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridModel {
    canvas_width_px: f32,
}

impl GridModel {
    /// Create a grid model for a canvas of the given pixel width.
    #[must_use]
    pub fn new(canvas_width_px: f32) -> Self {
        Self { canvas_width_px }
    }

    /// The canvas width this model was built for.
    #[must_use]
    pub const fn canvas_width_px(&self) -> f32 {
        self.canvas_width_px
    }

    /// Width of a single grid column in pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // COLUMN_COUNT is tiny
    pub fn column_width_px(&self) -> f32 {
        self.canvas_width_px / COLUMN_COUNT as f32
    }

    /// Convert a pixel offset to a percentage of the canvas width.
    #[must_use]
    pub fn px_to_percent(&self, px: f32) -> f32 {
        px * 100.0 / self.canvas_width_px
    }

    /// Convert a percentage of the canvas width to pixels.
    #[must_use]
    pub fn percent_to_px(&self, percent: f32) -> f32 {
        percent * self.canvas_width_px / 100.0
    }

    /// Quantize a pixel delta to the nearest whole number of columns,
    /// returned in pixels.
    #[must_use]
    pub fn snap_width_px(&self, delta_px: f32) -> f32 {
        (delta_px / self.column_width_px()).round() * self.column_width_px()
    }

    /// Quantize a pixel delta to the nearest whole number of columns.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // rounded before cast
    pub fn snap_cols(&self, delta_px: f32) -> i32 {
        (delta_px / self.column_width_px()).round() as i32
    }

    /// The canvas-width percentage spanned by `cols` grid columns.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cols_to_percent(cols: u32) -> f32 {
        cols as f32 * 100.0 / COLUMN_COUNT as f32
    }

    /// Quantize a vertical pixel delta to the row step.
    #[must_use]
    pub fn snap_top_px(delta_px: f32) -> f32 {
        (delta_px / ROW_HEIGHT_PX).round() * ROW_HEIGHT_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width() {
        let grid = GridModel::new(1000.0);
        assert!((grid.column_width_px() - 1000.0 / 43.0).abs() < 1e-4);
    }

    #[test]
    fn test_px_percent_round_trip() {
        let grid = GridModel::new(1280.0);
        let px = 321.5;
        let back = grid.percent_to_px(grid.px_to_percent(px));
        assert!((back - px).abs() < 1e-3);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let grid = GridModel::new(1000.0);
        for delta in [-137.2, -23.0, 0.0, 11.6, 50.0, 999.9] {
            let once = grid.snap_width_px(delta);
            let twice = grid.snap_width_px(once);
            assert!(
                (once - twice).abs() < 1e-4,
                "snap not idempotent for {delta}"
            );
        }
    }

    #[test]
    fn test_snap_cols_reference_scenario() {
        // 1000px canvas, 43 columns => column width ~23.26px;
        // a 50px delta rounds to 2 columns.
        let grid = GridModel::new(1000.0);
        assert_eq!(grid.snap_cols(50.0), 2);
        assert_eq!(grid.snap_cols(-50.0), -2);
        assert_eq!(grid.snap_cols(11.0), 0);
    }

    #[test]
    fn test_snap_top_rounds_to_row_step() {
        assert!((GridModel::snap_top_px(4.9)).abs() < f32::EPSILON);
        assert!((GridModel::snap_top_px(5.0) - 10.0).abs() < f32::EPSILON);
        assert!((GridModel::snap_top_px(-14.0) + 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cols_to_percent_full_span() {
        assert!((GridModel::cols_to_percent(COLUMN_COUNT) - 100.0).abs() < 1e-4);
        assert!(GridModel::cols_to_percent(0).abs() < f32::EPSILON);
    }
}
