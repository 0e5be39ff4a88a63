//! Board geometry: canvas pixels <-> grid cells
//!
//! Used by the renderer and for tap hit-testing. Works in canvas backing
//! pixels; `map_client_point` converts from CSS client coordinates first.

use glam::DVec2;

use crate::consts::{CANVAS_MAX_PX, CANVAS_MIN_PX};

/// Square backing size for a canvas whose CSS box is `css_w` x `css_h`
pub fn fit_canvas_px(css_w: f64, css_h: f64, device_pixel_ratio: f64) -> u32 {
    let side = if css_h > 0.0 { css_w.min(css_h) } else { css_w };
    (side.clamp(CANVAS_MIN_PX, CANVAS_MAX_PX) * device_pixel_ratio).round() as u32
}

/// Grid laid over a canvas of a given backing size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub canvas: DVec2,
    pub rows: usize,
    pub cols: usize,
}

impl BoardLayout {
    pub fn new(canvas: DVec2, rows: usize, cols: usize) -> Self {
        Self { canvas, rows, cols }
    }

    /// Whole-pixel tile size; leftover pixels stay blank on the right/bottom
    pub fn tile_size(&self) -> DVec2 {
        DVec2::new(
            (self.canvas.x / self.cols as f64).floor(),
            (self.canvas.y / self.rows as f64).floor(),
        )
    }

    /// Cell under a canvas-space point, `None` off the grid
    pub fn cell_at(&self, point: DVec2) -> Option<usize> {
        let tile = self.tile_size();
        if tile.x <= 0.0 || tile.y <= 0.0 || !point.is_finite() {
            return None;
        }
        let c = (point.x / tile.x).floor();
        let r = (point.y / tile.y).floor();
        if c < 0.0 || r < 0.0 || c >= self.cols as f64 || r >= self.rows as f64 {
            return None;
        }
        Some(r as usize * self.cols + c as usize)
    }

    /// Top-left corner of `cell` on the canvas
    pub fn cell_origin(&self, cell: usize) -> DVec2 {
        let tile = self.tile_size();
        let (r, c) = (cell / self.cols, cell % self.cols);
        DVec2::new(c as f64 * tile.x, r as f64 * tile.y)
    }

    /// Region of the source image covered by `tile`: (origin, size)
    pub fn source_rect(&self, tile: usize, image: DVec2) -> (DVec2, DVec2) {
        let (r, c) = (tile / self.cols, tile % self.cols);
        let cols = self.cols as f64;
        let rows = self.rows as f64;
        let origin = DVec2::new(
            (c as f64 * image.x / cols).floor(),
            (r as f64 * image.y / rows).floor(),
        );
        let size = DVec2::new((image.x / cols).ceil(), (image.y / rows).ceil());
        (origin, size)
    }

    /// Outline width of the selected cell
    pub fn selection_stroke_width(&self) -> f64 {
        (self.tile_size().x * 0.06).floor().max(2.0)
    }
}

/// CSS client coordinates -> canvas backing pixels, given the element's
/// bounding rect.
pub fn map_client_point(client: DVec2, rect_origin: DVec2, rect_size: DVec2, canvas: DVec2) -> DVec2 {
    let scale = DVec2::new(
        if rect_size.x > 0.0 { canvas.x / rect_size.x } else { 1.0 },
        if rect_size.y > 0.0 { canvas.y / rect_size.y } else { 1.0 },
    );
    (client - rect_origin) * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_canvas_clamps() {
        assert_eq!(fit_canvas_px(300.0, 800.0, 1.0), 400);
        assert_eq!(fit_canvas_px(700.0, 600.0, 2.0), 1200);
        assert_eq!(fit_canvas_px(2000.0, 0.0, 1.0), 1024);
    }

    #[test]
    fn test_cell_at_maps_grid() {
        let layout = BoardLayout::new(DVec2::new(400.0, 400.0), 4, 4);
        assert_eq!(layout.tile_size(), DVec2::new(100.0, 100.0));
        assert_eq!(layout.cell_at(DVec2::new(0.0, 0.0)), Some(0));
        assert_eq!(layout.cell_at(DVec2::new(150.0, 250.0)), Some(9));
        assert_eq!(layout.cell_at(DVec2::new(399.0, 399.0)), Some(15));
        assert_eq!(layout.cell_at(DVec2::new(-1.0, 10.0)), None);
        assert_eq!(layout.cell_at(DVec2::new(10.0, 400.0)), None);
    }

    #[test]
    fn test_cell_at_leftover_pixels_miss() {
        // 1000 / 24 = 41.67 -> 41 px tiles, 984 px used
        let layout = BoardLayout::new(DVec2::new(1000.0, 1000.0), 24, 24);
        assert_eq!(layout.cell_at(DVec2::new(999.0, 0.0)), None);
        assert_eq!(layout.cell_at(DVec2::new(0.0, 999.0)), None);
    }

    #[test]
    fn test_cell_origin_round_trips() {
        let layout = BoardLayout::new(DVec2::new(500.0, 480.0), 24, 25);
        for cell in [0, 1, 24, 25, 599] {
            let p = layout.cell_origin(cell) + DVec2::splat(1.0);
            assert_eq!(layout.cell_at(p), Some(cell));
        }
    }

    #[test]
    fn test_source_rect() {
        let layout = BoardLayout::new(DVec2::new(400.0, 400.0), 2, 3);
        let (origin, size) = layout.source_rect(4, DVec2::new(100.0, 50.0));
        assert_eq!(origin, DVec2::new(33.0, 25.0));
        assert_eq!(size, DVec2::new(34.0, 25.0));
    }

    #[test]
    fn test_map_client_point_scales() {
        let p = map_client_point(
            DVec2::new(110.0, 60.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(200.0, 200.0),
            DVec2::new(800.0, 800.0),
        );
        assert_eq!(p, DVec2::new(400.0, 200.0));
    }

    #[test]
    fn test_stroke_width_minimum() {
        let layout = BoardLayout::new(DVec2::new(400.0, 400.0), 24, 25);
        assert_eq!(layout.selection_stroke_width(), 2.0);
    }
}
