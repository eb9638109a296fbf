/// Pixel rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    /// Centre of the rectangle, for circle-based renderers.
    pub fn center(&self) -> (f32, f32) {
        (
            self.left as f32 + self.width as f32 / 2.0,
            self.top as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Maps grid coordinates to pixels on a drawing surface.
///
/// Each cell spans `scale` pixels, offset by a fixed `inset` from the surface edge.
/// Cell edges are rounded independently so the total width stays
/// `round(width * scale)` regardless of accumulated fractional error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub width: usize,
    pub height: usize,
    pub scale: f32,
    pub inset: i32,
}

impl SurfaceLayout {
    pub fn new(width: usize, height: usize, scale: f32, inset: i32) -> Self {
        Self {
            width,
            height,
            scale,
            inset,
        }
    }

    /// Total canvas size in pixels, including the inset border on both sides.
    pub fn canvas_size(&self) -> (u32, u32) {
        let w = 1 + 2 * self.inset + (self.width as f32 * self.scale).round() as i32;
        let h = 1 + 2 * self.inset + (self.height as f32 * self.scale).round() as i32;
        (w.max(1) as u32, h.max(1) as u32)
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> CellRect {
        let top = self.edge(row);
        let left = self.edge(col);
        CellRect {
            left,
            top,
            width: self.edge(col + 1) - left,
            height: self.edge(row + 1) - top,
        }
    }

    fn edge(&self, index: usize) -> i32 {
        self.inset + (index as f32 * self.scale).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_includes_inset_border() {
        let layout = SurfaceLayout::new(150, 150, 6.0, 1);
        assert_eq!(layout.canvas_size(), (903, 903));
    }

    #[test]
    fn cells_tile_without_gaps() {
        let layout = SurfaceLayout::new(7, 3, 2.5, 1);
        for col in 0..6 {
            let a = layout.cell_rect(0, col);
            let b = layout.cell_rect(0, col + 1);
            assert_eq!(a.left + a.width, b.left);
        }
        let last = layout.cell_rect(2, 6);
        let (w, h) = layout.canvas_size();
        assert!(last.left + last.width < w as i32);
        assert!(last.top + last.height < h as i32);
    }

    #[test]
    fn first_cell_sits_at_inset() {
        let layout = SurfaceLayout::new(10, 10, 6.0, 1);
        assert_eq!(
            layout.cell_rect(0, 0),
            CellRect {
                left: 1,
                top: 1,
                width: 6,
                height: 6
            }
        );
        assert_eq!(layout.cell_rect(0, 0).center(), (4.0, 4.0));
    }
}
