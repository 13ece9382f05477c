//! Bresenham line rasterization into the packed pixel store.

use crate::raster::RasterImage;

impl RasterImage {
    /// Draws a straight line from `(x0, y0)` to `(x1, y1)`, both endpoints
    /// included, writing `value` through [`set_pixel`](Self::set_pixel).
    ///
    /// Classic integer Bresenham: the dominant axis advances one unit per
    /// step while the other accumulates a doubled error term. A degenerate
    /// line plots exactly one pixel. Coordinates outside the canvas are
    /// silently skipped, so segments may enter and leave the image freely.
    pub fn draw_line(&mut self, mut x0: i64, mut y0: i64, x1: i64, y1: i64, value: u64) {
        let mut dx = x1 - x0;
        let mut dy = y1 - y0;
        let step_x = if dx < 0 {
            dx = -dx;
            -1
        } else {
            1
        };
        let step_y = if dy < 0 {
            dy = -dy;
            -1
        } else {
            1
        };
        if dx > dy {
            dy <<= 1;
            dx <<= 1;
            let mut fraction = dy - (dx >> 1);
            self.plot(x0, y0, value);
            while x0 != x1 {
                if fraction >= 0 {
                    y0 += step_y;
                    fraction -= dx;
                }
                x0 += step_x;
                fraction += dy;
                self.plot(x0, y0, value);
            }
        } else {
            dy <<= 1;
            dx <<= 1;
            let mut fraction = dx - (dy >> 1);
            self.plot(x0, y0, value);
            while y0 != y1 {
                if fraction >= 0 {
                    x0 += step_x;
                    fraction -= dy;
                }
                y0 += step_y;
                fraction += dx;
                self.plot(x0, y0, value);
            }
        }
    }

    /// Plots one pixel, skipping coordinates outside `[0, width) x [0, height)`.
    /// This is the only bounds-checked raster write path.
    fn plot(&mut self, x: i64, y: i64, value: u64) {
        if x < 0 || x >= i64::from(self.width()) {
            return;
        }
        if y < 0 || y >= i64::from(self.height()) {
            return;
        }
        // The row check above makes set_pixel infallible here.
        let _ = self.set_pixel(x as u32, y as u32, value);
    }
}
