//! Drawing surface for simulated systems.
//!
//! The canvas uses a y-up coordinate system with the origin in the bottom-left
//! corner, while the frame it produces is stored in the usual top-down image
//! layout. All coordinates are in pixels and may be fractional; they are
//! snapped to pixel centers before being handed to `imageproc`.

use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// A rendered RGB frame.
pub type Frame = RgbImage;

/// 8-bit RGB color.
pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];
pub const BLACK: Color = [0, 0, 0];
pub const GREY: Color = [128, 128, 128];

// Vertex coordinates are clamped to this range before reaching `imageproc`.
const COORD_LIMIT: f64 = 32_768.0;

/// Drawing surface for a single frame.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Creates a canvas filled with white.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(WHITE)),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color of the pixel at `(x, y)` in canvas (y-up) coordinates.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let row = self.height() - 1 - y;
        Some(self.image.get_pixel(x, row).0)
    }

    pub fn fill(&mut self, color: Color) {
        self.image = RgbImage::from_pixel(self.width(), self.height(), Rgb(color));
    }

    /// Maps a canvas point to continuous image coordinates measured from pixel
    /// centers, flipping the y axis.
    fn to_image(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x - 0.5, f64::from(self.height()) - y - 0.5)
    }

    /// Fills the pixels whose centers lie in the axis-aligned rectangle spanned
    /// by two corners (right and top edges excluded).
    pub fn fill_rect(&mut self, (x0, y0): (f64, f64), (x1, y1): (f64, f64), color: Color) {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return;
        }
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        // Half-open range of pixel indices whose centers lie in [a, b).
        let covered = |a: f64, b: f64, limit: f64| {
            (
                (a.min(b) - 0.5).ceil().clamp(0.0, limit),
                (a.max(b) - 0.5).ceil().clamp(0.0, limit),
            )
        };
        let (left, right) = covered(x0, x1, w);
        let (bottom, top) = covered(y0, y1, h);
        if right <= left || top <= bottom {
            return;
        }
        let rect = Rect::at(left as i32, (h - top) as i32)
            .of_size((right - left) as u32, (top - bottom) as u32);
        draw_filled_rect_mut(&mut self.image, rect, Rgb(color));
    }

    /// Fills a convex polygon.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
        if points.len() < 3 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }
        let mapped: Vec<(f64, f64)> = points.iter().map(|&p| self.to_image(p)).collect();
        let n = mapped.len() as f64;
        let cx = mapped.iter().map(|p| p.0).sum::<f64>() / n;
        let cy = mapped.iter().map(|p| p.1).sum::<f64>() / n;

        let mut vertices: Vec<Point<i32>> = Vec::with_capacity(mapped.len());
        for &(x, y) in &mapped {
            let vertex = Point::new(snap(x, cx), snap(y, cy));
            if vertices.last() != Some(&vertex) {
                vertices.push(vertex);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let color = Rgb(color);
        match vertices.as_slice() {
            [] => {}
            [a] => draw_line_segment_mut(&mut self.image, as_f32(*a), as_f32(*a), color),
            [a, b] => draw_line_segment_mut(&mut self.image, as_f32(*a), as_f32(*b), color),
            _ => draw_polygon_mut(&mut self.image, &vertices, color),
        }
    }

    /// Fills a disc.
    pub fn fill_circle(&mut self, (cx, cy): (f64, f64), radius: f64, color: Color) {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) || radius <= 0.0 {
            return;
        }
        let (x, y) = self.to_image((cx, cy));
        let center = (
            x.round().clamp(-COORD_LIMIT, COORD_LIMIT) as i32,
            y.round().clamp(-COORD_LIMIT, COORD_LIMIT) as i32,
        );
        let radius = radius.round().min(COORD_LIMIT) as i32;
        draw_filled_circle_mut(&mut self.image, center, radius, Rgb(color));
    }

    /// Draws a segment of the given thickness.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), thickness: f64, color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = dx.hypot(dy);
        if length == 0.0 || !length.is_finite() {
            return;
        }
        let half = thickness.max(1.0) / 2.0;
        let (nx, ny) = (-dy / length * half, dx / length * half);
        self.fill_polygon(
            &[
                (from.0 + nx, from.1 + ny),
                (to.0 + nx, to.1 + ny),
                (to.0 - nx, to.1 - ny),
                (from.0 - nx, from.1 - ny),
            ],
            color,
        );
    }

    /// Finishes drawing and returns the frame in top-down row order.
    #[must_use]
    pub fn into_frame(self) -> Frame {
        self.image
    }
}

/// Rounds a vertex coordinate towards the shape's center so that only pixels
/// whose centers lie inside the shape are covered.
fn snap(value: f64, center: f64) -> i32 {
    let snapped = if value < center { value.ceil() } else { value.floor() };
    snapped.clamp(-COORD_LIMIT, COORD_LIMIT) as i32
}

fn as_f32(point: Point<i32>) -> (f32, f32) {
    (point.x as f32, point.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_white() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
        assert_eq!(canvas.pixel(3, 2), Some(WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn rect_covers_pixel_centers() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect((2.0, 2.0), (5.0, 4.0), BLACK);
        assert_eq!(canvas.pixel(2, 2), Some(BLACK));
        assert_eq!(canvas.pixel(4, 3), Some(BLACK));
        assert_eq!(canvas.pixel(5, 3), Some(WHITE));
        assert_eq!(canvas.pixel(3, 4), Some(WHITE));
    }

    #[test]
    fn frame_rows_are_top_down() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect((0.0, 0.0), (4.0, 1.0), BLACK);
        let frame = canvas.into_frame();
        // Bottom canvas row ends up as the last image row.
        assert_eq!(frame.get_pixel(0, 3).0, BLACK);
        assert_eq!(frame.get_pixel(0, 0).0, WHITE);
    }

    #[test]
    fn circle_and_line_stay_in_bounds() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_circle((7.5, 7.5), 20.0, GREY);
        canvas.draw_line((-5.0, -5.0), (50.0, 50.0), 3.0, BLACK);
        assert_eq!(canvas.pixel(4, 4), Some(BLACK));
        assert_eq!(canvas.pixel(0, 7), Some(GREY));
    }

    #[test]
    fn non_finite_shapes_are_skipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_circle((f64::NAN, 1.0), 2.0, BLACK);
        canvas.draw_line((0.0, 0.0), (f64::INFINITY, 1.0), 2.0, BLACK);
        assert!(canvas.into_frame().pixels().all(|p| p.0 == WHITE));
    }
}
