//! Minimal raster primitives over an RGBA canvas.
//!
//! Placeholder art needs exactly five shapes: filled/outlined rectangles,
//! filled discs, thick horizontal lines, and rounded rectangles. All
//! primitives clip silently at the canvas edges; coordinates are signed so
//! callers can do cell-relative math without underflow checks.

use image::{Rgba, RgbaImage};

fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

pub fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, color: Rgba<u8>) {
    for dy in 0..h as i64 {
        for dx in 0..w as i64 {
            put(canvas, x + dx, y + dy, color);
        }
    }
}

/// 1px border drawn just inside the rectangle bounds.
pub fn outline_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, color: Rgba<u8>) {
    let (w, h) = (w as i64, h as i64);
    for dx in 0..w {
        put(canvas, x + dx, y, color);
        put(canvas, x + dx, y + h - 1, color);
    }
    for dy in 0..h {
        put(canvas, x, y + dy, color);
        put(canvas, x + w - 1, y + dy, color);
    }
}

pub fn fill_circle(canvas: &mut RgbaImage, cx: i64, cy: i64, radius: i64, color: Rgba<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(canvas, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Horizontal segment from `x0` to `x1` inclusive, `thickness` rows tall.
pub fn hline(canvas: &mut RgbaImage, x0: i64, x1: i64, y: i64, thickness: u32, color: Rgba<u8>) {
    for dy in 0..thickness as i64 {
        for x in x0..=x1 {
            put(canvas, x, y + dy, color);
        }
    }
}

/// Whether local pixel (x, y) lies inside a w x h rectangle whose corners
/// are rounded off with arcs of the given radius.
fn rounded_contains(x: i64, y: i64, w: i64, h: i64, radius: i64) -> bool {
    if x < 0 || y < 0 || x >= w || y >= h {
        return false;
    }
    let r = radius.min(w / 2).min(h / 2).max(0);
    let dx = if x < r {
        r - x
    } else if x >= w - r {
        x - (w - 1 - r)
    } else {
        0
    };
    let dy = if y < r {
        r - y
    } else if y >= h - r {
        y - (h - 1 - r)
    } else {
        0
    };
    dx * dx + dy * dy <= r * r
}

/// Fill the whole canvas with a rounded rectangle of the given corner radius.
pub fn fill_rounded_rect(canvas: &mut RgbaImage, radius: i64, color: Rgba<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for y in 0..h {
        for x in 0..w {
            if rounded_contains(x, y, w, h, radius) {
                put(canvas, x, y, color);
            }
        }
    }
}

/// Rounded border of the given thickness along the canvas edge.
pub fn outline_rounded_rect(canvas: &mut RgbaImage, radius: i64, thickness: i64, color: Rgba<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for y in 0..h {
        for x in 0..w {
            let outer = rounded_contains(x, y, w, h, radius);
            let inner = rounded_contains(
                x - thickness,
                y - thickness,
                w - 2 * thickness,
                h - 2 * thickness,
                radius - thickness,
            );
            if outer && !inner {
                put(canvas, x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn fill_rect_covers_bounds_and_clips() {
        let mut canvas = RgbaImage::new(10, 10);
        fill_rect(&mut canvas, 8, 8, 5, 5, RED);
        assert_eq!(*canvas.get_pixel(8, 8), RED);
        assert_eq!(*canvas.get_pixel(9, 9), RED);
        assert_eq!(*canvas.get_pixel(7, 7), CLEAR);
    }

    #[test]
    fn outline_rect_leaves_interior_clear() {
        let mut canvas = RgbaImage::new(10, 10);
        outline_rect(&mut canvas, 2, 2, 6, 6, RED);
        assert_eq!(*canvas.get_pixel(2, 2), RED);
        assert_eq!(*canvas.get_pixel(7, 7), RED);
        assert_eq!(*canvas.get_pixel(4, 4), CLEAR);
    }

    #[test]
    fn fill_circle_is_round() {
        let mut canvas = RgbaImage::new(21, 21);
        fill_circle(&mut canvas, 10, 10, 5, RED);
        assert_eq!(*canvas.get_pixel(10, 10), RED);
        assert_eq!(*canvas.get_pixel(10, 5), RED);
        assert_eq!(*canvas.get_pixel(10, 15), RED);
        // Corner of the bounding box is outside the disc.
        assert_eq!(*canvas.get_pixel(5, 5), CLEAR);
    }

    #[test]
    fn fill_circle_clips_at_edges() {
        let mut canvas = RgbaImage::new(8, 8);
        fill_circle(&mut canvas, 0, 0, 4, RED);
        assert_eq!(*canvas.get_pixel(0, 0), RED);
        assert_eq!(*canvas.get_pixel(7, 7), CLEAR);
    }

    #[test]
    fn hline_spans_inclusive_range() {
        let mut canvas = RgbaImage::new(10, 10);
        hline(&mut canvas, 2, 7, 4, 2, RED);
        assert_eq!(*canvas.get_pixel(2, 4), RED);
        assert_eq!(*canvas.get_pixel(7, 5), RED);
        assert_eq!(*canvas.get_pixel(1, 4), CLEAR);
        assert_eq!(*canvas.get_pixel(8, 4), CLEAR);
        assert_eq!(*canvas.get_pixel(2, 6), CLEAR);
    }

    #[test]
    fn rounded_rect_corners_stay_clear() {
        let mut canvas = RgbaImage::new(40, 20);
        fill_rounded_rect(&mut canvas, 8, RED);
        assert_eq!(*canvas.get_pixel(0, 0), CLEAR);
        assert_eq!(*canvas.get_pixel(39, 0), CLEAR);
        assert_eq!(*canvas.get_pixel(0, 19), CLEAR);
        assert_eq!(*canvas.get_pixel(39, 19), CLEAR);
        // Center and straight edges are filled.
        assert_eq!(*canvas.get_pixel(20, 10), RED);
        assert_eq!(*canvas.get_pixel(20, 0), RED);
        assert_eq!(*canvas.get_pixel(0, 10), RED);
    }

    #[test]
    fn rounded_outline_hugs_the_edge() {
        let mut canvas = RgbaImage::new(40, 20);
        outline_rounded_rect(&mut canvas, 8, 2, RED);
        assert_eq!(*canvas.get_pixel(20, 0), RED);
        assert_eq!(*canvas.get_pixel(20, 1), RED);
        assert_eq!(*canvas.get_pixel(20, 2), CLEAR);
        assert_eq!(*canvas.get_pixel(20, 10), CLEAR);
    }
}
