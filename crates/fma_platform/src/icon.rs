//! The window icon, generated in-process. No file on disk is involved:
//! a dark red base with two concentric fire-colored discs.

use winit::window::Icon;

pub const ICON_SIZE: u32 = 32;

const BASE: [u8; 4] = [200, 50, 50, 255];
const OUTER_DISC: [u8; 4] = [255, 150, 50, 255];
const INNER_DISC: [u8; 4] = [255, 220, 100, 255];
const OUTER_RADIUS: i32 = 10;
const INNER_RADIUS: i32 = 5;

/// Raw RGBA pixels of the icon, row-major.
pub fn icon_rgba() -> Vec<u8> {
    let center = ICON_SIZE as i32 / 2;
    let mut pixels = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE as i32 {
        for x in 0..ICON_SIZE as i32 {
            let dist2 = (x - center) * (x - center) + (y - center) * (y - center);
            let color = if dist2 <= INNER_RADIUS * INNER_RADIUS {
                INNER_DISC
            } else if dist2 <= OUTER_RADIUS * OUTER_RADIUS {
                OUTER_DISC
            } else {
                BASE
            };
            pixels.extend_from_slice(&color);
        }
    }
    pixels
}

pub fn window_icon() -> Icon {
    // Dimensions are compile-time constants matching the buffer above.
    Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE).expect("icon buffer matches declared size")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_at(pixels: &[u8], x: u32, y: u32) -> &[u8] {
        let offset = ((y * ICON_SIZE + x) * 4) as usize;
        &pixels[offset..offset + 4]
    }

    #[test]
    fn buffer_covers_the_full_icon() {
        assert_eq!(icon_rgba().len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
    }

    #[test]
    fn concentric_discs_on_dark_base() {
        let pixels = icon_rgba();
        assert_eq!(pixel_at(&pixels, 16, 16), INNER_DISC);
        // Between the two radii: outer disc color.
        assert_eq!(pixel_at(&pixels, 16, 24), OUTER_DISC);
        // Corners stay on the base fill.
        assert_eq!(pixel_at(&pixels, 0, 0), BASE);
        assert_eq!(pixel_at(&pixels, 31, 31), BASE);
    }
}
