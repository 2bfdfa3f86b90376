//! Grid overlay drawing.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::calc::MapScale;

const GRID_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Draw map grid lines over `canvas`, one every `pixels_per_square`
/// pixels (floored, as the map squares are), both axes.
pub fn draw_grid(canvas: &mut RgbImage, scale: &MapScale) {
    let step = scale.pixels_per_square.floor().max(1.0) as u32;
    let (width, height) = canvas.dimensions();

    let mut y = 0;
    while y < height {
        draw_line_segment_mut(
            canvas,
            (0.0, y as f32),
            (width as f32 - 1.0, y as f32),
            GRID_COLOR,
        );
        y += step;
    }
    let mut x = 0;
    while x < width {
        draw_line_segment_mut(
            canvas,
            (x as f32, 0.0),
            (x as f32, height as f32 - 1.0),
            GRID_COLOR,
        );
        x += step;
    }
}
