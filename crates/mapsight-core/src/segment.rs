//! Dual-object HSV segmentation and contour geometry.
//!
//! One call produces every derived artifact for a frame: the unioned binary
//! mask, the external contours found over it, and a frame copy annotated
//! with the minimum-area rectangle of the dominant contour.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::geometry::min_area_rect;
use imageproc::point::Point;

use crate::calibration::ThresholdRange;
use crate::color::rgb_to_hsv;
use crate::Frame;

const FOREGROUND: Luma<u8> = Luma([255]);
const RECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Derived artifacts for one frame. Recreated on every recompute.
pub struct Segmentation {
    /// Binary classification of pixels belonging to marker or player.
    pub mask: GrayImage,
    /// External contour boundaries of the mask. May be empty.
    pub contours: Vec<Contour<i32>>,
    /// Frame copy with the fitted rectangle of the dominant contour, or an
    /// unmodified copy when no contour was found.
    pub overlay: RgbImage,
}

/// Segment `frame` against both calibration ranges.
///
/// An all-background mask is not an error: the contour set comes back
/// empty, orientation fitting is skipped, and the overlay equals the frame.
pub fn segment(frame: &Frame, marker: ThresholdRange, player: ThresholdRange) -> Segmentation {
    let mask = union(threshold_mask(frame, marker), &threshold_mask(frame, player));

    let contours: Vec<Contour<i32>> = find_contours::<i32>(&mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect();

    let mut overlay = frame.clone();
    match dominant_contour(&contours) {
        Some(index) => draw_oriented_rect(&mut overlay, &contours[index].points),
        None => log::debug!("no contours found; overlay left unmodified"),
    }

    Segmentation {
        mask,
        contours,
        overlay,
    }
}

/// Binary mask of the pixels inside one threshold range.
pub fn threshold_mask(frame: &Frame, range: ThresholdRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width(), frame.height());
    for (dst, src) in mask.pixels_mut().zip(frame.pixels()) {
        if range.contains(rgb_to_hsv(*src)) {
            *dst = FOREGROUND;
        }
    }
    mask
}

/// Index of the contour with the most boundary points, in discovery order.
///
/// The best index starts at 0 and is replaced only on a strictly greater
/// point count, so ties keep the earliest contour. `None` only for an empty
/// set; callers must skip orientation fitting in that case.
pub fn dominant_contour(contours: &[Contour<i32>]) -> Option<usize> {
    if contours.is_empty() {
        return None;
    }
    let mut best = 0;
    for (index, contour) in contours.iter().enumerate().skip(1) {
        if contour.points.len() > contours[best].points.len() {
            best = index;
        }
    }
    Some(best)
}

fn union(mut base: GrayImage, other: &GrayImage) -> GrayImage {
    for (dst, src) in base.pixels_mut().zip(other.pixels()) {
        dst.0[0] |= src.0[0];
    }
    base
}

fn draw_oriented_rect(canvas: &mut RgbImage, points: &[Point<i32>]) {
    let corners = min_area_rect(points);
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            RECT_COLOR,
        );
    }
}
