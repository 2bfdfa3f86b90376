//! Render-target selection state machine.

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::segment::Segmentation;
use crate::Frame;

/// Which artifact is on screen. Closed set, advanced in fixed cyclic order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Image,
    Mask,
    Contours,
}

impl RenderMode {
    /// Next mode in the cycle Image → Mask → Contours → Image.
    pub fn next(self) -> Self {
        match self {
            RenderMode::Image => RenderMode::Mask,
            RenderMode::Mask => RenderMode::Contours,
            RenderMode::Contours => RenderMode::Image,
        }
    }
}

/// Holds the active [`RenderMode`] and resolves it to a display target.
///
/// Resolution is deterministic in the mode and the artifacts, so callers
/// re-resolve only when the mode or the artifacts changed and reuse the
/// previous target otherwise.
#[derive(Clone, Debug, Default)]
pub struct RenderSelector {
    mode: RenderMode,
}

impl RenderSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Jump directly to `mode`.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Advance to the next mode in the cycle.
    pub fn advance(&mut self) {
        let from = self.mode;
        self.mode = self.mode.next();
        log::info!("render mode switched: {from:?} -> {:?}", self.mode);
    }

    /// Build the display target for the active mode.
    pub fn resolve(&self, frame: &Frame, segmentation: &Segmentation) -> RgbImage {
        match self.mode {
            RenderMode::Image => frame.clone(),
            RenderMode::Mask => mask_to_rgb(&segmentation.mask),
            RenderMode::Contours => segmentation.overlay.clone(),
        }
    }
}

fn mask_to_rgb(mask: &GrayImage) -> RgbImage {
    let mut out = RgbImage::new(mask.width(), mask.height());
    for (dst, src) in out.pixels_mut().zip(mask.pixels()) {
        let v = src.0[0];
        *dst = Rgb([v, v, v]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{MARKER_DEFAULT, PLAYER_DEFAULT};
    use crate::segment::segment;

    #[test]
    fn starts_on_image_and_cycles_back_in_three() {
        let mut selector = RenderSelector::new();
        assert_eq!(selector.mode(), RenderMode::Image);
        selector.advance();
        assert_eq!(selector.mode(), RenderMode::Mask);
        selector.advance();
        assert_eq!(selector.mode(), RenderMode::Contours);
        selector.advance();
        assert_eq!(selector.mode(), RenderMode::Image);
    }

    #[test]
    fn resolve_is_stable_between_advances() {
        let frame = Frame::from_pixel(8, 8, Rgb([7, 7, 7]));
        let seg = segment(&frame, MARKER_DEFAULT, PLAYER_DEFAULT);

        let selector = RenderSelector::new();
        assert_eq!(selector.resolve(&frame, &seg), selector.resolve(&frame, &seg));
        assert_eq!(selector.resolve(&frame, &seg), frame);
    }

    #[test]
    fn each_mode_maps_to_its_artifact() {
        let frame = Frame::from_pixel(8, 8, Rgb([7, 7, 7]));
        let seg = segment(&frame, MARKER_DEFAULT, PLAYER_DEFAULT);
        let mut selector = RenderSelector::new();

        assert_eq!(selector.resolve(&frame, &seg), frame);
        selector.advance();
        let mask_target = selector.resolve(&frame, &seg);
        assert!(mask_target.pixels().all(|p| p.0 == [0, 0, 0]));
        selector.advance();
        assert_eq!(selector.resolve(&frame, &seg), seg.overlay);
    }
}
