//! HSV pixel math in the native thresholding scale.
//!
//! The native scale is hue 0–180, saturation and value 0–255 (half-degree
//! hue so the channel fits a byte). The "normal" scale used by external
//! color pickers is hue 0–360, saturation and value 0–100.

use image::Rgb;
use serde::{Deserialize, Serialize};

/// HSV triple in the native scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue, 0–180.
    pub h: u8,
    /// Saturation, 0–255.
    pub s: u8,
    /// Value, 0–255.
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Convert one RGB pixel to native-scale HSV.
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> Hsv {
    let [r, g, b] = pixel.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    let diff = (max - min) as f32;

    let s = if max == 0 {
        0
    } else {
        (diff * 255.0 / max as f32).round() as u8
    };

    let hue_deg = if max == min {
        0.0
    } else if max == r {
        60.0 * (g as f32 - b as f32) / diff
    } else if max == g {
        120.0 + 60.0 * (b as f32 - r as f32) / diff
    } else {
        240.0 + 60.0 * (r as f32 - g as f32) / diff
    };
    let hue_deg = if hue_deg < 0.0 {
        hue_deg + 360.0
    } else {
        hue_deg
    };

    Hsv::new((hue_deg / 2.0).round() as u8 % 180, s, v)
}

/// Normal-scale (0–360 / 0–100 / 0–100) triple to native scale.
///
/// Integer truncation matches the trackbar arithmetic the tool has always
/// used: `h / 2`, `s * 255 / 100`, `v * 255 / 100`.
pub fn hsv_normal_to_native(h: u16, s: u8, v: u8) -> Hsv {
    Hsv::new(
        (h / 2) as u8,
        (s as u16 * 255 / 100) as u8,
        (v as u16 * 255 / 100) as u8,
    )
}

/// Native-scale triple back to the normal scale.
pub fn hsv_native_to_normal(hsv: Hsv) -> (u16, u8, u8) {
    (
        hsv.h as u16 * 2,
        (hsv.s as u16 * 100 / 255) as u8,
        (hsv.v as u16 * 100 / 255) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), Hsv::new(120, 255, 255));
    }

    #[test]
    fn achromatic_pixels_have_zero_saturation() {
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 0])), Hsv::new(0, 0, 0));
        assert_eq!(rgb_to_hsv(Rgb([255, 255, 255])), Hsv::new(0, 0, 255));
        assert_eq!(rgb_to_hsv(Rgb([90, 90, 90])), Hsv::new(0, 0, 90));
    }

    #[test]
    fn negative_hue_wraps_to_upper_range() {
        // Magenta-ish: max == r with b > g gives a negative raw hue.
        let hsv = rgb_to_hsv(Rgb([255, 0, 255]));
        assert_eq!(hsv.h, 150);
    }

    #[test]
    fn scale_conversion_matches_trackbar_arithmetic() {
        assert_eq!(hsv_normal_to_native(60, 100, 100), Hsv::new(30, 255, 255));
        assert_eq!(hsv_normal_to_native(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(hsv_native_to_normal(Hsv::new(30, 255, 255)), (60, 100, 100));
    }

    #[test]
    fn scale_round_trip_within_truncation_error() {
        for h in (0..360).step_by(10) {
            for sv in (0..=100).step_by(20) {
                let native = hsv_normal_to_native(h, sv, sv);
                let (h2, s2, v2) = hsv_native_to_normal(native);
                assert!((h2 as i32 - h as i32).abs() <= 1);
                assert!((s2 as i32 - sv as i32).abs() <= 1);
                assert!((v2 as i32 - sv as i32).abs() <= 1);
            }
        }
    }
}
