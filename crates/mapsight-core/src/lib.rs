//! Frame pipeline for operator-facing visual telemetry.
//!
//! The pipeline ingests frames from a capture device or an ordered image
//! sequence, segments two independently calibrated color classes (marker and
//! player) into a unioned binary mask, extracts contour geometry, fits an
//! oriented rectangle to the dominant contour, and lets the operator cycle
//! the display between the raw frame, the mask, and the contour overlay.
//!
//! The crate is headless: device capture and on-screen presentation live
//! behind the [`FrameSource`], [`ControlInput`], and [`DisplaySink`] seams.

mod calc;
mod calibration;
mod color;
mod controller;
mod hud;
mod logger;
mod render;
mod segment;
mod source;

pub use calc::{angle_to_cardinal, normalize_angle, MapScale};
pub use calibration::{
    Bound, CalibrationError, CalibrationStore, ThresholdRange, TrackedObject, MARKER_DEFAULT,
    PLAYER_DEFAULT,
};
pub use color::{hsv_native_to_normal, hsv_normal_to_native, rgb_to_hsv, Hsv};
pub use controller::{
    Command, ControlInput, Controller, DisplaySink, LoopState, PipelineState, TickReport,
    KEY_ADVANCE, KEY_CYCLE_RENDER, KEY_QUIT,
};
pub use hud::draw_grid;
pub use logger::init_with_level;
pub use render::{RenderMode, RenderSelector};
pub use segment::{dominant_contour, segment, threshold_mask, Segmentation};
pub use source::{Advance, FrameSource, ImageSequence, SourceError, CAPTURE_SIZE};

/// One ingested image buffer, three-channel color, row-major.
pub type Frame = image::RgbImage;
