//! Threshold calibration for the two tracked color classes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Hsv;

/// Named color classes the pipeline tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackedObject {
    Marker,
    Player,
}

/// Which end of a threshold range a UI control addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Lower,
    Upper,
}

/// Inclusive per-channel HSV bounds for one tracked object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ThresholdRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// True when every channel of `lower` is at most the matching channel
    /// of `upper`.
    pub fn is_ordered(&self) -> bool {
        self.lower.h <= self.upper.h && self.lower.s <= self.upper.s && self.lower.v <= self.upper.v
    }

    /// Inclusive membership test on all three channels.
    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }
}

/// Startup calibration for the marker class.
pub const MARKER_DEFAULT: ThresholdRange =
    ThresholdRange::new(Hsv::new(30, 171, 174), Hsv::new(40, 255, 255));

/// Startup calibration for the player class.
pub const PLAYER_DEFAULT: ThresholdRange =
    ThresholdRange::new(Hsv::new(20, 16, 193), Hsv::new(33, 255, 255));

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// A `set` would leave some channel of `lower` above the matching
    /// channel of `upper`. The store keeps its previous range.
    #[error("inverted {object:?} range: {channel} lower {lower} > upper {upper}")]
    InvertedRange {
        object: TrackedObject,
        channel: &'static str,
        lower: u8,
        upper: u8,
    },
}

/// Owns the two threshold ranges and the dirty signal the controller
/// consumes to force recomputation.
///
/// Exactly one thread ever touches the store, so there is no locking; UI
/// events call [`CalibrationStore::set`] synchronously between ticks.
#[derive(Clone, Debug)]
pub struct CalibrationStore {
    marker: ThresholdRange,
    player: ThresholdRange,
    dirty: bool,
}

impl CalibrationStore {
    pub fn new() -> Self {
        Self {
            marker: MARKER_DEFAULT,
            player: PLAYER_DEFAULT,
            dirty: false,
        }
    }

    pub fn range(&self, object: TrackedObject) -> ThresholdRange {
        match object {
            TrackedObject::Marker => self.marker,
            TrackedObject::Player => self.player,
        }
    }

    pub fn get(&self, object: TrackedObject, bound: Bound) -> Hsv {
        let range = self.range(object);
        match bound {
            Bound::Lower => range.lower,
            Bound::Upper => range.upper,
        }
    }

    /// Replace one bound of one range, rejecting values that would invert
    /// the range on any channel. A successful call raises the dirty signal.
    pub fn set(
        &mut self,
        object: TrackedObject,
        bound: Bound,
        value: Hsv,
    ) -> Result<(), CalibrationError> {
        let mut candidate = self.range(object);
        match bound {
            Bound::Lower => candidate.lower = value,
            Bound::Upper => candidate.upper = value,
        }
        check_ordered(object, candidate)?;

        match object {
            TrackedObject::Marker => self.marker = candidate,
            TrackedObject::Player => self.player = candidate,
        }
        self.dirty = true;
        log::debug!("calibration updated: {object:?} {bound:?} = {value:?}");
        Ok(())
    }

    /// Read and clear the dirty signal.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_ordered(object: TrackedObject, range: ThresholdRange) -> Result<(), CalibrationError> {
    let channels = [
        ("hue", range.lower.h, range.upper.h),
        ("saturation", range.lower.s, range.upper.s),
        ("value", range.lower.v, range.upper.v),
    ];
    for (channel, lower, upper) in channels {
        if lower > upper {
            return Err(CalibrationError::InvertedRange {
                object,
                channel,
                lower,
                upper,
            });
        }
    }
    Ok(())
}
