//! Live frame acquisition over a capture device.

use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use mapsight_core::{Advance, FrameSource, SourceError, CAPTURE_SIZE};

pub struct LiveCapture {
    camera: Camera,
}

impl LiveCapture {
    /// Open the device and start streaming.
    ///
    /// The requested 600x600 format is advisory; the driver picks the
    /// closest one it supports. The stream is released when the capture is
    /// dropped, so a failed pipeline construction still closes the device.
    pub fn open(device_id: u32) -> Result<Self, SourceError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(CAPTURE_SIZE.0, CAPTURE_SIZE.1),
                FrameFormat::MJPEG,
                30,
            ),
        ));
        let mut camera = Camera::new(CameraIndex::Index(device_id), requested)
            .map_err(|err| SourceError::DeviceOpen(err.to_string()))?;
        camera
            .open_stream()
            .map_err(|err| SourceError::DeviceOpen(err.to_string()))?;
        log::info!(
            "capture device {device_id} open at {}",
            camera.camera_format()
        );
        Ok(Self { camera })
    }
}

impl FrameSource for LiveCapture {
    /// Blocking device read; a failed read or decode yields no frame for
    /// this tick and the caller keeps its previous one.
    fn next_frame(&mut self) -> Option<RgbImage> {
        match self
            .camera
            .frame()
            .and_then(|frame| frame.decode_image::<RgbFormat>())
        {
            Ok(frame) => Some(frame),
            Err(err) => {
                log::warn!("capture read failed: {err}");
                None
            }
        }
    }

    fn request_advance(&mut self) -> Advance {
        Advance::Ignored
    }

    fn is_live(&self) -> bool {
        true
    }
}
