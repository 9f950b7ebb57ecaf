use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use image::RgbImage;
use opencv::prelude::*;
use opencv::{imgproc, videoio};
use std::sync::{Arc, Mutex};

/// Capture device backed by an OpenCV `VideoCapture`. The handle lives
/// behind a mutex; each `read_frame` call is independent, so neither loop
/// needs coordination beyond what the driver provides.
pub struct DeviceCameraOpenCv {
    index: i32,
    source_tag: String,
    logger: Arc<dyn Logger + Send + Sync>,
    handle: Mutex<Option<videoio::VideoCapture>>,
}

impl DeviceCameraOpenCv {
    pub fn new(index: i32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            index,
            source_tag: format!("camera:{}", index),
            logger: logger.with_namespace("camera:opencv"),
            handle: Mutex::new(None),
        }
    }
}

impl DeviceCamera for DeviceCameraOpenCv {
    fn open(&self) -> Result<(), CaptureError> {
        let mut handle = self.handle.lock().unwrap();
        let capture = videoio::VideoCapture::new(self.index, videoio::CAP_ANY)
            .map_err(|_| CaptureError::Unavailable)?;
        if !capture.is_opened().map_err(|_| CaptureError::Unavailable)? {
            return Err(CaptureError::Unavailable);
        }
        let _ = self
            .logger
            .info(&format!("capture device {} opened", self.index));
        *handle = Some(capture);
        Ok(())
    }

    fn read_frame(&self) -> Result<Frame, CaptureError> {
        let mut handle = self.handle.lock().unwrap();
        let capture = handle.as_mut().ok_or(CaptureError::Unavailable)?;

        let mut raw = Mat::default();
        let got_frame = capture.read(&mut raw).map_err(|_| CaptureError::NoFrame)?;
        if !got_frame || raw.empty() {
            return Err(CaptureError::NoFrame);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(&raw, &mut rgb, imgproc::COLOR_BGR2RGB, 0)
            .map_err(|_| CaptureError::NoFrame)?;

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let bytes = rgb
            .data_bytes()
            .map_err(|_| CaptureError::NoFrame)?
            .to_vec();
        let pixels = RgbImage::from_raw(width, height, bytes).ok_or(CaptureError::NoFrame)?;

        Ok(Frame::new(pixels, self.source_tag.clone()))
    }

    fn close(&self) {
        let mut handle = self.handle.lock().unwrap();
        if let Some(mut capture) = handle.take() {
            let _ = capture.release();
            let _ = self
                .logger
                .info(&format!("capture device {} released", self.index));
        }
    }
}
