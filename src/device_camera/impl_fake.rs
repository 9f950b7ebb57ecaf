use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use std::sync::{Arc, Mutex};

const FAKE_WIDTH: u32 = 320;
const FAKE_HEIGHT: u32 = 240;

struct FakeState {
    opened: bool,
    frames_read: u32,
    failed_opens_remaining: u32,
    no_frame_every: Option<u32>,
}

/// Synthetic capture device. Produces a slowly shifting gradient so the
/// live feed visibly moves; failure behavior is scriptable for tests.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    state: Mutex<FakeState>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera:fake"),
            state: Mutex::new(FakeState {
                opened: false,
                frames_read: 0,
                failed_opens_remaining: 0,
                no_frame_every: None,
            }),
        }
    }

    /// The next `count` calls to `open` fail with `Unavailable`.
    pub fn failing_opens(self, count: u32) -> Self {
        self.state.lock().unwrap().failed_opens_remaining = count;
        self
    }

    /// Every nth read returns `NoFrame`.
    pub fn dropping_every(self, nth: u32) -> Self {
        self.state.lock().unwrap().no_frame_every = Some(nth);
        self
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock().unwrap();
        if state.failed_opens_remaining > 0 {
            state.failed_opens_remaining -= 1;
            return Err(CaptureError::Unavailable);
        }
        state.opened = true;
        let _ = self.logger.info("capture device opened");
        Ok(())
    }

    fn read_frame(&self) -> Result<Frame, CaptureError> {
        let mut state = self.state.lock().unwrap();
        if !state.opened {
            return Err(CaptureError::Unavailable);
        }
        state.frames_read += 1;
        if let Some(nth) = state.no_frame_every {
            if state.frames_read % nth == 0 {
                return Err(CaptureError::NoFrame);
            }
        }

        let shift = state.frames_read % 255;
        let pixels = RgbImage::from_fn(FAKE_WIDTH, FAKE_HEIGHT, |x, y| {
            let r = ((x * 255 / FAKE_WIDTH) + shift) % 255;
            let g = (y * 255 / FAKE_HEIGHT) % 255;
            Rgb([r as u8, g as u8, 90])
        });
        Ok(Frame::new(pixels, "camera:fake"))
    }

    fn close(&self) {
        let mut state = self.state.lock().unwrap();
        if state.opened {
            state.opened = false;
            let _ = self.logger.info("capture device released");
        }
    }
}

#[cfg(test)]
mod camera_fake_test {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()))
    }

    #[test]
    fn test_read_before_open_is_unavailable() {
        let camera = DeviceCameraFake::new(logger());
        assert!(matches!(
            camera.read_frame(),
            Err(CaptureError::Unavailable)
        ));
    }

    #[test]
    fn test_scripted_open_failures_then_success() {
        let camera = DeviceCameraFake::new(logger()).failing_opens(2);

        assert!(matches!(camera.open(), Err(CaptureError::Unavailable)));
        assert!(matches!(camera.open(), Err(CaptureError::Unavailable)));
        assert!(camera.open().is_ok());
        assert!(camera.read_frame().is_ok());
    }

    #[test]
    fn test_dropped_reads_keep_handle_valid() {
        let camera = DeviceCameraFake::new(logger()).dropping_every(2);
        camera.open().unwrap();

        assert!(camera.read_frame().is_ok());
        assert!(matches!(camera.read_frame(), Err(CaptureError::NoFrame)));
        assert!(camera.read_frame().is_ok());
    }

    #[test]
    fn test_close_is_idempotent() {
        let camera = DeviceCameraFake::new(logger());
        camera.open().unwrap();
        camera.close();
        camera.close();
        assert!(matches!(
            camera.read_frame(),
            Err(CaptureError::Unavailable)
        ));
    }
}
