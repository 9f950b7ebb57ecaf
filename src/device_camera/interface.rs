use crate::error::CaptureError;
use crate::frame::Frame;

pub trait DeviceCamera: Send + Sync {
    /// Attempt to open the underlying capture device. Fails with
    /// `CaptureError::Unavailable` when no device responds; safe to call
    /// again later (the controller retries on a fixed cadence).
    fn open(&self) -> Result<(), CaptureError>;

    /// Read one frame. `NoFrame` is transient: the handle stays valid and
    /// the caller skips the tick. `Unavailable` means the device is gone
    /// and must be reopened.
    fn read_frame(&self) -> Result<Frame, CaptureError>;

    /// Release the capture device. Idempotent.
    fn close(&self);
}
