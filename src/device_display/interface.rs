use crate::taxonomy::CanonicalBin;
use image::RgbImage;
use std::error::Error;
use std::sync::mpsc::Receiver;

/// Per-bin readout handed to the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinReadout {
    pub bin: CanonicalBin,
    pub level: u8,
    pub full: bool,
}

/// Commands a user can issue from the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationCommand {
    ResetLevels,
    Notify,
    Shutdown,
}

pub trait DeviceDisplay: Send {
    /// Show one presentation-normalized video frame. The frame is consumed
    /// by this call; displays never hand frames back.
    fn present_frame(&mut self, frame: RgbImage) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Update the bin meters.
    fn set_bins(&mut self, readouts: &[BinReadout]) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Show a one-line status (camera state, reset failures, ...).
    fn set_status(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Stream of user commands issued from this display. Yields a live
    /// receiver once; later calls return an already-closed channel.
    fn commands(&mut self) -> Receiver<StationCommand>;
}
