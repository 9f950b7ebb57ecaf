use crate::device_display::interface::{BinReadout, DeviceDisplay, StationCommand};
use image::RgbImage;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Test display: records everything it is told to show and lets tests
/// inject user commands.
pub struct DeviceDisplayFake {
    pub frames_presented: usize,
    pub bins_history: Vec<Vec<BinReadout>>,
    pub statuses: Vec<String>,
    command_sender: Sender<StationCommand>,
    command_receiver: Option<Receiver<StationCommand>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            frames_presented: 0,
            bins_history: Vec::new(),
            statuses: Vec::new(),
            command_sender: sender,
            command_receiver: Some(receiver),
        }
    }

    pub fn push_command(&self, command: StationCommand) {
        let _ = self.command_sender.send(command);
    }

    pub fn last_bins(&self) -> Option<&Vec<BinReadout>> {
        self.bins_history.last()
    }
}

impl Default for DeviceDisplayFake {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn present_frame(&mut self, _frame: RgbImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.frames_presented += 1;
        Ok(())
    }

    fn set_bins(&mut self, readouts: &[BinReadout]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.bins_history.push(readouts.to_vec());
        Ok(())
    }

    fn set_status(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.statuses.push(message.to_string());
        Ok(())
    }

    fn commands(&mut self) -> Receiver<StationCommand> {
        match self.command_receiver.take() {
            Some(receiver) => receiver,
            None => channel().1,
        }
    }
}
