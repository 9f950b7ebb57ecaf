use crate::device_display::interface::{BinReadout, DeviceDisplay, StationCommand};
use image::RgbImage;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Headless presentation: bin meters and status lines go to stdout, video
/// frames are dropped. Issues no commands; the sender is kept so the
/// command channel stays open for the life of the display.
pub struct DeviceDisplayConsole {
    last_bins: Vec<BinReadout>,
    last_status: String,
    _command_sender: Sender<StationCommand>,
    command_receiver: Option<Receiver<StationCommand>>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            last_bins: Vec::new(),
            last_status: String::new(),
            _command_sender: sender,
            command_receiver: Some(receiver),
        }
    }

    fn render_bins(&self) {
        for readout in &self.last_bins {
            let notice = if readout.full {
                "  Bin Full! Please empty."
            } else {
                ""
            };
            println!("{:<14} {:>3}%{}", readout.bin.as_str(), readout.level, notice);
        }
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn present_frame(&mut self, _frame: RgbImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn set_bins(&mut self, readouts: &[BinReadout]) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last_bins != readouts {
            self.last_bins = readouts.to_vec();
            self.render_bins();
        }
        Ok(())
    }

    fn set_status(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last_status != message {
            self.last_status = message.to_string();
            println!("{}", message);
        }
        Ok(())
    }

    fn commands(&mut self) -> Receiver<StationCommand> {
        match self.command_receiver.take() {
            Some(receiver) => receiver,
            None => channel().1,
        }
    }
}

#[cfg(test)]
mod display_console_test {
    use super::*;
    use crate::taxonomy::CanonicalBin;
    use std::sync::mpsc::TryRecvError;

    #[test]
    fn test_remembers_what_it_last_showed() {
        let mut display = DeviceDisplayConsole::new();
        let readouts = vec![BinReadout {
            bin: CanonicalBin::Organic,
            level: 42,
            full: false,
        }];

        display.set_bins(&readouts).unwrap();
        display.set_status("Watching...").unwrap();

        assert_eq!(display.last_bins, readouts);
        assert_eq!(display.last_status, "Watching...");
    }

    #[test]
    fn test_command_channel_stays_open_but_quiet() {
        let mut display = DeviceDisplayConsole::new();
        let commands = display.commands();

        // No commands ever arrive, but the channel is not closed while the
        // display is alive.
        assert_eq!(commands.try_recv().unwrap_err(), TryRecvError::Empty);
    }
}
