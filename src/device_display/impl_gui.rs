use crate::device_display::interface::{BinReadout, DeviceDisplay, StationCommand};
use eframe::egui;
use image::RgbImage;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

struct SharedPanel {
    frame: Mutex<Option<egui::ColorImage>>,
    bins: Mutex<Vec<BinReadout>>,
    status: Mutex<String>,
}

/// Station window. Shows the live feed, one meter per bin with its
/// dashboard description, full notices, and the Reset/Notify controls.
/// Closing the window issues a shutdown command.
pub struct DeviceDisplayGui {
    panel: Arc<SharedPanel>,
    command_sender: Sender<StationCommand>,
    command_receiver: Option<Receiver<StationCommand>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            panel: Arc::new(SharedPanel {
                frame: Mutex::new(None),
                bins: Mutex::new(Vec::new()),
                status: Mutex::new(String::new()),
            }),
            command_sender: sender,
            command_receiver: Some(receiver),
        }
    }

    /// Opens the window on its own thread and returns immediately. The
    /// thread reports shutdown once the user closes the window.
    pub fn open_window(&self) {
        let panel = self.panel.clone();
        let commands = self.command_sender.clone();

        thread::spawn(move || {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 700.0]),
                ..Default::default()
            };

            let window = StationWindow {
                panel,
                commands: commands.clone(),
                feed_texture: None,
            };

            // Blocks this thread until the window is closed.
            let _ = eframe::run_native(
                "Sortyx | Eco-Saver",
                options,
                Box::new(|_cc| Box::new(window)),
            );

            let _ = commands.send(StationCommand::Shutdown);
        });
    }
}

impl Default for DeviceDisplayGui {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn present_frame(&mut self, frame: RgbImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let size = [frame.width() as usize, frame.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, frame.as_raw());
        *self.panel.frame.lock().unwrap() = Some(color_image);
        Ok(())
    }

    fn set_bins(&mut self, readouts: &[BinReadout]) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.panel.bins.lock().unwrap() = readouts.to_vec();
        Ok(())
    }

    fn set_status(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.panel.status.lock().unwrap() = message.to_string();
        Ok(())
    }

    fn commands(&mut self) -> Receiver<StationCommand> {
        match self.command_receiver.take() {
            Some(receiver) => receiver,
            None => channel().1,
        }
    }
}

struct StationWindow {
    panel: Arc<SharedPanel>,
    commands: Sender<StationCommand>,
    feed_texture: Option<egui::TextureHandle>,
}

impl eframe::App for StationWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(image) = self.panel.frame.lock().unwrap().take() {
            self.feed_texture =
                Some(ctx.load_texture("live-feed", image, egui::TextureOptions::LINEAR));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Sortyx | Eco-Saver");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Notify").clicked() {
                        let _ = self.commands.send(StationCommand::Notify);
                    }
                    if ui.button("Reset Levels").clicked() {
                        let _ = self.commands.send(StationCommand::ResetLevels);
                    }
                });
            });
            ui.separator();

            match &self.feed_texture {
                Some(texture) => {
                    ui.image((texture.id(), texture.size_vec2()));
                }
                None => {
                    ui.label("No feed");
                }
            }
            ui.label(self.panel.status.lock().unwrap().as_str());
            ui.separator();

            let bins = self.panel.bins.lock().unwrap().clone();
            for readout in &bins {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(readout.bin.as_str());
                        ui.small(readout.bin.description());
                    });
                    ui.add(
                        egui::ProgressBar::new(readout.level as f32 / 100.0).show_percentage(),
                    );
                });
                if readout.full {
                    ui.colored_label(
                        egui::Color32::from_rgb(250, 204, 21),
                        "Bin Full! Please empty.",
                    );
                }
            }
        });

        ctx.request_repaint_after(Duration::from_millis(33));
    }
}
