use crate::device_display::interface::BinReadout;
use crate::station::core::{CameraState, ClassificationState, Model};
use crate::station::main::SortingStation;

impl SortingStation {
    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut display = self.device_display.lock().unwrap();

        let readouts: Vec<BinReadout> = model
            .bins
            .iter()
            .map(|(bin, indicator)| BinReadout {
                bin: *bin,
                level: indicator.level,
                full: indicator.full,
            })
            .collect();
        display.set_bins(&readouts)?;

        let status = self.status_line(model);
        display.set_status(&status)
    }

    fn status_line(&self, model: &Model) -> String {
        if let Some(note) = &model.note {
            if note.at.elapsed() < self.config.note_ttl {
                return note.text.clone();
            }
        }

        match model.camera {
            CameraState::Disconnected | CameraState::Opening => "Starting camera...".to_string(),
            CameraState::Backoff { .. } => "Camera unavailable, retrying...".to_string(),
            CameraState::Open => match model.classification {
                ClassificationState::InFlight { .. } => "Classifying...".to_string(),
                ClassificationState::Idle => match &model.last_prediction {
                    Some(prediction) => format!(
                        "Last: {} ({:.2})",
                        prediction.raw_label, prediction.confidence
                    ),
                    None => "Watching...".to_string(),
                },
            },
        }
    }
}
