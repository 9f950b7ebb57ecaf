use crate::error::CaptureError;
use crate::record_log::interface::NewRecord;
use crate::station::core::{ClassifyOutcome, Effect, Event};
use crate::station::main::SortingStation;
use std::sync::atomic::Ordering;
use std::time::Instant;

impl SortingStation {
    pub fn interpret_effect(&self, effect: Effect) {
        match effect {
            Effect::SubscribeDisplayTick => {
                while self.running.load(Ordering::SeqCst) {
                    std::thread::sleep(self.config.display_rate);
                    if self.event_sender.send(Event::DisplayTick(Instant::now())).is_err() {
                        break;
                    }
                }
            }

            Effect::SubscribeClassifyTick => {
                while self.running.load(Ordering::SeqCst) {
                    std::thread::sleep(self.config.classify_rate);
                    if self.event_sender.send(Event::ClassifyTick(Instant::now())).is_err() {
                        break;
                    }
                }
            }

            Effect::SubscribeCommands => {
                let commands = self.device_display.lock().unwrap().commands();
                loop {
                    match commands.recv() {
                        Ok(command) => {
                            if self.event_sender.send(Event::Command(command)).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            }

            Effect::OpenCamera => {
                let result = self.device_camera.open();
                if result.is_err() {
                    let _ = self
                        .logger
                        .warn("capture device unavailable, will retry");
                }
                let _ = self.event_sender.send(Event::CameraOpenDone(result));
            }

            Effect::ShowDisplayFrame => match self.device_camera.read_frame() {
                Ok(frame) => {
                    let mirrored = frame.mirrored();
                    let presented = self.device_display.lock().unwrap().present_frame(mirrored);
                    if let Err(error) = presented {
                        let _ = self
                            .logger
                            .warn(&format!("frame presentation failed: {}", error));
                    }
                }
                // Transient: skip this tick, keep the handle.
                Err(CaptureError::NoFrame) => {}
                Err(CaptureError::Unavailable) => {
                    let _ = self.event_sender.send(Event::CameraLost);
                }
            },

            Effect::RunClassification => {
                let outcome = self.classification_attempt();
                let _ = self.event_sender.send(Event::ClassifyDone(outcome));
            }

            Effect::PersistAccepted { bin } => {
                match self.bin_store.increment(bin, self.config.durable_step) {
                    Ok(level) => {
                        let _ = self
                            .logger
                            .info(&format!("{} ledger level now {}", bin, level));
                    }
                    // Background tick: recovered locally, never fatal.
                    Err(error) => {
                        let _ = self
                            .logger
                            .warn(&format!("ledger update dropped: {}", error));
                    }
                }
            }

            Effect::ResetDurable => {
                let floors = self.config.floors();
                let result = self.bin_store.reset_all(&floors);
                let _ = self.event_sender.send(Event::ResetDone(result));
            }

            Effect::Notify => {
                let _ = self.logger.info("notification dispatched (placeholder)");
            }
        }
    }

    /// One full classification pass: read a frame, classify it under the
    /// adapter's lock, and append the audit record. The append happens
    /// before the outcome reaches the controller, so the log always
    /// precedes any bin mutation derived from it.
    pub(super) fn classification_attempt(&self) -> ClassifyOutcome {
        let _guard = self.classification_gate.enter();

        let frame = match self.device_camera.read_frame() {
            Ok(frame) => frame,
            Err(error) => return ClassifyOutcome::FrameSkipped(error),
        };

        let result = match self.classifier.classify(&frame) {
            Ok(result) => result,
            Err(error) => {
                let _ = self.logger.warn(&format!("inference failed: {}", error));
                return ClassifyOutcome::Failed(error);
            }
        };

        let record = NewRecord {
            source_tag: frame.source_tag.clone(),
            raw_label: result.raw_label.clone(),
            confidence: result.confidence,
            timestamp: chrono::Utc::now(),
        };
        if let Err(error) = self.record_log.append(record) {
            // Dropped, never retried inline.
            let _ = self
                .logger
                .warn(&format!("audit record dropped: {}", error));
        }

        ClassifyOutcome::Completed(result)
    }
}
