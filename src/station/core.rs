use crate::config::Config;
use crate::device_display::interface::StationCommand;
use crate::error::{CaptureError, InferenceError, StorageError};
use crate::image_classifier::interface::ClassificationResult;
use crate::taxonomy::CanonicalBin;
use std::collections::BTreeMap;
use std::time::Instant;

/// Capture-side connection state. The camera starts disconnected; a failed
/// open backs off for the configured retry cadence before the next attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CameraState {
    #[default]
    Disconnected,
    Opening,
    Open,
    Backoff {
        since: Instant,
    },
}

/// In-memory counter for one bin: the responsive, per-event side of the
/// two-cadence design (the durable ledger moves in coarser steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinIndicator {
    pub level: u8,
    pub full: bool,
}

impl BinIndicator {
    fn at_floor(floor: u8) -> Self {
        Self {
            level: floor.min(100),
            full: false,
        }
    }

    /// One accepted classification. Clamps into [0, 100] and latches the
    /// full flag at 100; once full, further increments are no-ops until an
    /// explicit reset.
    fn accept(&mut self, step: u8) {
        self.level = self.level.saturating_add(step).min(100);
        if self.level == 100 {
            self.full = true;
        }
    }
}

/// At most one classification attempt is logically pending at any time;
/// ticks that fire while one is in flight are dropped, not queued.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ClassificationState {
    #[default]
    Idle,
    InFlight {
        since: Instant,
    },
}

/// Transient status note shown until it ages out.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub text: String,
    pub at: Instant,
}

impl Note {
    fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub camera: CameraState,
    pub bins: BTreeMap<CanonicalBin, BinIndicator>,
    pub classification: ClassificationState,
    pub last_prediction: Option<ClassificationResult>,
    pub note: Option<Note>,
    pub shutting_down: bool,
}

/// Outcome of one classification loop pass, reported by the effect that
/// ran it. When this is `Completed`, the audit record has already been
/// appended: the log is a superset of all bin-affecting events.
#[derive(Debug)]
pub enum ClassifyOutcome {
    Completed(ClassificationResult),
    FrameSkipped(CaptureError),
    Failed(InferenceError),
}

#[derive(Debug)]
pub enum Event {
    DisplayTick(Instant),
    ClassifyTick(Instant),
    CameraOpenDone(Result<(), CaptureError>),
    CameraLost,
    ClassifyDone(ClassifyOutcome),
    Command(StationCommand),
    ResetDone(Result<(), StorageError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubscribeDisplayTick,
    SubscribeClassifyTick,
    SubscribeCommands,
    OpenCamera,
    ShowDisplayFrame,
    RunClassification,
    /// Raise the durable ledger for one accepted classification.
    PersistAccepted { bin: CanonicalBin },
    /// Reset the durable ledger to the configured floors.
    ResetDurable,
    Notify,
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    let bins = CanonicalBin::ALL
        .into_iter()
        .map(|bin| (bin, BinIndicator::at_floor(config.bin_floor)))
        .collect();

    (
        Model {
            camera: CameraState::Disconnected,
            bins,
            classification: ClassificationState::Idle,
            last_prediction: None,
            note: None,
            shutting_down: false,
        },
        vec![
            Effect::SubscribeDisplayTick,
            Effect::SubscribeClassifyTick,
            Effect::SubscribeCommands,
        ],
    )
}

pub fn transition(config: &Config, mut model: Model, event: Event) -> (Model, Vec<Effect>) {
    match event {
        Event::DisplayTick(now) => {
            if model.shutting_down {
                return (model, vec![]);
            }
            match model.camera {
                CameraState::Open => (model, vec![Effect::ShowDisplayFrame]),
                CameraState::Disconnected => {
                    model.camera = CameraState::Opening;
                    (model, vec![Effect::OpenCamera])
                }
                CameraState::Backoff { since }
                    if now.duration_since(since) >= config.camera_retry =>
                {
                    model.camera = CameraState::Opening;
                    (model, vec![Effect::OpenCamera])
                }
                _ => (model, vec![]),
            }
        }

        Event::ClassifyTick(now) => {
            if model.shutting_down
                || model.camera != CameraState::Open
                || model.classification != ClassificationState::Idle
            {
                // Drop the tick: either nothing to classify from, or the
                // previous attempt is still in flight (no queueing).
                return (model, vec![]);
            }
            model.classification = ClassificationState::InFlight { since: now };
            (model, vec![Effect::RunClassification])
        }

        Event::CameraOpenDone(Ok(())) => {
            model.camera = CameraState::Open;
            (model, vec![])
        }
        Event::CameraOpenDone(Err(_)) => {
            model.camera = CameraState::Backoff {
                since: Instant::now(),
            };
            (model, vec![])
        }
        Event::CameraLost => {
            model.camera = CameraState::Backoff {
                since: Instant::now(),
            };
            model.note = Some(Note::now("Camera lost, reconnecting..."));
            (model, vec![])
        }

        Event::ClassifyDone(outcome) => {
            model.classification = ClassificationState::Idle;
            match outcome {
                ClassifyOutcome::Completed(result) => {
                    let accepted = config
                        .taxonomy
                        .normalize(&result.raw_label)
                        .filter(|_| result.confidence > config.confidence_gate);
                    model.last_prediction = Some(result);

                    match accepted {
                        Some(bin) => {
                            if let Some(indicator) = model.bins.get_mut(&bin) {
                                indicator.accept(config.ui_step);
                            }
                            (model, vec![Effect::PersistAccepted { bin }])
                        }
                        // Unrecognized label or gated-out confidence: the
                        // attempt is already in the audit log, no bin moves.
                        None => (model, vec![]),
                    }
                }
                ClassifyOutcome::FrameSkipped(CaptureError::Unavailable) => {
                    model.camera = CameraState::Backoff {
                        since: Instant::now(),
                    };
                    (model, vec![])
                }
                ClassifyOutcome::FrameSkipped(CaptureError::NoFrame) => (model, vec![]),
                ClassifyOutcome::Failed(_) => (model, vec![]),
            }
        }

        Event::Command(StationCommand::ResetLevels) => {
            for (_, indicator) in model.bins.iter_mut() {
                *indicator = BinIndicator::at_floor(config.bin_floor);
            }
            (model, vec![Effect::ResetDurable])
        }
        Event::Command(StationCommand::Notify) => {
            model.note = Some(Note::now("Notification dispatched"));
            (model, vec![Effect::Notify])
        }
        Event::Command(StationCommand::Shutdown) => {
            model.shutting_down = true;
            (model, vec![])
        }

        Event::ResetDone(Ok(())) => {
            model.note = Some(Note::now("Levels reset"));
            (model, vec![])
        }
        // Reset is an explicit user action; its storage failure is the one
        // that gets surfaced instead of dropped.
        Event::ResetDone(Err(error)) => {
            model.note = Some(Note::now(format!("Reset failed: {}", error)));
            (model, vec![])
        }
    }
}
