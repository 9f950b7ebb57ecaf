use crate::config::Config;
use crate::device_display::interface::StationCommand;
use crate::error::{CaptureError, InferenceError, StorageError};
use crate::image_classifier::interface::ClassificationResult;
use crate::station::core::{
    init, transition, BinIndicator, CameraState, ClassificationState, ClassifyOutcome, Effect,
    Event, Model,
};
use crate::taxonomy::CanonicalBin;
use std::time::Instant;

fn scored(label: &str, confidence: f32) -> Event {
    Event::ClassifyDone(ClassifyOutcome::Completed(ClassificationResult {
        raw_label: label.to_string(),
        confidence,
    }))
}

fn open_model(config: &Config) -> Model {
    let (mut model, _) = init(config);
    model.camera = CameraState::Open;
    model
}

#[test]
fn test_init_starts_all_bins_at_floor() {
    let config = Config::default();
    let (model, effects) = init(&config);

    assert_eq!(model.camera, CameraState::Disconnected);
    assert_eq!(model.classification, ClassificationState::Idle);
    assert!(!model.shutting_down);
    for bin in CanonicalBin::ALL {
        let indicator = model.bins[&bin];
        assert_eq!(indicator.level, config.bin_floor);
        assert!(!indicator.full);
    }
    assert_eq!(
        effects,
        vec![
            Effect::SubscribeDisplayTick,
            Effect::SubscribeClassifyTick,
            Effect::SubscribeCommands,
        ]
    );
}

#[test]
fn test_first_display_tick_opens_the_camera() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, effects) = transition(&config, model, Event::DisplayTick(Instant::now()));

    assert_eq!(model.camera, CameraState::Opening);
    assert_eq!(effects, vec![Effect::OpenCamera]);

    // While the open is pending, further ticks do nothing.
    let (model, effects) = transition(&config, model, Event::DisplayTick(Instant::now()));
    assert_eq!(model.camera, CameraState::Opening);
    assert!(effects.is_empty());
}

#[test]
fn test_open_camera_success_then_frames_flow() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, effects) = transition(&config, model, Event::CameraOpenDone(Ok(())));
    assert_eq!(model.camera, CameraState::Open);
    assert!(effects.is_empty());

    let (_, effects) = transition(&config, model, Event::DisplayTick(Instant::now()));
    assert_eq!(effects, vec![Effect::ShowDisplayFrame]);
}

#[test]
fn test_failed_open_backs_off_for_the_retry_cadence() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, _) = transition(
        &config,
        model,
        Event::CameraOpenDone(Err(CaptureError::Unavailable)),
    );
    let since = match model.camera {
        CameraState::Backoff { since } => since,
        other => panic!("unexpected camera state: {:?}", other),
    };

    // Too early: no reopen attempt.
    let (model, effects) = transition(&config, model, Event::DisplayTick(since));
    assert!(effects.is_empty());

    // Cadence elapsed: try again.
    let (model, effects) = transition(
        &config,
        model,
        Event::DisplayTick(since + config.camera_retry),
    );
    assert_eq!(model.camera, CameraState::Opening);
    assert_eq!(effects, vec![Effect::OpenCamera]);
}

#[test]
fn test_camera_lost_during_display_read() {
    let config = Config::default();
    let model = open_model(&config);

    let (model, effects) = transition(&config, model, Event::CameraLost);

    assert!(matches!(model.camera, CameraState::Backoff { .. }));
    assert!(effects.is_empty());
}

#[test]
fn test_classify_tick_starts_exactly_one_attempt() {
    let config = Config::default();
    let model = open_model(&config);

    let (model, effects) = transition(&config, model, Event::ClassifyTick(Instant::now()));
    assert!(matches!(
        model.classification,
        ClassificationState::InFlight { .. }
    ));
    assert_eq!(effects, vec![Effect::RunClassification]);

    // Overrun: the next tick is dropped, not queued.
    let (model, effects) = transition(&config, model, Event::ClassifyTick(Instant::now()));
    assert!(matches!(
        model.classification,
        ClassificationState::InFlight { .. }
    ));
    assert!(effects.is_empty());
}

#[test]
fn test_classify_tick_without_camera_is_dropped() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, effects) = transition(&config, model, Event::ClassifyTick(Instant::now()));

    assert_eq!(model.classification, ClassificationState::Idle);
    assert!(effects.is_empty());
}

#[test]
fn test_accepted_classification_moves_one_bin() {
    let config = Config::default();
    let model = open_model(&config);

    let (model, effects) = transition(&config, model, scored("Recyclable_item", 0.85));

    assert_eq!(
        model.bins[&CanonicalBin::Recyclable].level,
        config.bin_floor + 1
    );
    assert_eq!(model.bins[&CanonicalBin::NonRecyclable].level, config.bin_floor);
    assert_eq!(model.bins[&CanonicalBin::Organic].level, config.bin_floor);
    assert_eq!(
        effects,
        vec![Effect::PersistAccepted {
            bin: CanonicalBin::Recyclable
        }]
    );
    assert_eq!(model.classification, ClassificationState::Idle);
}

#[test]
fn test_unrecognized_label_moves_nothing() {
    let config = Config::default();
    let model = open_model(&config);

    let (model, effects) = transition(&config, model, scored("Glass", 0.95));

    for bin in CanonicalBin::ALL {
        assert_eq!(model.bins[&bin].level, config.bin_floor);
    }
    assert!(effects.is_empty());
}

#[test]
fn test_confidence_at_or_below_gate_moves_nothing() {
    let config = Config::default();

    let (model, effects) = transition(&config, open_model(&config), scored("Organic", 0.50));
    assert_eq!(model.bins[&CanonicalBin::Organic].level, config.bin_floor);
    assert!(effects.is_empty());

    // The gate is strict: exactly 0.70 is still rejected.
    let (model, effects) = transition(&config, open_model(&config), scored("Organic", 0.70));
    assert_eq!(model.bins[&CanonicalBin::Organic].level, config.bin_floor);
    assert!(effects.is_empty());
}

#[test]
fn test_bin_saturates_at_100_and_latches_full() {
    let config = Config::default();
    let mut model = open_model(&config);
    model.bins.insert(
        CanonicalBin::Organic,
        BinIndicator {
            level: 99,
            full: false,
        },
    );

    let (model, _) = transition(&config, model, scored("Organic", 0.9));
    assert_eq!(model.bins[&CanonicalBin::Organic].level, 100);
    assert!(model.bins[&CanonicalBin::Organic].full);

    // Further accepted classifications are clamped; the flag stays set.
    let (model, _) = transition(&config, model, scored("Compost", 0.95));
    assert_eq!(model.bins[&CanonicalBin::Organic].level, 100);
    assert!(model.bins[&CanonicalBin::Organic].full);
}

#[test]
fn test_reset_restores_floors_and_clears_full_flags() {
    let config = Config::default();
    let mut model = open_model(&config);
    model.bins.insert(
        CanonicalBin::Organic,
        BinIndicator {
            level: 100,
            full: true,
        },
    );
    model.bins.insert(
        CanonicalBin::Recyclable,
        BinIndicator {
            level: 42,
            full: false,
        },
    );

    let (model, effects) = transition(
        &config,
        model,
        Event::Command(StationCommand::ResetLevels),
    );

    for bin in CanonicalBin::ALL {
        assert_eq!(model.bins[&bin].level, config.bin_floor);
        assert!(!model.bins[&bin].full);
    }
    assert_eq!(effects, vec![Effect::ResetDurable]);
}

#[test]
fn test_reset_failure_is_surfaced() {
    let config = Config::default();
    let model = open_model(&config);

    let (model, _) = transition(
        &config,
        model,
        Event::ResetDone(Err(StorageError::BinStoreUnavailable(
            "disk gone".to_string(),
        ))),
    );

    let note = model.note.expect("reset failure should leave a note");
    assert!(note.text.contains("Reset failed"));
}

#[test]
fn test_skipped_and_failed_attempts_return_to_idle() {
    let config = Config::default();

    let mut model = open_model(&config);
    model.classification = ClassificationState::InFlight {
        since: Instant::now(),
    };
    let (model, effects) = transition(
        &config,
        model,
        Event::ClassifyDone(ClassifyOutcome::FrameSkipped(CaptureError::NoFrame)),
    );
    assert_eq!(model.classification, ClassificationState::Idle);
    assert_eq!(model.camera, CameraState::Open);
    assert!(effects.is_empty());

    let mut model = open_model(&config);
    model.classification = ClassificationState::InFlight {
        since: Instant::now(),
    };
    let (model, effects) = transition(
        &config,
        model,
        Event::ClassifyDone(ClassifyOutcome::Failed(InferenceError::ModelFailure(
            "timeout".to_string(),
        ))),
    );
    assert_eq!(model.classification, ClassificationState::Idle);
    assert!(effects.is_empty());
}

#[test]
fn test_classification_read_losing_the_camera_triggers_reconnect() {
    let config = Config::default();
    let mut model = open_model(&config);
    model.classification = ClassificationState::InFlight {
        since: Instant::now(),
    };

    let (model, _) = transition(
        &config,
        model,
        Event::ClassifyDone(ClassifyOutcome::FrameSkipped(CaptureError::Unavailable)),
    );

    assert!(matches!(model.camera, CameraState::Backoff { .. }));
    assert_eq!(model.classification, ClassificationState::Idle);
}

#[test]
fn test_shutdown_stops_both_loops() {
    let config = Config::default();
    let model = open_model(&config);

    let (model, effects) = transition(&config, model, Event::Command(StationCommand::Shutdown));
    assert!(model.shutting_down);
    assert!(effects.is_empty());

    let (model, effects) = transition(&config, model, Event::DisplayTick(Instant::now()));
    assert!(effects.is_empty());
    let (_, effects) = transition(&config, model, Event::ClassifyTick(Instant::now()));
    assert!(effects.is_empty());
}
