use crate::bin_store::interface::BinStore;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::image_classifier::adapter::ClassifierAdapter;
use crate::library::logger::interface::Logger;
use crate::record_log::interface::RecordLog;
use crate::station::core::{init, transition, Event};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Tracks whether a classification attempt is in flight so teardown can
/// wait for it (or abandon it after the grace period).
pub struct ClassificationGate {
    busy: Mutex<bool>,
    idle: Condvar,
}

impl ClassificationGate {
    fn new() -> Self {
        Self {
            busy: Mutex::new(false),
            idle: Condvar::new(),
        }
    }

    pub fn enter(&self) -> GateGuard<'_> {
        *self.busy.lock().unwrap() = true;
        GateGuard { gate: self }
    }

    /// Blocks until no attempt is in flight, up to `timeout`. Returns
    /// whether the gate went idle in time.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let busy = self.busy.lock().unwrap();
        let (busy, _) = self
            .idle
            .wait_timeout_while(busy, timeout, |busy| *busy)
            .unwrap();
        !*busy
    }
}

/// Marks the gate idle again on every exit path, panics included.
pub struct GateGuard<'a> {
    gate: &'a ClassificationGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        *self.gate.busy.lock().unwrap() = false;
        self.gate.idle.notify_all();
    }
}

#[derive(Clone)]
pub struct SortingStation {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay>>,
    pub classifier: Arc<ClassifierAdapter>,
    pub bin_store: Arc<dyn BinStore + Send + Sync>,
    pub record_log: Arc<dyn RecordLog + Send + Sync>,
    pub event_sender: Sender<Event>,
    pub(super) event_receiver: Arc<Mutex<Receiver<Event>>>,
    pub(super) running: Arc<AtomicBool>,
    pub(super) classification_gate: Arc<ClassificationGate>,
}

impl SortingStation {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay>>,
        classifier: Arc<ClassifierAdapter>,
        bin_store: Arc<dyn BinStore + Send + Sync>,
        record_log: Arc<dyn RecordLog + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();

        Self {
            config,
            logger,
            device_camera,
            device_display,
            classifier,
            bin_store,
            record_log,
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            running: Arc::new(AtomicBool::new(true)),
            classification_gate: Arc::new(ClassificationGate::new()),
        }
    }

    pub(super) fn spawn_effects(&self, effects: Vec<crate::station::core::Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.interpret_effect(effect));
        }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (mut model, effects) = init(&self.config);
        self.spawn_effects(effects);

        loop {
            let event = match self.event_receiver.lock().unwrap().recv() {
                Ok(event) => event,
                Err(error) => return Err(Box::new(error)),
            };

            if !matches!(event, Event::DisplayTick(_)) {
                let _ = self.logger.info(&format!("event: {:?}", event));
            }

            let (new_model, effects) = transition(&self.config, model, event);
            model = new_model;

            if let Err(error) = self.render(&model) {
                let _ = self.logger.error(&format!("render failed: {}", error));
            }

            self.spawn_effects(effects);

            if model.shutting_down {
                break;
            }
        }

        self.teardown();
        Ok(())
    }

    fn teardown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.logger.info("shutting down");

        if !self
            .classification_gate
            .wait_idle(self.config.shutdown_grace)
        {
            let _ = self
                .logger
                .warn("abandoning in-flight classification after grace period");
        }

        self.device_camera.close();
        let _ = self.logger.info("teardown complete");
    }
}
