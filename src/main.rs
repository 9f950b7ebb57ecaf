use sortyx::bin_store::impl_json::BinStoreJson;
use sortyx::bin_store::impl_memory::BinStoreMemory;
use sortyx::bin_store::interface::BinStore;
use sortyx::config::Config;
use sortyx::device_camera::interface::DeviceCamera;
use sortyx::device_display::impl_gui::DeviceDisplayGui;
use sortyx::image_classifier::adapter::ClassifierAdapter;
use sortyx::image_classifier::impl_fake::ImageClassifierFake;
use sortyx::image_classifier::interface::ImageClassifier;
use sortyx::library::logger::impl_console::LoggerConsole;
use sortyx::library::logger::interface::Logger;
use sortyx::record_log::impl_jsonl::RecordLogJsonl;
use sortyx::record_log::impl_memory::RecordLogMemory;
use sortyx::record_log::interface::RecordLog;
use sortyx::station::main::SortingStation;
use std::sync::{Arc, Mutex};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();
    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    // The classifier is the one resource the station is meaningless
    // without; failing to acquire it aborts startup.
    let model = load_classifier(&config, logger.clone()).map_err(|error| {
        let _ = logger.error(&format!("cannot load classifier: {}", error));
        error
    })?;
    let classifier = Arc::new(ClassifierAdapter::new(model));

    // Storage trouble degrades to in-memory state rather than killing the
    // live feed.
    let bin_store: Arc<dyn BinStore + Send + Sync> =
        match BinStoreJson::open(&config.bin_table_path, config.bin_floor) {
            Ok(store) => Arc::new(store),
            Err(error) => {
                let _ = logger.error(&format!("bin table unavailable, running volatile: {}", error));
                Arc::new(BinStoreMemory::new(config.bin_floor))
            }
        };
    let record_log: Arc<dyn RecordLog + Send + Sync> =
        match RecordLogJsonl::open(&config.record_log_path) {
            Ok(log) => Arc::new(log),
            Err(error) => {
                let _ = logger.error(&format!("record log unavailable, running volatile: {}", error));
                Arc::new(RecordLogMemory::new())
            }
        };

    let camera = open_camera(&config, logger.clone());

    let display = Arc::new(Mutex::new(DeviceDisplayGui::new()));
    display.lock().unwrap().open_window();

    let station = SortingStation::new(
        config,
        logger,
        camera,
        display,
        classifier,
        bin_store,
        record_log,
    );
    station.run()?;

    Ok(())
}

fn load_classifier(
    _config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Box<dyn ImageClassifier>, Box<dyn std::error::Error + Send + Sync>> {
    // Stand-in model; a deployment swaps in its real backend here.
    Ok(Box::new(ImageClassifierFake::new(logger)))
}

#[cfg(feature = "camera-opencv")]
fn open_camera(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    Arc::new(sortyx::device_camera::impl_opencv::DeviceCameraOpenCv::new(
        config.camera_index,
        logger,
    ))
}

#[cfg(not(feature = "camera-opencv"))]
fn open_camera(
    _config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    Arc::new(sortyx::device_camera::impl_fake::DeviceCameraFake::new(
        logger,
    ))
}
