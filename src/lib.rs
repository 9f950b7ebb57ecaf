pub mod bin_store;
pub mod config;
pub mod device_camera;
pub mod device_display;
pub mod error;
pub mod frame;
pub mod image_classifier;
pub mod library;
pub mod record_log;
pub mod station;
pub mod taxonomy;
