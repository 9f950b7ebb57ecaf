use crate::taxonomy::{CanonicalBin, Taxonomy};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Cadence of the live-feed loop.
    pub display_rate: Duration,
    /// Cadence of the classification loop. Deliberately much slower than
    /// the display loop; inference is expensive and bins fill slowly.
    pub classify_rate: Duration,
    /// How long to wait before re-attempting a failed camera open.
    pub camera_retry: Duration,
    /// A classification only moves a bin when its confidence is strictly
    /// above this threshold.
    pub confidence_gate: f32,
    /// Baseline level every bin starts at and resets to.
    pub bin_floor: u8,
    /// Step applied to the on-screen counter per accepted classification.
    pub ui_step: u8,
    /// Step applied to the durable ledger per accepted classification.
    /// Coarser than `ui_step` on purpose; see DESIGN.md.
    pub durable_step: u8,
    /// How long transient status notes stay on screen.
    pub note_ttl: Duration,
    /// How long teardown waits for an in-flight classification before
    /// abandoning it.
    pub shutdown_grace: Duration,
    pub camera_index: i32,
    pub logger_timezone: chrono::FixedOffset,
    pub bin_table_path: PathBuf,
    pub record_log_path: PathBuf,
    pub taxonomy: Taxonomy,
}

impl Config {
    /// Reset baseline for every canonical bin.
    pub fn floors(&self) -> BTreeMap<CanonicalBin, u8> {
        CanonicalBin::ALL
            .into_iter()
            .map(|bin| (bin, self.bin_floor))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_rate: Duration::from_millis(30),
            classify_rate: Duration::from_millis(3000),
            camera_retry: Duration::from_secs(2),
            confidence_gate: 0.70,
            bin_floor: 10,
            ui_step: 1,
            durable_step: 10,
            note_ttl: Duration::from_secs(4),
            shutdown_grace: Duration::from_secs(5),
            camera_index: 0,
            logger_timezone: utc(),
            bin_table_path: PathBuf::from("sortyx_bins.json"),
            record_log_path: PathBuf::from("sortyx_predictions.jsonl"),
            taxonomy: Taxonomy::three_class(),
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(0).unwrap()
}
