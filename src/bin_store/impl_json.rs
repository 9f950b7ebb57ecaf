use crate::bin_store::interface::BinStore;
use crate::error::StorageError;
use crate::taxonomy::CanonicalBin;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Bin ledger persisted as a single JSON table keyed by bin name.
///
/// All mutations run under one interior mutex, which is what makes
/// `increment` atomic for readers and keeps `reset_all` from interleaving
/// with an in-flight increment. Writes go to a temp file first and are
/// renamed into place so a crash cannot truncate the table.
pub struct BinStoreJson {
    path: PathBuf,
    floor: u8,
    levels: Mutex<BTreeMap<CanonicalBin, u8>>,
}

impl BinStoreJson {
    /// Opens the table, seeding any missing bin at `floor` (first run).
    pub fn open(path: impl Into<PathBuf>, floor: u8) -> Result<Self, StorageError> {
        let path = path.into();
        let mut levels: BTreeMap<CanonicalBin, u8> = BTreeMap::new();

        if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StorageError::BinStoreUnavailable(e.to_string()))?;
            let by_name: BTreeMap<String, u8> = serde_json::from_str(&raw)
                .map_err(|e| StorageError::BinStoreUnavailable(e.to_string()))?;
            for (name, level) in by_name {
                if let Some(bin) = CanonicalBin::from_name(&name) {
                    levels.insert(bin, level.min(100));
                }
            }
        }

        for bin in CanonicalBin::ALL {
            levels.entry(bin).or_insert(floor);
        }

        let store = Self {
            path,
            floor,
            levels: Mutex::new(levels),
        };
        {
            let levels = store.levels.lock().unwrap();
            store.persist(&levels)?;
        }
        Ok(store)
    }

    fn persist(&self, levels: &BTreeMap<CanonicalBin, u8>) -> Result<(), StorageError> {
        let by_name: BTreeMap<&str, u8> = levels
            .iter()
            .map(|(bin, level)| (bin.as_str(), *level))
            .collect();
        let raw = serde_json::to_string_pretty(&by_name)
            .map_err(|e| StorageError::BinStoreUnavailable(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| StorageError::BinStoreUnavailable(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::BinStoreUnavailable(e.to_string()))
    }
}

impl BinStore for BinStoreJson {
    fn get(&self, bin: CanonicalBin) -> Result<u8, StorageError> {
        let levels = self.levels.lock().unwrap();
        Ok(*levels.get(&bin).unwrap_or(&self.floor))
    }

    fn increment(&self, bin: CanonicalBin, delta: u8) -> Result<u8, StorageError> {
        let mut levels = self.levels.lock().unwrap();
        let current = *levels.get(&bin).unwrap_or(&self.floor);
        let next = current.saturating_add(delta).min(100);
        levels.insert(bin, next);
        self.persist(&levels)?;
        Ok(next)
    }

    fn reset(&self, bin: CanonicalBin, floor: u8) -> Result<(), StorageError> {
        let mut levels = self.levels.lock().unwrap();
        levels.insert(bin, floor.min(100));
        self.persist(&levels)
    }

    fn reset_all(&self, floors: &BTreeMap<CanonicalBin, u8>) -> Result<(), StorageError> {
        let mut levels = self.levels.lock().unwrap();
        for (bin, floor) in floors {
            levels.insert(*bin, (*floor).min(100));
        }
        self.persist(&levels)
    }
}
