use crate::bin_store::interface::BinStore;
use crate::error::StorageError;
use crate::taxonomy::CanonicalBin;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory bin ledger for tests. Can be switched into an unavailable
/// state to exercise the storage failure paths.
pub struct BinStoreMemory {
    floor: u8,
    levels: Mutex<BTreeMap<CanonicalBin, u8>>,
    unavailable: AtomicBool,
}

impl BinStoreMemory {
    pub fn new(floor: u8) -> Self {
        let levels = CanonicalBin::ALL.into_iter().map(|b| (b, floor)).collect();
        Self {
            floor,
            levels: Mutex::new(levels),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::BinStoreUnavailable(
                "store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl BinStore for BinStoreMemory {
    fn get(&self, bin: CanonicalBin) -> Result<u8, StorageError> {
        self.check_available()?;
        let levels = self.levels.lock().unwrap();
        Ok(*levels.get(&bin).unwrap_or(&self.floor))
    }

    fn increment(&self, bin: CanonicalBin, delta: u8) -> Result<u8, StorageError> {
        self.check_available()?;
        let mut levels = self.levels.lock().unwrap();
        let current = *levels.get(&bin).unwrap_or(&self.floor);
        let next = current.saturating_add(delta).min(100);
        levels.insert(bin, next);
        Ok(next)
    }

    fn reset(&self, bin: CanonicalBin, floor: u8) -> Result<(), StorageError> {
        self.check_available()?;
        let mut levels = self.levels.lock().unwrap();
        levels.insert(bin, floor.min(100));
        Ok(())
    }

    fn reset_all(&self, floors: &BTreeMap<CanonicalBin, u8>) -> Result<(), StorageError> {
        self.check_available()?;
        let mut levels = self.levels.lock().unwrap();
        for (bin, floor) in floors {
            levels.insert(*bin, (*floor).min(100));
        }
        Ok(())
    }
}
