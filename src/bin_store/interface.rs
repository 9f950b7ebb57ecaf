use crate::error::StorageError;
use crate::taxonomy::CanonicalBin;
use std::collections::BTreeMap;

/// Durable per-bin ledger, one row per canonical bin, levels in [0, 100].
///
/// Implementations guarantee that a single-bin mutation is atomic with
/// respect to concurrent readers, and that `reset_all` never interleaves
/// with an in-flight `increment`: a pending increment lands entirely
/// before or entirely after the reset, never into a half-reset table.
pub trait BinStore: Send + Sync {
    /// Current level; the configured floor for bins never written.
    fn get(&self, bin: CanonicalBin) -> Result<u8, StorageError>;

    /// Adds `delta`, clamping the result into [0, 100]. Returns the new
    /// level.
    fn increment(&self, bin: CanonicalBin, delta: u8) -> Result<u8, StorageError>;

    /// Sets the level to `floor` unconditionally.
    fn reset(&self, bin: CanonicalBin, floor: u8) -> Result<(), StorageError>;

    /// Resets every canonical bin in one logically atomic step.
    fn reset_all(&self, floors: &BTreeMap<CanonicalBin, u8>) -> Result<(), StorageError>;
}
