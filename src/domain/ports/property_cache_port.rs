//! Port definition for processed property caching.

use crate::domain::entities::ProcessedProperty;

/// Port for memoizing processed properties by id.
/// Implementations must be thread-safe.
#[cfg_attr(test, mockall::automock)]
pub trait PropertyCachePort: Send + Sync {
    /// Returns the cached record if present and not expired.
    fn get(&self, id: &str) -> Option<ProcessedProperty>;

    /// Stores a record, evicting others if the cache is full.
    fn set(&self, id: &str, data: ProcessedProperty);

    /// Returns whether a live record exists for `id`.
    fn has(&self, id: &str) -> bool;

    /// Returns the number of stored records, expired ones included.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every record.
    fn clear(&self);
}
