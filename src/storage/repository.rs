//! Repository contract for technology persistence.

use crate::schema::Technology;

use super::errors::StorageResult;

/// Durable mapping from integer id to technology record.
///
/// Implementations must be safe to share across request handlers.
pub trait TechnologyRepository: Send + Sync {
    /// Insert when `id` is unset (assigning a fresh id), otherwise overwrite
    /// the row with that id. Returns the stored record.
    fn save(&self, technology: Technology) -> StorageResult<Technology>;

    /// Look up a record. A missing id is `Ok(None)`, never an error.
    fn find_by_id(&self, id: i64) -> StorageResult<Option<Technology>>;

    /// Every stored record in ascending id order.
    fn find_all(&self) -> StorageResult<Vec<Technology>>;

    /// Remove a record. Absent ids are a no-op.
    fn delete_by_id(&self, id: i64) -> StorageResult<()>;
}
