//! Banner service coordinating storage and database operations.
//!
//! Implements the upload, update, delete, and list workflows: each request
//! decodes its payload, stages the file on disk, then commits the database
//! row. A failed commit leaves the staged file for the orphan sweep; old
//! files are unlinked best-effort once the row no longer references them.

use bannerhub_common::{Error, Result, UserId};
use bannerhub_db::models::User;
use bannerhub_db::pool::{get_conn, DbPool};
use bannerhub_db::queries::users;

use super::storage::BannerStorage;

/// High-level banner service that coordinates filesystem storage with
/// database records.
pub struct BannerService {
    storage: BannerStorage,
    pool: DbPool,
}

/// Result of a successful create workflow.
#[derive(Debug, Clone)]
pub struct CreatedBanner {
    /// Auto-assigned ID of the new record.
    pub id: UserId,
    /// Public path recorded in the `banner` column.
    pub public_path: String,
}

impl BannerService {
    /// Create a new `BannerService`.
    ///
    /// # Arguments
    ///
    /// * `storage` - The filesystem banner storage backend
    /// * `pool` - Database connection pool
    pub fn new(storage: BannerStorage, pool: DbPool) -> Self {
        Self { storage, pool }
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &BannerStorage {
        &self.storage
    }

    /// Create a user record with a freshly stored banner.
    ///
    /// Validates presence of both fields, decodes the payload, writes the
    /// file, then inserts the record. If the insert fails the staged file
    /// is left on disk for the sweep to reclaim.
    pub fn create(&self, name: &str, banner: &str) -> Result<CreatedBanner> {
        validate_fields(name, banner)?;

        let raw = BannerStorage::decode_banner(banner)?;
        let stored = self.storage.store(&raw)?;

        let conn = get_conn(&self.pool)?;
        let id = match users::insert_user(&conn, name, Some(stored.public_path.as_str())) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    "user insert failed, banner {} left for sweep: {}",
                    stored.file_name,
                    e
                );
                return Err(e);
            }
        };

        Ok(CreatedBanner {
            id,
            public_path: stored.public_path,
        })
    }

    /// Replace a user's name and banner.
    ///
    /// The record is looked up before any file is written, so an unknown
    /// ID never stages a blob. On success the previous banner file is
    /// unlinked best-effort.
    pub fn update(&self, id: UserId, name: &str, banner: &str) -> Result<String> {
        validate_fields(name, banner)?;

        let conn = get_conn(&self.pool)?;
        let existing = users::get_user(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("user {}", id)))?;

        let raw = BannerStorage::decode_banner(banner)?;
        let stored = self.storage.store(&raw)?;

        let updated = users::update_user(&conn, id, name, Some(stored.public_path.as_str()))?;
        if !updated {
            // Row vanished between the lookup and the update; the new file
            // is left for the sweep.
            return Err(Error::not_found(format!("user {}", id)));
        }

        if let Some(old) = existing.banner {
            if let Err(e) = self.storage.delete(&old) {
                tracing::warn!("failed to remove replaced banner {}: {}", old, e);
            }
        }

        Ok(stored.public_path)
    }

    /// Delete a user record and its banner.
    ///
    /// The row is removed first; the banner file is then unlinked
    /// best-effort.
    pub fn delete(&self, id: UserId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        let existing = users::get_user(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("user {}", id)))?;

        let deleted = users::delete_user(&conn, id)?;
        if !deleted {
            return Err(Error::not_found(format!("user {}", id)));
        }

        if let Some(banner) = existing.banner {
            if let Err(e) = self.storage.delete(&banner) {
                tracing::warn!("failed to remove banner {} of deleted user: {}", banner, e);
            }
        }

        Ok(())
    }

    /// List all user records.
    pub fn list(&self) -> Result<Vec<User>> {
        let conn = get_conn(&self.pool)?;
        users::list_users(&conn)
    }
}

/// Reject requests missing either required field.
fn validate_fields(name: &str, banner: &str) -> Result<()> {
    if name.is_empty() || banner.is_empty() {
        return Err(Error::invalid_input("Name and file are required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bannerhub_db::pool::init_memory_pool;

    const PNG_PAYLOAD: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn test_service() -> (BannerService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = BannerStorage::new(dir.path().to_path_buf());
        let pool = init_memory_pool().unwrap();
        (BannerService::new(storage, pool), dir)
    }

    fn upload_dir_entries(dir: &tempfile::TempDir) -> Vec<std::path::PathBuf> {
        match std::fs::read_dir(dir.path()) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_create_writes_file_and_record() {
        let (service, dir) = test_service();

        let created = service.create("Alice", PNG_PAYLOAD).unwrap();
        assert_eq!(created.id.get(), 1);
        assert!(created.public_path.starts_with("/uploads/"));

        let files = upload_dir_entries(&dir);
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read(&files[0]).unwrap(), b"\x89PNG\r\n\x1a\n");

        let users = service.list().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alice");
        assert_eq!(users[0].banner, Some(created.public_path));
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let (service, dir) = test_service();

        let err = service.create("", PNG_PAYLOAD).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = service.create("Alice", "").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // Nothing was staged or recorded
        assert!(upload_dir_entries(&dir).is_empty());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_base64() {
        let (service, dir) = test_service();

        let err = service.create("Alice", "!!not-base64!!").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(upload_dir_entries(&dir).is_empty());
    }

    #[test]
    fn test_update_unknown_id_writes_nothing() {
        let (service, dir) = test_service();

        let err = service
            .update(UserId::from(999), "Alice", PNG_PAYLOAD)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // The existence check runs before any blob write
        assert!(upload_dir_entries(&dir).is_empty());
    }

    #[test]
    fn test_update_replaces_banner() {
        let (service, dir) = test_service();

        let created = service.create("Alice", PNG_PAYLOAD).unwrap();
        let old_file = dir.path().join(created.public_path.rsplit('/').next().unwrap());
        assert!(old_file.exists());

        let new_path = service
            .update(created.id, "Alicia", "data:image/png;base64,aGVsbG8=")
            .unwrap();
        assert_ne!(new_path, created.public_path);

        // Old blob gone, new blob present with the new bytes
        assert!(!old_file.exists());
        let files = upload_dir_entries(&dir);
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read(&files[0]).unwrap(), b"hello");

        let users = service.list().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alicia");
        assert_eq!(users[0].banner, Some(new_path));
    }

    #[test]
    fn test_delete_removes_record_and_blob() {
        let (service, dir) = test_service();

        let created = service.create("Alice", PNG_PAYLOAD).unwrap();
        service.delete(created.id).unwrap();

        assert!(service.list().unwrap().is_empty());
        assert!(upload_dir_entries(&dir).is_empty());
    }

    #[test]
    fn test_delete_unknown_id() {
        let (service, _dir) = test_service();

        let err = service.delete(UserId::from(42)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_survives_missing_blob() {
        let (service, dir) = test_service();

        let created = service.create("Alice", PNG_PAYLOAD).unwrap();
        // Remove the file behind the service's back; delete still succeeds
        for f in upload_dir_entries(&dir) {
            std::fs::remove_file(f).unwrap();
        }

        service.delete(created.id).unwrap();
        assert!(service.list().unwrap().is_empty());
    }
}
