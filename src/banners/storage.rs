//! Filesystem-level banner storage.
//!
//! Handles decoding Base64 image payloads and storing them on disk under
//! the upload directory, using random-token naming.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use uuid::Uuid;

use bannerhub_common::{Error, Result};

/// Public URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Suffix appended to every stored file name.
const FILE_SUFFIX: &str = "_image.png";

/// Metadata about a stored banner file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBanner {
    /// File name under the upload directory.
    pub file_name: String,
    /// Public-prefixed relative path suitable for the static file route.
    pub public_path: String,
}

/// Filesystem manager for banner storage.
///
/// Writes each banner as a single file directly under the upload directory,
/// named `<token>_image.png` where the token is a random UUID.
#[derive(Debug, Clone)]
pub struct BannerStorage {
    upload_dir: PathBuf,
}

impl BannerStorage {
    /// Create a new `BannerStorage` with the given upload directory.
    pub fn new(upload_dir: PathBuf) -> Self {
        Self { upload_dir }
    }

    /// Returns the upload directory this storage writes into.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Decode a Base64 banner payload.
    ///
    /// Payloads optionally carry a data-URL header
    /// (`data:image/<subtype>;base64,`), which is stripped before decoding.
    /// The decoded bytes are stored as-is; no image validation is performed.
    pub fn decode_banner(payload: &str) -> Result<Vec<u8>> {
        let stripped = strip_data_url_prefix(payload);
        BASE64
            .decode(stripped.trim())
            .map_err(|e| Error::invalid_input(format!("Invalid Base64 image payload: {}", e)))
    }

    /// Store raw banner bytes under a freshly generated file name.
    ///
    /// The upload directory is created if it does not exist. Returns the
    /// file name and the public path to record in the database. An I/O
    /// failure here means no record must be written for this banner.
    pub fn store(&self, raw: &[u8]) -> Result<StoredBanner> {
        std::fs::create_dir_all(&self.upload_dir)?;

        let file_name = format!("{}{}", Uuid::new_v4().simple(), FILE_SUFFIX);
        let path = self.upload_dir.join(&file_name);
        std::fs::write(&path, raw)?;

        Ok(StoredBanner {
            public_path: format!("{}/{}", PUBLIC_PREFIX, file_name),
            file_name,
        })
    }

    /// Delete the file behind a stored reference.
    ///
    /// Accepts either a public path (`/uploads/<file>`) or a bare file
    /// name. Workflow callers treat failures as advisory and only log them.
    pub fn delete(&self, reference: &str) -> Result<()> {
        let path = self.path_for(file_name_of(reference))?;
        std::fs::remove_file(&path)?;
        Ok(())
    }

    /// Resolve a file name to its path under the upload directory.
    ///
    /// Rejects names that would escape the upload directory.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return Err(Error::invalid_input(format!(
                "Invalid banner file name: {}",
                file_name
            )));
        }
        Ok(self.upload_dir.join(file_name))
    }
}

/// Strip a `data:<mime>;base64,` header from a payload, if present.
fn strip_data_url_prefix(payload: &str) -> &str {
    if let Some(rest) = payload.strip_prefix("data:") {
        if let Some(idx) = rest.find(";base64,") {
            return &rest[idx + ";base64,".len()..];
        }
    }
    payload
}

/// Extract the bare file name from a stored reference.
fn file_name_of(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
