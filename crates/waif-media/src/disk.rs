//! [`DiskImageStore`] — content-addressed image files on local disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use waif_core::media::{ImageStore, MediaError};

use crate::{Result, parse::parse_data_uri};

/// Stores decoded payloads under a media root, named by their SHA-256
/// digest, and serves them from a public base URL. Identical payloads
/// dedupe to the same file and URL.
#[derive(Clone)]
pub struct DiskImageStore {
  root:        PathBuf,
  public_base: String,
}

impl DiskImageStore {
  /// Create the store, ensuring `root` exists.
  pub async fn open(
    root: impl AsRef<Path>,
    public_base: impl Into<String>,
  ) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&root).await?;
    let public_base = public_base.into().trim_end_matches('/').to_string();
    Ok(Self { root, public_base })
  }

  async fn write(&self, payload: &str) -> Result<String> {
    let image = parse_data_uri(payload)?;

    let digest = Sha256::digest(&image.bytes);
    let file_name = format!("{}.{}", hex::encode(digest), image.extension);
    let path = self.root.join(&file_name);

    // Re-uploading identical bytes lands on the same path; the write is a
    // no-op overwrite rather than an error.
    tokio::fs::write(&path, &image.bytes).await?;
    tracing::debug!(file = %file_name, size = image.bytes.len(), "stored image");

    Ok(format!("{}/{}", self.public_base, file_name))
  }
}

#[async_trait]
impl ImageStore for DiskImageStore {
  async fn put(&self, payload: &str) -> Result<String, MediaError> {
    self.write(payload).await.map_err(MediaError::from)
  }
}
