//! On-disk audio cache with a size-threshold validity gate.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use super::error::SynthesisError;
use crate::error::AppResult;

/// Files smaller than this are treated as truncated downloads or error
/// pages, never as playable audio.
pub const MIN_VALID_BYTES: u64 = 1024;

/// Addresses cached artifacts under a single root directory. The root must
/// exist before the store is used; creating it is a startup concern.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return `path` when a valid artifact already exists there, otherwise
    /// run `synthesize` and persist its output.
    ///
    /// A hit refreshes the file's modification time without rewriting
    /// content, so an external mtime-based reaper keeps entries that are
    /// still wanted. An undersized file counts as a miss and is overwritten.
    /// On synthesis failure the error propagates and any existing corrupt
    /// file stays in place; the next call detects it as undersized again.
    pub async fn lookup_or_synthesize<F, Fut>(&self, path: &Path, synthesize: F) -> AppResult<PathBuf>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, SynthesisError>>,
    {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() && meta.len() >= MIN_VALID_BYTES => {
                touch(path)?;
                info!(path = %path.display(), size = meta.len(), "cache hit");
                return Ok(path.to_path_buf());
            }
            Ok(meta) => {
                info!(
                    path = %path.display(),
                    size = meta.len(),
                    "cache entry undersized, regenerating"
                );
            }
            Err(_) => {
                debug!(path = %path.display(), "cache miss");
            }
        }

        let audio = synthesize().await?;
        tokio::fs::write(path, &audio).await?;
        info!(path = %path.display(), size = audio.len(), "cache entry written");
        Ok(path.to_path_buf())
    }
}

/// Bump the modification time without rewriting content.
fn touch(path: &Path) -> std::io::Result<()> {
    let file = std::fs::OpenOptions::new().append(true).open(path)?;
    file.set_modified(SystemTime::now())
}
