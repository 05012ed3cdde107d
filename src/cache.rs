use std::{
    fs::{self, File},
    io,
    path::Path,
    sync::Arc,
};

use crate::{
    error::LandsatError,
    remote::{ArtifactStream, RemoteSource},
};
use tempfile::NamedTempFile;

/// Check-then-fetch file cache in front of a remote.
///
/// Two workers asking for the same missing artifact at once will both download it and the later
/// rename wins. Artifact content never changes, so the only cost is the extra transfer.
pub struct ArtifactCache<R: RemoteSource> {
    remote: Arc<R>,
}

impl<R: RemoteSource> Clone for ArtifactCache<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<R: RemoteSource> ArtifactCache<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    /// Open `url`, going through the cache file at `local` when `cache` is set.
    ///
    /// A cached stream is always read back from disk, so a fetch and a later cache hit hand out
    /// the same bytes.
    pub fn fetch(
        &self,
        url: &str,
        local: &Path,
        cache: bool,
    ) -> Result<ArtifactStream, LandsatError> {
        if !cache {
            return self.remote.open(url);
        }

        if local.is_file() {
            log::debug!("Cached copy found: {:?}", local);
        } else {
            self.store(url, local)?;
        }

        Ok(Box::new(File::open(local)?))
    }

    /// Download into a temporary file next to `local` and move it into place once complete, so
    /// the cache path never names a partial download.
    fn store(&self, url: &str, local: &Path) -> Result<(), LandsatError> {
        let mut body = self.remote.open(url).map_err(|err| {
            log::debug!("Request failed: {} : {}", url, err);
            err
        })?;

        let dir = match local.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut part = NamedTempFile::new_in(dir).map_err(|err| {
            log::error!("Local file creation failed: {:?} : {}", dir, err);
            err
        })?;

        if let Err(err) = io::copy(&mut body, &mut part) {
            log::warn!("Failed to save remote data: {:?} : {}", local, err);
            return Err(err.into());
        }

        part.persist(local).map_err(|err| {
            log::error!("Failed to move download into cache: {:?} : {}", local, err);
            err.error
        })?;

        log::debug!("Cached {}", url);
        Ok(())
    }
}
