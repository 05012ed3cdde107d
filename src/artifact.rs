use std::path::{Path, PathBuf};

const METADATA_DIR: &str = "metadata";
const BAND_DIR: &str = "bands";

/// The files that make up a scene on the remote archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Metadata,
    Quality,
    Band(u8),
}

impl ArtifactKind {
    pub fn file_name(&self, id: &str) -> String {
        match *self {
            ArtifactKind::Metadata => format!("{}_MTL.txt", id),
            ArtifactKind::Quality => format!("{}_BQA.TIF", id),
            ArtifactKind::Band(n) => format!("{}_B{}.TIF", id, n),
        }
    }

    pub fn url(&self, base_url: &str, id: &str) -> String {
        format!("{}{}", base_url, self.file_name(id))
    }

    /// Location of the artifact inside the cache tree.
    ///
    /// Metadata files carry the scene id twice, `{root}/metadata/{id}{id}_MTL.txt`. Existing
    /// caches are laid out this way, so the name is kept as is.
    pub fn cache_path(&self, cache_root: &Path, id: &str) -> PathBuf {
        match *self {
            ArtifactKind::Metadata => cache_root
                .join(METADATA_DIR)
                .join(format!("{}{}", id, self.file_name(id))),
            ArtifactKind::Quality | ArtifactKind::Band(_) => {
                cache_root.join(BAND_DIR).join(self.file_name(id))
            }
        }
    }

    pub fn is_raster(&self) -> bool {
        !matches!(self, ArtifactKind::Metadata)
    }
}
