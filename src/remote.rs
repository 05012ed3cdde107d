use std::io::Read;

use crate::error::LandsatError;

/// A byte stream handed out by a remote or by the cache.
pub type ArtifactStream = Box<dyn Read + Send>;

/// Anything that can open a stream for a URL. The real implementation talks HTTP, tests use an
/// in-memory double.
pub trait RemoteSource: Send + Sync {
    fn open(&self, url: &str) -> Result<ArtifactStream, LandsatError>;
}
