use std::io::{BufRead, BufReader, Read};

use crate::{
    artifact::ArtifactKind, catalog::SceneRecord, error::LandsatError, level::ProcessingLevel,
    remote::ArtifactStream,
};
use chrono::naive::NaiveDateTime;

const SUN_ELEVATION_KEY: &str = "SUN_ELEVATION = ";

/// One acquisition, able to answer questions about itself and to hand out its artifacts.
///
/// A scene is owned by a single worker for its whole life, so `is_day` takes `&mut self` and may
/// remember its answer without any locking.
pub trait Scene {
    fn id(&self) -> &str;

    fn acquisition(&self) -> NaiveDateTime;

    fn cloud_cover(&self) -> f64;

    fn processing_level(&self) -> ProcessingLevel;

    fn is_day(&mut self) -> Result<bool, LandsatError>;

    fn artifact(&self, kind: ArtifactKind) -> Result<ArtifactStream, LandsatError>;

    fn metadata(&self) -> Result<ArtifactStream, LandsatError> {
        self.artifact(ArtifactKind::Metadata)
    }

    fn quality(&self) -> Result<ArtifactStream, LandsatError> {
        self.artifact(ArtifactKind::Quality)
    }

    fn band(&self, band: u8) -> Result<ArtifactStream, LandsatError> {
        self.artifact(ArtifactKind::Band(band))
    }
}

/// Turns catalog rows into scenes backed by some store.
pub trait SceneRepository: Clone + Send + 'static {
    type Scene: Scene;

    fn resolve(&self, record: &SceneRecord) -> Result<Self::Scene, LandsatError>;
}

/// Scan a metadata file for the sun elevation and classify the scene.
///
/// A file without the key classifies as night.
pub fn daytime_from_metadata<R: Read>(mtl: R) -> Result<bool, LandsatError> {
    for line in BufReader::new(mtl).split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();

        if let Some(value) = line.strip_prefix(SUN_ELEVATION_KEY) {
            let value = value.trim();
            let elevation: f64 = value.parse().map_err(|_| LandsatError::SunElevation {
                value: value.to_owned(),
            })?;

            return Ok(elevation >= 0.0);
        }
    }

    Ok(false)
}
