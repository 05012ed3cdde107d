use std::{
    fs::{create_dir_all, File},
    io,
    path::Path,
};

use crate::{
    artifact::ArtifactKind,
    catalog::SceneRecord,
    config::Options,
    error::LandsatError,
    scene::{Scene, SceneRepository},
};

/// What became of one catalog record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The row could not be turned into a scene.
    Rejected,
    /// Acquired outside the requested window.
    OutOfWindow,
    Daytime,
    /// Gave up after running out of attempts, or the scene directory could not be created.
    Failed,
    /// Every requested artifact is on disk.
    Downloaded(String),
}

/// Run `op` until it succeeds, at most `attempts` times. The last error is returned, and an error
/// that is not transient ends the attempts early.
pub fn retry<T, F>(attempts: u32, mut op: F) -> Result<T, LandsatError>
where
    F: FnMut() -> Result<T, LandsatError>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match op() {
            Ok(val) => return Ok(val),
            Err(err) if attempt >= attempts || !err.is_transient() => return Err(err),
            Err(err) => {
                log::debug!("Attempt {} of {} failed: {}", attempt, attempts, err);
                attempt += 1;
            }
        }
    }
}

/// Take one record from catalog row to downloaded scene.
pub fn process_record<SR: SceneRepository>(
    repo: &SR,
    opts: &Options,
    record: &SceneRecord,
) -> Outcome {
    let mut scene = match repo.resolve(record) {
        Ok(scene) => scene,
        Err(err) => {
            log::warn!("Failed to parse scene record {:?}: {}", record.id(), err);
            return Outcome::Rejected;
        }
    };

    if !opts.window.contains(scene.acquisition()) {
        return Outcome::OutOfWindow;
    }

    let day = match retry(opts.attempts(), || scene.is_day()) {
        Ok(day) => day,
        Err(err) => {
            log::error!(
                "Failed to determine if scene {} is nighttime: {}",
                scene.id(),
                err
            );
            return Outcome::Failed;
        }
    };

    if day {
        log::debug!("Skipping daytime scene {}", scene.id());
        return Outcome::Daytime;
    }

    let dir = opts.download_root.join(scene.id());
    if let Err(err) = create_dir_all(&dir) {
        log::error!("Failed to create storage directory: {:?} : {}", dir, err);
        return Outcome::Failed;
    }

    for kind in opts.artifacts() {
        if let Err(err) = retry(opts.attempts(), || save_artifact(&scene, kind, &dir)) {
            log::error!(
                "Failed to download {} for {}: {}",
                kind.file_name(scene.id()),
                scene.id(),
                err
            );
            return Outcome::Failed;
        }
    }

    log::info!("Done with {}", scene.id());
    Outcome::Downloaded(scene.id().to_owned())
}

fn save_artifact<S: Scene>(
    scene: &S,
    kind: ArtifactKind,
    dir: &Path,
) -> Result<(), LandsatError> {
    let path = dir.join(kind.file_name(scene.id()));

    let mut out = File::create(&path)?;
    let mut src = scene.artifact(kind)?;
    io::copy(&mut src, &mut out)?;

    log::debug!("Saved {:?}", path);
    Ok(())
}
