/**************************************************************************************************
 *                                           Public API
 *************************************************************************************************/
pub use crate::{
    artifact::ArtifactKind,
    cache::ArtifactCache,
    catalog::{Catalog, SceneRecord},
    config::{parse_day, CacheSettings, DateWindow, Options},
    error::LandsatError,
    http_remote::HttpRemote,
    http_scene::{HttpRepository, HttpScene},
    level::ProcessingLevel,
    pipeline::{Pipeline, RunSummary},
    remote::{ArtifactStream, RemoteSource},
    scene::{daytime_from_metadata, Scene, SceneRepository},
    worker::{process_record, retry, Outcome},
};
/**************************************************************************************************
 *                                      Private Implementation
 *************************************************************************************************/
mod artifact;
mod cache;
mod catalog;
mod config;
mod error;
mod http_remote;
mod http_scene;
mod level;
mod pipeline;
mod remote;
mod scene;
mod sink;
mod worker;
