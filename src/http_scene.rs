use std::sync::Arc;

use crate::{
    artifact::ArtifactKind,
    cache::ArtifactCache,
    catalog::{SceneRecord, MIN_FIELDS},
    config::CacheSettings,
    error::LandsatError,
    level::ProcessingLevel,
    remote::{ArtifactStream, RemoteSource},
    scene::{daytime_from_metadata, Scene, SceneRepository},
};
use chrono::naive::NaiveDateTime;

/// Timestamp layout of the acquisition date column.
pub const ACQUISITION_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const INDEX_PAGE: &str = "index.html";

/// Scenes served over HTTP from the public archive, with an optional local cache.
pub struct HttpRepository<R: RemoteSource> {
    cache: ArtifactCache<R>,
    settings: Arc<CacheSettings>,
}

impl<R: RemoteSource> Clone for HttpRepository<R> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<R: RemoteSource> HttpRepository<R> {
    pub fn new(remote: R, settings: CacheSettings) -> Self {
        Self::with_shared(Arc::new(remote), settings)
    }

    pub fn with_shared(remote: Arc<R>, settings: CacheSettings) -> Self {
        log::info!("Caching artifacts under: {:?}", &settings.root);
        Self {
            cache: ArtifactCache::new(remote),
            settings: Arc::new(settings),
        }
    }

    fn fetch(
        &self,
        id: &str,
        base_url: &str,
        kind: ArtifactKind,
    ) -> Result<ArtifactStream, LandsatError> {
        let cached = if kind.is_raster() {
            self.settings.rasters
        } else {
            self.settings.metadata
        };

        self.cache.fetch(
            &kind.url(base_url, id),
            &kind.cache_path(&self.settings.root, id),
            cached,
        )
    }
}

impl<R: RemoteSource + 'static> SceneRepository for HttpRepository<R> {
    type Scene = HttpScene<R>;

    fn resolve(&self, record: &SceneRecord) -> Result<HttpScene<R>, LandsatError> {
        if record.len() < MIN_FIELDS {
            return Err(LandsatError::ShortRecord { found: record.len() });
        }
        let field = |idx| record.field(idx).unwrap_or_default();

        let processing_level = ProcessingLevel::parse(field(3))?;

        let acquisition = NaiveDateTime::parse_from_str(field(1), ACQUISITION_FORMAT).map_err(
            |source| LandsatError::Timestamp {
                value: field(1).to_owned(),
                source,
            },
        )?;

        let cloud_cover = parse_cloud_cover(field(2))?;

        let location = field(10);
        let base_url = location.strip_suffix(INDEX_PAGE).unwrap_or(location);

        Ok(HttpScene {
            repo: self.clone(),
            id: field(0).to_owned(),
            acquisition,
            cloud_cover,
            processing_level,
            base_url: base_url.to_owned(),
            day: None,
        })
    }
}

fn parse_cloud_cover(value: &str) -> Result<f64, LandsatError> {
    let cover: f64 = value.parse().map_err(|err| LandsatError::CloudCover {
        value: value.to_owned(),
        reason: format!("{}", err),
    })?;

    if !(0.0..=100.0).contains(&cover) {
        return Err(LandsatError::CloudCover {
            value: value.to_owned(),
            reason: "outside 0-100".to_owned(),
        });
    }

    Ok(cover)
}

pub struct HttpScene<R: RemoteSource> {
    repo: HttpRepository<R>,
    id: String,
    acquisition: NaiveDateTime,
    cloud_cover: f64,
    processing_level: ProcessingLevel,
    base_url: String,
    day: Option<bool>,
}

impl<R: RemoteSource> HttpScene<R> {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl<R: RemoteSource> Scene for HttpScene<R> {
    fn id(&self) -> &str {
        &self.id
    }

    fn acquisition(&self) -> NaiveDateTime {
        self.acquisition
    }

    fn cloud_cover(&self) -> f64 {
        self.cloud_cover
    }

    fn processing_level(&self) -> ProcessingLevel {
        self.processing_level
    }

    fn is_day(&mut self) -> Result<bool, LandsatError> {
        if let Some(day) = self.day {
            return Ok(day);
        }

        let mtl = self.metadata().map_err(|err| {
            log::debug!("Failed to open MTL for {}: {}", self.id, err);
            err
        })?;
        let day = daytime_from_metadata(mtl)?;

        self.day = Some(day);
        Ok(day)
    }

    fn artifact(&self, kind: ArtifactKind) -> Result<ArtifactStream, LandsatError> {
        self.repo.fetch(&self.id, &self.base_url, kind)
    }
}
