use std::path::PathBuf;

use async_trait::async_trait;
use tax_core::{SourceConfig, SourceError, SourceFactory, SourceRegistry, TaxRate, TaxRateSource};
use tracing::debug;

use crate::fixture::{FixtureError, FixtureLoader};

/// Demo fixture compiled into the binary, served by the `memory` backend.
pub const BUNDLED_FIXTURE: &str = include_str!("../data/tax-rates.json");

/// Reads a fixture document from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TaxRateSource for FixtureSource {
    fn describe(&self) -> String {
        format!("fixture:{}", self.path.display())
    }

    async fn fetch_tax_rates(&self) -> Result<Vec<TaxRate>, SourceError> {
        debug!(path = %self.path.display(), "reading tax rate fixture");
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SourceError::NotFound(self.path.display().to_string())
                }
                _ => SourceError::Io(format!("{}: {e}", self.path.display())),
            })?;

        FixtureLoader::parse(contents.as_slice()).map_err(into_source_error)
    }
}

/// Serves [`BUNDLED_FIXTURE`] without touching the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySource;

#[async_trait]
impl TaxRateSource for MemorySource {
    fn describe(&self) -> String {
        "memory:bundled".to_string()
    }

    async fn fetch_tax_rates(&self) -> Result<Vec<TaxRate>, SourceError> {
        FixtureLoader::parse_str(BUNDLED_FIXTURE).map_err(into_source_error)
    }
}

fn into_source_error(err: FixtureError) -> SourceError {
    match err {
        FixtureError::JsonParse(msg) => SourceError::InvalidDocument(msg),
        FixtureError::Io(e) => SourceError::Io(e.to_string()),
    }
}

/// [`SourceFactory`] for the `fixture` backend. `location` is the path of
/// the JSON document.
pub struct FixtureSourceFactory;

#[async_trait]
impl SourceFactory for FixtureSourceFactory {
    fn backend_name(&self) -> &'static str {
        "fixture"
    }

    async fn create(&self, config: &SourceConfig) -> Result<Box<dyn TaxRateSource>, SourceError> {
        if config.location.trim().is_empty() {
            return Err(SourceError::Configuration(
                "fixture backend requires a location".to_string(),
            ));
        }
        Ok(Box::new(FixtureSource::new(&config.location)))
    }
}

/// [`SourceFactory`] for the `memory` backend. `location` is ignored.
pub struct MemorySourceFactory;

#[async_trait]
impl SourceFactory for MemorySourceFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &SourceConfig) -> Result<Box<dyn TaxRateSource>, SourceError> {
        Ok(Box::new(MemorySource))
    }
}

/// A registry with every backend this crate provides.
pub fn build_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(Box::new(FixtureSourceFactory));
    registry.register(Box::new(MemorySourceFactory));
    registry
}
