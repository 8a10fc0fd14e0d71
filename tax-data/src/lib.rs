//! Data boundaries for the tax rate engine: fixture documents in, CSV out.

pub mod export;
pub mod fixture;
pub mod sources;

pub use export::{CSV_HEADERS, EXPORT_FILE_NAME, ExportError, TaxRateExporter};
pub use fixture::{FixtureDocument, FixtureError, FixtureLoader};
pub use sources::{
    BUNDLED_FIXTURE, FixtureSource, FixtureSourceFactory, MemorySource, MemorySourceFactory,
    build_registry,
};
