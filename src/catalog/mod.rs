//! Build catalog
//!
//! The games, classes and builds the wheels are filled from, plus the
//! merge rules used when folding in scraped data.

pub mod defaults;
pub mod loader;
pub mod merge;
pub mod model;

pub use defaults::default_catalog;
pub use loader::{CatalogError, CatalogLoader, export_default_catalog, load_catalog, save_catalog};
pub use merge::{MergeFailure, MergeReport, ScrapeResult, apply_enrichment, merge_builds};
pub use model::{BuildEntry, Catalog, ClassEntry, GameCatalog, TopBuild, parse_hex_color};
