//! RON catalog loader
//!
//! Loads the catalog from `assets/data/catalog.ron`, with fallback to the
//! built-in catalog.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::defaults::default_catalog;
use super::model::Catalog;

/// Default location of the catalog file
pub const CATALOG_PATH: &str = "assets/data/catalog.ron";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize catalog: {0}")]
    Serialize(String),

    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Catalog has no games")]
    Empty,
}

/// Owns the loaded catalog and where it came from
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: Catalog,
    /// File the catalog was read from, `None` for the built-in one
    source: Option<PathBuf>,
}

impl CatalogLoader {
    /// Load from the default path, falling back to the built-in catalog
    pub fn new() -> Self {
        Self::load_or_default(Path::new(CATALOG_PATH))
    }

    /// Load from `path`, falling back to the built-in catalog on any error
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No catalog at {:?}, using built-in catalog", path);
            return Self::builtin();
        }
        match load_catalog(path) {
            Ok(catalog) => {
                log::info!("Catalog loaded from {:?} ({} games)", path, catalog.games.len());
                Self {
                    catalog,
                    source: Some(path.to_path_buf()),
                }
            }
            Err(e) => {
                log::warn!("{}. Using built-in catalog.", e);
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        Self {
            catalog: default_catalog(),
            source: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Read and parse a RON catalog file
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: Catalog = ron::from_str(&content).map_err(|e| CatalogError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if catalog.games.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(catalog)
}

/// Write a catalog as pretty RON, creating parent directories
pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let text = ron::ser::to_string_pretty(catalog, ron::ser::PrettyConfig::default())
        .map_err(|e| CatalogError::Serialize(e.to_string()))?;
    fs::write(path, text).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Catalog written to {:?}", path);
    Ok(())
}

/// Export the built-in catalog for editing
pub fn export_default_catalog(path: &Path) -> Result<(), CatalogError> {
    save_catalog(&default_catalog(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("buildwheel-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_export_then_load() {
        let path = temp_path("catalog.ron");
        export_default_catalog(&path).unwrap();

        let loader = CatalogLoader::load_or_default(&path);
        assert_eq!(loader.source(), Some(path.as_path()));
        assert_eq!(loader.catalog(), &default_catalog());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let loader = CatalogLoader::load_or_default(&temp_path("does-not-exist.ron"));
        assert!(loader.source().is_none());
        assert!(!loader.catalog().games.is_empty());
    }

    #[test]
    fn test_bad_file_falls_back() {
        let path = temp_path("broken.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(games: [ oops").unwrap();

        assert!(matches!(load_catalog(&path), Err(CatalogError::Parse { .. })));
        let loader = CatalogLoader::load_or_default(&path);
        assert!(loader.source().is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let path = temp_path("empty.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(games: [])").unwrap();
        assert!(matches!(load_catalog(&path), Err(CatalogError::Empty)));
        let _ = fs::remove_file(&path);
    }
}
