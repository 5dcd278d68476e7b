use super::molecule::MoleculeSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur while loading a molecule catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read from disk.
    #[error("failed to read catalog '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The catalog file content is not valid TOML.
    #[error("failed to parse catalog '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
    /// Two entries share the same name.
    #[error("duplicate catalog entry '{0}'")]
    DuplicateEntry(String),
    /// An entry declares a footprint with zero columns or rows.
    #[error("catalog entry '{0}' has a degenerate footprint")]
    DegenerateFootprint(String),
}

/// The catalog of molecule and contact templates available for placement.
///
/// This is the configuration provider of the editor: a TOML file listing one
/// [`MoleculeSpec`] per placeable item. The GUI presents these entries for
/// drag-and-drop; session files reference them by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// All catalog entries, in file order.
    #[serde(default, rename = "molecule")]
    pub entries: Vec<MoleculeSpec>,
}

impl Catalog {
    /// Loads and validates a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Toml`] if it is not valid TOML, and a validation
    /// error for duplicate names or degenerate footprints.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog = toml::from_str(&content).map_err(|source| CatalogError::Toml {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Builds a validated catalog from in-memory entries.
    ///
    /// # Errors
    ///
    /// Same validation as [`Catalog::load`]: duplicate names and degenerate
    /// footprints are rejected.
    pub fn from_entries(entries: Vec<MoleculeSpec>) -> Result<Self, CatalogError> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Looks up an entry by its catalog-unique name.
    pub fn get(&self, name: &str) -> Option<&MoleculeSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (i, spec) in self.entries.iter().enumerate() {
            if spec.footprint.0 == 0 || spec.footprint.1 == 0 {
                return Err(CatalogError::DegenerateFootprint(spec.name.clone()));
            }
            if self.entries[..i].iter().any(|other| other.name == spec.name) {
                return Err(CatalogError::DuplicateEntry(spec.name.clone()));
            }
        }
        Ok(())
    }
}
