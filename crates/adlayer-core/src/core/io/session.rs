use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur while reading or writing session files.
///
/// A failed load leaves the running session untouched; the error is surfaced
/// as a failed-load status message by the front end.
#[derive(Debug, Error)]
pub enum SessionFileError {
    /// The session file could not be read or written.
    #[error("session file I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The session file content is not a valid session snapshot.
    #[error("failed to parse session file '{path}': {source}", path = path.display())]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
    /// The snapshot could not be serialized.
    #[error("failed to serialize session state: {0}")]
    Serialize(Box<toml::ser::Error>),
    /// A snapshot references a molecule the catalog does not know.
    #[error("session references unknown catalog entry '{0}'")]
    UnknownMolecule(String),
    /// A snapshot violates a structural invariant.
    #[error("inconsistent session snapshot: {0}")]
    Inconsistent(String),
}

/// Occupancy snapshot of one site; `None` means vacant.
pub type StatusState = Option<u8>;

/// Snapshot of one non-default site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteState {
    pub col: i32,
    pub row: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: StatusState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: StatusState,
}

/// Snapshot of one selection block and its shadow sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockState {
    pub col: i32,
    pub row: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub sites: Vec<SiteState>,
}

/// Snapshot of one placed molecule; the spec is referenced by catalog name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeState {
    pub name: String,
    pub col: i32,
    pub row: i32,
    /// Rotation in quarter turns (0..4).
    #[serde(default)]
    pub rotation: u8,
}

/// Snapshot of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    pub col: i32,
    pub row: i32,
    pub width: u32,
    pub height: u32,
    pub atom_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lattice_template: Option<String>,
    /// Base sites that differ from the default vacant state.
    #[serde(default)]
    pub sites: Vec<SiteState>,
    #[serde(default)]
    pub blocks: Vec<BlockState>,
    #[serde(default)]
    pub molecules: Vec<MoleculeState>,
}

/// A serializable snapshot of a whole editing session, sufficient for exact
/// round-trip reconstruction without any engine references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_layer: usize,
    #[serde(rename = "layer")]
    pub layers: Vec<LayerState>,
}

impl SessionState {
    /// Reads a snapshot from a TOML session file.
    ///
    /// # Errors
    ///
    /// Returns [`SessionFileError::Io`] if the file cannot be read and
    /// [`SessionFileError::Parse`] for malformed or foreign content.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, SessionFileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SessionFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SessionFileError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// Writes the snapshot to a TOML session file.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), SessionFileError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|source| SessionFileError::Serialize(Box::new(source)))?;
        fs::write(path, content).map_err(|source| SessionFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
