use crate::core::io::session::SessionFileError;
use crate::core::io::template::TemplateError;
use thiserror::Error;

/// Represents errors raised by grid-index operations.
#[derive(Debug, Error)]
pub enum GridError {
    /// A paint operation named an atom kind outside the label list.
    #[error("atom kind {0} is out of range")]
    InvalidAtomKind(u8),
    /// An operation addressed a cell outside the layer bounds.
    #[error("cell ({col}, {row}) is outside the surface bounds")]
    OutsideBounds { col: i32, row: i32 },
}

/// Represents errors raised by molecule placement, movement, and rotation.
///
/// Placement conflicts are first resolved locally by the automatic nearby
/// relocation search; these errors surface only once every search attempt
/// has failed.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// No free position was found near the requested cell.
    #[error("no free position for '{name}' near ({col}, {row})")]
    NoRoom { name: String, col: i32, row: i32 },
    /// The rotated footprint collides and no relocation resolves it.
    #[error("'{name}' couldn't be rotated")]
    RotationBlocked { name: String },
    /// The catalog entry forbids rotating this item.
    #[error("'{name}' is not rotatable")]
    NotRotatable { name: String },
    /// The referenced molecule does not exist on the layer.
    #[error("unknown molecule id")]
    UnknownMolecule,
}

/// Represents errors that abort an export pass.
///
/// A missing structure template is fatal for the whole export: no partial
/// listing is ever produced, and the error names both the file and the
/// entity that required it.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The base lattice template of a layer could not be loaded.
    #[error("lattice template of layer {layer} is unavailable: {source}")]
    LatticeTemplate {
        layer: usize,
        source: TemplateError,
    },
    /// The structure template of a placed molecule could not be loaded.
    #[error("structure template of molecule '{molecule}' is unavailable: {source}")]
    MoleculeTemplate {
        molecule: String,
        source: TemplateError,
    },
}

/// The umbrella error type of the engine and workflow layers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grid operation failed: {0}")]
    Grid(#[from] GridError),

    #[error("placement failed: {0}")]
    Placement(#[from] PlacementError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("session file error: {0}")]
    SessionFile(#[from] SessionFileError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
