//! Error types for schematic operations.

use kicad_sexpr::{OverlappingEdit, ParseError};
use thiserror::Error;

/// Result type alias for schematic operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, querying, or editing a schematic.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is not well-formed s-expression text. Fatal; no document
    /// is created.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The file parsed but holds no top-level list to treat as the
    /// schematic root.
    #[error("no top-level list in input")]
    MissingRoot,

    /// A queued edit intersects one already pending. The document stays
    /// usable; the offending edit was not enqueued.
    #[error(transparent)]
    Overlap(#[from] OverlappingEdit),

    /// No symbol with the given reference designator.
    #[error("symbol not found: {reference}")]
    SymbolNotFound { reference: String },

    /// A write operation targeted a property the symbol does not have.
    #[error("property not found on {reference}: {name}")]
    PropertyNotFound { reference: String, name: String },

    /// A title-block read found no title block in the schematic. Only the
    /// write path synthesizes a missing block.
    #[error("schematic has no title block")]
    TitleBlockNotFound,

    /// Filesystem failure on load or commit. On commit the target file is
    /// left unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
