#![forbid(unsafe_code)]
//! piece_pool: Connector-indexed catalog of prefab pieces for structure generation.
//!
//! Modules:
//! - piece: pieces, connectors and the definitions they are built from
//! - pool: connector index, catalog, occurrence tracking and the [`pool::PiecePool`] protocol
//! - load: flat RON definition files and versioned cubeset files
//!
//! The generation algorithm itself lives outside this crate; it only consumes [`pool::PiecePool`].
pub mod error;
pub mod load;
pub mod piece;
pub mod pool;

/// Convenient re-exports for common types. Import with `use piece_pool::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::load::cubeset::StructuredReader;
    pub use crate::load::flat::FlatDefinitions;
    pub use crate::load::{FileFormat, LoadReport};
    pub use crate::piece::connector::{Connector, ConnectorDef, Direction};
    pub use crate::piece::{AllowedRotations, MergeStrategy, Piece, PieceDef, PieceId};
    pub use crate::pool::catalog::{CatalogRun, PieceCatalog};
    pub use crate::pool::index::ConnectorIndex;
    pub use crate::pool::prefab::PrefabPiecePool;
    pub use crate::pool::usage::OccurrenceCounters;
    pub use crate::pool::{default_piece_weight, PiecePool, PlacedPiece, WeightRule};
}
