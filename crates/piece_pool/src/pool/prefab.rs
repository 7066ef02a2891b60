//! Piece pool backed by prefab definitions.
use std::path::Path;

use crate::error::Result;
use crate::load::{self, FileFormat, LoadReport};
use crate::piece::connector::Connector;
use crate::piece::{Piece, PieceDef, PieceId};
use crate::pool::catalog::PieceCatalog;
use crate::pool::usage::OccurrenceCounters;
use crate::pool::{PiecePool, PlacedPiece, WeightRule};

/// A [`PiecePool`] that owns its catalog and a single set of occurrence counters.
///
/// Pieces are added with [`PrefabPiecePool::add_piece_defs`] /
/// [`PrefabPiecePool::add_starting_piece_defs`] or loaded from files; both are additive.
/// Call [`PrefabPiecePool::clear`] before loading a fresh catalog.
#[derive(Debug, Default)]
pub struct PrefabPiecePool {
    catalog: PieceCatalog,
    usage: OccurrenceCounters,
}

impl PrefabPiecePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool from in-memory definitions.
    ///
    /// With non-empty `starting_defs`, those are the only starting pieces and take no further
    /// part in generation. Otherwise any regular piece may also start a structure.
    pub fn from_defs(piece_defs: &[PieceDef], starting_defs: &[PieceDef]) -> Self {
        let mut pool = Self::new();
        pool.add_piece_defs(piece_defs);
        pool.add_starting_piece_defs(starting_defs);
        pool
    }

    /// Creates a pool and loads `path` into it, detecting the file format.
    ///
    /// A failed load leaves the pool empty; the failure is logged when `log_warnings` is set.
    pub fn from_file(path: impl AsRef<Path>, log_warnings: bool) -> Self {
        let mut pool = Self::new();
        pool.load_from_file(path, log_warnings);
        pool
    }

    /// Installs a rule that adjusts every connector-based weight.
    pub fn with_weight_rule<R: WeightRule + 'static>(mut self, rule: R) -> Self {
        self.catalog.set_weight_rule(rule);
        self
    }

    /// Removes all pieces and resets the occurrence counters.
    pub fn clear(&mut self) {
        self.catalog.clear();
        self.usage.clear();
    }

    /// Adds regular pieces; may be called repeatedly. Returns the number of pieces added.
    pub fn add_piece_defs(&mut self, defs: &[PieceDef]) -> usize {
        self.catalog.add_piece_defs(defs)
    }

    /// Adds starting pieces; may be called repeatedly. Returns the number of pieces added.
    pub fn add_starting_piece_defs(&mut self, defs: &[PieceDef]) -> usize {
        self.catalog.add_starting_piece_defs(defs)
    }

    /// Loads a flat definition file or a cubeset file, whichever `path` contains.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, log_warnings: bool) -> bool {
        self.try_load_from_file(path, log_warnings).is_ok()
    }

    pub fn try_load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        log_warnings: bool,
    ) -> Result<LoadReport> {
        load::load_file(&mut self.catalog, path, FileFormat::Detect, log_warnings)
    }

    /// Loads a cubeset file.
    pub fn load_from_cubeset_file(&mut self, path: impl AsRef<Path>, log_warnings: bool) -> bool {
        self.try_load_from_cubeset_file(path, log_warnings).is_ok()
    }

    pub fn try_load_from_cubeset_file(
        &mut self,
        path: impl AsRef<Path>,
        log_warnings: bool,
    ) -> Result<LoadReport> {
        load::load_file(&mut self.catalog, path, FileFormat::Cubeset, log_warnings)
    }

    /// Number of regular (non-starting) pieces.
    pub fn all_pieces_count(&self) -> usize {
        self.catalog.all_pieces_count()
    }

    /// Number of starting pieces.
    pub fn starting_pieces_count(&self) -> usize {
        self.catalog.starting_pieces_count()
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.catalog.piece(id)
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.catalog.metadata(key)
    }

    /// Placements of `piece` recorded since the last reset.
    pub fn occurrences(&self, piece: PieceId) -> u32 {
        self.usage.get(piece)
    }
}

impl PiecePool for PrefabPiecePool {
    fn pieces_with_connector(&self, connector_type: i32) -> Vec<&Piece> {
        self.catalog.pieces_with_connector(connector_type)
    }

    fn starting_pieces(&self) -> Vec<&Piece> {
        self.catalog.starting_pieces()
    }

    fn piece_weight(
        &self,
        placed: &PlacedPiece,
        existing_connector: &Connector,
        candidate: &Piece,
    ) -> u32 {
        self.catalog
            .piece_weight(&self.usage, placed, existing_connector, candidate)
    }

    fn starting_piece_weight(&self, candidate: &Piece) -> u32 {
        self.catalog.starting_piece_weight(&self.usage, candidate)
    }

    fn piece_placed(&mut self, piece: PieceId) {
        self.usage.record(piece);
    }

    fn reset(&mut self) {
        self.usage.clear();
    }
}
