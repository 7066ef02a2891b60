//! Piece catalog: owned piece collections plus the connector index.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::piece::connector::Connector;
use crate::piece::{Piece, PieceDef, PieceId};
use crate::pool::index::ConnectorIndex;
use crate::pool::usage::OccurrenceCounters;
use crate::pool::{
    default_piece_weight, default_starting_piece_weight, PiecePool, PlacedPiece, WeightRule,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Regular(usize),
    Starting(usize),
}

/// Sole owner of all pieces of a pool.
///
/// Regular pieces are indexed by connector type; starting pieces are never indexed.
/// Handles into the index stay valid until [`PieceCatalog::clear`].
#[derive(Clone, Default)]
pub struct PieceCatalog {
    regular: Vec<Piece>,
    starting: Vec<Piece>,
    index: ConnectorIndex,
    slots: HashMap<PieceId, Slot>,
    metadata: HashMap<String, String>,
    weight_rule: Option<Arc<dyn WeightRule>>,
    next_id: u32,
}

impl PieceCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds regular pieces and indexes them by connector type.
    ///
    /// Invalid definitions are skipped with a warning. Returns the number of pieces added.
    pub fn add_piece_defs(&mut self, defs: &[PieceDef]) -> usize {
        self.add_defs(defs, false)
    }

    /// Adds starting pieces. They are never indexed. Returns the number of pieces added.
    pub fn add_starting_piece_defs(&mut self, defs: &[PieceDef]) -> usize {
        self.add_defs(defs, true)
    }

    fn add_defs(&mut self, defs: &[PieceDef], starting: bool) -> usize {
        let mut added = 0;
        for def in defs {
            match self.add_piece(def, starting) {
                Ok(_) => added += 1,
                Err(e) => warn!("Skipping piece definition: {}", e),
            }
        }
        added
    }

    /// Adds a single piece, returning its id.
    pub fn add_piece(&mut self, def: &PieceDef, starting: bool) -> Result<PieceId> {
        let id = PieceId(self.next_id);
        let piece = Piece::from_def(id, def)?;
        self.next_id += 1;

        if starting {
            self.slots.insert(id, Slot::Starting(self.starting.len()));
            self.starting.push(piece);
        } else {
            let slot = self.regular.len();
            self.index.insert(slot, &piece);
            self.slots.insert(id, Slot::Regular(slot));
            self.regular.push(piece);
        }
        Ok(id)
    }

    /// Removes all pieces, the index and the metadata. The weight rule is kept.
    pub fn clear(&mut self) {
        self.regular.clear();
        self.starting.clear();
        self.index.clear();
        self.slots.clear();
        self.metadata.clear();
    }

    pub fn all_pieces_count(&self) -> usize {
        self.regular.len()
    }

    pub fn starting_pieces_count(&self) -> usize {
        self.starting.len()
    }

    pub fn all_pieces(&self) -> &[Piece] {
        &self.regular
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        match self.slots.get(&id)? {
            Slot::Regular(i) => self.regular.get(*i),
            Slot::Starting(i) => self.starting.get(*i),
        }
    }

    /// Regular pieces exposing `connector_type`, in insertion order.
    pub fn pieces_with_connector(&self, connector_type: i32) -> Vec<&Piece> {
        self.index
            .get(connector_type)
            .iter()
            .map(|&slot| &self.regular[slot])
            .collect()
    }

    /// The starting pieces, or every regular piece when no starting pieces were added.
    pub fn starting_pieces(&self) -> Vec<&Piece> {
        if self.starting.is_empty() {
            self.regular.iter().collect()
        } else {
            self.starting.iter().collect()
        }
    }

    pub fn index(&self) -> &ConnectorIndex {
        &self.index
    }

    /// Value stored under `key` in the catalog metadata, e.g. from a cubeset file.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Installs a rule that adjusts every connector-based weight.
    pub fn set_weight_rule<R: WeightRule + 'static>(&mut self, rule: R) {
        self.weight_rule = Some(Arc::new(rule));
    }

    pub fn clear_weight_rule(&mut self) {
        self.weight_rule = None;
    }

    /// Weight of `candidate` given the occurrence counts of the current run.
    pub fn piece_weight(
        &self,
        usage: &OccurrenceCounters,
        placed: &PlacedPiece,
        existing_connector: &Connector,
        candidate: &Piece,
    ) -> u32 {
        let weight = default_piece_weight(placed, candidate, usage.get(candidate.id()));
        match &self.weight_rule {
            Some(rule) if weight > 0 => rule.adjust(placed, existing_connector, candidate, weight),
            _ => weight,
        }
    }

    pub fn starting_piece_weight(&self, usage: &OccurrenceCounters, candidate: &Piece) -> u32 {
        default_starting_piece_weight(candidate, usage.get(candidate.id()))
    }

    /// Starts a generation run with its own occurrence counters over this catalog.
    pub fn start_run(&self) -> CatalogRun<'_> {
        CatalogRun {
            catalog: self,
            usage: OccurrenceCounters::new(),
        }
    }
}

impl fmt::Debug for PieceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieceCatalog")
            .field("regular", &self.regular.len())
            .field("starting", &self.starting.len())
            .field("connector_types", &self.index.len())
            .field("metadata", &self.metadata)
            .field("weight_rule", &self.weight_rule.is_some())
            .finish()
    }
}

/// A generation run over a borrowed catalog with private occurrence counters.
///
/// Any number of runs can share one catalog.
#[derive(Debug)]
pub struct CatalogRun<'a> {
    catalog: &'a PieceCatalog,
    usage: OccurrenceCounters,
}

impl<'a> CatalogRun<'a> {
    pub fn catalog(&self) -> &'a PieceCatalog {
        self.catalog
    }

    pub fn occurrences(&self, piece: PieceId) -> u32 {
        self.usage.get(piece)
    }
}

impl PiecePool for CatalogRun<'_> {
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
