//! Piece pools: the interface the generation algorithm draws pieces from.
//!
//! A generator seeds a structure with [`PiecePool::starting_pieces`], then for every open
//! connector asks [`PiecePool::pieces_with_connector`] for candidates, scores them with
//! [`PiecePool::piece_weight`], picks one and reports it back via [`PiecePool::piece_placed`].
//! [`PiecePool::reset`] prepares the pool for the next structure.
//!
//! The catalog ([`catalog::PieceCatalog`]) is read-only during a run; only the
//! [`usage::OccurrenceCounters`] change. [`prefab::PrefabPiecePool`] owns both, while
//! [`catalog::CatalogRun`] borrows a shared catalog with private counters.
use glam::IVec3;

use crate::piece::connector::Connector;
use crate::piece::{clamp_weight, Piece, PieceId};

pub mod catalog;
pub mod index;
pub mod prefab;
pub mod usage;

/// A piece as placed by the generator. The pool only reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedPiece {
    pub piece: PieceId,
    /// World position of the piece origin.
    pub coords: IVec3,
    /// Quarter turns clockwise around Y.
    pub num_cw_rotations: u8,
    /// Distance from the starting piece, which sits at depth 0.
    pub depth: u32,
    /// The connector of this piece used to attach it, `None` for the starting piece.
    pub connector: Option<Connector>,
}

impl PlacedPiece {
    pub fn new(piece: PieceId, coords: IVec3, depth: u32) -> Self {
        Self {
            piece,
            coords,
            num_cw_rotations: 0,
            depth,
            connector: None,
        }
    }

    pub fn with_rotations(mut self, num_cw_rotations: u8) -> Self {
        self.num_cw_rotations = num_cw_rotations % 4;
        self
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }
}

/// Selection, weighting and lifecycle protocol consumed by a structure generator.
pub trait PiecePool {
    /// Regular pieces exposing at least one connector of `connector_type`, in a stable order.
    fn pieces_with_connector(&self, connector_type: i32) -> Vec<&Piece>;

    /// Pieces eligible as the root of a structure.
    fn starting_pieces(&self) -> Vec<&Piece>;

    /// Weight of attaching `candidate` to `existing_connector` of `placed`. Zero means never.
    fn piece_weight(
        &self,
        placed: &PlacedPiece,
        existing_connector: &Connector,
        candidate: &Piece,
    ) -> u32;

    /// Weight of `candidate` as the root of a structure. Zero means never.
    fn starting_piece_weight(&self, candidate: &Piece) -> u32;

    /// Called once per accepted placement.
    fn piece_placed(&mut self, piece: PieceId);

    /// Forgets all per-structure state.
    fn reset(&mut self);
}

/// Extra policy applied on top of [`default_piece_weight`].
///
/// Receives both sides of the prospective join and the default weight; the returned value
/// replaces it. Returning 0 vetoes the match. Not consulted when the default weight is 0.
pub trait WeightRule: Send + Sync {
    fn adjust(
        &self,
        placed: &PlacedPiece,
        existing_connector: &Connector,
        candidate: &Piece,
        weight: u32,
    ) -> u32;
}

impl<F> WeightRule for F
where
    F: Fn(&PlacedPiece, &Connector, &Piece, u32) -> u32 + Send + Sync,
{
    fn adjust(
        &self,
        placed: &PlacedPiece,
        existing_connector: &Connector,
        candidate: &Piece,
        weight: u32,
    ) -> u32 {
        self(placed, existing_connector, candidate, weight)
    }
}

/// Default weighting: base weight minus depth decay at the placed piece's depth, plus the
/// same-piece bonus, clamped at zero. Exhausted pieces weigh 0.
pub fn default_piece_weight(placed: &PlacedPiece, candidate: &Piece, occurrences: u32) -> u32 {
    if candidate.is_exhausted(occurrences) {
        return 0;
    }
    let mut weight = i64::from(candidate.weight_at_depth(placed.depth));
    if placed.piece == candidate.id() {
        weight += i64::from(candidate.add_weight_if_same());
    }
    clamp_weight(weight)
}

/// Default weighting for the root piece: base weight, or 0 when exhausted.
pub fn default_starting_piece_weight(candidate: &Piece, occurrences: u32) -> u32 {
    if candidate.is_exhausted(occurrences) {
        0
    } else {
        candidate.weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::connector::Direction;
    use crate::piece::PieceDef;

    fn piece(id: u32, def: PieceDef) -> Piece {
        Piece::from_def(PieceId(id), &def).unwrap()
    }

    #[test]
    fn same_piece_bonus_applies_only_to_same_piece() {
        let candidate = piece(
            1,
            PieceDef::new("street", [1, 1, 1])
                .with_weight(10)
                .with_add_weight_if_same(-10),
        );
        let on_self = PlacedPiece::new(PieceId(1), IVec3::ZERO, 0);
        let on_other = PlacedPiece::new(PieceId(2), IVec3::ZERO, 0);
        assert_eq!(default_piece_weight(&on_self, &candidate, 0), 0);
        assert_eq!(default_piece_weight(&on_other, &candidate, 0), 10);
    }

    #[test]
    fn exhausted_piece_weighs_zero() {
        let candidate = piece(1, PieceDef::new("well", [1, 1, 1]).with_max_occurrences(1));
        let placed = PlacedPiece::new(PieceId(7), IVec3::ZERO, 0);
        assert_eq!(default_piece_weight(&placed, &candidate, 0), 1);
        assert_eq!(default_piece_weight(&placed, &candidate, 1), 0);
        assert_eq!(default_starting_piece_weight(&candidate, 1), 0);
    }

    #[test]
    fn closures_act_as_weight_rules() {
        let rule = |_: &PlacedPiece, c: &Connector, _: &Piece, w: u32| {
            if c.connector_type == 5 {
                0
            } else {
                w * 2
            }
        };
        let candidate = piece(1, PieceDef::new("gate", [1, 1, 1]));
        let placed = PlacedPiece::new(PieceId(2), IVec3::ZERO, 0);
        let blocked = Connector::new(5, IVec3::ZERO, Direction::XPos);
        let open = Connector::new(1, IVec3::ZERO, Direction::XPos);
        assert_eq!(rule.adjust(&placed, &blocked, &candidate, 3), 0);
        assert_eq!(rule.adjust(&placed, &open, &candidate, 3), 6);
    }

    #[test]
    fn placed_piece_builder_normalizes_rotation() {
        let connector = Connector::new(1, IVec3::ZERO, Direction::ZNeg);
        let placed = PlacedPiece::new(PieceId(0), IVec3::new(1, 2, 3), 4)
            .with_rotations(5)
            .with_connector(connector);
        assert_eq!(placed.num_cw_rotations, 1);
        assert_eq!(placed.connector, Some(connector));
    }
}
