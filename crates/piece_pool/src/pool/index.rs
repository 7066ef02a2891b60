//! Connector index mapping connector types to the regular pieces exposing them.
use std::collections::BTreeMap;

use crate::piece::Piece;

/// Maps a connector type to slots in the catalog's regular piece list.
///
/// Slots are listed in insertion order and each piece appears at most once per type.
#[derive(Clone, Debug, Default)]
pub struct ConnectorIndex {
    by_type: BTreeMap<i32, Vec<usize>>,
}

impl ConnectorIndex {
    pub fn new() -> Self {
        Self {
            by_type: BTreeMap::new(),
        }
    }

    /// Registers the piece stored at `slot` under every distinct connector type it exposes.
    pub fn insert(&mut self, slot: usize, piece: &Piece) {
        for connector_type in piece.connector_types() {
            self.by_type.entry(connector_type).or_default().push(slot);
        }
    }

    /// Slots of the pieces exposing `connector_type`, empty if there are none.
    pub fn get(&self, connector_type: i32) -> &[usize] {
        self.by_type
            .get(&connector_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Connector types present in the index, in ascending order.
    pub fn connector_types(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_type.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_type.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::connector::Direction;
    use crate::piece::{PieceDef, PieceId};

    fn piece(def: PieceDef) -> Piece {
        Piece::from_def(PieceId(0), &def).unwrap()
    }

    #[test]
    fn piece_with_repeated_type_is_listed_once() {
        let mut index = ConnectorIndex::new();
        let p = piece(
            PieceDef::new("corridor", [1, 1, 5])
                .with_connector(1, [0, 0, 0], Direction::ZNeg)
                .with_connector(1, [0, 0, 4], Direction::ZPos),
        );
        index.insert(0, &p);
        assert_eq!(index.get(1), &[0]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut index = ConnectorIndex::new();
        let a = piece(PieceDef::new("a", [1, 1, 1]).with_connector(3, [0, 0, 0], Direction::XNeg));
        let b = piece(PieceDef::new("b", [1, 1, 1]).with_connector(3, [0, 0, 0], Direction::XPos));
        index.insert(4, &a);
        index.insert(2, &b);
        assert_eq!(index.get(3), &[4, 2]);
    }

    #[test]
    fn unknown_type_is_empty_and_clear_empties() {
        let mut index = ConnectorIndex::new();
        assert!(index.get(9).is_empty());
        let a = piece(PieceDef::new("a", [1, 1, 1]).with_connector(-1, [0, 0, 0], Direction::YNeg));
        index.insert(0, &a);
        assert_eq!(index.connector_types().collect::<Vec<_>>(), [-1]);
        index.clear();
        assert!(index.is_empty());
        assert!(index.get(-1).is_empty());
    }
}
