//! Pieces and the definitions they are built from.
//!
//! A [`PieceDef`] is plain data, either written inline by the caller or produced by one of the
//! file loaders in [`crate::load`]. The pool turns definitions into owned [`Piece`]s and hands
//! each one a [`PieceId`] that stays valid until the pool is cleared.
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod connector;

use connector::{Connector, ConnectorDef, Direction};

/// Identity of a piece within the pool that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u32);

impl PieceId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Set of clockwise rotations around Y a piece may be placed with.
///
/// Bit 1 allows 90 degrees, bit 2 allows 180 degrees and bit 4 allows 270 degrees.
/// The unrotated placement is always allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedRotations(u8);

impl AllowedRotations {
    pub const NONE: Self = Self(0);
    pub const CW_90: Self = Self(1);
    pub const CW_180: Self = Self(2);
    pub const CW_270: Self = Self(4);
    pub const ALL: Self = Self(7);

    /// Returns `None` when bits other than the three rotation bits are set.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::ALL.0 == 0).then_some(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the piece may be placed after `num_cw_rotations` quarter turns.
    pub fn allows(self, num_cw_rotations: u8) -> bool {
        match num_cw_rotations % 4 {
            0 => true,
            n => self.0 & (1 << (n - 1)) != 0,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// How the blocks of a placed piece are merged with what is already in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeStrategy {
    Overwrite,
    KeepOld,
    Imprint,
    Lake,
    #[default]
    SpongePrint,
    Difference,
    SimpleCompare,
    Mask,
}

/// Accepts the variant name with or without an `ms` prefix, ignoring case.
impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("ms").unwrap_or(&lower);
        let strategy = match name {
            "overwrite" => MergeStrategy::Overwrite,
            "keepold" => MergeStrategy::KeepOld,
            "imprint" => MergeStrategy::Imprint,
            "lake" => MergeStrategy::Lake,
            "spongeprint" => MergeStrategy::SpongePrint,
            "difference" => MergeStrategy::Difference,
            "simplecompare" => MergeStrategy::SimpleCompare,
            "mask" => MergeStrategy::Mask,
            _ => {
                return Err(Error::invalid_field(
                    "mergeStrategy",
                    format!("unknown merge strategy '{s}'"),
                ))
            }
        };
        Ok(strategy)
    }
}

/// Definition of a single piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceDef {
    /// Name used in diagnostics.
    pub name: String,
    /// Bounding size in blocks; every component must be positive.
    pub size: [i32; 3],
    pub connectors: Vec<ConnectorDef>,
    pub allowed_rotations: AllowedRotations,
    /// Maximum number of times the piece may appear in one structure. `None` is unlimited.
    pub max_occurrences: Option<u32>,
    pub merge_strategy: MergeStrategy,
    /// Base selection weight.
    pub weight: u32,
    /// Weight removed per level of depth of the piece being attached to.
    pub depth_weight: i32,
    /// Weight added when attaching to another instance of the same piece.
    pub add_weight_if_same: i32,
    pub move_to_ground: bool,
}

impl Default for PieceDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: [0, 0, 0],
            connectors: Vec::new(),
            allowed_rotations: AllowedRotations::NONE,
            max_occurrences: None,
            merge_strategy: MergeStrategy::default(),
            weight: 1,
            depth_weight: 0,
            add_weight_if_same: 0,
            move_to_ground: false,
        }
    }
}

impl PieceDef {
    pub fn new(name: impl Into<String>, size: [i32; 3]) -> Self {
        Self {
            name: name.into(),
            size,
            ..Default::default()
        }
    }

    pub fn with_connector(
        mut self,
        connector_type: i32,
        position: [i32; 3],
        direction: Direction,
    ) -> Self {
        self.connectors
            .push(ConnectorDef::new(connector_type, position, direction));
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_depth_weight(mut self, depth_weight: i32) -> Self {
        self.depth_weight = depth_weight;
        self
    }

    pub fn with_add_weight_if_same(mut self, add_weight_if_same: i32) -> Self {
        self.add_weight_if_same = add_weight_if_same;
        self
    }

    pub fn with_max_occurrences(mut self, max_occurrences: u32) -> Self {
        self.max_occurrences = Some(max_occurrences);
        self
    }

    pub fn with_allowed_rotations(mut self, rotations: AllowedRotations) -> Self {
        self.allowed_rotations = rotations;
        self
    }

    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    pub fn with_move_to_ground(mut self, move_to_ground: bool) -> Self {
        self.move_to_ground = move_to_ground;
        self
    }

    /// Checks that the definition can be turned into a [`Piece`].
    pub fn validate(&self) -> Result<()> {
        if self.size.iter().any(|&c| c <= 0) {
            return Err(Error::invalid_piece(
                &self.name,
                format!("size {:?} must be positive in every component", self.size),
            ));
        }
        Ok(())
    }
}

/// A piece owned by a pool.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    id: PieceId,
    name: String,
    size: IVec3,
    connectors: Vec<Connector>,
    allowed_rotations: AllowedRotations,
    max_occurrences: Option<u32>,
    merge_strategy: MergeStrategy,
    weight: u32,
    depth_weight: i32,
    add_weight_if_same: i32,
    move_to_ground: bool,
}

impl Piece {
    pub(crate) fn from_def(id: PieceId, def: &PieceDef) -> Result<Self> {
        def.validate()?;
        Ok(Self {
            id,
            name: def.name.clone(),
            size: IVec3::from_array(def.size),
            connectors: def.connectors.iter().map(Connector::from).collect(),
            allowed_rotations: def.allowed_rotations,
            max_occurrences: def.max_occurrences,
            merge_strategy: def.merge_strategy,
            weight: def.weight,
            depth_weight: def.depth_weight,
            add_weight_if_same: def.add_weight_if_same,
            move_to_ground: def.move_to_ground,
        })
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Distinct connector types exposed by this piece, in ascending order.
    pub fn connector_types(&self) -> BTreeSet<i32> {
        self.connectors.iter().map(|c| c.connector_type).collect()
    }

    pub fn has_connector_type(&self, connector_type: i32) -> bool {
        self.connectors
            .iter()
            .any(|c| c.connector_type == connector_type)
    }

    pub fn allowed_rotations(&self) -> AllowedRotations {
        self.allowed_rotations
    }

    pub fn max_occurrences(&self) -> Option<u32> {
        self.max_occurrences
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn depth_weight(&self) -> i32 {
        self.depth_weight
    }

    pub fn add_weight_if_same(&self) -> i32 {
        self.add_weight_if_same
    }

    pub fn should_move_to_ground(&self) -> bool {
        self.move_to_ground
    }

    /// Base weight after depth decay when attaching to a piece at `depth`, clamped at zero.
    pub fn weight_at_depth(&self, depth: u32) -> u32 {
        let decay = i64::from(self.depth_weight) * i64::from(depth);
        clamp_weight(i64::from(self.weight) - decay)
    }

    /// Whether `occurrences` placements already exhaust this piece's limit.
    pub fn is_exhausted(&self, occurrences: u32) -> bool {
        self.max_occurrences
            .is_some_and(|limit| occurrences >= limit)
    }
}

pub(crate) fn clamp_weight(weight: i64) -> u32 {
    weight.clamp(0, i64::from(u32::MAX)) as u32
}
