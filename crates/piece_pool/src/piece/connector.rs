//! Connectors: typed attachment points on a piece.
use std::fmt;
use std::str::FromStr;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One of the six axis-aligned directions a connector can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    XNeg,
    XPos,
    YNeg,
    YPos,
    ZNeg,
    ZPos,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::XNeg,
        Direction::XPos,
        Direction::YNeg,
        Direction::YPos,
        Direction::ZNeg,
        Direction::ZPos,
    ];

    /// The direction facing the other way along the same axis.
    pub fn opposite(self) -> Self {
        match self {
            Direction::XNeg => Direction::XPos,
            Direction::XPos => Direction::XNeg,
            Direction::YNeg => Direction::YPos,
            Direction::YPos => Direction::YNeg,
            Direction::ZNeg => Direction::ZPos,
            Direction::ZPos => Direction::ZNeg,
        }
    }

    /// Rotates the direction 90 degrees clockwise around the Y axis, seen from above.
    pub fn rotate_cw(self) -> Self {
        match self {
            Direction::ZNeg => Direction::XPos,
            Direction::XPos => Direction::ZPos,
            Direction::ZPos => Direction::XNeg,
            Direction::XNeg => Direction::ZNeg,
            vertical => vertical,
        }
    }

    /// Unit offset pointing in this direction.
    pub fn unit(self) -> IVec3 {
        match self {
            Direction::XNeg => IVec3::NEG_X,
            Direction::XPos => IVec3::X,
            Direction::YNeg => IVec3::NEG_Y,
            Direction::YPos => IVec3::Y,
            Direction::ZNeg => IVec3::NEG_Z,
            Direction::ZPos => IVec3::Z,
        }
    }

    /// Maps a numeric block-face code (0 = y-, 1 = y+, 2 = z-, 3 = z+, 4 = x-, 5 = x+).
    pub fn from_block_face(face: i64) -> Option<Self> {
        match face {
            0 => Some(Direction::YNeg),
            1 => Some(Direction::YPos),
            2 => Some(Direction::ZNeg),
            3 => Some(Direction::ZPos),
            4 => Some(Direction::XNeg),
            5 => Some(Direction::XPos),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::XNeg => "x-",
            Direction::XPos => "x+",
            Direction::YNeg => "y-",
            Direction::YPos => "y+",
            Direction::ZNeg => "z-",
            Direction::ZPos => "z+",
        };
        f.write_str(s)
    }
}

/// Accepts `x-`, `-x`, `xm`, `XNeg` and the matching forms for the other axes, ignoring case.
impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let dir = match lower.as_str() {
            "x-" | "-x" | "xm" | "xneg" => Direction::XNeg,
            "x+" | "+x" | "xp" | "xpos" => Direction::XPos,
            "y-" | "-y" | "ym" | "yneg" => Direction::YNeg,
            "y+" | "+y" | "yp" | "ypos" => Direction::YPos,
            "z-" | "-z" | "zm" | "zneg" => Direction::ZNeg,
            "z+" | "+z" | "zp" | "zpos" => Direction::ZPos,
            _ => {
                return Err(Error::invalid_field(
                    "direction",
                    format!("unknown direction '{s}'"),
                ))
            }
        };
        Ok(dir)
    }
}

/// A typed attachment point, positioned relative to the owning piece's origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connector {
    pub connector_type: i32,
    pub position: IVec3,
    pub direction: Direction,
}

impl Connector {
    pub fn new(connector_type: i32, position: IVec3, direction: Direction) -> Self {
        Self {
            connector_type,
            position,
            direction,
        }
    }

    /// Returns this connector as it sits on the piece after a 90 degree clockwise rotation
    /// around Y. `size` is the piece size before rotation.
    pub fn rotated_cw(&self, size: IVec3) -> Self {
        let p = self.position;
        Self {
            connector_type: self.connector_type,
            position: IVec3::new(size.z - 1 - p.z, p.y, p.x),
            direction: self.direction.rotate_cw(),
        }
    }
}

/// Serializable connector record used by piece definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorDef {
    #[serde(rename = "type")]
    pub connector_type: i32,
    pub position: [i32; 3],
    pub direction: Direction,
}

impl ConnectorDef {
    pub fn new(connector_type: i32, position: [i32; 3], direction: Direction) -> Self {
        Self {
            connector_type,
            position,
            direction,
        }
    }
}

impl From<ConnectorDef> for Connector {
    fn from(def: ConnectorDef) -> Self {
        Connector::new(
            def.connector_type,
            IVec3::from_array(def.position),
            def.direction,
        )
    }
}

impl From<&ConnectorDef> for Connector {
    fn from(def: &ConnectorDef) -> Self {
        (*def).into()
    }
}
