//! Flat definition files: RON documents listing piece definitions.
//!
//! ```ron
//! (
//!     pieces: [
//!         (name: "road", size: (1, 1, 5), weight: 10,
//!          connectors: [(type: 1, position: (0, 0, 0), direction: ZNeg)]),
//!     ],
//!     starting_pieces: [
//!         (name: "well", size: (3, 4, 3), connectors: [(type: 1, position: (1, 0, 0), direction: ZNeg)]),
//!     ],
//! )
//! ```
//!
//! A syntax or type error fails the whole file; definitions that parse but are invalid
//! (e.g. a zero size) are skipped one by one.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::load::{LoadContext, LoadedPieces};
use crate::piece::PieceDef;

/// Contents of a flat definition file.
///
/// With non-empty `starting_pieces`, only those seed a structure and the regular pieces are
/// used for expansion only. Otherwise regular pieces serve both roles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatDefinitions {
    pub pieces: Vec<PieceDef>,
    pub starting_pieces: Vec<PieceDef>,
}

impl FlatDefinitions {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        ron::from_str(s).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Other(e.to_string()))
    }
}

pub(crate) fn parse_str(contents: &str, ctx: &mut LoadContext) -> Result<LoadedPieces> {
    let defs = FlatDefinitions::from_ron_str(contents)?;
    Ok(LoadedPieces {
        regular: valid_defs(defs.pieces, "piece", ctx),
        starting: valid_defs(defs.starting_pieces, "starting piece", ctx),
        metadata: Vec::new(),
    })
}

fn valid_defs(defs: Vec<PieceDef>, role: &str, ctx: &mut LoadContext) -> Vec<PieceDef> {
    defs.into_iter()
        .enumerate()
        .filter_map(|(i, def)| match def.validate() {
            Ok(()) => Some(def),
            Err(e) => {
                ctx.piece_skipped(&format!("{role} #{} ('{}')", i + 1, def.name), &e);
                None
            }
        })
        .collect()
}
