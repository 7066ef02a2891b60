//! Cubeset files: versioned, human-authored piece catalogs.
//!
//! ```json
//! {
//!   "version": 1,
//!   "metadata": { "intendedUse": "village" },
//!   "pieces": [
//!     {
//!       "name": "road",
//!       "size": [1, 1, 5],
//!       "weight": 10,
//!       "depthWeight": 2,
//!       "connectors": [ { "type": 1, "position": [0, 0, 0], "direction": "z-" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! The top-level `version` selects the reader; each version lives in its own module.
use crate::error::{Error, Result};
use crate::load::{LoadContext, LoadedPieces};

pub mod reader;
mod ver1;

pub use reader::StructuredReader;

/// Cubeset format versions this crate can read.
pub const SUPPORTED_VERSIONS: &[i64] = &[1];

pub(crate) fn parse_str(contents: &str, ctx: &mut LoadContext) -> Result<LoadedPieces> {
    let document: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| Error::Parse(e.to_string()))?;
    parse_document(&document, ctx)
}

/// Dispatches on the document's `version` field.
pub(crate) fn parse_document<R: StructuredReader>(
    document: &R,
    ctx: &mut LoadContext,
) -> Result<LoadedPieces> {
    let version = document
        .field("version")
        .and_then(StructuredReader::as_int)
        .ok_or_else(|| Error::Parse("missing integer 'version' field".into()))?;
    match version {
        1 => ver1::read_cubeset(document, ctx),
        version => Err(Error::UnsupportedVersion { version }),
    }
}
