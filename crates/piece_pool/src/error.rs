//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Loader
//! failures fall into three classes: whole-file failures ([`Error::Io`], [`Error::Parse`],
//! [`Error::UnsupportedVersion`], [`Error::UnknownFormat`]) abort a load, while
//! [`Error::InvalidPiece`] and [`Error::InvalidField`] are absorbed by the loaders and only
//! show up in the log and in the [`crate::load::LoadReport`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported cubeset version {version}")]
    UnsupportedVersion { version: i64 },

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("invalid piece '{piece}': {reason}")]
    InvalidPiece { piece: String, reason: String },

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_piece(piece: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPiece {
            piece: piece.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn invalid_piece_formats_name_and_reason() {
        let err = Error::invalid_piece("hall", "missing size");
        assert_eq!(err.to_string(), "invalid piece 'hall': missing size");
    }

    #[test]
    fn unsupported_version_mentions_version() {
        let err = Error::UnsupportedVersion { version: 7 };
        assert!(err.to_string().contains('7'));
    }
}
