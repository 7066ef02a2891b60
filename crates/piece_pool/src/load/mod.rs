//! Loading piece catalogs from files.
//!
//! Two formats are supported:
//! - [`flat`]: a RON file holding plain lists of [`crate::piece::PieceDef`]s.
//! - [`cubeset`]: a versioned JSON file read field by field through
//!   [`cubeset::StructuredReader`], so that one bad piece or connector does not spoil the file.
//!
//! Whole-file failures are returned as errors and leave the catalog untouched. Skipped pieces,
//! dropped connectors and defaulted fields are logged (at `warn` level when warnings are
//! enabled, `debug` otherwise) and counted in the [`LoadReport`].
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::piece::PieceDef;
use crate::pool::catalog::PieceCatalog;

pub mod cubeset;
pub mod flat;

/// Which loader to use for a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// A document starting with `{` is a cubeset, anything else a flat definition file.
    Detect,
    Flat,
    Cubeset,
}

impl FileFormat {
    fn resolve(self, contents: &str) -> FileFormat {
        match self {
            FileFormat::Detect if contents.trim_start().starts_with('{') => FileFormat::Cubeset,
            FileFormat::Detect => FileFormat::Flat,
            other => other,
        }
    }
}

/// Summary of a successful load.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub file: PathBuf,
    /// Regular pieces added to the catalog.
    pub pieces_loaded: usize,
    /// Starting pieces added to the catalog.
    pub starting_pieces_loaded: usize,
    /// Piece records that failed to load.
    pub pieces_skipped: usize,
    /// Malformed connector entries dropped from otherwise valid pieces.
    pub connectors_dropped: usize,
    /// Malformed metadata fields replaced by their defaults.
    pub fields_defaulted: usize,
}

/// Pieces read from a file, not yet added to a catalog.
#[derive(Clone, Debug, Default)]
pub(crate) struct LoadedPieces {
    pub regular: Vec<PieceDef>,
    pub starting: Vec<PieceDef>,
    pub metadata: Vec<(String, String)>,
}

/// Diagnostics sink and counters for a single load.
pub(crate) struct LoadContext {
    file: String,
    log_warnings: bool,
    report: LoadReport,
}

impl LoadContext {
    pub(crate) fn new(path: &Path, log_warnings: bool) -> Self {
        Self {
            file: path.display().to_string(),
            log_warnings,
            report: LoadReport {
                file: path.to_path_buf(),
                ..Default::default()
            },
        }
    }

    fn emit(&self, message: fmt::Arguments<'_>) {
        if self.log_warnings {
            warn!("{}: {}", self.file, message);
        } else {
            debug!("{}: {}", self.file, message);
        }
    }

    pub(crate) fn piece_skipped(&mut self, piece: &str, err: &Error) {
        self.report.pieces_skipped += 1;
        self.emit(format_args!("{piece} was not loaded: {err}"));
    }

    pub(crate) fn connector_dropped(&mut self, piece: &str, connector_index: usize, err: &Error) {
        self.report.connectors_dropped += 1;
        self.emit(format_args!(
            "{piece}: connector #{connector_index} dropped: {err}"
        ));
    }

    pub(crate) fn field_defaulted(&mut self, piece: &str, field: &str) {
        self.report.fields_defaulted += 1;
        self.emit(format_args!(
            "{piece}: malformed '{field}', using the default"
        ));
    }

    fn failed(&self, err: &Error) {
        self.emit(format_args!("cannot load pieces: {err}"));
    }

    #[cfg(test)]
    pub(crate) fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Loads `path` into `catalog`. On error the catalog is left as it was.
pub fn load_file(
    catalog: &mut PieceCatalog,
    path: impl AsRef<Path>,
    format: FileFormat,
    log_warnings: bool,
) -> Result<LoadReport> {
    let path = path.as_ref();
    let mut ctx = LoadContext::new(path, log_warnings);
    match read_file(path, format, &mut ctx) {
        Ok(loaded) => Ok(insert(catalog, loaded, ctx)),
        Err(e) => {
            ctx.failed(&e);
            Err(e)
        }
    }
}

fn read_file(path: &Path, format: FileFormat, ctx: &mut LoadContext) -> Result<LoadedPieces> {
    let contents = fs::read_to_string(path)?;
    match format.resolve(&contents) {
        FileFormat::Cubeset => cubeset::parse_str(&contents, ctx),
        FileFormat::Flat => flat::parse_str(&contents, ctx),
        FileFormat::Detect => Err(Error::UnknownFormat(path.display().to_string())),
    }
}

fn insert(catalog: &mut PieceCatalog, loaded: LoadedPieces, ctx: LoadContext) -> LoadReport {
    let mut report = ctx.report;
    report.pieces_loaded = catalog.add_piece_defs(&loaded.regular);
    report.starting_pieces_loaded = catalog.add_starting_piece_defs(&loaded.starting);
    for (key, value) in loaded.metadata {
        catalog.set_metadata(key, value);
    }

    info!(
        "Loaded {} pieces and {} starting pieces from {} ({} skipped, {} connectors dropped).",
        report.pieces_loaded,
        report.starting_pieces_loaded,
        ctx.file,
        report.pieces_skipped,
        report.connectors_dropped
    );
    report
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::PathBuf;

    /// Writes `contents` to a process-unique file in the temp directory.
    pub fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "piece_pool_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::write_temp;
    use super::*;
    use crate::pool::PiecePool;
    use crate::prelude::PrefabPiecePool;

    const CUBESET: &str = r#"{
        "version": 1,
        "metadata": { "intendedUse": "village" },
        "pieces": [
            { "name": "well", "size": [3, 4, 3], "isStarting": true, "connectors": [] },
            { "name": "road", "size": [1, 1, 5],
              "connectors": [ { "type": 1, "position": [0, 0, 0], "direction": "z-" } ] }
        ]
    }"#;

    const FLAT: &str = r#"(
        pieces: [
            (name: "road", size: (1, 1, 5),
             connectors: [(type: 1, position: (0, 0, 0), direction: ZNeg)]),
        ],
    )"#;

    #[test]
    fn detects_cubeset_and_flat_files() {
        assert_eq!(FileFormat::Detect.resolve("  {\"version\": 1}"), FileFormat::Cubeset);
        assert_eq!(FileFormat::Detect.resolve("(pieces: [])"), FileFormat::Flat);
        assert_eq!(FileFormat::Flat.resolve("{"), FileFormat::Flat);
    }

    #[test]
    fn loads_cubeset_file_with_metadata() {
        let path = write_temp("load_cubeset.json", CUBESET);
        let mut pool = PrefabPiecePool::new();
        let report = pool.try_load_from_file(&path, false).unwrap();
        assert_eq!(report.pieces_loaded, 1);
        assert_eq!(report.starting_pieces_loaded, 1);
        assert_eq!(pool.metadata("intendedUse"), Some("village"));
        assert_eq!(pool.starting_pieces()[0].name(), "well");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn loading_the_same_flat_file_twice_doubles_the_count() {
        let path = write_temp("load_twice.ron", FLAT);
        let mut pool = PrefabPiecePool::new();
        assert!(pool.load_from_file(&path, true));
        let once = pool.all_pieces_count();
        assert!(pool.load_from_file(&path, true));
        assert_eq!(pool.all_pieces_count(), once * 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_fails_without_touching_the_pool() {
        let mut pool = PrefabPiecePool::from_defs(&[PieceDef::new("kept", [1, 1, 1])], &[]);
        let missing = std::env::temp_dir().join("piece_pool_definitely_missing.json");
        assert!(!pool.load_from_cubeset_file(&missing, true));
        assert!(matches!(
            pool.try_load_from_cubeset_file(&missing, false),
            Err(Error::Io(_))
        ));
        assert_eq!(pool.all_pieces_count(), 1);
    }

    #[test]
    fn unsupported_version_fails_the_whole_load() {
        let path = write_temp(
            "load_version.json",
            r#"{ "version": 2, "pieces": [ { "size": [1, 1, 1], "connectors": [] } ] }"#,
        );
        let mut pool = PrefabPiecePool::new();
        assert!(matches!(
            pool.try_load_from_cubeset_file(&path, true),
            Err(Error::UnsupportedVersion { version: 2 })
        ));
        assert_eq!(pool.all_pieces_count(), 0);
        assert_eq!(pool.starting_pieces_count(), 0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn from_file_builds_a_pool() {
        let path = write_temp("from_file.ron", FLAT);
        let pool = PrefabPiecePool::from_file(&path, true);
        assert_eq!(pool.all_pieces_count(), 1);
        let _ = std::fs::remove_file(path);
    }
}
