//! Cubeset format version 1.
//!
//! A piece record without a `connectors` array is rejected as a whole, while a malformed
//! entry inside the array only drops that connector. Malformed optional metadata falls back
//! to the [`PieceDef`] default.
use crate::error::{Error, Result};
use crate::load::cubeset::reader::{read_i32, read_ivec3, read_u32, StructuredReader};
use crate::load::{LoadContext, LoadedPieces};
use crate::piece::connector::{ConnectorDef, Direction};
use crate::piece::{AllowedRotations, MergeStrategy, PieceDef};

pub(crate) fn read_cubeset<R: StructuredReader>(
    document: &R,
    ctx: &mut LoadContext,
) -> Result<LoadedPieces> {
    let pieces = document
        .field("pieces")
        .and_then(StructuredReader::elements)
        .ok_or_else(|| Error::Parse("missing 'pieces' array".into()))?;

    let mut loaded = LoadedPieces {
        metadata: read_metadata(document),
        ..Default::default()
    };

    for (i, record) in pieces.iter().enumerate() {
        let label = piece_label(record, i + 1);
        match read_piece(record, &label, ctx) {
            Ok((def, true)) => loaded.starting.push(def),
            Ok((def, false)) => loaded.regular.push(def),
            Err(e) => ctx.piece_skipped(&label, &e),
        }
    }
    Ok(loaded)
}

fn piece_label<R: StructuredReader>(record: &R, number: usize) -> String {
    match record.field("name").and_then(StructuredReader::as_str) {
        Some(name) => format!("piece #{number} ('{name}')"),
        None => format!("piece #{number}"),
    }
}

/// String, integer and boolean values of the top-level `metadata` table.
fn read_metadata<R: StructuredReader>(document: &R) -> Vec<(String, String)> {
    let Some(entries) = document.field("metadata").and_then(StructuredReader::entries) else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let text = value
                .as_str()
                .map(str::to_owned)
                .or_else(|| value.as_int().map(|v| v.to_string()))
                .or_else(|| value.as_bool().map(|v| v.to_string()))?;
            Some((key.to_owned(), text))
        })
        .collect()
}

/// Reads one piece record, returning its definition and whether it is a starting piece.
fn read_piece<R: StructuredReader>(
    record: &R,
    label: &str,
    ctx: &mut LoadContext,
) -> Result<(PieceDef, bool)> {
    if !record.is_table() {
        return Err(Error::invalid_piece(label, "piece record is not a table"));
    }
    let size = record
        .field("size")
        .and_then(read_ivec3)
        .ok_or_else(|| Error::invalid_piece(label, "missing or malformed 'size'"))?;
    let name = record
        .field("name")
        .and_then(StructuredReader::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| label.to_owned());

    let mut def = PieceDef::new(name, size.to_array());
    def.connectors = read_connectors(record, label, ctx)?;
    let starting = apply_metadata(record, &mut def, label, ctx);
    def.validate()?;
    Ok((def, starting))
}

fn read_connectors<R: StructuredReader>(
    record: &R,
    label: &str,
    ctx: &mut LoadContext,
) -> Result<Vec<ConnectorDef>> {
    let entries = record
        .field("connectors")
        .ok_or_else(|| Error::invalid_piece(label, "no 'connectors' array"))?
        .elements()
        .ok_or_else(|| Error::invalid_piece(label, "'connectors' is not an array"))?;

    let mut connectors = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match read_connector(entry) {
            Ok(connector) => connectors.push(connector),
            Err(e) => ctx.connector_dropped(label, i + 1, &e),
        }
    }
    Ok(connectors)
}

fn read_connector<R: StructuredReader>(entry: &R) -> Result<ConnectorDef> {
    let connector_type = entry
        .field("type")
        .and_then(read_i32)
        .ok_or_else(|| Error::invalid_field("type", "missing or not an integer"))?;
    let position = entry
        .field("position")
        .and_then(read_ivec3)
        .ok_or_else(|| Error::invalid_field("position", "missing or malformed"))?;
    let direction = read_direction(
        entry
            .field("direction")
            .ok_or_else(|| Error::invalid_field("direction", "missing"))?,
    )?;
    Ok(ConnectorDef::new(
        connector_type,
        position.to_array(),
        direction,
    ))
}

fn read_direction<R: StructuredReader>(value: &R) -> Result<Direction> {
    if let Some(text) = value.as_str() {
        return text.parse();
    }
    value
        .as_int()
        .and_then(Direction::from_block_face)
        .ok_or_else(|| Error::invalid_field("direction", "not a direction name or face code"))
}

/// Applies optional metadata to `def`. Returns the `isStarting` flag.
fn apply_metadata<R: StructuredReader>(
    record: &R,
    def: &mut PieceDef,
    label: &str,
    ctx: &mut LoadContext,
) -> bool {
    let mut fields = OptionalFields { record, label, ctx };

    if let Some(v) = fields.read("allowedRotations", |v| {
        read_u32(v)
            .and_then(|bits| u8::try_from(bits).ok())
            .and_then(AllowedRotations::from_bits)
    }) {
        def.allowed_rotations = v;
    }
    if let Some(v) = fields.read("maxOccurrence", read_u32) {
        def.max_occurrences = Some(v);
    }
    if let Some(v) = fields.read("mergeStrategy", |v| v.as_str()?.parse::<MergeStrategy>().ok()) {
        def.merge_strategy = v;
    }
    if let Some(v) = fields.read("weight", read_u32) {
        def.weight = v;
    }
    if let Some(v) = fields.read("depthWeight", read_i32) {
        def.depth_weight = v;
    }
    if let Some(v) = fields.read("addWeightIfSame", read_i32) {
        def.add_weight_if_same = v;
    }
    if let Some(v) = fields.read("moveToGround", StructuredReader::as_bool) {
        def.move_to_ground = v;
    }
    fields
        .read("isStarting", StructuredReader::as_bool)
        .unwrap_or(false)
}

struct OptionalFields<'a, R> {
    record: &'a R,
    label: &'a str,
    ctx: &'a mut LoadContext,
}

impl<R: StructuredReader> OptionalFields<'_, R> {
    /// Parsed value of `key`; `None` when absent or malformed, the latter being reported.
    fn read<T>(&mut self, key: &str, parse: impl Fn(&R) -> Option<T>) -> Option<T> {
        let value = self.record.field(key)?;
        let parsed = parse(value);
        if parsed.is_none() {
            self.ctx.field_defaulted(self.label, key);
        }
        parsed
    }
}
