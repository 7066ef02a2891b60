//! Structured-data reader abstraction used by the cubeset loaders.
use glam::IVec3;
use serde_json::Value;

/// Read access to a parsed, dynamically typed document.
///
/// Version-specific cubeset loaders only use these primitives, so the document syntax can be
/// swapped without touching them.
pub trait StructuredReader: Sized {
    /// Member `name` of a table, `None` when absent or when `self` is not a table.
    fn field(&self, name: &str) -> Option<&Self>;

    /// Elements of an array.
    fn elements(&self) -> Option<&[Self]>;

    /// Key/value pairs of a table.
    fn entries(&self) -> Option<Vec<(&str, &Self)>>;

    fn as_int(&self) -> Option<i64>;

    fn as_str(&self) -> Option<&str>;

    fn as_bool(&self) -> Option<bool>;

    fn is_table(&self) -> bool;
}

impl StructuredReader for Value {
    fn field(&self, name: &str) -> Option<&Self> {
        self.as_object()?.get(name)
    }

    fn elements(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }

    fn entries(&self) -> Option<Vec<(&str, &Self)>> {
        self.as_object()
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }

    fn as_int(&self) -> Option<i64> {
        Value::as_i64(self)
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn is_table(&self) -> bool {
        self.is_object()
    }
}

/// Reads an `i32`, rejecting values out of range.
pub fn read_i32<R: StructuredReader>(value: &R) -> Option<i32> {
    value.as_int().and_then(|v| i32::try_from(v).ok())
}

/// Reads a non-negative `u32`.
pub fn read_u32<R: StructuredReader>(value: &R) -> Option<u32> {
    value.as_int().and_then(|v| u32::try_from(v).ok())
}

/// Reads a vector written either as `[x, y, z]` or as `{ "x": .., "y": .., "z": .. }`.
pub fn read_ivec3<R: StructuredReader>(value: &R) -> Option<IVec3> {
    if let Some(items) = value.elements() {
        return match items {
            [x, y, z] => Some(IVec3::new(read_i32(x)?, read_i32(y)?, read_i32(z)?)),
            _ => None,
        };
    }
    Some(IVec3::new(
        read_i32(value.field("x")?)?,
        read_i32(value.field("y")?)?,
        read_i32(value.field("z")?)?,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_vectors_in_both_shapes() {
        assert_eq!(read_ivec3(&json!([1, -2, 3])), Some(IVec3::new(1, -2, 3)));
        assert_eq!(
            read_ivec3(&json!({ "x": 4, "y": 5, "z": 6 })),
            Some(IVec3::new(4, 5, 6))
        );
        assert_eq!(read_ivec3(&json!([1, 2])), None);
        assert_eq!(read_ivec3(&json!([1, 2, "3"])), None);
        assert_eq!(read_ivec3(&json!({ "x": 1, "y": 2 })), None);
        assert_eq!(read_ivec3(&json!(7)), None);
    }

    #[test]
    fn integer_readers_check_range() {
        assert_eq!(read_i32(&json!(5_000_000_000i64)), None);
        assert_eq!(read_u32(&json!(-1)), None);
        assert_eq!(read_u32(&json!(12)), Some(12));
        assert_eq!(read_i32(&json!(1.5)), None);
    }

    #[test]
    fn field_access_on_non_tables_is_none() {
        let doc = json!({ "a": [1, 2], "b": true });
        assert!(doc.is_table());
        assert_eq!(doc.field("a").and_then(|a| a.elements()).map(<[_]>::len), Some(2));
        assert_eq!(doc.field("b").and_then(StructuredReader::as_bool), Some(true));
        assert!(doc.field("a").unwrap().field("x").is_none());
        assert_eq!(doc.entries().map(|e| e.len()), Some(2));
    }
}
