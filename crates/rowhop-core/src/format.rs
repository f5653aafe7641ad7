use serde::{Serialize, Serializer};
use serde_json::Value as Json;
use std::fmt;

/// Hard ceiling on rendered cell length, in characters. Fixed, not
/// configurable.
pub const MAX_CELL_CHARS: usize = 1000;

///
/// Cell
///
/// Final scalar produced for one (row, path) position of the grid. `Null`
/// is the explicit marker for unset, unresolved, or broken references; it
/// is distinct from an empty string.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Convert a resolved raw value into its display cell.
    ///
    /// Relation pairs display as their label, homogeneous reference lists
    /// join with commas, labeled objects display their label, and anything
    /// else structured falls back to compact JSON. All text is truncated to
    /// [`MAX_CELL_CHARS`].
    #[must_use]
    pub fn from_resolved(raw: Option<Json>) -> Self {
        let Some(raw) = raw else {
            return Self::Null;
        };
        match raw {
            Json::Null => Self::Null,
            Json::Bool(value) => Self::Bool(value),
            Json::Number(number) => number
                .as_i64()
                .map_or_else(|| number.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            Json::String(text) => Self::Text(truncate(text)),
            Json::Array(items) => from_array(items),
            Json::Object(map) => from_object(map),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

fn from_array(items: Vec<Json>) -> Cell {
    // A single-valued relation the read returned verbatim: [id, label].
    if let [Json::Number(_), Json::String(label)] = items.as_slice() {
        return Cell::Text(truncate(label.clone()));
    }
    // Multi-valued reference lists: identifiers or labels, comma-joined.
    if !items.is_empty() && items.iter().all(Json::is_number) {
        let joined = items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        return Cell::Text(truncate(joined));
    }
    if !items.is_empty() && items.iter().all(Json::is_string) {
        let joined = items
            .iter()
            .filter_map(Json::as_str)
            .collect::<Vec<_>>()
            .join(",");
        return Cell::Text(truncate(joined));
    }
    serialized(&Json::Array(items))
}

fn from_object(map: serde_json::Map<String, Json>) -> Cell {
    if let Some(Json::String(label)) = map.get("display_name") {
        return Cell::Text(truncate(label.clone()));
    }
    serialized(&Json::Object(map))
}

// Compact JSON fallback for shapes with no tabular rendering.
fn serialized(value: &Json) -> Cell {
    match serde_json::to_string(value) {
        Ok(text) => Cell::Text(truncate(text)),
        Err(_) => Cell::Null,
    }
}

/// Truncate to [`MAX_CELL_CHARS`] characters; shorter text passes through
/// untouched.
#[must_use]
pub fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text;
    }
    text.chars().take(MAX_CELL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn resolved(value: Json) -> Cell {
        Cell::from_resolved(Some(value))
    }

    #[test]
    fn relation_pair_displays_label() {
        assert_eq!(
            resolved(json!([42, "Acme Corp"])),
            Cell::Text("Acme Corp".to_string())
        );
    }

    #[test]
    fn identifier_list_joins_with_commas() {
        assert_eq!(resolved(json!([1, 2, 3])), Cell::Text("1,2,3".to_string()));
    }

    #[test]
    fn label_list_joins_with_commas() {
        assert_eq!(
            resolved(json!(["a", "b"])),
            Cell::Text("a,b".to_string())
        );
    }

    #[test]
    fn labeled_object_displays_label() {
        assert_eq!(
            resolved(json!({"display_name": "Acme Corp", "id": 42})),
            Cell::Text("Acme Corp".to_string())
        );
    }

    #[test]
    fn unlabeled_object_falls_back_to_json() {
        assert_eq!(
            resolved(json!({"x": 1})),
            Cell::Text("{\"x\":1}".to_string())
        );
    }

    #[test]
    fn mixed_array_falls_back_to_json() {
        assert_eq!(
            resolved(json!([1, "a"])),
            Cell::Text("[1,\"a\"]".to_string())
        );
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(resolved(json!(true)), Cell::Bool(true));
        assert_eq!(resolved(json!(-5)), Cell::Int(-5));
        assert_eq!(resolved(json!(1.5)), Cell::Float(1.5));
        assert_eq!(resolved(json!("plain")), Cell::Text("plain".to_string()));
    }

    #[test]
    fn null_and_absent_are_null() {
        assert_eq!(resolved(json!(null)), Cell::Null);
        assert_eq!(Cell::from_resolved(None), Cell::Null);
    }

    #[test]
    fn over_limit_text_is_cut_to_exactly_the_limit() {
        let long = "x".repeat(MAX_CELL_CHARS + 1);
        let Cell::Text(text) = resolved(json!(long)) else {
            panic!("expected text cell");
        };
        assert_eq!(text.chars().count(), MAX_CELL_CHARS);
    }

    #[test]
    fn at_limit_text_is_unchanged() {
        let exact = "y".repeat(MAX_CELL_CHARS);
        assert_eq!(resolved(json!(exact.clone())), Cell::Text(exact));
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        let long: String = "é".repeat(MAX_CELL_CHARS + 10);
        let cut = truncate(long);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    proptest! {
        #[test]
        fn truncation_is_a_char_prefix(text in ".{0,1200}") {
            let cut = truncate(text.clone());
            prop_assert!(cut.chars().count() <= MAX_CELL_CHARS);
            prop_assert!(text.starts_with(&cut));
        }
    }
}
