//! Raw asset values as recovered from the asset store.
//!
//! The bundle walker hands the pipeline one [`RawRecord`] per asset. Field
//! values are loosely typed: the same logical field may arrive as an integer
//! in one asset and as a float or a string in another, so consumers go
//! through [`crate::coerce`] rather than matching on a single representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to another object in the asset store.
///
/// Serialized the way the bundle walker dumps Unity `PPtr` fields, so a
/// JSON object with exactly `m_FileID` and `m_PathID` reads back as a
/// reference rather than a nested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetHandle {
    /// Index of the file holding the referenced object (0 = same file).
    #[serde(rename = "m_FileID")]
    pub file_id: i64,

    /// Object id within that file.
    #[serde(rename = "m_PathID")]
    pub path_id: i64,
}

impl AssetHandle {
    /// Creates a new handle.
    pub fn new(file_id: i64, path_id: i64) -> Self {
        Self { file_id, path_id }
    }

    /// Returns true for the null reference (`path_id == 0`).
    pub fn is_null(&self) -> bool {
        self.path_id == 0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PPtr<{}:{}>", self.file_id, self.path_id)
    }
}

/// A single decoded field value.
///
/// Variant order matters for deserialization: `AssetRef` must be tried
/// before `Record` and `Int` before `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Missing or null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integral value (int or long).
    Int(i64),
    /// Floating point value (float or double).
    Float(f64),
    /// String value.
    String(String),
    /// Ordered list of values.
    List(Vec<RawValue>),
    /// Reference to another asset.
    AssetRef(AssetHandle),
    /// Nested record (embedded struct or component data).
    Record(RawRecord),
}

impl RawValue {
    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::List(_) => "list",
            RawValue::AssetRef(_) => "asset_ref",
            RawValue::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested record, if this is a record.
    pub fn as_record(&self) -> Option<&RawRecord> {
        match self {
            RawValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the asset handle, if this is a reference.
    pub fn as_asset_ref(&self) -> Option<&AssetHandle> {
        match self {
            RawValue::AssetRef(h) => Some(h),
            _ => None,
        }
    }

    /// Returns true for primitives that serialize without conversion.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            RawValue::Bool(_) | RawValue::Int(_) | RawValue::Float(_) | RawValue::String(_)
        )
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::String(s) => write!(f, "{}", s),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            RawValue::AssetRef(h) => write!(f, "{}", h),
            RawValue::Record(r) => write!(f, "{}", r),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i as i64)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<f32> for RawValue {
    fn from(x: f32) -> Self {
        RawValue::Float(x as f64)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<AssetHandle> for RawValue {
    fn from(h: AssetHandle) -> Self {
        RawValue::AssetRef(h)
    }
}

impl From<RawRecord> for RawValue {
    fn from(r: RawRecord) -> Self {
        RawValue::Record(r)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Field name to value mapping for one decoded asset.
///
/// Keys are kept in sorted order so diagnostics and serialized output are
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a field.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Inserts a field, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    /// Returns true if the field is present (a null value still counts).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Counts how many of `names` are present on this record.
    pub fn count_present(&self, names: &[&str]) -> usize {
        names.iter().filter(|n| self.contains(n)).count()
    }

    /// Returns true if at least one of `names` is present.
    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.contains(n))
    }

    /// Returns the first present, non-null field among `names`.
    pub fn first_of<'a>(&self, names: &[&'a str]) -> Option<(&'a str, &RawValue)> {
        names.iter().find_map(|&n| match self.get(n) {
            Some(v) if !v.is_null() => Some((n, v)),
            _ => None,
        })
    }

    /// Walks nested records along `path`.
    ///
    /// `get_path(&["ComponentData", "OrbComponent"])` returns the value of
    /// `OrbComponent` inside the `ComponentData` record.
    pub fn get_path(&self, path: &[&str]) -> Option<&RawValue> {
        let (first, rest) = path.split_first()?;
        let value = self.get(first)?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_record()?.get_path(rest)
    }

    /// Returns a string field, if present and a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RawValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A component attached to a composed game object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Script or component class name (e.g. `OrbComponent`).
    pub type_name: String,

    /// Decoded fields of the component.
    #[serde(default)]
    pub data: RawRecord,
}

impl ComponentRecord {
    pub fn new(type_name: impl Into<String>, data: RawRecord) -> Self {
        Self {
            type_name: type_name.into(),
            data,
        }
    }
}

/// A composed object: a named game object with its component list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Game object name as stored in the bundle.
    pub name: String,

    /// Attached components, in bundle order.
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

impl GameObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Builder method to attach a component.
    pub fn with_component(mut self, component: ComponentRecord) -> Self {
        self.components.push(component);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_untagged_deserialization_picks_variants() {
        let json = r#"{
            "name": "Orbelisk",
            "level": 2,
            "damage": 1.5,
            "enabled": true,
            "missing": null,
            "tags": ["a", 1],
            "sprite": { "m_FileID": 0, "m_PathID": 4411 },
            "nested": { "m_FileID": 0, "extra": 1 }
        }"#;

        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.get("name"), Some(&RawValue::from("Orbelisk")));
        assert_eq!(record.get("level"), Some(&RawValue::Int(2)));
        assert_eq!(record.get("damage"), Some(&RawValue::Float(1.5)));
        assert_eq!(record.get("enabled"), Some(&RawValue::Bool(true)));
        assert_eq!(record.get("missing"), Some(&RawValue::Null));
        assert_eq!(
            record.get("sprite"),
            Some(&RawValue::AssetRef(AssetHandle::new(0, 4411)))
        );
        assert!(record.get("nested").unwrap().as_record().is_some());
        assert_eq!(record.get("tags").unwrap().as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_get_path_walks_nested_records() {
        let record = RawRecord::new().with(
            "ComponentData",
            RawRecord::new().with("OrbComponent", RawRecord::new().with("Level", 2)),
        );

        let level = record.get_path(&["ComponentData", "OrbComponent", "Level"]);
        assert_eq!(level, Some(&RawValue::Int(2)));
        assert!(record.get_path(&["ComponentData", "Missing"]).is_none());
        assert!(record.get_path(&[]).is_none());
    }

    #[test]
    fn test_first_of_skips_nulls() {
        let record = RawRecord::new()
            .with("englishDisplayName", RawValue::Null)
            .with("enemyName", "Slime");

        let (field, value) = record
            .first_of(&["englishDisplayName", "EnglishDisplayName", "enemyName"])
            .unwrap();
        assert_eq!(field, "enemyName");
        assert_eq!(value.as_str(), Some("Slime"));
    }

    #[test]
    fn test_count_present_counts_null_fields() {
        let record = RawRecord::new().with("a", RawValue::Null).with("b", 1);
        assert_eq!(record.count_present(&["a", "b", "c"]), 2);
    }

    #[test]
    fn test_display_stringifies_nested_values() {
        let record = RawRecord::new()
            .with("ref", AssetHandle::new(1, 7))
            .with("xs", vec![1i64, 2]);
        assert_eq!(record.to_string(), "{ref: PPtr<1:7>, xs: [1, 2]}");
    }
}
