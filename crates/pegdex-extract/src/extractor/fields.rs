//! Ordered field lookups over one or more record layers.

use pegdex_model::{coerce, RawRecord, RawValue};

use crate::classifier::{COMPONENT_DATA_KEY, ORB_COMPONENT_KEY};

/// A stack of records searched in order; the first non-null hit wins.
pub(crate) struct Fields<'a> {
    layers: Vec<&'a RawRecord>,
}

impl<'a> Fields<'a> {
    /// Top-level fields only.
    pub fn top(record: &'a RawRecord) -> Self {
        Self {
            layers: vec![record],
        }
    }

    /// Top-level fields, then orb component data, then any other component
    /// data nested under `ComponentData`.
    pub fn with_components(record: &'a RawRecord) -> Self {
        let mut layers = vec![record];

        let orb_paths: [&[&str]; 2] = [&[COMPONENT_DATA_KEY, ORB_COMPONENT_KEY], &[ORB_COMPONENT_KEY]];
        for path in orb_paths {
            if let Some(nested) = record.get_path(path).and_then(RawValue::as_record) {
                layers.push(nested);
            }
        }

        if let Some(components) = record.get(COMPONENT_DATA_KEY).and_then(RawValue::as_record) {
            for (name, value) in components.iter() {
                if name == ORB_COMPONENT_KEY {
                    continue;
                }
                if let Some(nested) = value.as_record() {
                    layers.push(nested);
                }
            }
        }

        Self { layers }
    }

    /// First non-null value of `name` across layers.
    pub fn get(&self, name: &str) -> Option<&'a RawValue> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get(name))
            .find(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains(name))
    }

    /// First non-empty string among `names`. Scalars are stringified.
    pub fn string(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .find_map(|n| self.get(n).and_then(coerce::to_non_empty_string))
    }

    /// First coercible number among `names`, honouring integral field names.
    pub fn number(&self, names: &[&str]) -> Option<f64> {
        names
            .iter()
            .find_map(|n| self.get(n).and_then(|v| coerce::field_number(n, v)))
    }

    /// First coercible integer among `names`.
    pub fn int(&self, names: &[&str]) -> Option<i64> {
        names
            .iter()
            .find_map(|n| self.get(n).and_then(coerce::to_int))
    }

    /// List value of `name`, if present and a list.
    pub fn list(&self, name: &str) -> Option<&'a [RawValue]> {
        self.get(name).and_then(RawValue::as_list)
    }
}
