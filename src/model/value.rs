use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar property value as stored in a property set.
///
/// Values are serialized back to strings when written through the sync
/// engine; `Empty` is the explicit "no value" marker and flattens to an
/// empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
}

/// Properties of one property set, keyed by property name.
pub type PropertyMap = BTreeMap<String, PropValue>;

/// All property sets of one element, keyed by set name.
///
/// A `(element, set name)` pair denotes at most one set; the map key
/// enforces that.
pub type PropertySets = BTreeMap<String, PropertyMap>;

impl PropValue {
    /// Render the value as a table cell string. `Empty` becomes `""`.
    #[must_use]
    pub fn as_cell(&self) -> String {
        match self {
            PropValue::Text(s) => s.clone(),
            PropValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{n:.0}")
                } else {
                    n.to_string()
                }
            }
            PropValue::Bool(b) => b.to_string(),
            PropValue::Empty => String::new(),
        }
    }

    /// Whether the value renders as an empty cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            PropValue::Empty => true,
            PropValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}
