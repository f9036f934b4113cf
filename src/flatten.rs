//! Flattening between the property-set graph and flat `Set.Prop` columns.
//!
//! [`flatten`] turns an element's property sets into flat keyed cells;
//! [`split_column`] is its inverse, used by the sync engine to route an
//! edited cell back to the right set and property.

use std::collections::BTreeMap;

use crate::model::{Element, ElementId};
use crate::store::ModelStore;

/// Delimiter between set name and property name in flattened column keys.
pub const SET_PROP_DELIMITER: char = '.';

/// Upper-cased property-name fragments that mark an authoring-tool id.
///
/// Authoring tools disagree on where they stash their element id, so the
/// lookup scans property names for these fragments. Best-effort heuristic,
/// not a guarantee.
pub const ID_NAME_FRAGMENTS: &[&str] = &["ELEMENTID", "REVITID", "BATID"];

/// Flatten all property sets of one element into `"{Set}.{Prop}"` keyed
/// cells.
///
/// Missing values become `""` rather than being omitted, so the column
/// union downstream stays consistent. An element without property sets
/// yields an empty map, not an error. Pure read.
#[must_use]
pub fn flatten<M: ModelStore>(model: &M, id: ElementId) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();

    let Some(sets) = model.property_sets(id) else {
        return flat;
    };

    for (set_name, props) in sets {
        for (prop_name, value) in props {
            flat.insert(
                format!("{set_name}{SET_PROP_DELIMITER}{prop_name}"),
                value.as_cell(),
            );
        }
    }

    flat
}

/// Resolve the authoring-tool id for an element.
///
/// The canonical Tag attribute wins when present and non-empty. Otherwise
/// the property sets are scanned (in deterministic set/property order) for
/// a property whose name contains one of [`ID_NAME_FRAGMENTS`]; the first
/// non-empty value wins. Returns `None` when nothing matches.
#[must_use]
pub fn resolve_tool_id(element: &Element) -> Option<String> {
    if let Some(tag) = &element.tag {
        if !tag.is_empty() {
            return Some(tag.clone());
        }
    }

    for props in element.property_sets.values() {
        for (name, value) in props {
            let upper = name.to_uppercase();
            if ID_NAME_FRAGMENTS.iter().any(|fragment| upper.contains(fragment)) {
                let cell = value.as_cell();
                if !cell.is_empty() {
                    return Some(cell);
                }
            }
        }
    }

    None
}

/// Split a flattened column name into `(set name, property name)`.
///
/// Splits at the **last** delimiter occurrence, so a dotted set name keeps
/// its dots and the property name never contains one. This mirrors the
/// flattening direction and is the documented parsing rule for edited
/// sheets. Returns `None` for columns without a delimiter (identity and
/// metadata columns).
#[must_use]
pub fn split_column(column: &str) -> Option<(&str, &str)> {
    column.rsplit_once(SET_PROP_DELIMITER)
}
