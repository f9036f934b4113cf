//! Tabular representation of extracted elements.
//!
//! One row per element, one column per identity field plus every
//! `Set.Prop` pair observed across the batch. The table is what the human
//! edits; it is never authoritative — the model file is.

use std::collections::{BTreeMap, HashSet};

use chrono::Local;
use tracing::warn;

use crate::error::StoreError;
use crate::flatten;
use crate::model::{Element, ElementId, SPACE_KIND, STOREY_KIND, ZONE_KIND};
use crate::progress::Progress;
use crate::store::ModelStore;

pub const COL_GUID: &str = "GUID";
pub const COL_BIM_ID: &str = "BIM_ID";
pub const COL_ENTITY: &str = "Entity";
pub const COL_NAME: &str = "Name";
pub const COL_TYPE: &str = "Type";
pub const COL_MATERIAL: &str = "Material";
pub const COL_FLOOR: &str = "Floor";
pub const COL_ZONE: &str = "Zone";

/// Fixed identity/derived columns, in output order.
pub const IDENTITY_COLUMNS: &[&str] = &[
    COL_GUID,
    COL_BIM_ID,
    COL_ENTITY,
    COL_NAME,
    COL_TYPE,
    COL_MATERIAL,
    COL_FLOOR,
    COL_ZONE,
];

/// Prefix marking batch metadata columns; the sync engine never writes
/// these back.
pub const METADATA_PREFIX: char = '_';
pub const COL_SOURCE_FILE: &str = "_source_file";
pub const COL_EXTRACT_DATE: &str = "_extract_date";

/// Joins material names into one cell.
pub const MATERIAL_DELIMITER: &str = " | ";

/// A flat table of elements. Rows are aligned to `columns`; cells the
/// element lacks hold `""`. Row order is model enumeration order and
/// carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row index and column name.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Build one table over all elements of the model.
///
/// Per-element failures are logged with the element id and skip that
/// element only; the batch always completes. Every produced row carries
/// the identical column set: the union of all columns observed across the
/// batch, identity columns first, property columns in first-seen order,
/// batch metadata last.
pub fn build_table<M: ModelStore>(model: &M, source_file: &str, progress: &mut Progress) -> Table {
    let ids = model.list_elements(None);
    let total = ids.len();

    let mut raw_rows: Vec<BTreeMap<String, String>> = Vec::with_capacity(total);
    let mut property_columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, id) in ids.iter().enumerate() {
        match build_row(model, *id) {
            Ok(row) => {
                for key in row.keys() {
                    if !IDENTITY_COLUMNS.contains(&key.as_str()) && seen.insert(key.clone()) {
                        property_columns.push(key.clone());
                    }
                }
                raw_rows.push(row);
            }
            Err(error) => warn!(element = *id, %error, "skipping element"),
        }

        progress.report(index + 1, total, "extracting elements");
    }

    let extract_date = Local::now().to_rfc3339();

    let mut columns: Vec<String> = IDENTITY_COLUMNS.iter().map(ToString::to_string).collect();
    columns.extend(property_columns);
    columns.push(COL_SOURCE_FILE.to_string());
    columns.push(COL_EXTRACT_DATE.to_string());

    let rows = raw_rows
        .into_iter()
        .map(|mut raw| {
            columns
                .iter()
                .map(|column| match column.as_str() {
                    COL_SOURCE_FILE => source_file.to_string(),
                    COL_EXTRACT_DATE => extract_date.clone(),
                    name => raw.remove(name).unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    Table { columns, rows }
}

fn build_row<M: ModelStore>(
    model: &M,
    id: ElementId,
) -> Result<BTreeMap<String, String>, StoreError> {
    let element = model.element(id).ok_or(StoreError::UnknownElement { id })?;

    let mut row = BTreeMap::new();
    row.insert(COL_GUID.to_string(), element.global_id.clone());
    row.insert(
        COL_BIM_ID.to_string(),
        flatten::resolve_tool_id(element).unwrap_or_default(),
    );
    row.insert(COL_ENTITY.to_string(), element.entity_kind.clone());
    row.insert(COL_NAME.to_string(), element.name.clone().unwrap_or_default());
    row.insert(
        COL_TYPE.to_string(),
        element.type_name.clone().unwrap_or_default(),
    );
    row.insert(
        COL_MATERIAL.to_string(),
        element.materials.join(MATERIAL_DELIMITER),
    );
    row.insert(
        COL_FLOOR.to_string(),
        resolve_floor(element).unwrap_or_default(),
    );
    row.insert(
        COL_ZONE.to_string(),
        resolve_zone(element).unwrap_or_default(),
    );

    for (key, value) in flatten::flatten(model, id) {
        row.insert(key, value);
    }

    Ok(row)
}

/// Storey lookup for the Floor column.
///
/// Spatial containers have no floor of their own. Otherwise the first
/// containment relation targeting a storey wins; its name, falling back to
/// the long name.
fn resolve_floor(element: &Element) -> Option<String> {
    if element.is_spatial_container() {
        return None;
    }

    element
        .contained_in
        .iter()
        .find(|r| r.kind.eq_ignore_ascii_case(STOREY_KIND))
        .and_then(|r| r.name.clone().or_else(|| r.long_name.clone()))
}

/// Zone lookup: a zone group assignment wins; failing that, non-spatial
/// elements fall back to the space they are contained in.
fn resolve_zone(element: &Element) -> Option<String> {
    let zone = element
        .groups
        .iter()
        .find(|g| g.kind.eq_ignore_ascii_case(ZONE_KIND))
        .and_then(|g| g.name.clone());
    if zone.is_some() {
        return zone;
    }

    if element.is_spatial_container() {
        return None;
    }

    element
        .contained_in
        .iter()
        .find(|r| r.kind.eq_ignore_ascii_case(SPACE_KIND))
        .and_then(|r| r.name.clone().or_else(|| r.long_name.clone()))
}
