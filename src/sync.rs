//! Sync engine: applies edited table rows back onto a model.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::annotate::{LCA_SET, REUSE_STATUS_PROP};
use crate::error::{StoreError, SyncError};
use crate::flatten::split_column;
use crate::model::{ElementId, PropValue};
use crate::progress::Progress;
use crate::store::ModelStore;
use crate::table::{Table, COL_GUID, METADATA_PREFIX};

/// Outcome of one sync batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    pub rows_processed: usize,
    pub elements_updated: usize,
    pub rows_skipped: usize,
    pub properties_written: usize,
}

/// Apply every row of an edited table to the model, then persist it.
///
/// Rows resolve to elements by the GUID column (exact match); a row with
/// no matching element is logged and skipped, never fatal. A column is
/// written back when its name holds a set/property delimiter, does not
/// carry the metadata prefix, and its cell is non-empty. Each write
/// touches exactly the one named property; siblings in the same set stay
/// as they are.
///
/// A failed save aborts the batch with an error. There is no rollback:
/// property writes already applied in memory are not persisted, or —
/// depending on the store's save semantics — partially persisted. Known
/// limitation, not an atomicity guarantee.
pub fn sync_table<M: ModelStore>(
    model: &mut M,
    table: &Table,
    save_path: &Path,
    progress: &mut Progress,
) -> Result<SyncSummary, SyncError> {
    let guid_index = table.column_index(COL_GUID).ok_or_else(|| {
        SyncError::MissingColumn {
            name: COL_GUID.to_string(),
        }
    })?;

    let mut summary = SyncSummary::default();
    let total = table.rows.len();

    for (index, row) in table.rows.iter().enumerate() {
        summary.rows_processed += 1;
        let guid = row[guid_index].as_str();

        let Some(element) = model.find_by_global_id(guid) else {
            warn!(guid, "no element for row, skipping");
            summary.rows_skipped += 1;
            progress.report(index + 1, total, "syncing rows");
            continue;
        };

        match apply_row(model, element, table, row) {
            Ok(written) => {
                summary.properties_written += written;
                summary.elements_updated += 1;
            }
            Err(error) => {
                warn!(guid, %error, "row failed, skipping");
                summary.rows_skipped += 1;
            }
        }

        progress.report(index + 1, total, "syncing rows");
    }

    model.save(save_path)?;
    info!(
        elements = summary.elements_updated,
        properties = summary.properties_written,
        skipped = summary.rows_skipped,
        "sync complete"
    );

    Ok(summary)
}

/// Fast-path variant: updates only the reuse-status field, skipping
/// general column parsing. Used for low-latency interactive edits; the
/// row-resolution and write rules are the same as [`sync_table`]
/// restricted to the one well-known column.
pub fn sync_reuse_status<M: ModelStore>(
    model: &mut M,
    table: &Table,
    save_path: &Path,
) -> Result<SyncSummary, SyncError> {
    let column = format!("{LCA_SET}.{REUSE_STATUS_PROP}");
    let guid_index = table.column_index(COL_GUID).ok_or_else(|| {
        SyncError::MissingColumn {
            name: COL_GUID.to_string(),
        }
    })?;
    let status_index = table
        .column_index(&column)
        .ok_or(SyncError::MissingColumn { name: column })?;

    let mut summary = SyncSummary::default();

    for row in &table.rows {
        summary.rows_processed += 1;
        let guid = row[guid_index].as_str();
        let value = row[status_index].as_str();
        if value.is_empty() {
            continue;
        }

        let Some(element) = model.find_by_global_id(guid) else {
            warn!(guid, "no element for row, skipping");
            summary.rows_skipped += 1;
            continue;
        };

        match write_property(model, element, LCA_SET, REUSE_STATUS_PROP, value) {
            Ok(()) => {
                summary.elements_updated += 1;
                summary.properties_written += 1;
            }
            Err(error) => {
                warn!(guid, %error, "row failed, skipping");
                summary.rows_skipped += 1;
            }
        }
    }

    model.save(save_path)?;
    Ok(summary)
}

fn apply_row<M: ModelStore>(
    model: &mut M,
    element: ElementId,
    table: &Table,
    row: &[String],
) -> Result<usize, StoreError> {
    let mut written = 0usize;

    for (column, value) in table.columns.iter().zip(row) {
        if column.starts_with(METADATA_PREFIX) || value.is_empty() {
            continue;
        }

        // Identity columns carry no delimiter and fall through here
        let Some((set_name, prop_name)) = split_column(column) else {
            continue;
        };

        write_property(model, element, set_name, prop_name, value)?;
        written += 1;
    }

    Ok(written)
}

/// Single-property write: locate (or create) the set, then merge in just
/// the one value, serialized as a string.
fn write_property<M: ModelStore>(
    model: &mut M,
    element: ElementId,
    set_name: &str,
    prop_name: &str,
    value: &str,
) -> Result<(), StoreError> {
    let handle = model.find_or_create_property_set(element, set_name)?;
    let props = [(prop_name.to_string(), PropValue::from(value))].into();
    model.write_properties(&handle, &props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{ensure_annotations, EXTERNAL_ID_PROP};
    use crate::model::{Element, PropertySets};
    use crate::store::JsonModel;
    use pretty_assertions::assert_eq;

    fn wall(id: ElementId, global_id: &str) -> Element {
        Element {
            id,
            global_id: global_id.to_string(),
            entity_kind: "IfcWall".to_string(),
            name: None,
            type_name: None,
            tag: None,
            materials: Vec::new(),
            contained_in: Vec::new(),
            groups: Vec::new(),
            property_sets: PropertySets::new(),
        }
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    fn save_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
        dir.path().join("model.json")
    }

    #[test]
    fn targeted_write_leaves_siblings_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        let mut e = wall(1, "1A2B");
        e.property_sets.insert(
            "S".to_string(),
            [
                ("a".to_string(), PropValue::from("1")),
                ("b".to_string(), PropValue::from("2")),
            ]
            .into(),
        );
        model.insert_element(e);

        let edited = table(&["GUID", "S.a"], &[&["1A2B", "9"]]);
        let summary =
            sync_table(&mut model, &edited, &save_path(&dir), &mut Progress::none()).unwrap();

        assert_eq!(summary.elements_updated, 1);
        assert_eq!(summary.properties_written, 1);

        let set = &model.property_sets(1).unwrap()["S"];
        assert_eq!(set["a"], PropValue::from("9"));
        assert_eq!(set["b"], PropValue::from("2"));
    }

    #[test]
    fn missing_set_is_created_others_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        let mut e = wall(1, "1A2B");
        e.property_sets
            .insert("S".to_string(), [("a".to_string(), PropValue::from("1"))].into());
        model.insert_element(e);

        let edited = table(&["GUID", "T.c"], &[&["1A2B", "value"]]);
        sync_table(&mut model, &edited, &save_path(&dir), &mut Progress::none()).unwrap();

        let sets = model.property_sets(1).unwrap();
        assert_eq!(sets["T"]["c"], PropValue::from("value"));
        assert_eq!(sets["S"]["a"], PropValue::from("1"));
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn unresolvable_row_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        model.insert_element(wall(1, "1A2B"));

        let edited = table(
            &["GUID", "S.a"],
            &[&["MISSING", "1"], &["1A2B", "2"]],
        );
        let summary =
            sync_table(&mut model, &edited, &save_path(&dir), &mut Progress::none()).unwrap();

        assert_eq!(summary.rows_processed, 2);
        assert_eq!(summary.rows_skipped, 1);
        assert_eq!(summary.elements_updated, 1);
        assert_eq!(model.property_sets(1).unwrap()["S"]["a"], PropValue::from("2"));
    }

    #[test]
    fn identity_metadata_and_empty_cells_are_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        model.insert_element(wall(1, "1A2B"));

        let edited = table(
            &["GUID", "Name", "_source_file", "S.a", "S.b"],
            &[&["1A2B", "Vegg", "model.json", "1", ""]],
        );
        let summary =
            sync_table(&mut model, &edited, &save_path(&dir), &mut Progress::none()).unwrap();

        assert_eq!(summary.properties_written, 1);
        let sets = model.property_sets(1).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets["S"].len(), 1);
    }

    #[test]
    fn missing_guid_column_is_batch_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        let edited = table(&["S.a"], &[&["1"]]);

        let err = sync_table(&mut model, &edited, &save_path(&dir), &mut Progress::none())
            .unwrap_err();
        assert!(matches!(err, SyncError::MissingColumn { .. }));
    }

    #[test]
    fn failed_save_aborts_the_batch() {
        let mut model = JsonModel::new("IFC4");
        model.insert_element(wall(1, "1A2B"));
        let edited = table(&["GUID", "S.a"], &[&["1A2B", "1"]]);

        let missing_dir = std::path::Path::new("/nonexistent-folder/model.json");
        let err =
            sync_table(&mut model, &edited, missing_dir, &mut Progress::none()).unwrap_err();
        assert!(matches!(err, SyncError::Store(StoreError::FileWrite { .. })));
    }

    #[test]
    fn reuse_status_round_trip() {
        // The concrete scenario: annotate, edit the status, sync it back
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        let mut e = wall(1, "1A2B");
        e.materials = vec!["Concrete".to_string(), "Insulation".to_string()];
        model.insert_element(e);

        ensure_annotations(&mut model, 1, "basis", "P").unwrap();
        assert_eq!(
            model.property_sets(1).unwrap()[LCA_SET][REUSE_STATUS_PROP],
            PropValue::from("NY")
        );

        let edited = table(
            &["GUID", "G55_LCA.Gjenbruksstatus"],
            &[&["1A2B", "GJEN"]],
        );
        sync_table(&mut model, &edited, &save_path(&dir), &mut Progress::none()).unwrap();

        let lca = &model.property_sets(1).unwrap()[LCA_SET];
        assert_eq!(lca[REUSE_STATUS_PROP], PropValue::from("GJEN"));
        assert_eq!(lca[EXTERNAL_ID_PROP], PropValue::from("1A2B"));
    }

    #[test]
    fn fast_path_writes_only_the_status_column() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = JsonModel::new("IFC4");
        model.insert_element(wall(1, "1A2B"));
        ensure_annotations(&mut model, 1, "basis", "P").unwrap();

        let edited = table(
            &["GUID", "S.a", "G55_LCA.Gjenbruksstatus"],
            &[&["1A2B", "ignored", "GJEN"]],
        );
        let summary = sync_reuse_status(&mut model, &edited, &save_path(&dir)).unwrap();

        assert_eq!(summary.properties_written, 1);
        let sets = model.property_sets(1).unwrap();
        assert_eq!(sets[LCA_SET][REUSE_STATUS_PROP], PropValue::from("GJEN"));
        // The general column is not parsed on the fast path
        assert!(!sets.contains_key("S"));
    }
}
