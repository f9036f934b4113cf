//! Analysis annotation: the two well-known property sets every element of
//! an analysis copy carries.

use chrono::Local;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::model::{ElementId, PropValue, PropertyMap, PropertySets};
use crate::progress::Progress;
use crate::store::ModelStore;

/// Project metadata set added to every element of an analysis copy.
pub const PROJECT_INFO_SET: &str = "G55_Prosjektinfo";
/// Life-cycle analysis set added to every element of an analysis copy.
pub const LCA_SET: &str = "G55_LCA";

pub const EXTERNAL_ID_PROP: &str = "External_ID";
pub const SOURCE_BASIS_PROP: &str = "Basert_på_IFC";
/// Snapshot of the legacy maturity code found on the element, if any.
pub const LEGACY_CODE_PROP: &str = "MMI_Kode";
/// Reuse status category (new / existing / reused).
pub const REUSE_STATUS_PROP: &str = "Gjenbruksstatus";
/// Default reuse status: new construction.
pub const REUSE_STATUS_NEW: &str = "NY";

const LCA_STATUS_PROP: &str = "LCA_Status";
const LCA_STATUS_PENDING: &str = "Pending";
const CO2_PROP: &str = "CO2_kg";
const METHOD_PROP: &str = "LCA_Method";
const NOTES_PROP: &str = "Notes";

const PROJECT_PROP: &str = "Prosjekt";
const CREATED_PROP: &str = "Opprettet";
const STATUS_PROP: &str = "Status";
const STATUS_ANALYSIS: &str = "Analyse";

/// Upper-cased fragment marking a legacy maturity-code property name.
const LEGACY_CODE_FRAGMENT: &str = "MMI";

/// Ensure both analysis sets exist on one element.
///
/// A set that already exists is left untouched, so repeated runs over an
/// already-annotated model are no-ops. The legacy code is snapshotted into
/// the LCA set at creation time so later edits to its source property
/// never lose it. `source_basis` names the file (and its modification
/// time) the analysis copy was derived from.
pub fn ensure_annotations<M: ModelStore>(
    model: &mut M,
    id: ElementId,
    source_basis: &str,
    project_label: &str,
) -> Result<(), StoreError> {
    let element = model.element(id).ok_or(StoreError::UnknownElement { id })?;
    let global_id = element.global_id.clone();

    let sets = model
        .property_sets(id)
        .ok_or(StoreError::UnknownElement { id })?;
    let has_project_info = sets.contains_key(PROJECT_INFO_SET);
    let has_lca = sets.contains_key(LCA_SET);
    let legacy_code = capture_legacy_code(sets);

    if !has_project_info {
        let handle = model.find_or_create_property_set(id, PROJECT_INFO_SET)?;
        let props: PropertyMap = [
            (PROJECT_PROP.to_string(), PropValue::from(project_label)),
            (
                CREATED_PROP.to_string(),
                PropValue::from(Local::now().to_rfc3339()),
            ),
            (STATUS_PROP.to_string(), PropValue::from(STATUS_ANALYSIS)),
        ]
        .into();
        model.write_properties(&handle, &props)?;
    }

    if !has_lca {
        let handle = model.find_or_create_property_set(id, LCA_SET)?;
        let props: PropertyMap = [
            (EXTERNAL_ID_PROP.to_string(), PropValue::from(global_id)),
            (SOURCE_BASIS_PROP.to_string(), PropValue::from(source_basis)),
            (LEGACY_CODE_PROP.to_string(), PropValue::from(legacy_code)),
            (
                REUSE_STATUS_PROP.to_string(),
                PropValue::from(REUSE_STATUS_NEW),
            ),
            (
                LCA_STATUS_PROP.to_string(),
                PropValue::from(LCA_STATUS_PENDING),
            ),
            (CO2_PROP.to_string(), PropValue::Empty),
            (METHOD_PROP.to_string(), PropValue::Empty),
            (NOTES_PROP.to_string(), PropValue::Empty),
        ]
        .into();
        model.write_properties(&handle, &props)?;
    }

    Ok(())
}

/// Annotate every element of the model.
///
/// Per-element failures are logged and skip that element only. Returns how
/// many elements were annotated successfully.
pub fn annotate_model<M: ModelStore>(
    model: &mut M,
    source_basis: &str,
    project_label: &str,
    progress: &mut Progress,
) -> usize {
    let ids = model.list_elements(None);
    let total = ids.len();
    let mut annotated = 0usize;

    for (index, id) in ids.iter().enumerate() {
        match ensure_annotations(model, *id, source_basis, project_label) {
            Ok(()) => annotated += 1,
            Err(error) => warn!(element = *id, %error, "skipping annotation"),
        }

        progress.report(index + 1, total, "annotating elements");
    }

    info!(annotated, total, "annotation pass complete");
    annotated
}

/// First non-empty value of a property whose name contains the legacy code
/// fragment, in deterministic set/property order. Empty when none exists.
fn capture_legacy_code(sets: &PropertySets) -> String {
    for props in sets.values() {
        for (name, value) in props {
            if name.to_uppercase().contains(LEGACY_CODE_FRAGMENT) {
                let cell = value.as_cell();
                if !cell.is_empty() {
                    return cell;
                }
            }
        }
    }

    String::new()
}
