//! Model store abstraction over the native building-model library.

pub mod json;

pub use crate::error::StoreError;
pub use json::JsonModel;

use std::path::Path;

use crate::model::{Element, ElementId, PropertyMap, PropertySets};

/// Opaque handle to one property set on one element.
///
/// Obtained from [`ModelStore::find_or_create_property_set`] and only
/// meaningful for the model instance that produced it.
#[derive(Debug, Clone)]
pub struct PsetHandle {
    pub(crate) element: ElementId,
    pub(crate) set_name: String,
}

/// Read/write access to one open building model.
///
/// Stands in for the native BIM library, which this crate never parses
/// directly. The mutation side is single-writer: writes to the same open
/// model must never interleave from two call sites.
pub trait ModelStore: Sized {
    /// File extension used for default input-file discovery.
    const EXTENSION: &'static str;

    fn open(path: &Path) -> Result<Self, StoreError>;

    fn save(&self, path: &Path) -> Result<(), StoreError>;

    /// Element ids in model enumeration order, optionally restricted to one
    /// entity kind (case-insensitive).
    fn list_elements(&self, kind_filter: Option<&str>) -> Vec<ElementId>;

    fn element(&self, id: ElementId) -> Option<&Element>;

    fn find_by_global_id(&self, global_id: &str) -> Option<ElementId>;

    fn property_sets(&self, id: ElementId) -> Option<&PropertySets>;

    /// Locate the named set on the element, creating an empty one if it is
    /// absent. Never duplicates an existing set.
    fn find_or_create_property_set(
        &mut self,
        id: ElementId,
        set_name: &str,
    ) -> Result<PsetHandle, StoreError>;

    /// Merge properties into the set behind the handle. Sibling properties
    /// not named in `props` are left untouched.
    fn write_properties(
        &mut self,
        pset: &PsetHandle,
        props: &PropertyMap,
    ) -> Result<(), StoreError>;
}
