use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::StoreError;
use crate::model::{Element, ElementId, PropertyMap, PropertySets};
use crate::store::{ModelStore, PsetHandle};

/// JSON-backed reference model store.
///
/// The native IFC serialization belongs to an external library; this store
/// implements the same surface over a plain JSON document so the
/// extract/annotate/sync pipeline has a concrete, file-backed collaborator
/// for local runs and tests.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JsonModel {
    /// Schema tag carried through from the source model, e.g. "IFC4".
    #[serde(default)]
    pub schema: String,
    elements: Vec<Element>,
    #[serde(skip)]
    by_id: HashMap<ElementId, usize>,
    #[serde(skip)]
    by_global_id: HashMap<String, usize>,
}

impl JsonModel {
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            elements: Vec::new(),
            by_id: HashMap::new(),
            by_global_id: HashMap::new(),
        }
    }

    /// Add an element to the model.
    ///
    /// Authoring helper — element creation is the modeling process's job,
    /// not this system's. Used when building models programmatically and by
    /// test fixtures.
    pub fn insert_element(&mut self, element: Element) {
        let index = self.elements.len();
        self.by_id.insert(element.id, index);
        self.by_global_id.insert(element.global_id.clone(), index);
        self.elements.push(element);
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    // Lookup maps are not serialized; rebuild them after deserializing.
    fn reindex(&mut self) {
        self.by_id = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, e)| (e.id, index))
            .collect();
        self.by_global_id = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, e)| (e.global_id.clone(), index))
            .collect();
    }

    fn sets_mut(&mut self, id: ElementId) -> Result<&mut PropertySets, StoreError> {
        let index = *self
            .by_id
            .get(&id)
            .ok_or(StoreError::UnknownElement { id })?;
        Ok(&mut self.elements[index].property_sets)
    }
}

impl ModelStore for JsonModel {
    const EXTENSION: &'static str = "json";

    fn open(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut model: JsonModel = serde_json::from_str(&content)?;
        model.reindex();
        Ok(model)
    }

    fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| StoreError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    fn list_elements(&self, kind_filter: Option<&str>) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| match kind_filter {
                Some(kind) => e.entity_kind.eq_ignore_ascii_case(kind),
                None => true,
            })
            .map(|e| e.id)
            .collect()
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.by_id.get(&id).map(|&index| &self.elements[index])
    }

    fn find_by_global_id(&self, global_id: &str) -> Option<ElementId> {
        self.by_global_id
            .get(global_id)
            .map(|&index| self.elements[index].id)
    }

    fn property_sets(&self, id: ElementId) -> Option<&PropertySets> {
        self.element(id).map(|e| &e.property_sets)
    }

    fn find_or_create_property_set(
        &mut self,
        id: ElementId,
        set_name: &str,
    ) -> Result<PsetHandle, StoreError> {
        let sets = self.sets_mut(id)?;
        sets.entry(set_name.to_string()).or_default();

        Ok(PsetHandle {
            element: id,
            set_name: set_name.to_string(),
        })
    }

    fn write_properties(
        &mut self,
        pset: &PsetHandle,
        props: &PropertyMap,
    ) -> Result<(), StoreError> {
        let sets = self.sets_mut(pset.element)?;
        let set = sets.entry(pset.set_name.clone()).or_default();

        for (name, value) in props {
            set.insert(name.clone(), value.clone());
        }

        Ok(())
    }
}
