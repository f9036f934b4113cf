use serde::{Deserialize, Serialize};

use super::value::PropertySets;

/// Store-local element identifier, stable for the lifetime of one open model.
pub type ElementId = u64;

/// Entity kinds that are themselves spatial containers. Elements of these
/// kinds never get a Floor/Zone assignment of their own.
pub const SPATIAL_KINDS: &[&str] = &[
    "IfcSite",
    "IfcBuilding",
    "IfcBuildingStorey",
    "IfcSpace",
    "IfcZone",
];

pub const STOREY_KIND: &str = "IfcBuildingStorey";
pub const SPACE_KIND: &str = "IfcSpace";
pub const ZONE_KIND: &str = "IfcZone";

/// One entity in the building model.
///
/// Read-only to this crate except for `property_sets`; everything else is
/// authored upstream. Optional attributes are resolved once at extraction
/// time, not re-checked ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Globally unique, stable across saves. Join key between table and model.
    pub global_id: String,
    /// Entity kind tag, e.g. "IfcWall".
    pub entity_kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    /// Authoring-tool Tag attribute, when present.
    #[serde(default)]
    pub tag: Option<String>,
    /// Material names in model order.
    #[serde(default)]
    pub materials: Vec<String>,
    /// "Contained in structure" relations, target per entry.
    #[serde(default)]
    pub contained_in: Vec<SpatialRef>,
    /// Group-assignment relations (zones, systems).
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub property_sets: PropertySets,
}

/// Target of a spatial containment relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialRef {
    /// Entity kind of the container, e.g. "IfcBuildingStorey".
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
}

/// Target of a group-assignment relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRef {
    /// Entity kind of the group, e.g. "IfcZone".
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Element {
    #[must_use]
    pub fn is_spatial_container(&self) -> bool {
        SPATIAL_KINDS
            .iter()
            .any(|k| k.eq_ignore_ascii_case(&self.entity_kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Element {
        Element {
            id: 1,
            global_id: "1A2B".to_string(),
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

    #[test]
    fn spatial_container_detection() {
        let mut element = wall();
        assert!(!element.is_spatial_container());

        element.entity_kind = "IfcBuildingStorey".to_string();
        assert!(element.is_spatial_container());

        // Kind comparison is case-insensitive
        element.entity_kind = "IFCSPACE".to_string();
        assert!(element.is_spatial_container());
    }
}
