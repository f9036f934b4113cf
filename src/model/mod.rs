pub mod element;
pub mod value;

pub use element::{Element, ElementId, GroupRef, SpatialRef, SPACE_KIND, STOREY_KIND, ZONE_KIND};
pub use value::{PropValue, PropertyMap, PropertySets};
