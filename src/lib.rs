//! # IFC Sync
//!
//! Extracts building-model element data into a flat, spreadsheet-friendly
//! table and syncs approved edits back into an annotated analysis copy of
//! the model.
//!
//! ## Features
//!
//! - Flatten property sets into `Set.Property` columns with a batch-wide
//!   union column set
//! - Derive identity columns (GUID, BIM id, material, floor, zone)
//! - Idempotently annotate elements with the project-info and LCA sets
//! - Sync edited sheets back with single-property precision
//! - CSV export/import of the element table
//!
//! ## Example
//!
//! ```no_run
//! use ifc_sync::progress::Progress;
//! use ifc_sync::store::{JsonModel, ModelStore};
//! use ifc_sync::table::build_table;
//!
//! let model = JsonModel::open("model.json".as_ref()).expect("Failed to open");
//! let table = build_table(&model, "model.json", &mut Progress::none());
//! println!("Elements: {}", table.row_count());
//! ```

pub mod annotate;
pub mod config;
pub mod error;
pub mod export;
pub mod flatten;
pub mod model;
pub mod progress;
pub mod store;
pub mod sync;
pub mod table;
pub mod workflow;
