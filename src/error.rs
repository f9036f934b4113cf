//! Error types for IFC Sync.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a model store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the model file from disk.
    #[error("failed to read model '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to persist the model file to disk.
    #[error("failed to save model '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The model file content is invalid or malformed.
    #[error("invalid model data: {source}")]
    InvalidModel {
        #[from]
        source: serde_json::Error,
    },

    /// An element id that is not present in the model.
    #[error("unknown element #{id}")]
    UnknownElement { id: u64 },
}

/// Errors that can occur when reading or writing tabular sheet files.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to open the sheet file for reading.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read or write CSV data.
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// Failed to flush buffered CSV output.
    #[error("failed to write data: {message}")]
    WriteError { message: String },
}

/// Errors that abort a whole sync batch.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The table has no identity column to resolve elements by.
    #[error("table is missing required column '{name}'")]
    MissingColumn { name: String },

    /// Persisting the target model failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that abort a workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No model files were found in the input folder.
    #[error("no model files (*.{extension}) found in '{dir}'")]
    NoInputFiles { dir: PathBuf, extension: String },

    /// The named input file does not exist.
    #[error("model file not found: '{path}'")]
    InputMissing { path: PathBuf },

    /// Failed to inspect the input file's metadata.
    #[error("failed to read metadata for '{path}': {source}")]
    FileMetadata {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create an input/output folder.
    #[error("failed to create folder '{path}': {source}")]
    FolderCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A model store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A sheet file could not be read or written.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// A sync batch failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}
