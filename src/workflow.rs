//! End-to-end workflow: extract the table, create the annotated analysis
//! copy, and apply edited sheets.
//!
//! Each public operation opens the model, runs its full pass, and saves
//! before returning. The core is stateless between calls; serializing
//! overlapping requests is the caller's job.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::annotate::annotate_model;
use crate::config::Config;
use crate::error::WorkflowError;
use crate::export::read_csv;
use crate::progress::Progress;
use crate::store::ModelStore;
use crate::sync::{sync_table, SyncSummary};
use crate::table::{build_table, Table};

/// Suffix appended to the source file stem for the analysis copy.
pub const ANALYSIS_SUFFIX: &str = "_analyse";

/// Paths and data produced by one workflow run.
#[derive(Debug)]
pub struct WorkflowResult {
    pub source_path: PathBuf,
    pub analysis_path: PathBuf,
    pub row_count: usize,
    pub table: Table,
}

/// Run the full workflow for one model file.
///
/// Resolves the input (explicit file name, or the first model file in the
/// input folder), extracts the element table, and creates the annotated
/// analysis copy. No sheet is written here — exporting the table is an
/// explicit, separate request.
pub fn run_workflow<M: ModelStore>(
    config: &Config,
    file_name: Option<&str>,
    progress: &mut Progress,
) -> Result<WorkflowResult, WorkflowError> {
    let input_dir = config.effective_input_dir();
    let output_dir = config.effective_output_dir();
    ensure_folder(&input_dir)?;
    ensure_folder(&output_dir)?;

    let source_path = resolve_input::<M>(&input_dir, file_name)?;
    info!(source = %source_path.display(), "starting workflow");

    let table = extract_table::<M>(&source_path, progress)?;
    let analysis_path = create_analysis_copy::<M>(config, &source_path, progress)?;

    let row_count = table.row_count();
    info!(rows = row_count, analysis = %analysis_path.display(), "workflow complete");

    Ok(WorkflowResult {
        source_path,
        analysis_path,
        row_count,
        table,
    })
}

/// Open the model and extract its element table in one pass.
pub fn extract_table<M: ModelStore>(
    path: &Path,
    progress: &mut Progress,
) -> Result<Table, WorkflowError> {
    let model = M::open(path)?;
    let source_file = file_name_string(path);
    Ok(build_table(&model, &source_file, progress))
}

/// Create the annotated analysis copy: the configured sub-folder next to
/// the source, file stem plus [`ANALYSIS_SUFFIX`].
///
/// Reopens the source so extraction and annotation stay independent
/// passes over independent model instances.
pub fn create_analysis_copy<M: ModelStore>(
    config: &Config,
    source_path: &Path,
    progress: &mut Progress,
) -> Result<PathBuf, WorkflowError> {
    let mut model = M::open(source_path)?;

    let source_basis = source_basis_label(source_path)?;
    annotate_model(&mut model, &source_basis, &config.project_label, progress);

    let analysis_dir = config.analysis_dir(source_path);
    ensure_folder(&analysis_dir)?;
    let analysis_path = analysis_dir.join(analysis_file_name::<M>(source_path));

    model.save(&analysis_path)?;
    info!(path = %analysis_path.display(), "saved analysis copy");

    Ok(analysis_path)
}

/// Apply an edited sheet to an analysis model file and persist it in
/// place.
pub fn sync_sheet<M: ModelStore>(
    sheet_path: &Path,
    model_path: &Path,
    progress: &mut Progress,
) -> Result<SyncSummary, WorkflowError> {
    info!(sheet = %sheet_path.display(), model = %model_path.display(), "syncing sheet");

    let table = read_csv(sheet_path)?;
    let mut model = M::open(model_path)?;
    let summary = sync_table(&mut model, &table, model_path, progress)?;

    Ok(summary)
}

fn resolve_input<M: ModelStore>(
    input_dir: &Path,
    file_name: Option<&str>,
) -> Result<PathBuf, WorkflowError> {
    if let Some(name) = file_name {
        let path = input_dir.join(name);
        if !path.exists() {
            error!(path = %path.display(), "model file not found");
            return Err(WorkflowError::InputMissing { path });
        }
        return Ok(path);
    }

    // Default: first model file in the folder, in name order
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .map_err(|source| WorkflowError::FileMetadata {
            path: input_dir.to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(M::EXTENSION))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| WorkflowError::NoInputFiles {
            dir: input_dir.to_path_buf(),
            extension: M::EXTENSION.to_string(),
        })
}

/// "<file name> @ <modification time>" — records which source revision an
/// analysis copy was derived from.
fn source_basis_label(path: &Path) -> Result<String, WorkflowError> {
    let metadata = std::fs::metadata(path).map_err(|source| WorkflowError::FileMetadata {
        path: path.to_path_buf(),
        source,
    })?;
    let modified = metadata
        .modified()
        .map_err(|source| WorkflowError::FileMetadata {
            path: path.to_path_buf(),
            source,
        })?;
    let modified: DateTime<Local> = modified.into();

    Ok(format!("{} @ {}", file_name_string(path), modified.to_rfc3339()))
}

fn analysis_file_name<M: ModelStore>(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map_or_else(|| "model".to_string(), |s| s.to_string_lossy().to_string());
    let ext = source
        .extension()
        .map_or_else(|| M::EXTENSION.to_string(), |e| e.to_string_lossy().to_string());

    format!("{stem}{ANALYSIS_SUFFIX}.{ext}")
}

fn ensure_folder(path: &Path) -> Result<(), WorkflowError> {
    std::fs::create_dir_all(path).map_err(|source| WorkflowError::FolderCreate {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonModel;
    use pretty_assertions::assert_eq;

    #[test]
    fn analysis_name_keeps_stem_and_extension() {
        assert_eq!(
            analysis_file_name::<JsonModel>(Path::new("input/G55_ARK.json")),
            "G55_ARK_analyse.json"
        );
    }

    #[test]
    fn default_input_is_first_model_file_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.txt"), "not a model").unwrap();

        let resolved = resolve_input::<JsonModel>(dir.path(), None).unwrap();
        assert_eq!(resolved, dir.path().join("a.json"));
    }

    #[test]
    fn empty_input_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input::<JsonModel>(dir.path(), None).unwrap_err();
        assert!(matches!(err, WorkflowError::NoInputFiles { .. }));
    }

    #[test]
    fn named_input_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input::<JsonModel>(dir.path(), Some("missing.json")).unwrap_err();
        assert!(matches!(err, WorkflowError::InputMissing { .. }));
    }
}
