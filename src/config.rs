//! Workflow configuration.

use std::path::{Path, PathBuf};

/// Folder and project settings for the extract/annotate/sync workflow.
///
/// Temp-storage mode redirects input and output under the system temp
/// directory. Whether to enable it belongs to the deployment (CLI flag or
/// hosting glue), never to the core logic.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder scanned for input model files.
    pub input_dir: PathBuf,
    /// Folder for produced sheets and other outputs.
    pub output_dir: PathBuf,
    /// Sub-folder, next to the source file, that receives analysis copies.
    pub analysis_subdir: String,
    /// Project label stamped into the project-info set.
    pub project_label: String,
    /// Redirect input/output under the system temp directory.
    pub use_temp_storage: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            analysis_subdir: "analyse".to_string(),
            project_label: "Grønland 55".to_string(),
            use_temp_storage: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, keeping the defaults
    /// for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            input_dir: std::env::var("IFC_SYNC_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: std::env::var("IFC_SYNC_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            analysis_subdir: std::env::var("IFC_SYNC_ANALYSIS_SUBDIR")
                .unwrap_or(defaults.analysis_subdir),
            project_label: std::env::var("IFC_SYNC_PROJECT_LABEL")
                .unwrap_or(defaults.project_label),
            use_temp_storage: false,
        }
    }

    #[must_use]
    pub fn with_temp_storage(mut self, enabled: bool) -> Self {
        self.use_temp_storage = enabled;
        self
    }

    /// Effective input folder, honoring temp-storage mode.
    #[must_use]
    pub fn effective_input_dir(&self) -> PathBuf {
        if self.use_temp_storage {
            temp_root().join("input")
        } else {
            self.input_dir.clone()
        }
    }

    /// Effective output folder, honoring temp-storage mode.
    #[must_use]
    pub fn effective_output_dir(&self) -> PathBuf {
        if self.use_temp_storage {
            temp_root().join("output")
        } else {
            self.output_dir.clone()
        }
    }

    /// Where the analysis copy of `source` goes: the configured sub-folder
    /// next to the source file.
    #[must_use]
    pub fn analysis_dir(&self, source: &Path) -> PathBuf {
        source.parent().map_or_else(
            || PathBuf::from(&self.analysis_subdir),
            |parent| parent.join(&self.analysis_subdir),
        )
    }
}

fn temp_root() -> PathBuf {
    std::env::temp_dir().join("ifc-sync")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.input_dir, PathBuf::from("input"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(!config.use_temp_storage);
    }

    #[test]
    fn temp_storage_redirects_folders() {
        let config = Config::default().with_temp_storage(true);
        assert!(config.effective_input_dir().starts_with(std::env::temp_dir()));
        assert!(config.effective_output_dir().starts_with(std::env::temp_dir()));

        let plain = Config::default();
        assert_eq!(plain.effective_input_dir(), PathBuf::from("input"));
    }

    #[test]
    fn analysis_dir_sits_next_to_the_source() {
        let config = Config::default();
        assert_eq!(
            config.analysis_dir(Path::new("input/G55_ARK.json")),
            PathBuf::from("input/analyse")
        );
    }
}
