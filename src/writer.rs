use crate::{
    config::Config,
    error::{Error, Result},
};
use serde::Serialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info};

/// File name of the build manifest.
pub(crate) const MANIFEST_FILE: &str = "manifest.json";

/// One file written by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    /// File name inside the output directory
    pub filename: String,

    /// Size in bytes
    pub bytes: usize,
}

/// Outcome of the compile step as recorded in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileStatus {
    Compiled,
    Skipped,
    Failed,
}

/// Metadata about one build, written next to the artifacts.
#[derive(Debug, Serialize)]
pub(crate) struct Manifest<'a> {
    /// Base name shared by the artifacts
    pub base_name: &'a str,

    /// LaTeX source
    pub tex: Option<&'a ArtifactSummary>,

    /// Compiled PDF
    pub pdf: Option<&'a ArtifactSummary>,

    /// Handling of empty optional sections
    pub section_policy: &'a str,

    /// Compiler requested from the service
    pub compiler: &'a str,

    pub compile_status: CompileStatus,

    /// Error reported by the compile step
    pub compile_error: Option<String>,

    /// Profile validation warnings
    pub warnings: Vec<String>,

    /// Execution duration in seconds
    pub duration_secs: f64,

    /// Output directory path
    pub output_directory: String,

    /// Generation timestamp
    pub generated_at: String,
}

/// Writes build artifacts with atomic operations.
pub(crate) struct Writer {
    output_dir: PathBuf,
    backup_existing: bool,
}

impl Writer {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            backup_existing: config.backup_existing,
        }
    }

    pub(crate) fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes one artifact into the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory cannot be created
    /// - The backup or the write itself fails
    pub(crate) fn write_artifact(&self, filename: &str, content: &[u8]) -> Result<ArtifactSummary> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        let path = self.output_dir.join(filename);
        self.write_file_atomic(&path, content)?;

        info!("Wrote {} ({} bytes)", path.display(), content.len());

        Ok(ArtifactSummary {
            filename: filename.to_string(),
            bytes: content.len(),
        })
    }

    /// Writes a file atomically with optional backup.
    ///
    /// # Process
    ///
    /// 1. Creates backup if file exists and backup is enabled
    /// 2. Writes content to temporary file
    /// 3. Syncs temporary file to disk
    /// 4. Atomically renames temporary file to target path
    fn write_file_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        if path.exists() && self.backup_existing {
            self.backup_file(path)?;
        }

        let temp_path = Self::temp_path(path)?;
        let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;

        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        Ok(())
    }

    // `resume.tex` and `resume.pdf` must not share a temp file
    fn temp_path(path: &Path) -> Result<PathBuf> {
        let filename = path
            .file_name()
            .ok_or_else(|| Error::config("Invalid file path"))?
            .to_string_lossy();
        Ok(path.with_file_name(format!("{filename}.tmp")))
    }

    /// Creates a timestamped backup of an existing file.
    fn backup_file(&self, path: &Path) -> Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)?
            .as_nanos();

        let filename = path
            .file_name()
            .ok_or_else(|| Error::config("Invalid file path"))?
            .to_string_lossy();

        let backup_path = self
            .output_dir
            .join(format!("{filename}.backup.{timestamp}"));

        fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;

        debug!("Created backup: {}", backup_path.display());
        Ok(())
    }

    /// Writes the manifest JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub(crate) fn write_manifest(&self, manifest: &Manifest<'_>) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        let manifest_path = self.output_dir.join(MANIFEST_FILE);
        let file = fs::File::create(&manifest_path).map_err(|e| Error::io(&manifest_path, e))?;

        serde_json::to_writer_pretty(file, manifest).map_err(Error::from)?;

        info!("Wrote manifest to {}", manifest_path.display());
        Ok(manifest_path)
    }
}

/// Local time as recorded in manifests.
pub(crate) fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
