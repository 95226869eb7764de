//! Folder-level batch processing: one scene per source panorama.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::progress::ProgressSink;
use super::stage::{SceneError, SceneGenerator, SceneSummary};

/// Source file extensions picked up by a batch, compared case-insensitively.
pub const SOURCE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors that stop a batch before any scene runs.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Source folder not found: {0}")]
    SourceDirNotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create output folder {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of processing a folder.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<SceneSummary>,
    pub failed: Vec<(PathBuf, SceneError)>,
}

impl BatchReport {
    /// Number of scenes produced.
    pub fn scene_count(&self) -> usize {
        self.succeeded.len()
    }

    /// True when no scene failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Scene id for a source file: its stem with spaces replaced by underscores.
pub fn scene_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(' ', "_"))
        .unwrap_or_default()
}

fn is_source_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SOURCE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
            .unwrap_or(false)
}

/// Lists the panoramas directly inside `dir`, sorted by path.
pub fn scan_sources(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::SourceDirNotFound(dir.to_path_buf()));
    }

    let read_err = |source| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if is_source_file(&path) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Generates one scene per panorama in `source_dir` under `output_dir/<scene id>`.
///
/// Scenes run one after another. A failed scene is logged, its directory is
/// removed if this run created it, and the batch moves on. A source whose
/// scene id was already taken by an earlier source is skipped and recorded
/// as failed.
pub fn generate_from_folder(
    generator: &SceneGenerator,
    source_dir: &Path,
    output_dir: &Path,
    progress: &dyn ProgressSink,
) -> Result<BatchReport, BatchError> {
    let sources = scan_sources(source_dir)?;
    tracing::info!("Found {} panoramas in {}", sources.len(), source_dir.display());

    std::fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateOutput {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport::default();
    let mut claimed: HashMap<String, &Path> = HashMap::new();
    for (i, source) in sources.iter().enumerate() {
        let id = scene_id(source);
        tracing::info!("[{}/{}] {}", i + 1, sources.len(), source.display());

        if let Some(first) = claimed.get(&id) {
            let err = SceneError::DuplicateScene {
                id,
                first: first.to_path_buf(),
            };
            tracing::warn!("Skipping {}: {}", source.display(), err);
            report.failed.push((source.clone(), err));
            continue;
        }
        let scene_dir = output_dir.join(&id);
        claimed.insert(id, source);

        let existed = scene_dir.exists();
        match generator.generate_with_progress(source, &scene_dir, progress) {
            Ok(summary) => report.succeeded.push(summary),
            Err(err) => {
                tracing::warn!("Scene {} failed ({:?}): {}", source.display(), err.kind(), err);
                if !existed && scene_dir.exists() {
                    if let Err(e) = std::fs::remove_dir_all(&scene_dir) {
                        tracing::warn!("Could not remove {}: {}", scene_dir.display(), e);
                    }
                }
                report.failed.push((source.clone(), err));
            }
        }
    }

    tracing::info!(
        "Generated {} of {} scenes",
        report.scene_count(),
        sources.len()
    );
    Ok(report)
}
