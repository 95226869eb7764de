//! Output stage trait and per-scene orchestration.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cube::{convert_to_cube, CubeFaceSet};
use crate::export::{write_preview, ExportError};
use crate::source::{LoadError, SourceImage};
use crate::tiling::{generate_pyramid, ConfigError, TilingConfig};

use super::progress::{LogProgress, ProgressEvent, ProgressSink};

/// Unique identifier for output stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Multi-resolution tile pyramid.
    Tiles,
    /// Cross-layout preview thumbnail.
    Preview,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Tiles => "tiles",
            StageId::Preview => "preview",
        }
    }
}

/// Coarse classification of a scene failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputNotFound,
    UnsupportedFormat,
    DecodeError,
    IoError,
    InvalidConfig,
    /// Another source in the same batch already claimed the scene id.
    DuplicateScene,
}

/// Errors that end a single scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Scene id '{id}' is already used by {first}")]
    DuplicateScene { id: String, first: PathBuf },
}

impl SceneError {
    /// Classifies the failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SceneError::Load(LoadError::NotFound(_)) => ErrorKind::InputNotFound,
            SceneError::Load(LoadError::UnsupportedFormat { .. }) => ErrorKind::UnsupportedFormat,
            SceneError::Load(LoadError::Decode { .. } | LoadError::Empty { .. }) => {
                ErrorKind::DecodeError
            }
            SceneError::Load(LoadError::Io { .. }) => ErrorKind::IoError,
            SceneError::Export(ExportError::Encode { .. }) => ErrorKind::DecodeError,
            SceneError::Export(ExportError::Dimensions { .. }) => ErrorKind::InvalidConfig,
            SceneError::Export(_) | SceneError::CreateOutput { .. } => ErrorKind::IoError,
            SceneError::Config(ConfigError::Read { .. }) => ErrorKind::IoError,
            SceneError::Config(_) => ErrorKind::InvalidConfig,
            SceneError::DuplicateScene { .. } => ErrorKind::DuplicateScene,
        }
    }
}

/// A step that writes part of a scene from its base cube faces.
pub trait OutputStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for this stage.
    fn name(&self) -> &str;

    /// Writes this stage's files under `output_dir`.
    ///
    /// Returns the number of files written.
    fn execute(
        &self,
        faces: &CubeFaceSet,
        output_dir: &Path,
        config: &TilingConfig,
        progress: &dyn ProgressSink,
    ) -> Result<usize, SceneError>;
}

/// Writes every configured pyramid level as JPEG tiles.
pub struct TileStage;

impl OutputStage for TileStage {
    fn id(&self) -> StageId {
        StageId::Tiles
    }

    fn name(&self) -> &str {
        "Tile Pyramid"
    }

    fn execute(
        &self,
        faces: &CubeFaceSet,
        output_dir: &Path,
        config: &TilingConfig,
        progress: &dyn ProgressSink,
    ) -> Result<usize, SceneError> {
        let written = generate_pyramid(
            faces,
            &config.levels,
            output_dir,
            config.tile_quality,
            |level, face, tiles| {
                progress.on_event(ProgressEvent::LevelFaceWritten { level, face, tiles });
            },
        )?;
        Ok(written)
    }
}

/// Writes `preview.jpg`.
pub struct PreviewStage;

impl OutputStage for PreviewStage {
    fn id(&self) -> StageId {
        StageId::Preview
    }

    fn name(&self) -> &str {
        "Preview"
    }

    fn execute(
        &self,
        faces: &CubeFaceSet,
        output_dir: &Path,
        config: &TilingConfig,
        _progress: &dyn ProgressSink,
    ) -> Result<usize, SceneError> {
        write_preview(faces, output_dir, config.preview_size, config.preview_quality)?;
        Ok(1)
    }
}

/// Outcome of a successful scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub output_dir: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    pub files_written: usize,
}

/// Turns one panorama into a scene directory by running output stages in order.
pub struct SceneGenerator {
    config: TilingConfig,
    stages: Vec<Box<dyn OutputStage>>,
}

impl SceneGenerator {
    /// Creates a generator with no stages. Fails if `config` is invalid.
    pub fn new(config: TilingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stages: Vec::new(),
        })
    }

    /// Creates a generator with the tile and preview stages.
    pub fn standard(config: TilingConfig) -> Result<Self, ConfigError> {
        let mut generator = Self::new(config)?;
        generator.add_stage(TileStage).add_stage(PreviewStage);
        Ok(generator)
    }

    /// Adds a stage to run after those already added.
    pub fn add_stage<S: OutputStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Generates a scene, reporting progress through `tracing`.
    pub fn generate(&self, source_path: &Path, output_dir: &Path) -> Result<SceneSummary, SceneError> {
        self.generate_with_progress(source_path, output_dir, &LogProgress)
    }

    /// Generates a scene from the panorama at `source_path` into `output_dir`.
    ///
    /// The source is decoded before anything is created on disk, so a load
    /// failure leaves the filesystem untouched.
    pub fn generate_with_progress(
        &self,
        source_path: &Path,
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<SceneSummary, SceneError> {
        tracing::info!(
            "Generating scene {} from {}",
            output_dir.display(),
            source_path.display()
        );
        let source = SourceImage::open(source_path)?;
        self.generate_from_image(source, output_dir, progress)
    }

    /// Generates a scene from an already decoded panorama.
    pub fn generate_from_image(
        &self,
        source: SourceImage,
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<SceneSummary, SceneError> {
        let (source_width, source_height) = (source.width(), source.height());
        progress.on_event(ProgressEvent::SourceLoaded {
            width: source_width,
            height: source_height,
        });

        let face_size = self.config.base_face_size;
        let faces = convert_to_cube(&source, face_size, |face| {
            progress.on_event(ProgressEvent::FaceRasterized { face, face_size });
        });
        drop(source);

        std::fs::create_dir_all(output_dir).map_err(|source| SceneError::CreateOutput {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let files_written = self.run_stages(&faces, output_dir, progress)?;
        progress.on_event(ProgressEvent::SceneCompleted { files_written });

        Ok(SceneSummary {
            output_dir: output_dir.to_path_buf(),
            source_width,
            source_height,
            files_written,
        })
    }

    /// Runs every stage in order on an existing face set.
    ///
    /// `output_dir` must already exist. Returns the total number of files written.
    pub fn run_stages(
        &self,
        faces: &CubeFaceSet,
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<usize, SceneError> {
        let total = self.stages.len();
        let mut files_written = 0;

        for (index, stage) in self.stages.iter().enumerate() {
            tracing::debug!("Running {} in {}", stage.name(), output_dir.display());
            progress.on_event(ProgressEvent::StageStarted {
                stage: stage.id(),
                index,
                total,
            });

            files_written += stage.execute(faces, output_dir, &self.config, progress)?;

            progress.on_event(ProgressEvent::StageCompleted {
                stage: stage.id(),
                index,
                total,
            });
        }

        Ok(files_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::PREVIEW_FILE_NAME;
    use crate::geometry::CubeFaceId;
    use crate::tiling::{tile_path, LevelSpec};
    use image::{Rgb, RgbImage};
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn small_config() -> TilingConfig {
        TilingConfig {
            base_face_size: 32,
            levels: vec![
                LevelSpec::new(0, 8, 8),
                LevelSpec::new(1, 16, 8),
                LevelSpec::new(2, 20, 16),
            ],
            tile_quality: 90,
            preview_size: 8,
            preview_quality: 85,
        }
    }

    fn panorama() -> RgbImage {
        RgbImage::from_fn(64, 32, |x, y| Rgb([(x * 4) as u8, (y * 8) as u8, 128]))
    }

    fn write_panorama(dir: &Path) -> PathBuf {
        let path = dir.join("pano.png");
        panorama().save(&path).unwrap();
        path
    }

    #[test]
    fn test_stage_id_name() {
        assert_eq!(StageId::Tiles.name(), "tiles");
        assert_eq!(StageId::Preview.name(), "preview");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.levels.clear();
        let err = SceneGenerator::standard(config).err().unwrap();
        assert_eq!(SceneError::from(err).kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_generate_writes_full_scene() {
        let dir = tempdir().unwrap();
        let source = write_panorama(dir.path());
        let out = dir.path().join("scene");

        let generator = SceneGenerator::standard(small_config()).unwrap();
        assert_eq!(generator.stage_count(), 2);
        let summary = generator.generate(&source, &out).unwrap();

        // 6 faces * (1 + 4 + 4) tiles + preview
        assert_eq!(summary.files_written, 55);
        assert_eq!((summary.source_width, summary.source_height), (64, 32));
        assert_eq!(summary.output_dir, out);

        for spec in &generator.config().levels {
            for face in CubeFaceId::all() {
                for row in 0..spec.grid_size() {
                    for col in 0..spec.grid_size() {
                        assert!(tile_path(&out, spec.level, face, row, col).is_file());
                    }
                }
            }
        }
        // Partial 20px level: grid of 2, nothing at index 2.
        assert!(!tile_path(&out, 2, CubeFaceId::Front, 0, 2).exists());

        let preview = image::open(out.join(PREVIEW_FILE_NAME)).unwrap();
        assert_eq!((preview.width(), preview.height()), (32, 24));
    }

    #[test]
    fn test_generate_reports_progress() {
        let dir = tempdir().unwrap();
        let events = Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| events.lock().unwrap().push(event);

        let generator = SceneGenerator::standard(small_config()).unwrap();
        let source = SourceImage::new(panorama()).unwrap();
        generator
            .generate_from_image(source, dir.path(), &sink)
            .unwrap();

        let events = events.into_inner().unwrap();
        assert_eq!(events[0], ProgressEvent::SourceLoaded { width: 64, height: 32 });
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ProgressEvent::FaceRasterized { face_size: 32, .. }))
                .count(),
            6
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ProgressEvent::LevelFaceWritten { .. }))
                .count(),
            18
        );

        let stages: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::StageStarted { stage, index, total } => Some((*stage, *index, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![(StageId::Tiles, 0, 2), (StageId::Preview, 1, 2)]);
        assert_eq!(
            events.last(),
            Some(&ProgressEvent::SceneCompleted { files_written: 55 })
        );
    }

    #[test]
    fn test_stages_run_in_order() {
        struct Recording {
            id: StageId,
            log: &'static Mutex<Vec<StageId>>,
        }

        impl OutputStage for Recording {
            fn id(&self) -> StageId {
                self.id
            }

            fn name(&self) -> &str {
                "Recording"
            }

            fn execute(
                &self,
                _faces: &CubeFaceSet,
                _output_dir: &Path,
                _config: &TilingConfig,
                _progress: &dyn ProgressSink,
            ) -> Result<usize, SceneError> {
                self.log.lock().unwrap().push(self.id);
                Ok(0)
            }
        }

        static LOG: Mutex<Vec<StageId>> = Mutex::new(Vec::new());
        let dir = tempdir().unwrap();
        let mut generator = SceneGenerator::new(small_config()).unwrap();
        generator
            .add_stage(Recording { id: StageId::Preview, log: &LOG })
            .add_stage(Recording { id: StageId::Tiles, log: &LOG });

        let faces = convert_to_cube(&SourceImage::new(panorama()).unwrap(), 4, |_| {});
        let written = generator.run_stages(&faces, dir.path(), &LogProgress).unwrap();

        assert_eq!(written, 0);
        assert_eq!(*LOG.lock().unwrap(), vec![StageId::Preview, StageId::Tiles]);
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("scene");
        let generator = SceneGenerator::standard(small_config()).unwrap();

        let err = generator
            .generate(&dir.path().join("absent.jpg"), &out)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
        assert!(!out.exists());
    }

    #[test]
    fn test_corrupt_input_creates_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("broken.png");
        let mut bytes = std::fs::read(write_panorama(dir.path())).unwrap();
        bytes.truncate(bytes.len() / 2);
        std::fs::write(&source, bytes).unwrap();
        let out = dir.path().join("scene");

        let generator = SceneGenerator::standard(small_config()).unwrap();
        let err = generator.generate(&source, &out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert!(!out.exists());
    }

    #[test]
    fn test_unsupported_input() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, "not an image at all").unwrap();

        let generator = SceneGenerator::standard(small_config()).unwrap();
        let err = generator
            .generate(&source, &dir.path().join("scene"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_blocked_output_is_io_error() {
        let dir = tempdir().unwrap();
        let source = write_panorama(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let generator = SceneGenerator::standard(small_config()).unwrap();
        let err = generator
            .generate(&source, &blocker.join("scene"))
            .unwrap_err();
        assert!(matches!(err, SceneError::CreateOutput { .. }));
        assert_eq!(err.kind(), ErrorKind::IoError);
    }

    #[test]
    fn test_regeneration_is_identical() {
        let dir = tempdir().unwrap();
        let source = write_panorama(dir.path());
        let a = dir.path().join("a");
        let b = dir.path().join("b");

        let generator = SceneGenerator::standard(small_config()).unwrap();
        generator.generate(&source, &a).unwrap();
        generator.generate(&source, &b).unwrap();

        for face in CubeFaceId::all() {
            let rel = tile_path(Path::new(""), 1, face, 1, 0);
            let tile_a = image::open(a.join(&rel)).unwrap().to_rgb8();
            let tile_b = image::open(b.join(&rel)).unwrap().to_rgb8();
            assert_eq!(tile_a, tile_b);
        }
    }
}
