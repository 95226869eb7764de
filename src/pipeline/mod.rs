//! Pipeline module for turning panoramas into scene directories.
//!
//! A [`SceneGenerator`] converts one panorama to a cube map and runs its
//! output stages in order; [`generate_from_folder`] drives it over a folder.

mod batch;
mod progress;
mod stage;

pub use batch::{
    generate_from_folder, scan_sources, scene_id, BatchError, BatchReport, SOURCE_EXTENSIONS,
};
pub use progress::{LogProgress, NoProgress, ProgressEvent, ProgressSink};
pub use stage::{
    ErrorKind, OutputStage, PreviewStage, SceneError, SceneGenerator, SceneSummary, StageId,
    TileStage,
};
