//! Progress reporting for scene generation.

use crate::geometry::CubeFaceId;

use super::stage::StageId;

/// Something that happened while generating a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The panorama was decoded.
    SourceLoaded { width: u32, height: u32 },
    /// One cube face finished rasterizing.
    FaceRasterized { face: CubeFaceId, face_size: u32 },
    /// An output stage is about to run.
    StageStarted { stage: StageId, index: usize, total: usize },
    /// All tiles for one face at one level were written.
    LevelFaceWritten { level: u32, face: CubeFaceId, tiles: usize },
    /// An output stage finished.
    StageCompleted { stage: StageId, index: usize, total: usize },
    /// The scene finished successfully.
    SceneCompleted { files_written: usize },
}

/// Receives progress events. Events may arrive from rayon worker threads.
pub trait ProgressSink: Sync {
    fn on_event(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Sync,
{
    fn on_event(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::SourceLoaded { width, height } => {
                tracing::debug!(width, height, "Loaded panorama");
            }
            ProgressEvent::FaceRasterized { face, face_size } => {
                tracing::debug!(%face, face_size, "Rasterized cube face");
            }
            ProgressEvent::StageStarted { stage, index, total } => {
                tracing::info!("  [{}/{}] Starting: {}", index + 1, total, stage.name());
            }
            ProgressEvent::LevelFaceWritten { level, face, tiles } => {
                tracing::debug!(level, %face, tiles, "Wrote level tiles");
            }
            ProgressEvent::StageCompleted { stage, index, total } => {
                tracing::info!("  [{}/{}] Completed: {}", index + 1, total, stage.name());
            }
            ProgressEvent::SceneCompleted { files_written } => {
                tracing::info!(files_written, "Scene complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_is_a_sink() {
        let count = AtomicUsize::new(0);
        let sink = |event: ProgressEvent| {
            if let ProgressEvent::FaceRasterized { .. } = event {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };

        sink.on_event(ProgressEvent::FaceRasterized {
            face: CubeFaceId::Front,
            face_size: 8,
        });
        sink.on_event(ProgressEvent::SceneCompleted { files_written: 1 });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builtin_sinks_accept_every_event() {
        let events = [
            ProgressEvent::SourceLoaded { width: 4, height: 2 },
            ProgressEvent::StageStarted {
                stage: StageId::Tiles,
                index: 0,
                total: 2,
            },
            ProgressEvent::LevelFaceWritten {
                level: 0,
                face: CubeFaceId::Up,
                tiles: 1,
            },
            ProgressEvent::StageCompleted {
                stage: StageId::Preview,
                index: 1,
                total: 2,
            },
        ];
        for event in events {
            NoProgress.on_event(event);
            LogProgress.on_event(event);
        }
    }
}
