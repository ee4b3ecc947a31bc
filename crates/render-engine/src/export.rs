//! Batch export: rasterize every canvas in order, pack them into one archive,
//! hand the archive to a save action.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use vantage_common::clock::Stopwatch;
use vantage_common::config::ExportDefaults;
use vantage_common::error::{VantageError, VantageResult};

use crate::archive::{archive_file_name, Archive, ArchiveWriter};
use crate::composer::ComposedCanvas;
use crate::raster::{CanvasSurface, Rasterizer};

/// Progress callback for batch exports.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportProgress {
    /// Percentage in `[0, 100]`, never decreasing within one export.
    pub progress: u8,

    /// Human-readable status line.
    pub status: String,

    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStage {
    Preparing,
    Rendering,
    Finalizing,
    Complete,
    Failed,
}

/// The save action for a finished archive.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Persist or offer the archive. Returns where it went.
    async fn save(&self, archive: &Archive) -> VantageResult<PathBuf>;

    fn name(&self) -> &str;
}

/// Saves archives into a directory under their own file name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sink for the configured export directory.
    pub fn from_config(export: &ExportDefaults) -> Self {
        Self::new(export.output_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArchiveSink for DirectorySink {
    async fn save(&self, archive: &Archive) -> VantageResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(&archive.file_name);
        tokio::fs::write(&path, &archive.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// Wrap composed canvases as surfaces displayed at `preview_zoom`.
pub fn surfaces(canvases: &[Arc<ComposedCanvas>], preview_zoom: f32) -> Vec<CanvasSurface> {
    canvases
        .iter()
        .map(|c| CanvasSurface::new(Arc::clone(c)).with_preview_zoom(preview_zoom))
        .collect()
}

/// Progress value reported when item `index` of `total` starts rendering.
pub fn item_progress(low: u8, high: u8, index: usize, total: usize) -> u8 {
    if total == 0 {
        return low;
    }
    let span = high.saturating_sub(low) as usize;
    (low as usize + index * span / total).min(high as usize) as u8
}

/// Clears the busy flag when an export ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Reporter {
    callback: Option<ProgressCallback>,
    last: u8,
}

impl Reporter {
    fn emit(&mut self, progress: u8, stage: ExportStage, status: impl Into<String>) {
        self.last = self.last.max(progress.min(100));
        let status = status.into();
        tracing::debug!(progress = self.last, stage = ?stage, status = %status, "Export progress");
        if let Some(cb) = &self.callback {
            cb(ExportProgress {
                progress: self.last,
                status,
                stage,
            });
        }
    }
}

/// Sequential batch exporter. At most one export runs per engine.
pub struct ExportEngine<R> {
    rasterizer: R,
    settings: ExportDefaults,
    busy: Arc<AtomicBool>,
}

impl<R: Rasterizer> ExportEngine<R> {
    pub fn new(rasterizer: R, settings: ExportDefaults) -> VantageResult<Self> {
        settings.validate()?;
        Ok(Self {
            rasterizer,
            settings,
            busy: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn settings(&self) -> &ExportDefaults {
        &self.settings
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Whether an export is running right now.
    pub fn is_exporting(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn acquire(&self) -> VantageResult<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| VantageError::ExportInProgress)?;
        Ok(BusyGuard(Arc::clone(&self.busy)))
    }

    /// Rasterize every surface in order and return the archive.
    pub async fn export_all(
        &self,
        surfaces: &[CanvasSurface],
        progress: Option<ProgressCallback>,
    ) -> VantageResult<Archive> {
        let _guard = self.acquire()?;
        let mut reporter = Reporter {
            callback: progress,
            last: 0,
        };

        let archive = self.build(surfaces, &mut reporter).await?;
        reporter.emit(
            100,
            ExportStage::Complete,
            format!("Exported {} screenshots", archive.len()),
        );
        Ok(archive)
    }

    /// Export, then call `sink` exactly once with the archive.
    ///
    /// The sink is never called when rendering or packing fails.
    pub async fn export_and_save(
        &self,
        surfaces: &[CanvasSurface],
        sink: &dyn ArchiveSink,
        progress: Option<ProgressCallback>,
    ) -> VantageResult<PathBuf> {
        let _guard = self.acquire()?;
        let mut reporter = Reporter {
            callback: progress,
            last: 0,
        };

        let archive = self.build(surfaces, &mut reporter).await?;
        let path = match sink.save(&archive).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(sink = sink.name(), error = %e, "Saving archive failed");
                reporter.emit(reporter.last, ExportStage::Failed, format!("Save failed: {e}"));
                return Err(e);
            }
        };

        tracing::info!(sink = sink.name(), path = %path.display(), "Archive saved");
        reporter.emit(
            100,
            ExportStage::Complete,
            format!("Exported {} screenshots", archive.len()),
        );
        Ok(path)
    }

    /// Everything up to the high watermark. Emits `Failed` on error.
    async fn build(
        &self,
        surfaces: &[CanvasSurface],
        reporter: &mut Reporter,
    ) -> VantageResult<Archive> {
        let timer = Stopwatch::start();
        tracing::info!(
            backend = self.rasterizer.name(),
            count = surfaces.len(),
            "Starting export"
        );
        reporter.emit(0, ExportStage::Preparing, "Preparing export");

        match self.render_archive(surfaces, reporter).await {
            Ok(archive) => {
                tracing::info!(
                    entries = archive.len(),
                    bytes = archive.bytes.len(),
                    elapsed_ms = timer.elapsed_ms(),
                    "Export finished"
                );
                Ok(archive)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = ?e.category(),
                    elapsed_ms = timer.elapsed_ms(),
                    "Export failed"
                );
                reporter.emit(reporter.last, ExportStage::Failed, format!("Export failed: {e}"));
                Err(e)
            }
        }
    }

    async fn render_archive(
        &self,
        surfaces: &[CanvasSurface],
        reporter: &mut Reporter,
    ) -> VantageResult<Archive> {
        if surfaces.is_empty() {
            return Err(VantageError::archive("nothing to export"));
        }

        let (low, high) = (self.settings.low_watermark, self.settings.high_watermark);
        let total = surfaces.len();
        let mut writer = ArchiveWriter::new(self.settings.entry_prefix.clone());

        for (index, surface) in surfaces.iter().enumerate() {
            reporter.emit(
                item_progress(low, high, index, total),
                ExportStage::Rendering,
                format!("Rendering screenshot {} of {total}", index + 1),
            );
            let timer = Stopwatch::start();
            let image = self.rasterizer.rasterize(surface).await?;
            let entry = writer.add_png(&image)?;
            tracing::debug!(
                index,
                entry = %entry,
                width = image.width(),
                height = image.height(),
                elapsed_ms = timer.elapsed_ms(),
                "Screenshot rasterized"
            );
        }

        let archive = writer.finish(archive_file_name(&self.settings))?;
        reporter.emit(high, ExportStage::Finalizing, "Archive compressed");
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_progress_floor() {
        assert_eq!(item_progress(10, 90, 0, 5), 10);
        assert_eq!(item_progress(10, 90, 1, 5), 26);
        assert_eq!(item_progress(10, 90, 4, 5), 74);
        assert_eq!(item_progress(10, 90, 1, 3), 36);
        assert_eq!(item_progress(10, 90, 0, 0), 10);
    }

    #[test]
    fn test_item_progress_monotonic() {
        for total in 1..=10 {
            let values: Vec<u8> = (0..total).map(|i| item_progress(10, 90, i, total)).collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
            assert!(values.iter().all(|&v| (10..90).contains(&v)));
        }
    }

    #[test]
    fn test_progress_serializes_snake_case() {
        let json = serde_json::to_string(&ExportProgress {
            progress: 100,
            status: "done".into(),
            stage: ExportStage::Complete,
        })
        .unwrap();
        assert!(json.contains("\"stage\":\"complete\""));
    }

    #[tokio::test]
    async fn test_directory_sink_writes_archive() {
        let dir = std::env::temp_dir().join(format!("vantage-sink-{}", std::process::id()));
        let archive = Archive {
            file_name: "shots.zip".into(),
            bytes: vec![1, 2, 3],
            entries: vec!["screenshot-01.png".into()],
        };
        let path = DirectorySink::new(&dir).save(&archive).await.unwrap();
        assert_eq!(path, dir.join("shots.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_configured_sink_saves_into_output_dir() {
        let dir = std::env::temp_dir().join(format!("vantage-config-sink-{}", std::process::id()));
        let settings = ExportDefaults {
            output_dir: dir.clone(),
            ..ExportDefaults::default()
        };
        let sink = DirectorySink::from_config(&settings);
        assert_eq!(sink.dir(), dir.as_path());

        let archive = Archive {
            file_name: archive_file_name(&settings),
            bytes: vec![7],
            entries: vec![],
        };
        let path = sink.save(&archive).await.unwrap();
        assert_eq!(path, dir.join("app-store-screenshots-export.zip"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_watermarks_rejected() {
        struct Never;
        #[async_trait]
        impl Rasterizer for Never {
            async fn rasterize(&self, _: &CanvasSurface) -> VantageResult<image::RgbaImage> {
                Err(VantageError::rasterize("unused"))
            }
            fn name(&self) -> &str {
                "never"
            }
        }
        let settings = ExportDefaults {
            low_watermark: 90,
            high_watermark: 10,
            ..ExportDefaults::default()
        };
        assert!(ExportEngine::new(Never, settings).is_err());
    }
}
