//! Vantage Render Engine
//!
//! Composes app-store screenshot mockups and exports them as an archive of
//! device-native PNGs.
//!
//! # Pipeline Architecture
//!
//! ```text
//! ThemeSettings ──┐
//!                 ├── Composer (template layout)
//! Screenshot ─────┘         │
//!                           ├── Device Frame (× 1–2)
//!                           ▼
//!                    ComposedCanvas (scene graph)
//!                           │
//!                           ▼
//!                   Rasterizer (tiny-skia)
//!                           │
//!                           ▼
//!                  ArchiveWriter (zip of PNGs)
//!                           │
//!                           ▼
//!                      ArchiveSink
//! ```

pub mod archive;
pub mod blur;
pub mod composer;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod raster;
pub mod scene;
pub mod templates;
pub mod text;

pub use archive::{archive_file_name, entry_name, Archive, ArchiveWriter};
pub use composer::{ComposedCanvas, Composer, LayoutContext, TemplateLayout, DESIGN_WIDTH};
pub use export::*;
pub use frame::{render_device_frame, FrameGeometry, FrameOptions};
pub use raster::{CanvasSurface, Rasterizer, SkiaRasterizer};
