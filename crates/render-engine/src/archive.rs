//! In-memory zip archive of exported screenshots.

use std::io::{Cursor, Write};

use image::{ImageFormat, RgbaImage};
use vantage_common::clock::archive_timestamp;
use vantage_common::config::{ArchiveNaming, ExportDefaults};
use vantage_common::error::{VantageError, VantageResult};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A finished archive ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Entry names in insertion order.
    pub entries: Vec<String>,
}

impl Archive {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Name of the `index`-th entry (0-based input, 1-based name).
pub fn entry_name(prefix: &str, index: usize) -> String {
    format!("{prefix}-{:02}.png", index + 1)
}

/// File name offered for the whole archive.
pub fn archive_file_name(export: &ExportDefaults) -> String {
    match &export.naming {
        ArchiveNaming::Timestamped => {
            format!("{}-{}.zip", export.archive_prefix, archive_timestamp())
        }
        ArchiveNaming::Fixed { suffix } => format!("{}-{suffix}.zip", export.archive_prefix),
    }
}

/// Encode pixels as PNG.
pub fn encode_png(image: &RgbaImage) -> VantageResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| VantageError::archive(format!("PNG encoding failed: {e}")))?;
    Ok(out.into_inner())
}

/// Appends numbered PNG entries to a deflated zip held in memory.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entry_prefix: String,
    entries: Vec<String>,
}

impl ArchiveWriter {
    pub fn new(entry_prefix: impl Into<String>) -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entry_prefix: entry_prefix.into(),
            entries: Vec::new(),
        }
    }

    /// Identical input produces byte-identical archives: every entry carries
    /// the zip epoch as its modification time.
    fn options() -> FileOptions<'static, ()> {
        FileOptions::<()>::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644)
    }

    /// Add the next image; returns the entry name.
    pub fn add_png(&mut self, image: &RgbaImage) -> VantageResult<String> {
        let png = encode_png(image)?;
        self.add_bytes(&png)
    }

    /// Add already-encoded PNG bytes as the next entry.
    pub fn add_bytes(&mut self, png: &[u8]) -> VantageResult<String> {
        let name = entry_name(&self.entry_prefix, self.entries.len());
        self.zip
            .start_file(name.as_str(), Self::options())
            .map_err(|e| VantageError::archive(format!("cannot start {name}: {e}")))?;
        self.zip
            .write_all(png)
            .map_err(|e| VantageError::archive(format!("cannot write {name}: {e}")))?;
        self.entries.push(name.clone());
        Ok(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the central directory and hand back the archive.
    pub fn finish(self, file_name: impl Into<String>) -> VantageResult<Archive> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| VantageError::archive(format!("cannot finalize archive: {e}")))?;
        Ok(Archive {
            file_name: file_name.into(),
            bytes: cursor.into_inner(),
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Read;

    fn tiny(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(3, 2, Rgba(color))
    }

    #[test]
    fn test_entry_names_are_one_based_and_padded() {
        assert_eq!(entry_name("screenshot", 0), "screenshot-01.png");
        assert_eq!(entry_name("screenshot", 9), "screenshot-10.png");
    }

    #[test]
    fn test_archive_file_names() {
        let mut export = ExportDefaults::default();
        assert_eq!(archive_file_name(&export), "app-store-screenshots-export.zip");

        export.naming = ArchiveNaming::Timestamped;
        let name = archive_file_name(&export);
        assert!(name.starts_with("app-store-screenshots-"));
        assert!(name.ends_with(".zip"));
        // prefix + '-' + YYYYMMDD-HHMMSS + .zip
        assert_eq!(name.len(), "app-store-screenshots-".len() + 15 + 4);
    }

    #[test]
    fn test_archive_readback() {
        let mut writer = ArchiveWriter::new("shot");
        writer.add_png(&tiny([255, 0, 0, 255])).unwrap();
        writer.add_png(&tiny([0, 0, 255, 128])).unwrap();
        let archive = writer.finish("out.zip").unwrap();
        assert_eq!(archive.entries, vec!["shot-01.png", "shot-02.png"]);

        let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        assert_eq!(zip.len(), 2);
        let mut png = Vec::new();
        zip.by_name("shot-02.png").unwrap().read_to_end(&mut png).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn test_identical_input_identical_bytes() {
        let build = || {
            let mut writer = ArchiveWriter::new("screenshot");
            writer.add_png(&tiny([9, 9, 9, 255])).unwrap();
            writer.finish("a.zip").unwrap()
        };
        assert_eq!(build().bytes, build().bytes);
    }
}
