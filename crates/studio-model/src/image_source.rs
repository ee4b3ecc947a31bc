//! Screen image references and decoding.
//!
//! User images are either decoded up front ([`load_image`]) or referenced by
//! path and decoded when a canvas is rasterized. Placeholders are generated
//! procedurally from a seed so default records render without any I/O.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use vantage_common::error::{VantageError, VantageResult};

/// Placeholder bitmap dimensions (portrait, 1:2).
pub const PLACEHOLDER_WIDTH: u32 = 400;
pub const PLACEHOLDER_HEIGHT: u32 = 800;

/// A decoded, displayable image shared between records and canvases.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Where the image came from, for diagnostics.
    pub origin: PathBuf,
    pixels: Arc<RgbaImage>,
}

impl LoadedImage {
    pub fn new(origin: impl Into<PathBuf>, pixels: RgbaImage) -> Self {
        Self {
            origin: origin.into(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn pixels(&self) -> &Arc<RgbaImage> {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

impl PartialEq for LoadedImage {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && (Arc::ptr_eq(&self.pixels, &other.pixels) || self.pixels == other.pixels)
    }
}

/// Reference to the raster shown inside a device screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Deterministic generated artwork.
    Placeholder { seed: u32 },
    /// A file decoded at rasterization time.
    File(PathBuf),
    /// An image decoded when it was attached.
    Loaded(LoadedImage),
}

impl ImageSource {
    /// Produce the pixels for this source.
    pub fn decode(&self) -> VantageResult<Arc<RgbaImage>> {
        match self {
            ImageSource::Placeholder { seed } => Ok(Arc::new(placeholder_image(*seed))),
            ImageSource::File(path) => decode_file(path).map(Arc::new),
            ImageSource::Loaded(loaded) => Ok(Arc::clone(loaded.pixels())),
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Placeholder { seed } => format!("placeholder#{seed}"),
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Loaded(loaded) => format!("loaded:{}", loaded.origin.display()),
        }
    }
}

/// Read and decode an image file, asynchronously.
///
/// Uploads to different slots may run concurrently; each call owns its data.
pub async fn load_image(path: impl AsRef<Path>) -> VantageResult<LoadedImage> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VantageError::FileNotFound { path: path.clone() }
        } else {
            VantageError::image_decode(format!("failed reading {}: {e}", path.display()))
        }
    })?;

    let origin = path.clone();
    let pixels = tokio::task::spawn_blocking(move || decode_bytes(&bytes, &origin))
        .await
        .map_err(|e| VantageError::image_decode(format!("decoder task failed: {e}")))??;

    tracing::debug!(
        path = %path.display(),
        width = pixels.width(),
        height = pixels.height(),
        "Image loaded"
    );
    Ok(LoadedImage::new(path, pixels))
}

/// Decode an in-memory encoded image of any format the `image` crate knows.
pub fn decode_bytes(bytes: &[u8], origin: &Path) -> VantageResult<RgbaImage> {
    let format = image::guess_format(bytes).map_err(|e| {
        VantageError::image_decode(format!("unrecognized image {}: {e}", origin.display()))
    })?;
    let decoded = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        VantageError::image_decode(format!("failed decoding {}: {e}", origin.display()))
    })?;
    Ok(decoded.to_rgba8())
}

fn decode_file(path: &Path) -> VantageResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        VantageError::image_decode(format!("failed reading {}: {e}", path.display()))
    })?;
    decode_bytes(&bytes, path)
}

/// Generate the placeholder artwork for a seed.
///
/// A two-tone vertical wash with a header bar and stacked content cards,
/// reading as a generic app screen.
pub fn placeholder_image(seed: u32) -> RgbaImage {
    let hash = fnv1a_32(&seed.to_le_bytes());
    let top = hue_to_rgb((hash % 360) as f32, 0.55, 0.55);
    let bottom = hue_to_rgb(((hash / 360 + hash % 360 + 40) % 360) as f32, 0.60, 0.30);

    let (w, h) = (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    let mut img = RgbaImage::new(w, h);
    for (_, y, px) in img.enumerate_pixels_mut() {
        let t = y as f32 / (h - 1) as f32;
        *px = Rgba([
            lerp_u8(top[0], bottom[0], t),
            lerp_u8(top[1], bottom[1], t),
            lerp_u8(top[2], bottom[2], t),
            0xff,
        ]);
    }

    let card = |img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, alpha: f32| {
        for y in y0..y1.min(h) {
            for x in x0..x1.min(w) {
                let p = img.get_pixel_mut(x, y);
                for c in 0..3 {
                    p[c] = lerp_u8(p[c], 0xff, alpha);
                }
            }
        }
    };

    card(&mut img, 0, 0, w, 96, 0.18);
    let rows = 3 + hash % 3;
    let mut y = 140;
    for i in 0..rows {
        let height = 90 + ((hash >> (i * 3)) % 5) * 20;
        card(&mut img, 28, y, w - 28, y + height, 0.22);
        y += height + 28;
    }
    img
}

fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(0x01000193);
    }
    hash
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

fn hue_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hp = hue / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = placeholder_image(10);
        let b = placeholder_image(10);
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT));
        assert_ne!(a, placeholder_image(11));
    }

    #[test]
    fn test_decode_placeholder_source() {
        let img = ImageSource::Placeholder { seed: 12 }.decode().unwrap();
        assert_eq!(img.width(), PLACEHOLDER_WIDTH);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let source = ImageSource::File(PathBuf::from("/definitely/not/here.png"));
        assert!(matches!(
            source.decode(),
            Err(VantageError::ImageDecode { .. })
        ));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = decode_bytes(b"not an image", Path::new("junk.bin")).unwrap_err();
        assert!(matches!(err, VantageError::ImageDecode { .. }));
    }

    #[test]
    fn test_png_bytes_decode() {
        let mut bytes = Vec::new();
        let img = RgbaImage::from_pixel(3, 5, Rgba([10, 20, 30, 255]));
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        let decoded = decode_bytes(&bytes, Path::new("tiny.png")).unwrap();
        assert_eq!(decoded.dimensions(), (3, 5));
        assert_eq!(decoded.get_pixel(2, 4), &Rgba([10, 20, 30, 255]));
    }

    #[tokio::test]
    async fn test_load_image_reports_missing_file() {
        let err = load_image("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, VantageError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_image_from_disk() {
        let path = std::env::temp_dir().join("vantage_test_load_image.png");
        RgbaImage::from_pixel(4, 8, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).await.unwrap();
        assert_eq!(loaded.dimensions(), (4, 8));
        let source = ImageSource::Loaded(loaded.clone());
        assert!(Arc::ptr_eq(&source.decode().unwrap(), loaded.pixels()));

        std::fs::remove_file(&path).ok();
    }
}
