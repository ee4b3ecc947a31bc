//! Text shaping and coverage rendering with rusttype.

use std::path::{Path, PathBuf};

use rusttype::{point, Font, Scale};
use vantage_common::error::{VantageError, VantageResult};

use crate::scene::{FontWeight, TextAlign, TextBlock};

/// Fonts probed when no font is configured. Bold faces first since most
/// headings are heavy.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// The single face used for all canvas typography.
pub struct FontSet {
    font: Font<'static>,
    source: PathBuf,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet").field("source", &self.source).finish()
    }
}

impl FontSet {
    pub fn from_file(path: &Path) -> VantageResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            VantageError::config(format!("cannot read font {}: {e}", path.display()))
        })?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            VantageError::config(format!("{} is not a usable TrueType font", path.display()))
        })?;
        Ok(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    /// The configured font if it loads, otherwise the first system font found.
    pub fn discover(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::from_file(path) {
                Ok(fonts) => return Some(fonts),
                Err(e) => tracing::warn!(error = %e, "Configured font unusable, probing system fonts"),
            }
        }

        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .filter(|p| p.exists())
            .find_map(|p| Self::from_file(p).ok())
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }
}

/// One wrapped line and its advance width in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedLine {
    pub text: String,
    pub width: f32,
}

/// Horizontal advance of `text` including kerning and letter spacing.
pub fn measure(font: &Font<'static>, text: &str, size: f32, spacing: f32) -> f32 {
    let scale = Scale::uniform(size);
    let mut width = 0.0;
    let mut prev = None;
    for c in text.chars() {
        let glyph = font.glyph(c).scaled(scale);
        if let Some(p) = prev {
            width += font.pair_kerning(scale, p, glyph.id());
        }
        width += glyph.h_metrics().advance_width + spacing;
        prev = Some(glyph.id());
    }
    if text.is_empty() {
        0.0
    } else {
        width - spacing
    }
}

/// Greedy word wrap. Words wider than the line are broken by character.
pub fn wrap_lines(
    font: &Font<'static>,
    text: &str,
    size: f32,
    spacing: f32,
    max_width: f32,
) -> Vec<ShapedLine> {
    let mut lines = Vec::new();
    let max_width = max_width.max(size);

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure(font, &candidate, size, spacing) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                let width = measure(font, &current, size, spacing);
                lines.push(ShapedLine {
                    text: std::mem::take(&mut current),
                    width,
                });
            }
            for c in word.chars() {
                let mut next = current.clone();
                next.push(c);
                if !current.is_empty() && measure(font, &next, size, spacing) > max_width {
                    let width = measure(font, &current, size, spacing);
                    lines.push(ShapedLine {
                        text: std::mem::take(&mut current),
                        width,
                    });
                    current.push(c);
                } else {
                    current = next;
                }
            }
        }
        if !current.is_empty() {
            let width = measure(font, &current, size, spacing);
            lines.push(ShapedLine {
                text: current,
                width,
            });
        }
    }
    lines
}

/// 8-bit glyph coverage for a text block.
#[derive(Debug, Clone)]
pub struct Coverage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Coverage {
    /// Premultiplied RGBA bytes of the coverage tinted with `rgba`.
    pub fn tinted(&self, rgba: [u8; 4]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for &cov in &self.data {
            let a = (cov as u32 * rgba[3] as u32 + 127) / 255;
            out.extend_from_slice(&[
                ((rgba[0] as u32 * a + 127) / 255) as u8,
                ((rgba[1] as u32 * a + 127) / 255) as u8,
                ((rgba[2] as u32 * a + 127) / 255) as u8,
                a as u8,
            ]);
        }
        out
    }
}

/// Horizontal re-strike offsets, in em, used to embolden the single face.
fn weight_offsets(weight: FontWeight) -> &'static [f32] {
    match weight {
        FontWeight::Regular | FontWeight::SemiBold => &[0.0],
        FontWeight::Bold => &[0.0, 0.02],
        FontWeight::Black => &[0.0, 0.025, 0.05],
    }
}

/// Rasterize `block` at `scale` pixels per layout unit, wrapping within
/// `width` layout units. `None` when nothing would be drawn.
pub fn render_coverage(
    fonts: &FontSet,
    block: &TextBlock,
    width: f32,
    scale: f32,
) -> Option<Coverage> {
    let style = &block.style;
    let content = block.rendered();
    if content.trim().is_empty() || scale <= 0.0 {
        return None;
    }

    let font = fonts.font();
    let size = style.size * scale;
    let spacing = style.letter_spacing * size;
    let line_height = size * style.line_height;
    let box_width = (width * scale).max(1.0);

    let lines = wrap_lines(font, &content, size, spacing, box_width);
    if lines.is_empty() {
        return None;
    }

    let px_scale = Scale::uniform(size);
    let v = font.v_metrics(px_scale);
    let glyph_height = v.ascent - v.descent;

    let cov_width = box_width.ceil() as u32 + 2;
    let cov_height = (lines.len() as f32 * line_height).ceil().max(1.0) as u32 + 2;
    let mut data = vec![0u8; (cov_width * cov_height) as usize];

    for (i, line) in lines.iter().enumerate() {
        let x0 = match style.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => ((box_width - line.width) / 2.0).max(0.0),
        };
        let baseline = i as f32 * line_height + (line_height - glyph_height) / 2.0 + v.ascent;

        for offset in weight_offsets(style.weight) {
            let mut x = x0 + offset * size;
            let mut prev = None;
            for c in line.text.chars() {
                let glyph = font.glyph(c).scaled(px_scale);
                if let Some(p) = prev {
                    x += font.pair_kerning(px_scale, p, glyph.id());
                }
                prev = Some(glyph.id());
                let advance = glyph.h_metrics().advance_width;
                let positioned = glyph.positioned(point(x, baseline));
                if let Some(bb) = positioned.pixel_bounding_box() {
                    positioned.draw(|gx, gy, value| {
                        let px = bb.min.x + gx as i32;
                        let py = bb.min.y + gy as i32;
                        if px < 0 || py < 0 || px >= cov_width as i32 || py >= cov_height as i32 {
                            return;
                        }
                        let idx = (py as u32 * cov_width + px as u32) as usize;
                        let v = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
                        data[idx] = data[idx].max(v);
                    });
                }
                x += advance + spacing;
            }
        }
    }

    Some(Coverage {
        width: cov_width,
        height: cov_height,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TextStyle;
    use vantage_studio_model::Color;

    fn fonts() -> Option<FontSet> {
        FontSet::discover(None)
    }

    #[test]
    fn test_missing_font_file_is_config_error() {
        let err = FontSet::from_file(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, VantageError::Config { .. }));
    }

    #[test]
    fn test_tinted_is_premultiplied() {
        let cov = Coverage {
            width: 2,
            height: 1,
            data: vec![255, 128],
        };
        let px = cov.tinted([255, 0, 0, 255]);
        assert_eq!(&px[0..4], &[255, 0, 0, 255]);
        assert_eq!(px[7], 128);
        assert!(px[4] <= px[7]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let Some(fonts) = fonts() else { return };
        let lines = wrap_lines(fonts.font(), "one two three four five six", 20.0, 0.0, 80.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 80.0 || !line.text.contains(' '));
        }
    }

    #[test]
    fn test_coverage_has_ink() {
        let Some(fonts) = fonts() else { return };
        let block = TextBlock {
            content: "Hello".into(),
            style: TextStyle::new(24.0, Color::WHITE),
        };
        let cov = render_coverage(&fonts, &block, 200.0, 1.0).unwrap();
        assert!(cov.data.iter().any(|&v| v > 0));

        let empty = TextBlock {
            content: "   ".into(),
            style: TextStyle::new(24.0, Color::WHITE),
        };
        assert!(render_coverage(&fonts, &empty, 200.0, 1.0).is_none());
    }
}
