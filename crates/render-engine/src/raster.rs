//! Canvas rasterization.
//!
//! A [`Rasterizer`] turns a [`CanvasSurface`] into an RGBA image at the
//! canvas' native resolution. [`SkiaRasterizer`] paints the scene graph with
//! tiny-skia on a blocking worker.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, IntSize, LinearGradient, Mask, Path, PathBuilder, Pattern,
    Pixmap, PixmapPaint, RadialGradient, Shader, SpreadMode, Transform,
};
use vantage_common::config::RenderDefaults;
use vantage_common::error::{VantageError, VantageResult};
use vantage_studio_model::{Color, ImageSource};

use crate::blur::{box_blur, DEFAULT_PASSES};
use crate::composer::ComposedCanvas;
use crate::geometry::{CornerRadii, Point, Rect};
use crate::scene::{GradientStop, Node, NodeKind, Paint, Stroke, TextBlock, Transform2D};
use crate::text::{render_coverage, Coverage, FontSet};

/// Slant applied to italic text.
const ITALIC_SKEW_DEG: f32 = -12.0;

/// Bezier handle length for quarter circles.
const KAPPA: f32 = 0.552_284_8;

/// A canvas as currently displayed, possibly zoomed for preview.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    pub canvas: Arc<ComposedCanvas>,
    /// Display zoom of the on-screen preview. Never affects output size.
    pub preview_zoom: f32,
}

impl CanvasSurface {
    pub fn new(canvas: Arc<ComposedCanvas>) -> Self {
        Self {
            canvas,
            preview_zoom: 1.0,
        }
    }

    pub fn with_preview_zoom(mut self, zoom: f32) -> Self {
        self.preview_zoom = zoom;
        self
    }

    fn zoom(&self) -> f32 {
        if self.preview_zoom.is_finite() && self.preview_zoom > 0.0 {
            self.preview_zoom
        } else {
            1.0
        }
    }

    /// On-screen size at the current zoom.
    pub fn displayed_size(&self) -> (f32, f32) {
        let zoom = self.zoom();
        (
            self.canvas.width as f32 * zoom,
            self.canvas.height as f32 * zoom,
        )
    }

    /// Capture pixel ratio that undoes the preview zoom.
    pub fn pixel_ratio(&self) -> f32 {
        1.0 / self.zoom()
    }

    /// Output size: displayed size times pixel ratio, i.e. native size.
    pub fn capture_size(&self) -> (u32, u32) {
        let (w, h) = self.displayed_size();
        let ratio = self.pixel_ratio();
        (
            ((w * ratio).round() as u32).max(1),
            ((h * ratio).round() as u32).max(1),
        )
    }
}

/// Produces pixels for composed canvases.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, surface: &CanvasSurface) -> VantageResult<RgbaImage>;

    fn name(&self) -> &str;
}

/// tiny-skia backed rasterizer.
#[derive(Debug, Clone)]
pub struct SkiaRasterizer {
    fonts: Option<Arc<FontSet>>,
}

impl SkiaRasterizer {
    pub fn new(render: &RenderDefaults) -> Self {
        let fonts = FontSet::discover(render.font_path.as_deref()).map(Arc::new);
        match &fonts {
            Some(f) => tracing::info!(font = %f.source().display(), "Rasterizer font loaded"),
            None => tracing::warn!("No usable font found; canvas text will not be drawn"),
        }
        Self { fonts }
    }

    /// Rasterizer that skips typography.
    pub fn without_text() -> Self {
        Self { fonts: None }
    }

    pub fn has_text(&self) -> bool {
        self.fonts.is_some()
    }

    /// Synchronous rendering on the calling thread.
    pub fn render_blocking(&self, surface: &CanvasSurface) -> VantageResult<RgbaImage> {
        paint_canvas(&surface.canvas, self.fonts.as_deref(), surface.capture_size())
    }
}

#[async_trait]
impl Rasterizer for SkiaRasterizer {
    async fn rasterize(&self, surface: &CanvasSurface) -> VantageResult<RgbaImage> {
        let canvas = Arc::clone(&surface.canvas);
        let fonts = self.fonts.clone();
        let size = surface.capture_size();
        tokio::task::spawn_blocking(move || paint_canvas(&canvas, fonts.as_deref(), size))
            .await
            .map_err(|e| VantageError::rasterize(format!("raster task failed: {e}")))?
    }

    fn name(&self) -> &str {
        "tiny-skia"
    }
}

fn paint_canvas(
    canvas: &ComposedCanvas,
    fonts: Option<&FontSet>,
    (width, height): (u32, u32),
) -> VantageResult<RgbaImage> {
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        VantageError::rasterize(format!("cannot allocate {width}x{height} canvas"))
    })?;

    let base = Transform2D::scale_xy(
        width as f32 / canvas.width as f32,
        height as f32 / canvas.height as f32,
    );
    let mut painter = Painter {
        fonts,
        images: HashMap::new(),
        width,
        height,
    };
    painter.draw_node(&mut pixmap, &canvas.root, base, None)?;

    tracing::debug!(
        record = %canvas.record_id,
        width,
        height,
        images = painter.images.len(),
        "Canvas rasterized"
    );
    pixmap_to_image(pixmap)
}

struct Painter<'a> {
    fonts: Option<&'a FontSet>,
    /// Decoded images keyed by source description.
    images: HashMap<String, Arc<Pixmap>>,
    width: u32,
    height: u32,
}

impl Painter<'_> {
    fn draw_node(
        &mut self,
        target: &mut Pixmap,
        node: &Node,
        parent: Transform2D,
        mask: Option<&Mask>,
    ) -> VantageResult<()> {
        if node.opacity <= 0.0 {
            return Ok(());
        }
        let ts = node.transform.then(&parent);

        if node.opacity < 1.0 {
            let mut layer = self.blank_layer()?;
            self.draw_content(&mut layer, node, ts, mask)?;
            let paint = PixmapPaint {
                opacity: node.opacity.clamp(0.0, 1.0),
                blend_mode: BlendMode::SourceOver,
                quality: FilterQuality::Nearest,
            };
            target.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
            return Ok(());
        }
        self.draw_content(target, node, ts, mask)
    }

    fn draw_content(
        &mut self,
        target: &mut Pixmap,
        node: &Node,
        ts: Transform2D,
        mask: Option<&Mask>,
    ) -> VantageResult<()> {
        match &node.kind {
            NodeKind::Group { clip, children } => {
                let clip_mask = match clip {
                    Some(radii) => self.clip_mask(&node.bounds, radii, ts, mask)?,
                    None => None,
                };
                let mask = clip_mask.as_ref().or(mask);
                for child in children {
                    self.draw_node(target, child, ts, mask)?;
                }
            }
            NodeKind::Shape(shape) => {
                let Some(path) = rounded_rect_path(&node.bounds, &shape.radii) else {
                    return Ok(());
                };
                if let Some(shadow) = &shape.shadow {
                    let offset = Transform2D::translate(shadow.offset.x, shadow.offset.y).then(&ts);
                    self.draw_soft(
                        target,
                        &path,
                        &Paint::Solid(shadow.color),
                        &node.bounds,
                        offset,
                        shadow.blur,
                        mask,
                    )?;
                }
                if shape.blur > 0.0 {
                    self.draw_soft(target, &path, &shape.fill, &node.bounds, ts, shape.blur, mask)?;
                } else {
                    fill_path(target, &path, &shape.fill, &node.bounds, ts, mask);
                }
                if let Some(stroke) = &shape.stroke {
                    stroke_path(target, &path, stroke, ts, mask);
                }
            }
            NodeKind::Text(block) => self.draw_text(target, &node.bounds, block, ts, mask)?,
            NodeKind::Image { source, radii } => {
                self.draw_image(target, &node.bounds, source, radii, ts, mask)?
            }
            NodeKind::Polygon {
                points,
                fill,
                stroke,
            } => {
                let Some(path) = polygon_path(points) else {
                    return Ok(());
                };
                let bounds = Rect::bounding(points).unwrap_or(node.bounds);
                fill_path(target, &path, fill, &bounds, ts, mask);
                if let Some(stroke) = stroke {
                    stroke_path(target, &path, stroke, ts, mask);
                }
            }
            NodeKind::Vignette { color, width } => {
                draw_vignette(target, &node.bounds, *color, *width, ts, mask)
            }
        }
        Ok(())
    }

    fn blank_layer(&self) -> VantageResult<Pixmap> {
        Pixmap::new(self.width, self.height)
            .ok_or_else(|| VantageError::rasterize("cannot allocate compositing layer"))
    }

    fn clip_mask(
        &self,
        bounds: &Rect,
        radii: &CornerRadii,
        ts: Transform2D,
        parent: Option<&Mask>,
    ) -> VantageResult<Option<Mask>> {
        let Some(path) = rounded_rect_path(bounds, radii) else {
            // Empty clip hides everything.
            return Mask::new(self.width, self.height)
                .map(Some)
                .ok_or_else(|| VantageError::rasterize("cannot allocate clip mask"));
        };
        let transform = to_skia(ts);
        let mask = match parent {
            Some(parent) => {
                let mut mask = parent.clone();
                mask.intersect_path(&path, FillRule::Winding, true, transform);
                mask
            }
            None => {
                let mut mask = Mask::new(self.width, self.height)
                    .ok_or_else(|| VantageError::rasterize("cannot allocate clip mask"))?;
                mask.fill_path(&path, FillRule::Winding, true, transform);
                mask
            }
        };
        Ok(Some(mask))
    }

    /// Fill `path` into a padded offscreen layer, blur it, then composite.
    #[allow(clippy::too_many_arguments)]
    fn draw_soft(
        &self,
        target: &mut Pixmap,
        path: &Path,
        paint: &Paint,
        bounds: &Rect,
        ts: Transform2D,
        blur: f32,
        mask: Option<&Mask>,
    ) -> VantageResult<()> {
        let radius = (blur * ts.average_scale()).round().max(0.0) as usize;
        let margin = (radius * DEFAULT_PASSES + 2) as f32;
        let device = ts.map_rect(bounds);
        let area = device.inset(-margin);

        let x0 = area.x.floor().max(0.0);
        let y0 = area.y.floor().max(0.0);
        let x1 = area.right().ceil().min(self.width as f32);
        let y1 = area.bottom().ceil().min(self.height as f32);
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let (lw, lh) = ((x1 - x0) as u32, (y1 - y0) as u32);
        let mut layer = Pixmap::new(lw, lh)
            .ok_or_else(|| VantageError::rasterize("cannot allocate blur layer"))?;

        let local = ts.then(&Transform2D::translate(-x0, -y0));
        fill_path(&mut layer, path, paint, bounds, local, None);
        box_blur(
            layer.data_mut(),
            lw as usize,
            lh as usize,
            radius,
            DEFAULT_PASSES,
        );

        target.draw_pixmap(
            x0 as i32,
            y0 as i32,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            mask,
        );
        Ok(())
    }

    fn draw_text(
        &self,
        target: &mut Pixmap,
        bounds: &Rect,
        block: &TextBlock,
        ts: Transform2D,
        mask: Option<&Mask>,
    ) -> VantageResult<()> {
        let Some(fonts) = self.fonts else {
            return Ok(());
        };
        let scale = ts.average_scale();
        let Some(coverage) = render_coverage(fonts, block, bounds.w, scale) else {
            return Ok(());
        };
        let style = &block.style;

        let placement = |dx: f32, dy: f32, margin: u32| {
            let m = margin as f32;
            let slant = if style.italic {
                Transform2D::about(
                    Point::new(0.0, m + coverage.height as f32 / 2.0),
                    &Transform2D::skew_x_deg(ITALIC_SKEW_DEG),
                )
            } else {
                Transform2D::IDENTITY
            };
            slant
                .then(&Transform2D::translate(-m, -m))
                .then(&Transform2D::scale(1.0 / scale))
                .then(&Transform2D::translate(bounds.x + dx, bounds.y + dy))
                .then(&ts)
        };
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };

        for shadow in &style.shadows {
            let radius = (shadow.blur * scale).round().max(0.0) as usize;
            let margin = (radius * DEFAULT_PASSES) as u32 + 1;
            let mut layer = coverage_pixmap(&coverage, shadow.color, margin)?;
            let (lw, lh) = (layer.width() as usize, layer.height() as usize);
            box_blur(layer.data_mut(), lw, lh, radius, DEFAULT_PASSES);
            let at = placement(shadow.offset.x, shadow.offset.y, margin);
            target.draw_pixmap(0, 0, layer.as_ref(), &paint, to_skia(at), mask);
        }

        let glyphs = coverage_pixmap(&coverage, style.color, 0)?;
        target.draw_pixmap(0, 0, glyphs.as_ref(), &paint, to_skia(placement(0.0, 0.0, 0)), mask);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_image(
        &mut self,
        target: &mut Pixmap,
        bounds: &Rect,
        source: &ImageSource,
        radii: &CornerRadii,
        ts: Transform2D,
        mask: Option<&Mask>,
    ) -> VantageResult<()> {
        let Some(path) = rounded_rect_path(bounds, radii) else {
            return Ok(());
        };
        let pixmap = self.image(source)?;
        let (iw, ih) = (pixmap.width() as f32, pixmap.height() as f32);

        // Cover fit, centered.
        let scale = (bounds.w / iw).max(bounds.h / ih);
        let fit = Transform::from_row(
            scale,
            0.0,
            0.0,
            scale,
            bounds.x + (bounds.w - iw * scale) / 2.0,
            bounds.y + (bounds.h - ih * scale) / 2.0,
        );
        let paint = tiny_skia::Paint {
            shader: Pattern::new(
                (*pixmap).as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bicubic,
                1.0,
                fit,
            ),
            anti_alias: true,
            ..tiny_skia::Paint::default()
        };
        target.fill_path(&path, &paint, FillRule::Winding, to_skia(ts), mask);
        Ok(())
    }

    fn image(&mut self, source: &ImageSource) -> VantageResult<Arc<Pixmap>> {
        let key = source.describe();
        if let Some(cached) = self.images.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let decoded = source.decode()?;
        let pixmap = Arc::new(image_to_pixmap(&decoded)?);
        self.images.insert(key, Arc::clone(&pixmap));
        Ok(pixmap)
    }
}

fn to_skia(t: Transform2D) -> Transform {
    Transform::from_row(t.sx, t.ky, t.kx, t.sy, t.tx, t.ty)
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_stops(stops: &[GradientStop]) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.offset.clamp(0.0, 1.0), skia_color(s.color)))
        .collect()
}

/// Shader for `paint` over `bounds`, in the same local space as the path.
fn shader_for(paint: &Paint, bounds: &Rect) -> Shader<'static> {
    let fallback = |stops: &[GradientStop]| {
        stops
            .first()
            .map(|s| Shader::SolidColor(skia_color(s.color)))
            .unwrap_or(Shader::SolidColor(tiny_skia::Color::TRANSPARENT))
    };
    match paint {
        Paint::Solid(color) => Shader::SolidColor(skia_color(*color)),
        Paint::LinearGradient { angle, stops } => {
            let (start, end) = css_gradient_line(*angle, bounds);
            LinearGradient::new(
                tiny_skia::Point::from_xy(start.x, start.y),
                tiny_skia::Point::from_xy(end.x, end.y),
                skia_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or_else(|| fallback(stops))
        }
        Paint::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let c = tiny_skia::Point::from_xy(
                bounds.x + center.x * bounds.w,
                bounds.y + center.y * bounds.h,
            );
            RadialGradient::new(
                c,
                c,
                (radius * bounds.w.max(bounds.h)).max(f32::EPSILON),
                skia_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or_else(|| fallback(stops))
        }
    }
}

/// Endpoints of a CSS `linear-gradient(angle)` line across `bounds`.
pub(crate) fn css_gradient_line(angle: f32, bounds: &Rect) -> (Point, Point) {
    let (sin, cos) = angle.to_radians().sin_cos();
    let half = (bounds.w * sin.abs() + bounds.h * cos.abs()) / 2.0;
    let c = bounds.center();
    let (dx, dy) = (sin * half, -cos * half);
    (Point::new(c.x - dx, c.y - dy), Point::new(c.x + dx, c.y + dy))
}

fn fill_path(
    target: &mut Pixmap,
    path: &Path,
    paint: &Paint,
    bounds: &Rect,
    ts: Transform2D,
    mask: Option<&Mask>,
) {
    let paint = tiny_skia::Paint {
        shader: shader_for(paint, bounds),
        anti_alias: true,
        ..tiny_skia::Paint::default()
    };
    target.fill_path(path, &paint, FillRule::Winding, to_skia(ts), mask);
}

fn stroke_path(
    target: &mut Pixmap,
    path: &Path,
    stroke: &Stroke,
    ts: Transform2D,
    mask: Option<&Mask>,
) {
    if stroke.width <= 0.0 {
        return;
    }
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(skia_color(stroke.color));
    paint.anti_alias = true;
    let style = tiny_skia::Stroke {
        width: stroke.width,
        ..tiny_skia::Stroke::default()
    };
    target.stroke_path(path, &paint, &style, to_skia(ts), mask);
}

/// Four edge bands fading inward from `color` to transparent.
fn draw_vignette(
    target: &mut Pixmap,
    bounds: &Rect,
    color: Color,
    width: f32,
    ts: Transform2D,
    mask: Option<&Mask>,
) {
    let w = width.min(bounds.w / 2.0).min(bounds.h / 2.0);
    if w <= 0.0 {
        return;
    }
    let clear = color.with_opacity(0.0);
    let bands = [
        (Rect::new(bounds.x, bounds.y, bounds.w, w), 180.0),
        (Rect::new(bounds.x, bounds.bottom() - w, bounds.w, w), 0.0),
        (Rect::new(bounds.x, bounds.y, w, bounds.h), 90.0),
        (Rect::new(bounds.right() - w, bounds.y, w, bounds.h), 270.0),
    ];
    for (band, angle) in bands {
        if let Some(path) = rounded_rect_path(&band, &CornerRadii::ZERO) {
            fill_path(target, &path, &Paint::linear(angle, color, clear), &band, ts, mask);
        }
    }
}

/// Rounded rectangle with independent corner radii. `None` when empty.
pub(crate) fn rounded_rect_path(rect: &Rect, radii: &CornerRadii) -> Option<Path> {
    if rect.is_empty() {
        return None;
    }
    let r = radii.clamped_to(rect);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(x + r.top_left, y);
    pb.line_to(right - r.top_right, y);
    corner(&mut pb, Point::new(right - r.top_right, y), Point::new(right, y + r.top_right), Point::new(right, y));
    pb.line_to(right, bottom - r.bottom_right);
    corner(
        &mut pb,
        Point::new(right, bottom - r.bottom_right),
        Point::new(right - r.bottom_right, bottom),
        Point::new(right, bottom),
    );
    pb.line_to(x + r.bottom_left, bottom);
    corner(&mut pb, Point::new(x + r.bottom_left, bottom), Point::new(x, bottom - r.bottom_left), Point::new(x, bottom));
    pb.line_to(x, y + r.top_left);
    corner(&mut pb, Point::new(x, y + r.top_left), Point::new(x + r.top_left, y), Point::new(x, y));
    pb.close();
    pb.finish()
}

/// Quarter arc from `from` to `to` bending toward the rectangle corner.
fn corner(pb: &mut PathBuilder, from: Point, to: Point, apex: Point) {
    if from == to {
        return;
    }
    let c1 = Point::new(from.x + (apex.x - from.x) * KAPPA, from.y + (apex.y - from.y) * KAPPA);
    let c2 = Point::new(to.x + (apex.x - to.x) * KAPPA, to.y + (apex.y - to.y) * KAPPA);
    pb.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
}

fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

fn coverage_pixmap(coverage: &Coverage, color: Color, margin: u32) -> VantageResult<Pixmap> {
    let tinted = coverage.tinted([color.r, color.g, color.b, color.a]);
    let (w, h) = (coverage.width + 2 * margin, coverage.height + 2 * margin);
    let mut data = vec![0u8; (w * h * 4) as usize];
    let row_bytes = (coverage.width * 4) as usize;
    for row in 0..coverage.height as usize {
        let src = row * row_bytes;
        let dst = ((row + margin as usize) * w as usize + margin as usize) * 4;
        data[dst..dst + row_bytes].copy_from_slice(&tinted[src..src + row_bytes]);
    }
    let size = IntSize::from_wh(w, h)
        .ok_or_else(|| VantageError::rasterize("empty text layer"))?;
    Pixmap::from_vec(data, size).ok_or_else(|| VantageError::rasterize("invalid text layer"))
}

fn image_to_pixmap(image: &RgbaImage) -> VantageResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut rgba = image.as_raw().clone();
    premultiply_rgba_in_place(&mut rgba);

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        VantageError::rasterize(format!("cannot allocate {width}x{height} image pixmap"))
    })?;
    pixmap.data_mut().copy_from_slice(&rgba);
    Ok(pixmap)
}

fn pixmap_to_image(pixmap: Pixmap) -> VantageResult<RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut data = pixmap.take();
    unpremultiply_rgba_in_place(&mut data);
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| VantageError::rasterize("pixel buffer does not match canvas size"))
}

fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3];
        if alpha == 0 {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
            continue;
        }
        let alpha = alpha as u16;
        pixel[0] = ((pixel[0] as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
        pixel[1] = ((pixel[1] as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
        pixel[2] = ((pixel[2] as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use vantage_studio_model::{default_record, DeviceId, ThemeSettings};

    fn canvas() -> Arc<ComposedCanvas> {
        let settings = ThemeSettings {
            device: DeviceId::Iphone8Plus,
            ..ThemeSettings::default()
        };
        Arc::new(
            Composer::new()
                .compose(&settings, &default_record(0))
                .unwrap(),
        )
    }

    #[test]
    fn test_capture_size_ignores_zoom() {
        let canvas = canvas();
        let native = (canvas.width, canvas.height);
        for zoom in [0.25, 0.5, 1.0, 1.7, 0.0, -2.0, f32::NAN] {
            let surface = CanvasSurface::new(Arc::clone(&canvas)).with_preview_zoom(zoom);
            assert_eq!(surface.capture_size(), native, "zoom {zoom}");
        }
        let half = CanvasSurface::new(Arc::clone(&canvas)).with_preview_zoom(0.5);
        assert_eq!(half.pixel_ratio(), 2.0);
        assert_eq!(half.displayed_size().0, canvas.width as f32 / 2.0);
    }

    #[test]
    fn test_css_gradient_line() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (start, end) = css_gradient_line(180.0, &rect);
        assert!((start.y - 0.0).abs() < 1e-3 && (end.y - 50.0).abs() < 1e-3);
        let (start, end) = css_gradient_line(90.0, &rect);
        assert!((start.x - 0.0).abs() < 1e-3 && (end.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_rounded_rect_path_bounds() {
        let rect = Rect::new(10.0, 20.0, 100.0, 60.0);
        let path = rounded_rect_path(&rect, &CornerRadii::uniform(500.0)).unwrap();
        let b = path.bounds();
        assert!((b.left() - 10.0).abs() < 1e-3);
        assert!((b.bottom() - 80.0).abs() < 1e-3);
        assert!(rounded_rect_path(&Rect::new(0.0, 0.0, 0.0, 10.0), &CornerRadii::ZERO).is_none());
    }

    #[test]
    fn test_premultiply_roundtrip_opaque() {
        let mut px = vec![10, 200, 77, 255];
        premultiply_rgba_in_place(&mut px);
        unpremultiply_rgba_in_place(&mut px);
        assert_eq!(px, vec![10, 200, 77, 255]);
    }

    #[test]
    fn test_render_blocking_native_size() {
        let canvas = canvas();
        let surface = CanvasSurface::new(Arc::clone(&canvas)).with_preview_zoom(0.4);
        let image = SkiaRasterizer::without_text().render_blocking(&surface).unwrap();
        assert_eq!(image.dimensions(), (canvas.width, canvas.height));
        // Background corner is the opaque gradient start.
        let corner = image.get_pixel(0, 0);
        assert_eq!(corner.0[3], 255);
    }

    #[test]
    fn test_missing_file_image_fails() {
        let mut record = default_record(0);
        record.image = ImageSource::File("/nonexistent/shot.png".into());
        let canvas = Composer::new()
            .compose(
                &ThemeSettings {
                    device: DeviceId::Iphone8Plus,
                    ..ThemeSettings::default()
                },
                &record,
            )
            .unwrap();
        let err = SkiaRasterizer::without_text()
            .render_blocking(&CanvasSurface::new(Arc::new(canvas)))
            .unwrap_err();
        assert!(matches!(err, VantageError::ImageDecode { .. }));
    }
}
