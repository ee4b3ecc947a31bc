//! Template composer.
//!
//! Turns one `(ThemeSettings, ScreenshotRecord)` pair into a [`ComposedCanvas`]
//! at device-native resolution. Layout happens in a design space that is
//! [`DESIGN_WIDTH`] units wide with a height that follows the device aspect;
//! the canvas root scales it to pixels.

use std::collections::HashMap;
use std::sync::Arc;

use vantage_common::config::RenderDefaults;
use vantage_common::error::{VantageError, VantageResult};
use vantage_studio_model::{
    Color, DeviceId, DeviceProfile, ScreenshotRecord, SessionSnapshot, TemplateStyle,
    ThemeSettings,
};

use crate::frame::{render_device_frame, FrameGeometry, FrameOptions};
use crate::geometry::{CornerRadii, Point, Rect, Size};
use crate::scene::{
    FontWeight, Node, Paint, Shadow, ShapeNode, TextAlign, TextBlock, TextStyle, Transform2D,
};
use crate::templates::standard_layouts;

/// Width of the layout design space.
pub const DESIGN_WIDTH: f32 = 414.0;

/// Label of the shared gradient background node.
pub const BACKGROUND_LABEL: &str = "background";

/// A fully composed, immutable scene for one screenshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedCanvas {
    /// Device-native output size.
    pub width: u32,
    pub height: u32,
    pub design_size: Size,
    pub template: TemplateStyle,
    pub device: DeviceId,
    pub record_id: String,
    /// Root group; its transform maps design units to pixels.
    pub root: Node,
}

impl ComposedCanvas {
    /// Pixels per design unit.
    pub fn design_scale(&self) -> f32 {
        self.width as f32 / self.design_size.width
    }

    /// Label of the topmost interactive node at a canvas pixel.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&str> {
        self.root
            .hit_test(Point::new(x, y))
            .map(|node| node.label.as_str())
    }

    pub fn background(&self) -> Option<&Node> {
        self.root.children().first()
    }
}

/// Everything a layout may read.
pub struct LayoutContext<'a> {
    pub settings: &'a ThemeSettings,
    pub record: &'a ScreenshotRecord,
    pub profile: &'static DeviceProfile,
    pub design: Size,
    pub frame_options: FrameOptions,
}

impl LayoutContext<'_> {
    /// Native size of the device chassis.
    pub fn device_size(&self) -> Size {
        FrameGeometry::for_profile(self.profile).size
    }

    /// Largest frame size with the device aspect inside `max`.
    pub fn fit_frame(&self, max: Size) -> Size {
        self.device_size().fit_within(Size::new(max.width.max(1.0), max.height.max(1.0)))
    }

    /// Device frame placed into `rect` (design units), then transformed by
    /// `extra` in design space.
    pub fn device_frame(&self, label: &str, rect: Rect, extra: Transform2D) -> Node {
        let native = self.device_size();
        let scale = rect.w / native.width;
        let mut frame = render_device_frame(
            self.profile,
            self.settings.device_finish,
            self.settings.text_color,
            self.record.image.clone(),
            &self.frame_options,
        );
        frame.label = label.to_string();
        frame.transform = Transform2D::scale(scale)
            .then(&Transform2D::translate(rect.x, rect.y))
            .then(&extra);
        frame
    }

    /// Outer chassis radius once the frame is scaled to `frame_width`.
    pub fn frame_radius(&self, frame_width: f32) -> f32 {
        let geo = FrameGeometry::for_profile(self.profile);
        geo.outer_radius * frame_width / geo.size.width
    }

    /// Base typography in the session text color, with the legibility
    /// shadow applied when that color is white.
    pub fn text_style(&self, size: f32, line_height: f32, weight: FontWeight) -> TextStyle {
        self.text_style_in(self.settings.text_color, size, line_height, weight)
    }

    /// Typography in a fixed `color`, for copy on a surface the template paints itself.
    pub fn text_style_in(
        &self,
        color: Color,
        size: f32,
        line_height: f32,
        weight: FontWeight,
    ) -> TextStyle {
        let mut style = TextStyle::new(size, color);
        style.line_height = line_height;
        style.weight = weight;
        style.shadows = legibility_shadows(color);
        style
    }

    /// Text node at `(x, y)` wrapping within `width`. Returns the node and
    /// its estimated height.
    pub fn text(
        &self,
        label: &str,
        content: &str,
        origin: Point,
        width: f32,
        style: TextStyle,
    ) -> (Node, f32) {
        let height = estimate_text_height(content, &style, width);
        let node = Node::text(
            label,
            Rect::new(origin.x, origin.y, width, height),
            TextBlock {
                content: content.to_string(),
                style,
            },
        );
        (node, height)
    }
}

/// Dark layered shadow beneath white typography; nothing otherwise.
pub fn legibility_shadows(text_color: Color) -> Vec<Shadow> {
    if text_color.is_white() {
        vec![
            Shadow::new(Color::black_alpha(0.35), 0.0, 2.0, 4.0),
            Shadow::new(Color::black_alpha(0.25), 0.0, 8.0, 16.0),
        ]
    } else {
        Vec::new()
    }
}

/// Average glyph advance in em for layout estimates.
fn average_advance(style: &TextStyle) -> f32 {
    let base = match style.weight {
        FontWeight::Regular => 0.50,
        FontWeight::SemiBold => 0.53,
        FontWeight::Bold => 0.56,
        FontWeight::Black => 0.60,
    };
    (base + style.letter_spacing).max(0.1)
}

/// Deterministic line count for `text` greedily wrapped within `width`.
pub fn estimate_line_count(text: &str, style: &TextStyle, width: f32) -> usize {
    let advance = style.size * average_advance(style);
    let capacity = ((width / advance).floor() as usize).max(1);

    let mut lines = 0;
    for paragraph in text.lines() {
        let mut current = 0usize;
        let mut paragraph_lines = 0usize;
        for word in paragraph.split_whitespace() {
            let len = word.chars().count();
            if current == 0 {
                paragraph_lines += 1;
                current = len;
            } else if current + 1 + len <= capacity {
                current += 1 + len;
            } else {
                paragraph_lines += 1;
                current = len;
            }
            while current > capacity {
                paragraph_lines += 1;
                current -= capacity;
            }
        }
        lines += paragraph_lines;
    }
    lines
}

/// Estimated block height; zero for empty text.
pub fn estimate_text_height(text: &str, style: &TextStyle, width: f32) -> f32 {
    estimate_line_count(text, style, width) as f32 * style.size * style.line_height
}

/// One compositional layout.
///
/// Layouts are pure: they read the context and return the nodes drawn above
/// the shared gradient background.
pub trait TemplateLayout: Send + Sync {
    fn style(&self) -> TemplateStyle;

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>>;
}

/// Registry of layouts plus frame options.
pub struct Composer {
    layouts: HashMap<TemplateStyle, Box<dyn TemplateLayout>>,
    frame_options: FrameOptions,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    /// Composer with every built-in template.
    pub fn new() -> Self {
        Self::with_templates(standard_layouts())
    }

    /// Composer restricted to the given layouts.
    pub fn with_templates(layouts: Vec<Box<dyn TemplateLayout>>) -> Self {
        Self {
            layouts: layouts.into_iter().map(|l| (l.style(), l)).collect(),
            frame_options: FrameOptions::default(),
        }
    }

    pub fn from_config(render: &RenderDefaults) -> Self {
        Self::new().with_frame_options(FrameOptions {
            show_gloss: render.show_gloss,
            status_bar: false,
        })
    }

    pub fn with_frame_options(mut self, options: FrameOptions) -> Self {
        self.frame_options = options;
        self
    }

    /// Registered templates in picker order.
    pub fn templates(&self) -> Vec<TemplateStyle> {
        TemplateStyle::ALL
            .into_iter()
            .filter(|t| self.layouts.contains_key(t))
            .collect()
    }

    /// Compose one screenshot.
    pub fn compose(
        &self,
        settings: &ThemeSettings,
        record: &ScreenshotRecord,
    ) -> VantageResult<ComposedCanvas> {
        let profile = settings.device_profile()?;
        let layout =
            self.layouts
                .get(&settings.template)
                .ok_or_else(|| VantageError::UnknownTemplate {
                    id: settings.template.slug().to_string(),
                })?;

        let design = Size::new(
            DESIGN_WIDTH,
            profile.height_for_width(DESIGN_WIDTH as f64) as f32,
        );
        let cx = LayoutContext {
            settings,
            record,
            profile,
            design,
            frame_options: FrameOptions {
                status_bar: settings.show_status_bar,
                ..self.frame_options
            },
        };

        let mut children = vec![background(settings, design)];
        children.extend(layout.layout(&cx)?);

        let scale = profile.pixel_width as f32 / DESIGN_WIDTH;
        let root = Node::clipped_group("canvas", Rect::from_size(design), CornerRadii::ZERO, children)
            .with_transform(Transform2D::scale(scale));

        tracing::debug!(
            template = %settings.template,
            device = %settings.device,
            record = %record.id,
            "Canvas composed"
        );

        Ok(ComposedCanvas {
            width: profile.pixel_width,
            height: profile.pixel_height,
            design_size: design,
            template: settings.template,
            device: settings.device,
            record_id: record.id.clone(),
            root,
        })
    }

    /// Compose every record of a snapshot, in order.
    pub fn compose_all(&self, snapshot: &SessionSnapshot) -> VantageResult<Vec<Arc<ComposedCanvas>>> {
        snapshot
            .records
            .iter()
            .map(|record| self.compose(&snapshot.settings, record).map(Arc::new))
            .collect()
    }
}

fn background(settings: &ThemeSettings, design: Size) -> Node {
    Node::shape(
        BACKGROUND_LABEL,
        Rect::from_size(design),
        ShapeNode::new(Paint::linear(
            settings.gradient_angle.degrees(),
            settings.primary_color,
            settings.secondary_color,
        )),
    )
}

/// Center-aligned copy of a style.
pub(crate) fn centered(mut style: TextStyle) -> TextStyle {
    style.align = TextAlign::Center;
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_studio_model::default_record;

    #[test]
    fn test_canvas_is_device_native() {
        let composer = Composer::new();
        for device in DeviceId::ALL {
            let settings = ThemeSettings {
                device,
                ..ThemeSettings::default()
            };
            let canvas = composer.compose(&settings, &default_record(0)).unwrap();
            let profile = device.profile().unwrap();
            assert_eq!((canvas.width, canvas.height), (profile.pixel_width, profile.pixel_height));
            let aspect = canvas.design_size.height / canvas.design_size.width;
            assert!((aspect - profile.pixel_height as f32 / profile.pixel_width as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn test_missing_template_is_error() {
        let composer = Composer::with_templates(Vec::new());
        let err = composer
            .compose(&ThemeSettings::default(), &default_record(0))
            .unwrap_err();
        assert!(matches!(err, VantageError::UnknownTemplate { ref id } if id == "classic"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_legibility_shadow_only_for_white() {
        assert_eq!(legibility_shadows(Color::WHITE).len(), 2);
        assert!(legibility_shadows(Color::rgb(0x0f, 0x17, 0x2a)).is_empty());
    }

    #[test]
    fn test_line_estimate() {
        let style = TextStyle::new(20.0, Color::WHITE);
        assert_eq!(estimate_line_count("", &style, 200.0), 0);
        assert_eq!(estimate_line_count("short", &style, 200.0), 1);
        // 20 chars of capacity per line.
        let long = "aaaa bbbb cccc dddd eeee ffff gggg";
        assert_eq!(estimate_line_count(long, &style, 200.0), 2);
        assert_eq!(estimate_line_count(&"x".repeat(45), &style, 200.0), 3);
    }

    #[test]
    fn test_from_config_respects_gloss() {
        let render = RenderDefaults {
            show_gloss: false,
            ..RenderDefaults::default()
        };
        let canvas = Composer::from_config(&render)
            .compose(&ThemeSettings::default(), &default_record(0))
            .unwrap();
        assert!(canvas.root.find("gloss").is_none());
    }
}
