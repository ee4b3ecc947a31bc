//! The built-in compositional layouts.
//!
//! All measurements are design units (see [`crate::composer::DESIGN_WIDTH`]).

use vantage_common::error::VantageResult;
use vantage_studio_model::{Color, TemplateStyle};

use crate::composer::{centered, estimate_text_height, LayoutContext, TemplateLayout};
use crate::geometry::{CornerRadii, Point, Rect, Size};
use crate::scene::{
    FontWeight, GradientStop, Node, NodeKind, Paint, Shadow, ShapeNode, Stroke, TextTransform,
    Transform2D,
};

const SLATE_900: Color = Color::rgb(0x0f, 0x17, 0x2a);
const SLATE_500: Color = Color::rgb(0x64, 0x74, 0x8b);

/// One instance of every layout.
pub fn standard_layouts() -> Vec<Box<dyn TemplateLayout>> {
    vec![
        Box::new(Classic),
        Box::new(Bento),
        Box::new(FloatingDuo),
        Box::new(Isometric),
        Box::new(Editorial),
        Box::new(MinimalLuxe),
        Box::new(DynamicBreak),
    ]
}

fn solid(color: Color) -> ShapeNode {
    ShapeNode::new(Paint::Solid(color))
}

fn pill(label: &str, rect: Rect, color: Color) -> Node {
    Node::shape(label, rect, solid(color).radii(CornerRadii::pill(rect.size())))
}

/// Centered single title + subtitle stack.
pub struct Classic;

impl TemplateLayout for Classic {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::Classic
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let pad = 48.0;
        let width = design.width - 2.0 * pad;
        let mut nodes = Vec::new();

        nodes.push(
            Node::shape(
                "atmosphere",
                Rect::new(0.0, 0.0, design.width, design.height * 0.4),
                ShapeNode::new(Paint::linear(180.0, Color::white_alpha(0.1), Color::TRANSPARENT)),
            )
            .pass_through(),
        );

        let mut y = pad + 32.0;
        let mut title_style = centered(cx.text_style(48.0, 1.05, FontWeight::Black));
        title_style.letter_spacing = -0.05;
        let (title, h) = cx.text("title", &cx.record.title, Point::new(pad, y), width, title_style);
        nodes.push(title);
        y += h + 16.0;

        let sub_width = width.min(340.0);
        let (subtitle, h) = cx.text(
            "subtitle",
            &cx.record.subtitle,
            Point::new((design.width - sub_width) / 2.0, y),
            sub_width,
            centered(cx.text_style(21.0, 1.625, FontWeight::SemiBold)),
        );
        nodes.push(subtitle.with_opacity(0.8));
        y += h + 40.0;

        let bottom = design.height - pad;
        let size = cx.fit_frame(Size::new(width * 0.8, bottom - y));
        let frame = Rect::new((design.width - size.width) / 2.0, bottom - size.height, size.width, size.height);

        nodes.push(
            Node::shape(
                "device-shadow",
                Rect::new(frame.x + frame.w * 0.125, bottom - 10.0, frame.w * 0.75, 30.0),
                solid(Color::black_alpha(0.4)).rounded(15.0).blur(24.0),
            )
            .pass_through(),
        );
        nodes.push(cx.device_frame("device", frame, Transform2D::IDENTITY));
        Ok(nodes)
    }
}

/// Device in an upper glass panel, copy in a frosted lower panel.
pub struct Bento;

impl TemplateLayout for Bento {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::Bento
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let pad = 32.0;
        let width = design.width - 2.0 * pad;
        let panel_pad = 40.0;
        let text_width = width - 2.0 * panel_pad;

        let mut title_style = cx.text_style(36.0, 1.1, FontWeight::Black);
        title_style.letter_spacing = -0.025;
        let sub_style = cx.text_style(18.0, 1.625, FontWeight::SemiBold);
        let title_h =
            estimate_text_height(&cx.record.title, &title_style, text_width);
        let sub_h =
            estimate_text_height(&cx.record.subtitle, &sub_style, text_width);

        let panel_h = panel_pad + title_h + 16.0 + sub_h + panel_pad;
        let panel = Rect::new(pad, design.height - pad - 8.0 - panel_h, width, panel_h);
        let zone = Rect::new(pad, pad, width, (panel.y - 16.0 - pad).max(1.0));

        let glass = |label: &str, rect: Rect| {
            Node::shape(
                label,
                rect,
                solid(Color::white_alpha(0.05))
                    .rounded(40.0)
                    .stroke(Stroke::new(Color::white_alpha(0.1), 1.0)),
            )
        };

        let mut nodes = vec![glass("device-panel", zone)];

        let size = cx.fit_frame(Size::new((zone.w - 48.0) * 0.82, zone.h - 48.0));
        let frame = Rect::centered(zone.center(), size);
        nodes.push(cx.device_frame("device", frame, Transform2D::IDENTITY));

        let mut copy_panel = glass("copy-panel", panel);
        if let NodeKind::Shape(shape) = &mut copy_panel.kind {
            shape.shadow = Some(Shadow::new(Color::black_alpha(0.25), 0.0, 25.0, 25.0));
        }
        nodes.push(copy_panel);
        nodes.push(
            Node::shape(
                "copy-panel-sheen",
                panel,
                ShapeNode::new(Paint::linear(135.0, Color::white_alpha(0.1), Color::TRANSPARENT))
                    .rounded(40.0),
            )
            .pass_through(),
        );

        let text_x = panel.x + panel_pad;
        let (title, _) = cx.text(
            "title",
            &cx.record.title,
            Point::new(text_x, panel.y + panel_pad),
            text_width,
            title_style,
        );
        let (subtitle, _) = cx.text(
            "subtitle",
            &cx.record.subtitle,
            Point::new(text_x, panel.y + panel_pad + title_h + 16.0),
            text_width,
            sub_style,
        );
        nodes.push(title);
        nodes.push(subtitle.with_opacity(0.7));
        Ok(nodes)
    }
}

/// Two copies of the same device, offset and counter-rotated.
pub struct FloatingDuo;

impl TemplateLayout for FloatingDuo {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::FloatingDuo
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let pad = 48.0;
        let width = design.width - 2.0 * pad;

        let mut nodes = vec![Node::shape(
            "shade",
            Rect::from_size(design),
            ShapeNode::new(Paint::linear(0.0, Color::black_alpha(0.2), Color::TRANSPARENT)),
        )
        .pass_through()];

        let mut y = pad;
        let mut title_style = centered(cx.text_style(42.0, 1.0, FontWeight::Black));
        title_style.letter_spacing = -0.05;
        title_style.transform = TextTransform::Uppercase;
        let (title, h) = cx.text("title", &cx.record.title, Point::new(pad, y), width, title_style);
        nodes.push(title);
        y += h + 16.0;

        nodes.push(pill(
            "divider",
            Rect::new(design.width / 2.0 - 32.0, y, 64.0, 6.0),
            Color::white_alpha(0.3),
        ));
        y += 6.0 + 24.0;

        let sub_width = width.min(300.0);
        let (subtitle, h) = cx.text(
            "subtitle",
            &cx.record.subtitle,
            Point::new((design.width - sub_width) / 2.0, y),
            sub_width,
            centered(cx.text_style(19.0, 1.25, FontWeight::Bold)),
        );
        nodes.push(subtitle.with_opacity(0.8));
        y += h + 64.0;

        let stage = Rect::new(pad, y, width, (design.height - pad - y).max(1.0));
        let stage_zoom = Transform2D::about(stage.center(), &Transform2D::scale(1.1));
        let size = cx.fit_frame(Size::new(width * 0.65, stage.h * 0.8));
        let frame = Rect::centered(stage.center(), size);

        let back = Transform2D::about(
            frame.center(),
            &Transform2D::scale(0.95).then(&Transform2D::rotate_deg(-10.0)),
        )
        .then(&Transform2D::translate(-64.0, 64.0))
        .then(&stage_zoom);
        nodes.push(cx.device_frame("device-back", frame, back).with_opacity(0.4));

        let front = Transform2D::about(frame.center(), &Transform2D::rotate_deg(8.0))
            .then(&Transform2D::translate(24.0, 0.0))
            .then(&stage_zoom);
        nodes.push(cx.device_frame("device-front", frame, front));
        Ok(nodes)
    }
}

/// Single device under an isometric tilt, copy upper-left.
pub struct Isometric;

impl Isometric {
    pub const ROTATE_X: f32 = 50.0;
    pub const ROTATE_Z: f32 = -30.0;
}

impl TemplateLayout for Isometric {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::Isometric
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let pad = 48.0;
        let width = design.width - 2.0 * pad;

        let glow = Rect::new(
            -0.2 * design.width,
            -0.2 * design.height,
            design.width,
            design.height,
        );
        let mut nodes = vec![Node::shape(
            "glow",
            glow,
            solid(Color::white_alpha(0.1))
                .radii(CornerRadii::pill(glow.size()))
                .blur(60.0),
        )
        .pass_through()];

        let mut y = pad + 32.0;
        let icon = Rect::new(pad, y, 40.0, 40.0);
        nodes.push(Node::shape(
            "icon",
            icon,
            solid(Color::white_alpha(0.1))
                .rounded(16.0)
                .stroke(Stroke::new(Color::white_alpha(0.2), 1.0))
                .shadow(Shadow::new(Color::black_alpha(0.2), 0.0, 10.0, 12.0)),
        ));
        nodes.push(Node::shape(
            "icon-dot",
            Rect::centered(icon.center(), Size::new(16.0, 16.0)),
            solid(Color::WHITE)
                .rounded(8.0)
                .shadow(Shadow::new(Color::WHITE, 0.0, 0.0, 5.0)),
        ));
        y += 40.0 + 24.0;

        let mut title_style = cx.text_style(52.0, 0.9, FontWeight::Black);
        title_style.italic = true;
        title_style.letter_spacing = -0.05;
        title_style.transform = TextTransform::Uppercase;
        let (title, h) = cx.text("title", &cx.record.title, Point::new(pad, y), width, title_style);
        nodes.push(title);
        y += h + 24.0;

        let mut sub_style = cx.text_style(21.0, 1.375, FontWeight::Bold);
        sub_style.letter_spacing = -0.025;
        let (subtitle, h) = cx.text("subtitle", &cx.record.subtitle, Point::new(pad, y), width, sub_style);
        nodes.push(subtitle.with_opacity(0.7));
        y += h + 48.0;

        let stage = Rect::new(pad, y, width, (design.height - pad - y).max(1.0));
        let tilt = Transform2D::isometric(Self::ROTATE_X, Self::ROTATE_Z)
            .then(&Transform2D::scale(1.1));

        // Shrink until the projected device fits the stage.
        let base = cx.fit_frame(Size::new(width * 0.78, f32::MAX));
        let projected = tilt.map_rect(&Rect::from_size(base));
        let k = (stage.w / projected.w)
            .min(stage.h / projected.h)
            .min(1.0);
        let size = Size::new(base.width * k, base.height * k);
        let frame = Rect::centered(stage.center(), size);
        let transform = Transform2D::about(frame.center(), &tilt);

        nodes.push(
            Node::shape(
                "device-shadow",
                frame.translate(-64.0 * k, 64.0 * k),
                solid(Color::black_alpha(0.2))
                    .rounded(cx.frame_radius(size.width) + 8.0)
                    .blur(24.0),
            )
            .with_transform(transform)
            .pass_through(),
        );
        nodes.push(cx.device_frame("device", frame, transform));
        Ok(nodes)
    }
}

/// Colored upper band with a bleeding device, white lower band with copy.
///
/// The copy sits on white paper, so it ignores the session text color.
pub struct Editorial;

impl TemplateLayout for Editorial {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::Editorial
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let band_h = design.height * 0.48;
        let band = Rect::new(0.0, 0.0, design.width, band_h);
        let lower = Rect::new(0.0, band_h, design.width, design.height - band_h);

        let mut nodes = vec![
            Node::shape("band-shade", band, solid(Color::black_alpha(0.1))),
            Node::shape("paper", lower, solid(Color::WHITE)),
        ];

        let bottom = band_h * 1.18;
        let size = cx.fit_frame(Size::new(design.width * 0.68, bottom - 24.0));
        let frame = Rect::new(40.0, bottom - size.height, size.width, size.height);
        let mat = 8.0;
        nodes.push(Node::shape(
            "device-mat",
            frame.inset(-mat),
            solid(Color::WHITE)
                .rounded(cx.frame_radius(size.width) + mat)
                .shadow(Shadow::new(Color::black_alpha(0.3), 0.0, 40.0, 40.0)),
        ));
        nodes.push(cx.device_frame("device", frame, Transform2D::IDENTITY));

        let pad = 56.0;
        let width = design.width - 2.0 * pad;

        let sub_width = width.min(280.0);
        let sub_style = cx.text_style_in(SLATE_500, 23.0, 1.25, FontWeight::SemiBold);
        let sub_h = estimate_text_height(&cx.record.subtitle, &sub_style, sub_width);
        let sub_y = design.height - pad - sub_h;
        let bar_y = sub_y - 24.0 - 8.0;

        let mut title_style = cx.text_style_in(SLATE_900, 58.0, 0.85, FontWeight::Black);
        title_style.italic = true;
        title_style.letter_spacing = -0.05;
        title_style.transform = TextTransform::Uppercase;
        let title_h = estimate_text_height(&cx.record.title, &title_style, width);
        let title_y = bar_y - 24.0 - title_h;

        let (title, _) = cx.text("title", &cx.record.title, Point::new(pad, title_y), width, title_style);
        nodes.push(title);
        nodes.push(pill(
            "rule",
            Rect::new(pad, bar_y, 80.0, 8.0),
            SLATE_900,
        ));
        let (subtitle, _) = cx.text(
            "subtitle",
            &cx.record.subtitle,
            Point::new(pad, sub_y),
            sub_width,
            sub_style,
        );
        nodes.push(subtitle);
        Ok(nodes)
    }
}

/// Bordered inset card with a centered device and quiet copy.
pub struct MinimalLuxe;

impl TemplateLayout for MinimalLuxe {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::MinimalLuxe
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let card = Rect::from_size(design).inset(56.0);
        let inner = card.inset(40.0);

        let mut nodes = vec![
            Node::shape(
                "card",
                card,
                solid(Color::TRANSPARENT)
                    .rounded(56.0)
                    .stroke(Stroke::new(Color::white_alpha(0.1), 2.0)),
            ),
            Node::shape(
                "card-highlight",
                Rect::new(card.x + 48.0, card.y, card.w - 96.0, 4.0),
                ShapeNode::new(Paint::LinearGradient {
                    angle: 90.0,
                    stops: vec![
                        GradientStop::new(0.0, Color::TRANSPARENT),
                        GradientStop::new(0.5, Color::white_alpha(0.4)),
                        GradientStop::new(1.0, Color::TRANSPARENT),
                    ],
                }),
            )
            .pass_through(),
        ];

        let mut y = inner.y + 24.0;
        let mut title_style = centered(cx.text_style(40.0, 1.25, FontWeight::Black));
        title_style.letter_spacing = -0.025;
        title_style.transform = TextTransform::Uppercase;
        let (title, h) = cx.text("title", &cx.record.title, Point::new(inner.x, y), inner.w, title_style);
        nodes.push(title);
        y += h + 16.0;

        let mut sub_style = centered(cx.text_style(17.0, 1.5, FontWeight::Bold));
        sub_style.letter_spacing = 0.2;
        sub_style.transform = TextTransform::Uppercase;
        let (subtitle, h) = cx.text("subtitle", &cx.record.subtitle, Point::new(inner.x, y), inner.w, sub_style);
        nodes.push(subtitle.with_opacity(0.6));
        y += h + 24.0;

        let handle = Rect::new(inner.center().x - 24.0, inner.bottom() - 16.0 - 6.0, 48.0, 6.0);
        let area = Rect::new(inner.x, y, inner.w, (handle.y - 24.0 - y).max(1.0));
        let size = cx.fit_frame(Size::new(inner.w * 0.8, area.h));
        let frame = Rect::centered(area.center(), size);

        nodes.push(cx.device_frame("device", frame, Transform2D::IDENTITY));
        nodes.push(
            Node::shape(
                "device-sheen",
                frame,
                ShapeNode::new(Paint::linear(45.0, Color::white_alpha(0.05), Color::TRANSPARENT))
                    .rounded(cx.frame_radius(size.width)),
            )
            .pass_through(),
        );
        nodes.push(pill("handle", handle, Color::white_alpha(0.2)));
        Ok(nodes)
    }
}

/// Rounded break panel behind the copy, device with a star badge.
pub struct DynamicBreak;

impl TemplateLayout for DynamicBreak {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::DynamicBreak
    }

    fn layout(&self, cx: &LayoutContext<'_>) -> VantageResult<Vec<Node>> {
        let design = cx.design;
        let pad = 48.0;
        let width = design.width - 2.0 * pad;

        let mut nodes = vec![Node::shape(
            "break-panel",
            Rect::new(0.0, 0.0, design.width, design.height * 0.55),
            solid(Color::black_alpha(0.1))
                .radii(CornerRadii::bottom(100.0))
                .stroke(Stroke::new(Color::white_alpha(0.05), 1.0)),
        )];

        let mut y = pad + 32.0;
        let mut title_style = centered(cx.text_style(50.0, 1.0, FontWeight::Black));
        title_style.letter_spacing = -0.05;
        title_style.transform = TextTransform::Uppercase;
        let (title, h) = cx.text("title", &cx.record.title, Point::new(pad, y), width, title_style);
        nodes.push(title);
        y += h + 24.0;

        // Subtitle chip: dot + one line of tracked caps.
        let mut chip_style = cx.text_style(14.0, 1.43, FontWeight::Black);
        chip_style.letter_spacing = 0.1;
        chip_style.transform = TextTransform::Uppercase;
        let chars = cx.record.subtitle.chars().count() as f32;
        let text_w = (chars * 14.0 * 0.7).min(width - 48.0);
        let chip_text_h = estimate_text_height(&cx.record.subtitle, &chip_style, text_w)
            .max(20.0);
        let chip = Rect::new(
            (design.width - (text_w + 48.0)) / 2.0,
            y,
            text_w + 48.0,
            chip_text_h + 12.0,
        );
        nodes.push(Node::shape(
            "chip",
            chip,
            solid(Color::white_alpha(0.1))
                .rounded(16.0)
                .stroke(Stroke::new(Color::white_alpha(0.2), 1.0)),
        ));
        nodes.push(pill(
            "chip-dot",
            Rect::new(chip.x + 16.0, chip.center().y - 4.0, 8.0, 8.0),
            Color::rgb(0x4a, 0xde, 0x80),
        ));
        let (subtitle, _) = cx.text(
            "subtitle",
            &cx.record.subtitle,
            Point::new(chip.x + 32.0, chip.y + 6.0),
            text_w,
            chip_style,
        );
        nodes.push(subtitle.with_opacity(0.8));
        y += chip.h + 32.0;

        let stage = Rect::new(pad, y, width, (design.height - pad - y).max(1.0));
        let size = cx.fit_frame(Size::new(width * 0.82, stage.h / 1.1));
        let frame = Rect::centered(stage.center(), size);
        let stage_t = Transform2D::about(stage.center(), &Transform2D::scale(1.1))
            .then(&Transform2D::translate(0.0, 48.0));

        nodes.push(cx.device_frame("device", frame, stage_t));
        nodes.push(star_badge(
            Rect::new(frame.right() - 112.0 + 48.0, frame.y - 48.0, 112.0, 112.0),
            stage_t,
        ));
        Ok(nodes)
    }
}

fn star_badge(rect: Rect, transform: Transform2D) -> Node {
    let disc = Node::shape(
        "badge-disc",
        rect,
        solid(Color::WHITE)
            .radii(CornerRadii::pill(rect.size()))
            .stroke(Stroke::new(SLATE_900, 4.0))
            .shadow(Shadow::new(Color::black_alpha(0.25), 0.0, 25.0, 25.0)),
    );

    let c = rect.center();
    let outer = rect.w * 0.27;
    let inner = outer * 0.4;
    let points: Vec<Point> = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = (-90.0 + 36.0 * i as f32).to_radians();
            Point::new(c.x + r * a.cos(), c.y + r * a.sin())
        })
        .collect();
    let star_bounds = Rect::bounding(&points).unwrap_or(rect);
    let star = Node::new(
        "badge-star",
        star_bounds,
        NodeKind::Polygon {
            points,
            fill: Paint::Solid(SLATE_900),
            stroke: None,
        },
    );

    Node::group("badge", rect, vec![disc, star]).with_transform(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use vantage_studio_model::{default_record, ThemeSettings};

    fn compose(template: TemplateStyle) -> crate::composer::ComposedCanvas {
        let settings = ThemeSettings {
            template,
            ..ThemeSettings::default()
        };
        Composer::new().compose(&settings, &default_record(1)).unwrap()
    }

    #[test]
    fn test_every_template_registered() {
        let styles: Vec<_> = standard_layouts().iter().map(|l| l.style()).collect();
        assert_eq!(styles, TemplateStyle::ALL.to_vec());
    }

    #[test]
    fn test_floating_duo_has_two_frames_of_same_image() {
        let canvas = compose(TemplateStyle::FloatingDuo);
        let back = canvas.root.find("device-back").unwrap();
        let front = canvas.root.find("device-front").unwrap();
        assert!(back.opacity < front.opacity);
        assert_eq!(back.image_sources(), front.image_sources());
    }

    #[test]
    fn test_isometric_device_is_tilted() {
        let canvas = compose(TemplateStyle::Isometric);
        let device = canvas.root.find("device").unwrap();
        assert!(device.transform.ky.abs() > 1e-3 || device.transform.kx.abs() > 1e-3);
    }

    #[test]
    fn test_dynamic_break_has_badge() {
        let canvas = compose(TemplateStyle::DynamicBreak);
        assert!(canvas.root.find("badge-star").is_some());
    }

    #[test]
    fn test_editorial_device_bleeds_into_lower_band() {
        let canvas = compose(TemplateStyle::Editorial);
        let device = canvas.root.find("device").unwrap();
        let paper = canvas.root.find("paper").unwrap();
        let placed = device.transform.map_rect(&device.bounds);
        assert!(placed.y < paper.bounds.y);
        assert!(placed.bottom() > paper.bounds.y);
    }

    #[test]
    fn test_editorial_copy_is_dark_on_paper() {
        let canvas = compose(TemplateStyle::Editorial);
        assert!(ThemeSettings::default().text_color.is_white());
        for (label, expected) in [("title", SLATE_900), ("subtitle", SLATE_500)] {
            match &canvas.root.find(label).unwrap().kind {
                NodeKind::Text(block) => {
                    assert_eq!(block.style.color, expected);
                    assert!(block.style.shadows.is_empty());
                }
                other => panic!("unexpected kind {other:?}"),
            }
        }
        match &canvas.root.find("rule").unwrap().kind {
            NodeKind::Shape(shape) => assert_eq!(shape.fill, Paint::Solid(SLATE_900)),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_bento_panels_are_translucent() {
        let canvas = compose(TemplateStyle::Bento);
        for label in ["device-panel", "copy-panel"] {
            match &canvas.root.find(label).unwrap().kind {
                NodeKind::Shape(shape) => match shape.fill {
                    Paint::Solid(c) => assert!(c.a < 0xff),
                    ref other => panic!("unexpected fill {other:?}"),
                },
                other => panic!("unexpected kind {other:?}"),
            }
        }
    }
}
