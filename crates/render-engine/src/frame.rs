//! Device frame renderer.
//!
//! Builds the layered shell of a physical device around screen content:
//! drop shadow, metal chassis with chamfer highlight, hardware buttons and
//! antenna bands (phones only), bezel, screen, sensor island, status bar,
//! vignette and gloss.
//!
//! Frames are built in device-native pixel units with the chassis occupying
//! `(0, 0, pixel_width, pixel_height)`. Templates scale them into place.

use vantage_studio_model::{Color, DeviceFinish, DeviceProfile, ImageSource};

use crate::geometry::{CornerRadii, Point, Rect, Size};
use crate::scene::{
    FontWeight, GradientStop, Node, NodeKind, Paint, Shadow, ShapeNode, Stroke, TextAlign,
    TextBlock, TextStyle, Transform2D,
};

/// Label of the node holding the user's screen image.
pub const SCREEN_CONTENT_LABEL: &str = "screen-content";

/// Per-render toggles for optional frame layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    pub show_gloss: bool,
    pub status_bar: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            show_gloss: true,
            status_bar: false,
        }
    }
}

/// Fixed material colors for one finish.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishPalette {
    /// Vertical chassis gradient, top to bottom.
    pub frame: [Color; 3],
    pub bezel: Color,
    /// Chamfer highlight along the outer edge.
    pub edge: Color,
    pub shadow: Color,
    pub button: Color,
}

pub fn finish_palette(finish: DeviceFinish) -> FinishPalette {
    match finish {
        DeviceFinish::Titanium => FinishPalette {
            frame: [
                Color::rgb(0xb8, 0xb8, 0xb8),
                Color::rgb(0x8c, 0x8c, 0x8c),
                Color::rgb(0x70, 0x70, 0x70),
            ],
            bezel: Color::rgb(0x0a, 0x0a, 0x0a),
            edge: Color::rgba(0xff, 0xff, 0xff, 0x20),
            shadow: Color::black_alpha(0.4),
            button: Color::rgb(0x88, 0x88, 0x88),
        },
        DeviceFinish::SpaceBlack => FinishPalette {
            frame: [
                Color::rgb(0x2c, 0x2c, 0x2c),
                Color::rgb(0x15, 0x15, 0x15),
                Color::rgb(0x00, 0x00, 0x00),
            ],
            bezel: Color::rgb(0x02, 0x02, 0x02),
            edge: Color::rgba(0xff, 0xff, 0xff, 0x10),
            shadow: Color::black_alpha(0.6),
            button: Color::rgb(0x33, 0x33, 0x33),
        },
        DeviceFinish::Silver => FinishPalette {
            frame: [
                Color::rgb(0xf8, 0xf8, 0xf8),
                Color::rgb(0xd1, 0xd1, 0xd1),
                Color::rgb(0xbe, 0xbe, 0xbe),
            ],
            bezel: Color::rgb(0x0d, 0x0d, 0x0d),
            edge: Color::rgba(0xff, 0xff, 0xff, 0x40),
            shadow: Color::black_alpha(0.3),
            button: Color::rgb(0xdd, 0xdd, 0xdd),
        },
    }
}

/// Derived shell dimensions, in native pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub size: Size,
    pub frame_thickness: f32,
    pub bezel: f32,
    pub outer_radius: f32,
    pub mid_radius: f32,
    pub screen_radius: f32,
    /// Region inside the bezel that carries content.
    pub screen: Rect,
}

impl FrameGeometry {
    /// Nested radii are derived from the screen outward, so
    /// `outer > mid > screen >= 0` holds even for square-cornered screens.
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        let width = profile.pixel_width as f32;
        let height = profile.pixel_height as f32;
        let frame_thickness = (width * 0.012).round().max(8.0);
        let bezel = (profile.bezel_width as f32).max(1.0);

        let screen_radius = profile.corner_radius as f32;
        let mid_radius = screen_radius + bezel;
        let outer_radius = mid_radius + frame_thickness;

        let inset = frame_thickness + bezel;
        Self {
            size: Size::new(width, height),
            frame_thickness,
            bezel,
            outer_radius,
            mid_radius,
            screen_radius,
            screen: Rect::from_size(Size::new(width, height)).inset(inset),
        }
    }

    pub fn chassis(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn bezel_rect(&self) -> Rect {
        self.chassis().inset(self.frame_thickness)
    }
}

/// Build the device frame node around `content`.
pub fn render_device_frame(
    profile: &DeviceProfile,
    finish: DeviceFinish,
    text_color: Color,
    content: ImageSource,
    options: &FrameOptions,
) -> Node {
    let geo = FrameGeometry::for_profile(profile);
    let palette = finish_palette(finish);
    let w = geo.size.width;
    let h = geo.size.height;

    let mut layers = Vec::new();

    if !profile.is_tablet {
        layers.extend(hardware_buttons(&geo, &palette));
    }

    layers.push(Node::shape(
        "chassis",
        geo.chassis(),
        ShapeNode::new(Paint::LinearGradient {
            angle: 180.0,
            stops: vec![
                GradientStop::new(0.0, palette.frame[0]),
                GradientStop::new(0.5, palette.frame[1]),
                GradientStop::new(1.0, palette.frame[2]),
            ],
        })
        .rounded(geo.outer_radius)
        .stroke(Stroke::new(palette.edge, geo.frame_thickness / 3.0))
        .shadow(Shadow::new(palette.shadow, 0.0, w * 0.09, w * 0.09)),
    ));

    if !profile.is_tablet {
        let band = (w * 0.003).max(1.0);
        for (label, y) in [("antenna-top", h * 0.08), ("antenna-bottom", h * 0.92 - band)] {
            layers.push(Node::shape(
                label,
                Rect::new(0.0, y, w, band),
                ShapeNode::new(Paint::Solid(Color::black_alpha(0.1))),
            ));
        }
    }

    layers.push(Node::shape(
        "bezel",
        geo.bezel_rect(),
        ShapeNode::new(Paint::Solid(palette.bezel))
            .rounded(geo.mid_radius)
            .stroke(Stroke::new(Color::white_alpha(0.05), (w * 0.002).max(1.0))),
    ));

    layers.push(screen_group(profile, &geo, text_color, content, options));

    Node::group("device-frame", geo.chassis(), layers)
}

fn hardware_buttons(geo: &FrameGeometry, palette: &FinishPalette) -> Vec<Node> {
    let w = geo.size.width;
    let h = geo.size.height;
    let button_w = w * 0.009;
    let protrude = w * 0.012;
    let radius = CornerRadii::uniform(button_w / 2.0);

    // (label, left side, top fraction, height fraction)
    let specs = [
        ("button-action", true, 0.14, 0.03),
        ("button-volume-up", true, 0.20, 0.06),
        ("button-volume-down", true, 0.27, 0.06),
        ("button-power", false, 0.23, 0.10),
    ];

    specs
        .into_iter()
        .map(|(label, left, top, height)| {
            let x = if left { -protrude } else { w - button_w };
            Node::shape(
                label,
                Rect::new(x, h * top, button_w + protrude, h * height),
                ShapeNode::new(Paint::Solid(palette.button))
                    .radii(radius)
                    .shadow(Shadow::new(Color::black_alpha(0.25), 0.0, 1.0, button_w / 2.0)),
            )
        })
        .collect()
}

fn screen_group(
    profile: &DeviceProfile,
    geo: &FrameGeometry,
    text_color: Color,
    content: ImageSource,
    options: &FrameOptions,
) -> Node {
    let screen = geo.screen;
    let radii = CornerRadii::uniform(geo.screen_radius);
    let mut children = vec![
        Node::shape(
            "screen-backdrop",
            screen,
            ShapeNode::new(Paint::Solid(Color::BLACK)),
        ),
        Node::image(SCREEN_CONTENT_LABEL, screen, content, radii),
    ];

    if profile.has_notch {
        children.push(sensor_island(&screen));
    }

    if options.status_bar {
        children.push(status_bar(&screen, profile.has_notch, text_color));
    }

    children.push(
        Node::new(
            "vignette",
            screen,
            NodeKind::Vignette {
                color: Color::black_alpha(0.6),
                width: screen.w * 0.025,
            },
        )
        .pass_through(),
    );

    if options.show_gloss {
        children.push(gloss(&screen));
    }

    Node::clipped_group("screen", screen, radii, children)
}

fn sensor_island(screen: &Rect) -> Node {
    let size = Size::new(screen.w * 0.26, screen.h * 0.034);
    let bounds = Rect::new(
        screen.center().x - size.width / 2.0,
        screen.y + screen.h * 0.025,
        size.width,
        size.height,
    );
    let lens_d = size.height * 0.45;
    let lens = Rect::new(
        bounds.right() - size.height / 2.0 - lens_d / 2.0,
        bounds.center().y - lens_d / 2.0,
        lens_d,
        lens_d,
    );
    let pill = Node::shape(
        "sensor-island-body",
        bounds,
        ShapeNode::new(Paint::Solid(Color::BLACK))
            .radii(CornerRadii::pill(size))
            .stroke(Stroke::new(Color::white_alpha(0.05), 1.0)),
    );
    let camera = Node::shape(
        "sensor-island-lens",
        lens,
        ShapeNode::new(Paint::RadialGradient {
            center: Point::new(0.5, 0.5),
            radius: 0.5,
            stops: vec![
                GradientStop::new(0.0, Color::rgba(0x63, 0x66, 0xf1, 0x1a)),
                GradientStop::new(1.0, Color::rgb(0x08, 0x08, 0x08)),
            ],
        })
        .radii(CornerRadii::pill(lens.size())),
    );
    Node::group("sensor-island", bounds, vec![pill, camera])
}

fn status_bar(screen: &Rect, has_notch: bool, color: Color) -> Node {
    let bar_h = screen.h * 0.045;
    let bar = Rect::new(screen.x, screen.y, screen.w, bar_h);
    let pad = screen.w * 0.07;
    let font = bar_h * 0.42;
    let baseline_top = screen.y + (bar_h - font * 1.2) / 2.0 + if has_notch { bar_h * 0.1 } else { 0.0 };

    let mut clock_style = TextStyle::new(font, color);
    clock_style.weight = FontWeight::SemiBold;
    clock_style.align = TextAlign::Left;
    let clock = Node::text(
        "status-clock",
        Rect::new(bar.x + pad, baseline_top, screen.w * 0.2, font * 1.2),
        TextBlock {
            content: "9:41".to_string(),
            style: clock_style,
        },
    );

    let mut children = vec![clock];

    // Signal bars, rising left to right.
    let glyph_h = font * 0.8;
    let bar_w = glyph_h * 0.22;
    let gap = bar_w * 0.6;
    let battery_w = glyph_h * 2.0;
    let right = bar.right() - pad;
    let signal_right = right - battery_w - gap * 4.0;
    let glyph_bottom = baseline_top + font * 1.05;
    for i in 0..4 {
        let bh = glyph_h * (0.4 + 0.2 * i as f32);
        let x = signal_right - (4 - i) as f32 * (bar_w + gap);
        children.push(Node::shape(
            format!("status-signal-{i}"),
            Rect::new(x, glyph_bottom - bh, bar_w, bh),
            ShapeNode::new(Paint::Solid(color)).rounded(bar_w / 3.0),
        ));
    }

    let battery = Rect::new(right - battery_w, glyph_bottom - glyph_h, battery_w, glyph_h);
    children.push(Node::shape(
        "status-battery",
        battery,
        ShapeNode::new(Paint::Solid(Color::TRANSPARENT))
            .rounded(glyph_h * 0.25)
            .stroke(Stroke::new(color.with_opacity(0.5), glyph_h * 0.1)),
    ));
    children.push(Node::shape(
        "status-battery-level",
        battery.inset(glyph_h * 0.18),
        ShapeNode::new(Paint::Solid(color)).rounded(glyph_h * 0.12),
    ));

    Node::group("status-bar", bar, children).pass_through()
}

fn gloss(screen: &Rect) -> Node {
    let upper = Rect::new(
        screen.x - screen.w * 0.2,
        screen.y,
        screen.w,
        screen.h * 0.3,
    );
    let lower = Rect::new(
        screen.right() - screen.w * 0.5,
        screen.bottom() - screen.h * 0.2,
        screen.w * 0.6,
        screen.h * 0.2,
    );
    let soften = screen.w * 0.01;

    let upper_node = Node::shape(
        "gloss-upper",
        upper,
        ShapeNode::new(Paint::linear(135.0, Color::white_alpha(0.2), Color::TRANSPARENT))
            .blur(soften),
    )
    .with_transform(Transform2D::about(upper.center(), &Transform2D::rotate_deg(-12.0)));

    let lower_node = Node::shape(
        "gloss-lower",
        lower,
        ShapeNode::new(Paint::linear(315.0, Color::white_alpha(0.1), Color::TRANSPARENT))
            .blur(soften),
    )
    .with_transform(Transform2D::about(lower.center(), &Transform2D::rotate_deg(10.0)));

    Node::group("gloss", *screen, vec![upper_node, lower_node])
        .with_opacity(0.4)
        .pass_through()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_studio_model::{all_profiles, DeviceId};

    fn frame_for(id: DeviceId, options: FrameOptions) -> Node {
        let profile = id.profile().unwrap();
        render_device_frame(
            profile,
            DeviceFinish::Titanium,
            Color::WHITE,
            ImageSource::Placeholder { seed: 1 },
            &options,
        )
    }

    #[test]
    fn test_radii_shrink_inward() {
        for profile in all_profiles() {
            let geo = FrameGeometry::for_profile(profile);
            assert!(geo.outer_radius > geo.mid_radius, "{}", profile.display_name);
            assert!(geo.mid_radius > geo.screen_radius, "{}", profile.display_name);
            assert!(geo.screen_radius >= 0.0);
        }
    }

    #[test]
    fn test_profile_radius_is_the_screen_radius() {
        for profile in all_profiles() {
            let geo = FrameGeometry::for_profile(profile);
            assert_eq!(geo.screen_radius, profile.corner_radius as f32);
            assert_eq!(geo.outer_radius, geo.screen_radius + geo.bezel + geo.frame_thickness);
        }
        let square = FrameGeometry::for_profile(DeviceId::Iphone8Plus.profile().unwrap());
        assert_eq!(square.screen_radius, 0.0);
    }

    #[test]
    fn test_screen_sits_inside_bezel() {
        let geo = FrameGeometry::for_profile(DeviceId::Pixel9Pro.profile().unwrap());
        let bezel = geo.bezel_rect();
        assert!(geo.screen.x > bezel.x && geo.screen.right() < bezel.right());
        assert_eq!(geo.chassis().size(), Size::new(1344.0, 2992.0));
    }

    #[test]
    fn test_tablets_have_no_buttons() {
        let ipad = frame_for(DeviceId::IpadPro129, FrameOptions::default());
        assert!(ipad.find("button-power").is_none());
        assert!(ipad.find("antenna-top").is_none());

        let pixel = frame_for(DeviceId::Pixel9Pro, FrameOptions::default());
        assert!(pixel.find("button-power").is_some());
        assert!(pixel.find("antenna-top").is_some());
    }

    #[test]
    fn test_sensor_island_follows_profile_flag() {
        for id in DeviceId::ALL {
            let frame = frame_for(id, FrameOptions::default());
            let expected = id.profile().unwrap().has_notch;
            assert_eq!(frame.find("sensor-island").is_some(), expected, "{id}");
        }
    }

    #[test]
    fn test_optional_layers() {
        let plain = frame_for(
            DeviceId::Iphone16ProMax,
            FrameOptions {
                show_gloss: false,
                status_bar: false,
            },
        );
        assert!(plain.find("gloss").is_none());
        assert!(plain.find("status-bar").is_none());

        let full = frame_for(
            DeviceId::Iphone16ProMax,
            FrameOptions {
                show_gloss: true,
                status_bar: true,
            },
        );
        assert!(full.find("gloss").is_some());
        let clock = full.find("status-clock").unwrap();
        match &clock.kind {
            NodeKind::Text(block) => assert_eq!(block.style.color, Color::WHITE),
            other => panic!("unexpected clock node {other:?}"),
        }
    }

    #[test]
    fn test_decorations_pass_pointer_through_to_content() {
        let frame = frame_for(
            DeviceId::Iphone15ProMax,
            FrameOptions {
                show_gloss: true,
                status_bar: true,
            },
        );
        let geo = FrameGeometry::for_profile(DeviceId::Iphone15ProMax.profile().unwrap());
        // Below the sensor island, where gloss and vignette overlap content.
        let probe = Point::new(geo.screen.x + geo.screen.w * 0.3, geo.screen.y + geo.screen.h * 0.1);
        let hit = frame.hit_test(probe).unwrap();
        assert_eq!(hit.label, SCREEN_CONTENT_LABEL);
    }

    #[test]
    fn test_every_finish_has_distinct_palette() {
        let palettes: Vec<_> = DeviceFinish::ALL.iter().map(|f| finish_palette(*f)).collect();
        assert_ne!(palettes[0], palettes[1]);
        assert_ne!(palettes[1], palettes[2]);
    }
}
