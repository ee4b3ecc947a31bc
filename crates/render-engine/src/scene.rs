//! Retained scene graph produced by composition and consumed by rasterizers.
//!
//! A scene is plain data: nodes carry geometry in their own local space and
//! an affine transform into their parent's space. Nothing here draws.

use std::borrow::Cow;

use vantage_studio_model::{Color, ImageSource};

use crate::geometry::{CornerRadii, Point, Rect};

/// 2D affine transform.
///
/// Maps `(x, y)` to `(sx*x + kx*y + tx, ky*x + sy*y + ty)`, the same
/// row layout `tiny_skia::Transform::from_row` takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub sx: f32,
    pub ky: f32,
    pub kx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        sx: 1.0,
        ky: 0.0,
        kx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self {
            sx,
            sy,
            ..Self::IDENTITY
        }
    }

    /// Clockwise rotation on screen (y grows downward), like CSS `rotate()`.
    pub fn rotate_deg(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            sx: cos,
            ky: sin,
            kx: -sin,
            sy: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Horizontal shear, like CSS `skewX()`.
    pub fn skew_x_deg(degrees: f32) -> Self {
        Self {
            kx: degrees.to_radians().tan(),
            ..Self::IDENTITY
        }
    }

    /// `rotateX(rx) rotateZ(rz)` flattened with an orthographic projection.
    ///
    /// The Z rotation is applied first, then the X tilt foreshortens the
    /// vertical axis by `cos(rx)`.
    pub fn isometric(rotate_x_deg: f32, rotate_z_deg: f32) -> Self {
        let (sin_z, cos_z) = rotate_z_deg.to_radians().sin_cos();
        let cos_x = rotate_x_deg.to_radians().cos();
        Self {
            sx: cos_z,
            ky: sin_z * cos_x,
            kx: -sin_z,
            sy: cos_z * cos_x,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Transform2D) -> Self {
        Self {
            sx: next.sx * self.sx + next.kx * self.ky,
            ky: next.ky * self.sx + next.sy * self.ky,
            kx: next.sx * self.kx + next.kx * self.sy,
            sy: next.ky * self.kx + next.sy * self.sy,
            tx: next.sx * self.tx + next.kx * self.ty + next.tx,
            ty: next.ky * self.tx + next.sy * self.ty + next.ty,
        }
    }

    /// Apply `transform` around `origin` instead of around `(0, 0)`.
    pub fn about(origin: Point, transform: &Transform2D) -> Self {
        Self::translate(-origin.x, -origin.y)
            .then(transform)
            .then(&Self::translate(origin.x, origin.y))
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    /// Axis-aligned bounds of a transformed rectangle.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|c| self.map_point(c));
        Rect::bounding(&corners).unwrap_or_default()
    }

    pub fn determinant(&self) -> f32 {
        self.sx * self.sy - self.kx * self.ky
    }

    /// Geometric-mean scale factor.
    pub fn average_scale(&self) -> f32 {
        self.determinant().abs().sqrt()
    }

    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        let sx = self.sy / det;
        let ky = -self.ky / det;
        let kx = -self.kx / det;
        let sy = self.sx / det;
        Some(Self {
            sx,
            ky,
            kx,
            sy,
            tx: -(sx * self.tx + kx * self.ty),
            ty: -(ky * self.tx + sy * self.ty),
        })
    }
}

/// One color stop of a gradient, `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// How a region is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// CSS `linear-gradient(angle, ...)` over the node bounds: 0° points up,
    /// 90° points right, and the gradient line spans the box corners.
    LinearGradient {
        angle: f32,
        stops: Vec<GradientStop>,
    },
    /// Circular gradient. `center` is relative to the bounds; `radius` is
    /// relative to the longer side.
    RadialGradient {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    pub fn linear(angle: f32, from: Color, to: Color) -> Self {
        Paint::LinearGradient {
            angle,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        }
    }

    /// Same paint with every color's alpha scaled by `opacity`.
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let fade = |stops: &[GradientStop]| {
            stops
                .iter()
                .map(|s| GradientStop::new(s.offset, s.color.with_opacity(opacity)))
                .collect()
        };
        match self {
            Paint::Solid(c) => Paint::Solid(c.with_opacity(opacity)),
            Paint::LinearGradient { angle, stops } => Paint::LinearGradient {
                angle: *angle,
                stops: fade(stops),
            },
            Paint::RadialGradient {
                center,
                radius,
                stops,
            } => Paint::RadialGradient {
                center: *center,
                radius: *radius,
                stops: fade(stops),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Soft drop shadow. `blur` is the box-blur radius in local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub offset: Point,
    pub blur: f32,
}

impl Shadow {
    pub const fn new(color: Color, dx: f32, dy: f32, blur: f32) -> Self {
        Self {
            color,
            offset: Point::new(dx, dy),
            blur,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    SemiBold,
    Bold,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
}

/// Typography parameters. Sizes are in local units.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    /// Multiple of `size`.
    pub line_height: f32,
    pub weight: FontWeight,
    pub italic: bool,
    /// Extra advance per glyph, in em.
    pub letter_spacing: f32,
    pub align: TextAlign,
    pub transform: TextTransform,
    pub color: Color,
    /// Drawn beneath the glyphs, first entry lowest.
    pub shadows: Vec<Shadow>,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            line_height: 1.2,
            weight: FontWeight::Regular,
            italic: false,
            letter_spacing: 0.0,
            align: TextAlign::Left,
            transform: TextTransform::None,
            color,
            shadows: Vec::new(),
        }
    }
}

/// A run of wrapped text inside a node's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Exactly as authored. Case transforms are applied when drawing.
    pub content: String,
    pub style: TextStyle,
}

impl TextBlock {
    /// The string that actually gets drawn.
    pub fn rendered(&self) -> Cow<'_, str> {
        match self.style.transform {
            TextTransform::None => Cow::Borrowed(&self.content),
            TextTransform::Uppercase => Cow::Owned(self.content.to_uppercase()),
        }
    }
}

/// A filled, optionally stroked rounded rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub radii: CornerRadii,
    pub fill: Paint,
    pub stroke: Option<Stroke>,
    pub shadow: Option<Shadow>,
    /// Softens the fill itself (CSS `filter: blur`), in local units.
    pub blur: f32,
}

impl ShapeNode {
    pub fn new(fill: Paint) -> Self {
        Self {
            radii: CornerRadii::ZERO,
            fill,
            stroke: None,
            shadow: None,
            blur: 0.0,
        }
    }

    pub fn radii(mut self, radii: CornerRadii) -> Self {
        self.radii = radii;
        self
    }

    pub fn rounded(self, r: f32) -> Self {
        self.radii(CornerRadii::uniform(r))
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn blur(mut self, radius: f32) -> Self {
        self.blur = radius;
        self
    }
}

/// Whether a node can be the target of pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
    #[default]
    Auto,
    /// Pass-through: hit testing skips the node and its subtree.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Children drawn in order, optionally clipped to the rounded bounds.
    Group {
        clip: Option<CornerRadii>,
        children: Vec<Node>,
    },
    Shape(ShapeNode),
    Text(TextBlock),
    /// Raster content, cover-fitted into the bounds.
    Image {
        source: ImageSource,
        radii: CornerRadii,
    },
    /// Closed polygon in local coordinates.
    Polygon {
        points: Vec<Point>,
        fill: Paint,
        stroke: Option<Stroke>,
    },
    /// Inset edge darkening, fading to transparent over `width`.
    Vignette { color: Color, width: f32 },
}

/// One element of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    /// Geometry in local coordinates.
    pub bounds: Rect,
    /// Local to parent.
    pub transform: Transform2D,
    pub opacity: f32,
    pub pointer_events: PointerEvents,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(label: impl Into<String>, bounds: Rect, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            bounds,
            transform: Transform2D::IDENTITY,
            opacity: 1.0,
            pointer_events: PointerEvents::Auto,
            kind,
        }
    }

    pub fn group(label: impl Into<String>, bounds: Rect, children: Vec<Node>) -> Self {
        Self::new(
            label,
            bounds,
            NodeKind::Group {
                clip: None,
                children,
            },
        )
    }

    pub fn clipped_group(
        label: impl Into<String>,
        bounds: Rect,
        radii: CornerRadii,
        children: Vec<Node>,
    ) -> Self {
        Self::new(
            label,
            bounds,
            NodeKind::Group {
                clip: Some(radii),
                children,
            },
        )
    }

    pub fn shape(label: impl Into<String>, bounds: Rect, shape: ShapeNode) -> Self {
        Self::new(label, bounds, NodeKind::Shape(shape))
    }

    pub fn text(label: impl Into<String>, bounds: Rect, block: TextBlock) -> Self {
        Self::new(label, bounds, NodeKind::Text(block))
    }

    pub fn image(
        label: impl Into<String>,
        bounds: Rect,
        source: ImageSource,
        radii: CornerRadii,
    ) -> Self {
        Self::new(label, bounds, NodeKind::Image { source, radii })
    }

    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn pass_through(mut self) -> Self {
        self.pointer_events = PointerEvents::None;
        self
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Group { children, .. } => children,
            _ => &[],
        }
    }

    /// Pre-order traversal.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// First node in pre-order with the given label.
    pub fn find(&self, label: &str) -> Option<&Node> {
        let mut found = None;
        self.visit(&mut |n| {
            if found.is_none() && n.label == label {
                found = Some(n);
            }
        });
        found
    }

    /// Every image referenced by the subtree, in draw order.
    pub fn image_sources(&self) -> Vec<&ImageSource> {
        let mut sources = Vec::new();
        self.visit(&mut |n| {
            if let NodeKind::Image { source, .. } = &n.kind {
                sources.push(source);
            }
        });
        sources
    }

    /// Every text block in draw order.
    pub fn text_blocks(&self) -> Vec<&TextBlock> {
        let mut blocks = Vec::new();
        self.visit(&mut |n| {
            if let NodeKind::Text(block) = &n.kind {
                blocks.push(block);
            }
        });
        blocks
    }

    /// Topmost node under `point` (given in the parent's space) that accepts
    /// pointer input.
    ///
    /// Pass-through subtrees and fully transparent nodes are skipped; clipped
    /// groups only hit inside their clip.
    pub fn hit_test(&self, point: Point) -> Option<&Node> {
        if self.pointer_events == PointerEvents::None || self.opacity <= 0.0 {
            return None;
        }
        let local = self.transform.invert()?.map_point(point);

        match &self.kind {
            NodeKind::Group { clip, children } => {
                if clip.is_some() && !self.bounds.contains(local) {
                    return None;
                }
                children.iter().rev().find_map(|c| c.hit_test(local))
            }
            _ => self.bounds.contains(local).then_some(self),
        }
    }
}
