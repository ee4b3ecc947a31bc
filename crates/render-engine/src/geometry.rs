//! Rectangles, points, and corner radii in layout units.
//!
//! Layout happens in design units; the canvas root scales them to device
//! pixels. All coordinates are `f32` to match the rasterizer.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest size with this aspect that fits inside `bounds`.
    pub fn fit_within(&self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Size::default();
        }
        let scale = (bounds.width / self.width).min(bounds.height / self.height);
        Size::new(self.width * scale, self.height * scale)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Create a rectangle; negative extents collapse to zero.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Rectangle of `size` centered on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        self.inset_xy(amount, amount)
    }

    pub fn inset_xy(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w - 2.0 * dx, self.h - 2.0 * dy)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Smallest rectangle covering all points. `None` for an empty slice.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Per-corner radii, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    pub const ZERO: CornerRadii = CornerRadii::uniform(0.0);

    pub const fn uniform(r: f32) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// Only the bottom corners are rounded.
    pub const fn bottom(r: f32) -> Self {
        Self {
            top_left: 0.0,
            top_right: 0.0,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// Fully rounded ends for a rectangle of the given size.
    pub fn pill(size: Size) -> Self {
        Self::uniform(size.width.min(size.height) / 2.0)
    }

    /// Radii scaled down so adjacent corners never overlap inside `rect`.
    pub fn clamped_to(&self, rect: &Rect) -> Self {
        let limit = rect.w.min(rect.h) / 2.0;
        let clamp = |r: f32| r.clamp(0.0, limit);
        Self {
            top_left: clamp(self.top_left),
            top_right: clamp(self.top_right),
            bottom_right: clamp(self.bottom_right),
            bottom_left: clamp(self.bottom_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let inner = r.inset(5.0);
        assert_eq!(inner, Rect::new(15.0, 25.0, 90.0, 40.0));
        assert_eq!(inner.center(), r.center());
    }

    #[test]
    fn test_inset_never_goes_negative() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0).inset(10.0);
        assert!(r.is_empty());
        assert_eq!(r.w, 0.0);
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        let device = Size::new(1320.0, 2868.0);
        let fitted = device.fit_within(Size::new(300.0, 300.0));
        assert!((fitted.height - 300.0).abs() < 1e-3);
        assert!((fitted.width / fitted.height - 1320.0 / 2868.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_rect() {
        let pts = [
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(
            Rect::bounding(&pts).unwrap(),
            Rect::new(-2.0, -1.0, 5.0, 5.0)
        );
        assert!(Rect::bounding(&[]).is_none());
    }

    #[test]
    fn test_radii_clamp() {
        let r = CornerRadii::uniform(80.0).clamped_to(&Rect::new(0.0, 0.0, 100.0, 60.0));
        assert_eq!(r, CornerRadii::uniform(30.0));
        assert_eq!(CornerRadii::pill(Size::new(40.0, 10.0)).top_left, 5.0);
    }
}
