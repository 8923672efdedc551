use glam::Vec2;

use super::Viewport;

/// Axis-aligned rectangle in screen pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Integer pixel span of a rectangle clipped to a target: `[x0, x1) × [y0, y1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelSpan {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of side `side` centered on `center`.
    #[inline]
    pub fn square_at(center: Vec2, side: f32) -> Self {
        let half = side * 0.5;
        Self::new(center.x - half, center.y - half, side, side)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let lo = self.origin.min(self.origin + self.size);
        let hi = self.origin.max(self.origin + self.size);
        Self::from_min_max(lo, hi)
    }

    #[inline]
    fn from_min_max(lo: Vec2, hi: Vec2) -> Self {
        Self { origin: lo, size: hi - lo }
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x < (r.origin.x + r.size.x)
            && p.y < (r.origin.y + r.size.y)
    }

    /// Returns the rectangle grown by `margin` on every side.
    #[inline]
    pub fn inflate(self, margin: f32) -> Self {
        Self::new(
            self.origin.x - margin,
            self.origin.y - margin,
            self.size.x + 2.0 * margin,
            self.size.y + 2.0 * margin,
        )
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let lo = a.min().max(b.min());
        let hi = a.max().min(b.max());

        if hi.x <= lo.x || hi.y <= lo.y {
            None
        } else {
            Some(Self::from_min_max(lo, hi))
        }
    }

    /// Converts to whole pixels clipped to `target`.
    ///
    /// Edges round to the nearest pixel boundary. Returns `None` if nothing
    /// of the rectangle covers a pixel of the target.
    pub fn pixel_span(self, target: Viewport) -> Option<PixelSpan> {
        if !self.is_finite() {
            return None;
        }
        let clip = self.intersect(target.rect())?;
        let lo = clip.min().round();
        let hi = clip.max().round();

        let span = PixelSpan {
            x0: (lo.x.max(0.0) as u32).min(target.width),
            y0: (lo.y.max(0.0) as u32).min(target.height),
            x1: (hi.x.max(0.0) as u32).min(target.width),
            y1: (hi.y.max(0.0) as u32).min(target.height),
        };

        if span.x1 <= span.x0 || span.y1 <= span.y0 { None } else { Some(span) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let n = r(10.0, 0.0, -4.0, 5.0).normalized();
        assert_eq!(n.origin.x, 6.0);
        assert_eq!(n.size.x, 4.0);
    }

    // ── contains / square_at ──────────────────────────────────────────────

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn square_is_centered() {
        let sq = Rect::square_at(Vec2::new(10.0, 20.0), 4.0);
        assert_eq!(sq, r(8.0, 18.0, 4.0, 4.0));
    }

    #[test]
    fn inflate_grows_every_side() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).inflate(2.0), r(-2.0, -2.0, 14.0, 14.0));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0)).unwrap();
        assert_eq!(i, r(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 10.0, 10.0)).is_none());
    }

    // ── pixel_span ────────────────────────────────────────────────────────

    #[test]
    fn pixel_span_clips_to_target() {
        let span = r(-3.0, 2.0, 8.0, 4.0).pixel_span(Viewport::new(4, 4)).unwrap();
        assert_eq!(span, PixelSpan { x0: 0, y0: 2, x1: 4, y1: 4 });
    }

    #[test]
    fn pixel_span_outside_target_is_none() {
        assert!(r(50.0, 50.0, 2.0, 2.0).pixel_span(Viewport::new(10, 10)).is_none());
    }

    #[test]
    fn pixel_span_sub_pixel_rect_is_none() {
        assert!(r(1.1, 1.1, 0.2, 0.2).pixel_span(Viewport::new(10, 10)).is_none());
    }

    #[test]
    fn pixel_span_rejects_nan() {
        assert!(r(f32::NAN, 0.0, 2.0, 2.0).pixel_span(Viewport::new(10, 10)).is_none());
    }
}
