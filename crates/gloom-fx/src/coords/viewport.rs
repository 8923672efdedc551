use glam::Vec2;

use super::Rect;

/// Render target size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn area(self) -> f32 {
        self.width as f32 * self.height as f32
    }

    #[inline]
    pub fn min_dim(self) -> u32 {
        self.width.min(self.height)
    }

    /// Pixel center of the viewport (`(w/2, h/2)`).
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    /// Full-viewport rectangle.
    #[inline]
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Reduced-resolution size used for cheap backing textures.
    ///
    /// Each axis is divided by `divisor` and raised to at least `floor`
    /// (and never below 1).
    #[inline]
    pub fn reduced(self, divisor: u32, floor: u32) -> Self {
        let divisor = divisor.max(1);
        let floor = floor.max(1);
        Self {
            width: (self.width / divisor).max(floor),
            height: (self.height / divisor).max(floor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_divides_each_axis() {
        let v = Viewport::new(960, 544).reduced(2, 1);
        assert_eq!(v, Viewport::new(480, 272));
    }

    #[test]
    fn reduced_respects_floor() {
        let v = Viewport::new(120, 90).reduced(3, 64);
        assert_eq!(v, Viewport::new(64, 64));
    }

    #[test]
    fn reduced_never_reaches_zero() {
        let v = Viewport::new(1, 1).reduced(4, 0);
        assert_eq!(v, Viewport::new(1, 1));
    }

    #[test]
    fn zero_axis_is_invalid() {
        assert!(!Viewport::new(0, 10).is_valid());
        assert!(Viewport::new(1, 1).is_valid());
    }
}
