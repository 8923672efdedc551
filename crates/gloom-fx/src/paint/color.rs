use bytemuck::{Pod, Zeroable};

/// Straight-alpha sRGB color, 8 bits per channel.
///
/// Invariant:
/// - memory layout is `r, g, b, a` with alignment 1, so any `&mut [u8]` whose
///   length is a multiple of 4 can be viewed as `&mut [Color]` via `bytemuck`.
///
/// Rationale:
/// - matches the streaming texture format of the target renderer
/// - overlay generators write texels directly into locked texture rows
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Multiplies two 8-bit channels as if they were `[0, 1]` values, rounding
/// to nearest.
#[inline]
pub fn mul_channel(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

/// Quantizes a `[0, 1]` factor to a channel value (NaN reads as 0).
#[inline]
pub fn unit_to_byte(v: f32) -> u8 {
    (crate::coords::clamp_unit(v) * 255.0).round() as u8
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque gray with all color channels set to `v`.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Color channels equal `(255, 255, 255)`; alpha is ignored.
    #[inline]
    pub fn is_white(self) -> bool {
        self.r == 255 && self.g == 255 && self.b == 255
    }

    /// Channel-wise linear interpolation towards `other`.
    ///
    /// `t` is clamped to `[0, 1]`; results round to nearest.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Channel-wise multiply of the color channels; alpha is kept.
    ///
    /// This is the texture color-modulation step of the renderer.
    #[inline]
    pub fn modulate(self, m: Self) -> Self {
        Self {
            r: mul_channel(self.r, m.r),
            g: mul_channel(self.g, m.g),
            b: mul_channel(self.b, m.b),
            a: self.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_channel_identities() {
        assert_eq!(mul_channel(255, 200), 200);
        assert_eq!(mul_channel(0, 200), 0);
        assert_eq!(mul_channel(128, 128), 64);
    }

    #[test]
    fn unit_to_byte_rounds_and_clamps() {
        assert_eq!(unit_to_byte(0.5), 128);
        assert_eq!(unit_to_byte(2.0), 255);
        assert_eq!(unit_to_byte(f32::NAN), 0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Color::rgb(0, 100, 200);
        let b = Color::rgb(255, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(128, 100, 100));
    }

    #[test]
    fn lerp_clamps_t() {
        let a = Color::BLACK;
        let b = Color::WHITE;
        assert_eq!(a.lerp(b, 4.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, f32::NAN), a);
    }

    #[test]
    fn modulate_by_white_is_identity() {
        let c = Color::rgba(12, 34, 56, 78);
        assert_eq!(c.modulate(Color::WHITE), c);
    }

    #[test]
    fn byte_rows_cast_to_texels() {
        let mut bytes = [0u8; 8];
        let texels: &mut [Color] = bytemuck::cast_slice_mut(&mut bytes);
        texels[1] = Color::rgba(1, 2, 3, 4);
        assert_eq!(bytes, [0, 0, 0, 0, 1, 2, 3, 4]);
    }
}
