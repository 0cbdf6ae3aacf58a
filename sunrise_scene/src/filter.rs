//! Mountain lighting: the `brightness → sepia → saturate` filter chain.
//!
//! [`FilterParams::to_css`] gives the directive a compositor would apply;
//! [`FilterParams::apply`] does the same thing to a single pixel using the
//! Filter Effects color matrices, for software rendering.

use crate::ramp::Rgb;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    /// 0.2 (dark) → 1.0 (unchanged).
    pub brightness: f64,
    /// 0.0 → 0.4.
    pub sepia:      f64,
    /// 1.0 (unchanged) → 2.0.
    pub saturate:   f64,
}

impl FilterParams {
    pub const IDENTITY: FilterParams = FilterParams {
        brightness: 1.0,
        sepia:      0.0,
        saturate:   1.0,
    };

    /// Mountain lighting for a sunrise level.
    pub fn for_level(level: f64) -> Self {
        FilterParams {
            brightness: 0.2 + level * 0.8,
            sepia:      level * 0.4,
            saturate:   1.0 + level * 1.0,
        }
    }

    /// e.g. `brightness(0.6) sepia(0.2) saturate(1.5)`.
    pub fn to_css(&self) -> String {
        format!(
            "brightness({}) sepia({}) saturate({})",
            self.brightness, self.sepia, self.saturate
        )
    }

    /// Run one pixel through the chain, in the same order as the CSS.
    pub fn apply(&self, c: Rgb) -> Rgb {
        let mut px = [c.r as f64 / 255.0, c.g as f64 / 255.0, c.b as f64 / 255.0];

        // brightness
        let k = self.brightness.max(0.0);
        px = clamp3([px[0] * k, px[1] * k, px[2] * k]);

        // sepia
        let a = 1.0 - self.sepia.clamp(0.0, 1.0);
        px = clamp3(mul3(&[
            [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
            [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
            [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
        ], px));

        // saturate
        let s = self.saturate.max(0.0);
        px = clamp3(mul3(&[
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ], px));

        let to_u8 = |v: f64| (v * 255.0).round() as u8;
        Rgb::new(to_u8(px[0]), to_u8(px[1]), to_u8(px[2]))
    }
}

impl Default for FilterParams {
    fn default() -> Self { FilterParams::IDENTITY }
}

fn mul3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn clamp3(v: [f64; 3]) -> [f64; 3] {
    [v[0].clamp(0.0, 1.0), v[1].clamp(0.0, 1.0), v[2].clamp(0.0, 1.0)]
}
