//! Piecewise-linear color ramps.

// ════════════════════════════════════════════════════════════════════════════
// Rgb
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Unpack the low 24 bits of a packed `0xAARRGGBB` pixel.
    pub const fn from_argb(argb: u32) -> Self {
        Rgb {
            r: ((argb >> 16) & 0xFF) as u8,
            g: ((argb >>  8) & 0xFF) as u8,
            b: ( argb        & 0xFF) as u8,
        }
    }

    /// Packed opaque `0xFFRRGGBB`, the framebuffer pixel format.
    pub const fn to_argb(self) -> u32 {
        0xFF000000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// CSS functional notation, e.g. `rgb(10, 10, 40)`.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ColorStop / SKY_RAMP
// ════════════════════════════════════════════════════════════════════════════

/// One keyframe of a ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub pos: f64,
    pub r:   u8,
    pub g:   u8,
    pub b:   u8,
}

impl ColorStop {
    pub const fn new(pos: f64, r: u8, g: u8, b: u8) -> Self {
        ColorStop { pos, r, g, b }
    }

    pub const fn color(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Night → pale sky → red dawn → orange sunrise.
pub const SKY_RAMP: [ColorStop; 4] = [
    ColorStop::new(0.0,  10,  10,  40),  // dark blue
    ColorStop::new(0.7,  80, 120, 150),  // pale sky blue
    ColorStop::new(0.8, 220,  50,  50),  // red
    ColorStop::new(1.0, 255,  80,   0),  // orange
];

/// Sample a ramp at `t`.
///
/// The first adjacent pair with `pos[i] <= t <= pos[i+1]` is used, so a `t`
/// sitting exactly on a shared keyframe resolves to the end of the earlier
/// segment. A `t` outside every segment extrapolates along the first one.
/// Channels are floored and held to `[0, 255]`.
pub fn sample(stops: &[ColorStop], t: f64) -> Rgb {
    match stops {
        []      => return Rgb::default(),
        [only]  => return only.color(),
        _       => {}
    }

    let (start, end) = stops.windows(2)
        .find(|w| w[0].pos <= t && t <= w[1].pos)
        .map(|w| (w[0], w[1]))
        .unwrap_or((stops[0], stops[1]));

    let seg_t = (t - start.pos) / (end.pos - start.pos);
    let lerp = |a: u8, b: u8| {
        let v = (a as f64 + seg_t * (b as f64 - a as f64)).floor();
        v.clamp(0.0, 255.0) as u8
    };

    Rgb::new(lerp(start.r, end.r), lerp(start.g, end.g), lerp(start.b, end.b))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyframes_are_hit_exactly() {
        assert_eq!(sample(&SKY_RAMP, 0.0), Rgb::new( 10,  10,  40));
        assert_eq!(sample(&SKY_RAMP, 0.7), Rgb::new( 80, 120, 150));
        assert_eq!(sample(&SKY_RAMP, 0.8), Rgb::new(220,  50,  50));
        assert_eq!(sample(&SKY_RAMP, 1.0), Rgb::new(255,  80,   0));
    }

    #[test]
    fn midpoint_of_first_segment() {
        // 0.35 / 0.7 = 0.5 → halfway between dark blue and pale sky.
        assert_eq!(sample(&SKY_RAMP, 0.35), Rgb::new(45, 65, 95));
    }

    #[test]
    fn channels_are_floored() {
        // 0.75 → halfway through [0.7, 0.8]: r = 150, g = 85, b = 100,
        // each possibly a hair under due to float error, never over.
        let c = sample(&SKY_RAMP, 0.75);
        assert!((149..=150).contains(&c.r));
        assert!((84..=85).contains(&c.g));
        assert!((99..=100).contains(&c.b));
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(sample(&SKY_RAMP, -1.0), Rgb::new(0, 0, 0));
        let hi = sample(&SKY_RAMP, 5.0);
        assert_eq!(hi.r, 255);
        assert_eq!(hi.g, 255);
        assert_eq!(hi.b, 255);
    }

    #[test]
    fn degenerate_ramps() {
        assert_eq!(sample(&[], 0.5), Rgb::default());
        let one = [ColorStop::new(0.0, 1, 2, 3)];
        assert_eq!(sample(&one, 0.9), Rgb::new(1, 2, 3));
    }

    #[test]
    fn argb_packing() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_argb(), 0xFF123456);
        assert_eq!(Rgb::from_argb(0xFF123456), c);
        assert_eq!(c.to_css(), "rgb(18, 52, 86)");
    }
}
