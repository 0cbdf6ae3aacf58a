//! Software-rendered scene using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     BANZAI SUNRISE  (title)                    │
//! │   ⋀ cranes        ✦ sparkles        HAPPY NEW YEAR  (pop-ups)   │
//! │                          .-"""-.                               │
//! │                         (  sun  )                              │
//! │                     ____/\/\/\/\____   snow cap                │
//! │                ____/   mountain     \____                      │
//! │   RAISE YOUR HANDS!  (prompt, fades out)                       │
//! ├────────────────────────────────────────────────────────────────┤
//! │ status bar                                       key legend    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window doubles as the simulated camera: [`Visualizer::poll_input`]
//! turns the keyboard and mouse into one [`SimPose`] per frame.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use sunrise_scene::{Rgb, SceneElements};

use crate::error::AppError;
use crate::overlay::{Overlay, Popup, PopupKind, POPUPS};
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:        usize = 960;
pub const WIN_H:        usize = 540;
const STATUS_H:         usize = 28;
/// Height of the scene proper; the sun's percentages are relative to this.
pub const SCENE_H:      usize = WIN_H - STATUS_H;

const SUN_RADIUS:       f32   = 56.0;
const SUN_X:            f32   = WIN_W as f32 * 0.5;
const SUN_COLOR:        u32   = 0xFFFFD24A;
const SUN_GLOW:         u32   = 0xFFFFB347;

const MOUNTAIN_TOP:     f32   = SCENE_H as f32 * 0.42;
const MOUNTAIN_TOP_HW:  f32   = 34.0;   // half-width of the crater rim
const MOUNTAIN_BASE_HW: f32   = 640.0;  // half-width at the bottom edge
const SNOW_LINE:        f32   = 0.30;   // fraction of the mountain's height
const MOUNTAIN_BODY:    Rgb   = Rgb::new( 72,  96, 140);
const MOUNTAIN_SHADE:   Rgb   = Rgb::new( 56,  74, 112);
const MOUNTAIN_SNOW:    Rgb   = Rgb::new(236, 242, 250);

const TITLE_SCALE:      usize = 7;
const PROMPT_SCALE:     usize = 4;
const STATUS_SCALE:     usize = 2;
const TEXT_COLOR:       u32   = 0xFFFFFFFF;
const GOLD:             u32   = 0xFFFFD700;
const STATUS_BG:        u32   = 0xFF0F1B33;

const LEGEND: &str = "SPACE=BANZAI  MOUSE=HAND  H=NO HANDS  Q=QUIT";

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    buf:     Vec<u32>,
    sim_tx:  Sender<SimInput>,
    overlay: Overlay,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Banzai Sunrise",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![0xFF000000; WIN_W * WIN_H],
            sim_tx,
            overlay: Overlay::new(),
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Sample the keyboard and mouse as this frame's simulated pose.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let pose = if self.window.is_key_down(Key::Space) || self.window.is_key_down(Key::Up) {
            SimPose::BothRaised
        } else if self.window.is_key_down(Key::H) {
            SimPose::NoHands
        } else if self.window.get_mouse_down(MouseButton::Left) {
            match self.window.get_mouse_pos(MouseMode::Discard) {
                Some((mx, my)) => SimPose::Pointer {
                    x: mx / WIN_W as f32,
                    y: my / SCENE_H as f32,
                },
                None => SimPose::Lowered,
            }
        } else {
            SimPose::Lowered
        };

        // No receiver in replay mode; the pose is simply dropped.
        let _ = self.sim_tx.send(SimInput::Pose(pose));
        true
    }

    /// Render one frame. `dt` is the time since the previous frame.
    pub fn render(&mut self, elements: &SceneElements, status: &str, dt: Duration) {
        self.overlay.tick(elements, dt.as_secs_f32());

        // ── Sky ───────────────────────────────────────────────────────────
        let sky = elements.background.to_argb();
        self.buf.fill(sky);

        // ── Sun (behind the mountain) ─────────────────────────────────────
        self.draw_sun(elements.sun_offset);

        // ── Mountain, lit by the current filter ───────────────────────────
        let body  = elements.mountain.apply(MOUNTAIN_BODY).to_argb();
        let shade = elements.mountain.apply(MOUNTAIN_SHADE).to_argb();
        let snow  = elements.mountain.apply(MOUNTAIN_SNOW).to_argb();
        self.draw_mountain(body, shade, snow);

        // ── Title and pop-ups ─────────────────────────────────────────────
        let title_alpha = self.overlay.title.value;
        if title_alpha > 0.0 {
            self.draw_text_centered("BANZAI SUNRISE", 28, TITLE_SCALE, GOLD, title_alpha);
        }
        let reveal = self.overlay.popups.value;
        if reveal > 0.0 {
            for popup in POPUPS.iter() {
                self.draw_popup(popup, reveal);
            }
        }

        // ── Prompt ────────────────────────────────────────────────────────
        let prompt_alpha = self.overlay.prompt.value;
        if prompt_alpha > 0.0 {
            let y = (SCENE_H as f32 * 0.80) as usize;
            self.draw_text_centered("RAISE YOUR HANDS!", y, PROMPT_SCALE, TEXT_COLOR, prompt_alpha);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, SCENE_H, WIN_W, STATUS_H, STATUS_BG);
        let ty = SCENE_H + (STATUS_H - 5 * STATUS_SCALE) / 2;
        self.draw_text(status, 10, ty, STATUS_SCALE, 0xFFEEEEEE, 1.0);
        let lw = text_width(LEGEND, STATUS_SCALE);
        self.draw_text(LEGEND, WIN_W.saturating_sub(lw + 10), ty, STATUS_SCALE, 0xFF888888, 1.0);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Sun ───────────────────────────────────────────────────────────────

    /// `offset` is the sun's bottom edge in percent of the scene height.
    fn draw_sun(&mut self, offset: f64) {
        let bottom = SCENE_H as f32 - (offset as f32 / 100.0) * SCENE_H as f32;
        let cy = bottom - SUN_RADIUS;
        let glow_r = SUN_RADIUS * 1.6;

        let y0 = (cy - glow_r).max(0.0) as usize;
        let y1 = ((cy + glow_r).max(0.0) as usize).min(SCENE_H);
        let x0 = (SUN_X - glow_r).max(0.0) as usize;
        let x1 = ((SUN_X + glow_r) as usize).min(WIN_W);

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 - SUN_X;
                let dy = y as f32 - cy;
                let d  = (dx * dx + dy * dy).sqrt();
                if d <= SUN_RADIUS {
                    self.set_pixel(x, y, SUN_COLOR);
                } else if d <= glow_r {
                    let a = 0.45 * (1.0 - (d - SUN_RADIUS) / (glow_r - SUN_RADIUS));
                    self.blend_pixel(x, y, SUN_GLOW, a);
                }
            }
        }
    }

    // ── Mountain ──────────────────────────────────────────────────────────

    fn draw_mountain(&mut self, body: u32, shade: u32, snow: u32) {
        let cx     = WIN_W as f32 * 0.5;
        let height = SCENE_H as f32 - MOUNTAIN_TOP;

        for y in (MOUNTAIN_TOP as usize)..SCENE_H {
            let frac = (y as f32 - MOUNTAIN_TOP) / height;
            // Concave flanks: steep near the summit, spreading toward the base.
            let hw = MOUNTAIN_TOP_HW + (MOUNTAIN_BASE_HW - MOUNTAIN_TOP_HW) * frac.powf(1.7);
            let x0 = (cx - hw).max(0.0) as usize;
            let x1 = ((cx + hw).max(0.0) as usize).min(WIN_W);

            for x in x0..x1 {
                // Ragged snow line.
                let jag = 0.035 * (x as f32 * 0.09).sin() + 0.02 * (x as f32 * 0.23).sin();
                let color = if frac < SNOW_LINE + jag {
                    snow
                } else if (x as f32) < cx {
                    shade
                } else {
                    body
                };
                self.buf[y * WIN_W + x] = color;
            }
        }
    }

    // ── Pop-up decorations ────────────────────────────────────────────────

    fn draw_popup(&mut self, popup: &Popup, reveal: f32) {
        let cx = (popup.x * WIN_W as f32) as isize;
        let cy = (popup.y * SCENE_H as f32) as isize;
        let s  = popup.size * reveal;

        match popup.kind {
            PopupKind::Crane => {
                let w = (28.0 * s) as isize;
                let h = (10.0 * s) as isize;
                self.draw_line(cx - w, cy - h, cx, cy, TEXT_COLOR, reveal);
                self.draw_line(cx, cy, cx + w, cy - h, TEXT_COLOR, reveal);
                self.draw_line(cx - w, cy - h + 1, cx, cy + 1, TEXT_COLOR, reveal);
                self.draw_line(cx, cy + 1, cx + w, cy - h + 1, TEXT_COLOR, reveal);
            }
            PopupKind::Sparkle => {
                let r = (10.0 * s) as usize;
                if cx >= 0 && cy >= 0 {
                    draw_diamond(&mut self.buf, cx as usize, cy as usize, r, GOLD, reveal);
                    self.draw_line(cx - 2 * r as isize, cy, cx + 2 * r as isize, cy, GOLD, reveal);
                    self.draw_line(cx, cy - 2 * r as isize, cx, cy + 2 * r as isize, GOLD, reveal);
                }
            }
            PopupKind::Banner(text) => {
                let scale = ((3.0 * s).round() as usize).max(1);
                let w = text_width(text, scale) as isize;
                let x = (cx - w / 2).max(0) as usize;
                let y = cy.max(0) as usize;
                self.draw_text(text, x, y, scale, TEXT_COLOR, reveal);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Paint `color` over the existing pixel with opacity `alpha`.
    fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32) {
        blend_at(&mut self.buf, x, y, color, alpha);
    }

    /// Straight line by uniform stepping; clipped to the window.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32, alpha: f32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            if x >= 0 && y >= 0 {
                self.blend_pixel(x as usize, y as usize, color, alpha);
            }
        }
    }

    fn draw_text_centered(&mut self, text: &str, y: usize, scale: usize, color: u32, alpha: f32) {
        let x = WIN_W.saturating_sub(text_width(text, scale)) / 2;
        self.draw_text(text, x, y, scale, color, alpha);
    }

    /// 3×5 bitmap font, each font pixel drawn as a `scale`×`scale` block.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32, alpha: f32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 3 * scale > WIN_W { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.blend_pixel(cx + col * scale + sx, y + row * scale + sy,
                                             color, alpha);
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
        }
    }
}

/// Pixel width of `text` at `scale`, without the trailing gap.
pub fn text_width(text: &str, scale: usize) -> usize {
    (text.chars().count() * 4 * scale).saturating_sub(scale)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Blend `color` into `buf[y][x]` with opacity `alpha`; clipped to the window.
fn blend_at(buf: &mut [u32], x: usize, y: usize, color: u32, alpha: f32) {
    if x < WIN_W && y < WIN_H {
        let i = y * WIN_W + x;
        buf[i] = blend(buf[i], color, alpha);
    }
}

/// Outline of a diamond of radius `r` around `(cx, cy)`, faded in by `alpha`.
fn draw_diamond(buf: &mut [u32], cx: usize, cy: usize, r: usize, color: u32, alpha: f32) {
    for dy in 0..=r as isize {
        let dx = r as isize - dy;
        for &(sx, sy) in &[
            (cx as isize + dx, cy as isize + dy),
            (cx as isize - dx, cy as isize + dy),
            (cx as isize + dx, cy as isize - dy),
            (cx as isize - dx, cy as isize - dy),
        ] {
            if sx >= 0 && sy >= 0 {
                blend_at(buf, sx as usize, sy as usize, color, alpha);
            }
        }
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let ca = Rgb::from_argb(a);
    let cb = Rgb::from_argb(b);
    let lerp = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t).round() as u8;
    Rgb::new(lerp(ca.r, cb.r), lerp(ca.g, cb.g), lerp(ca.b, cb.b)).to_argb()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints_and_midpoint() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFF6400C8, 0.5), 0xFF320064);
    }

    #[test]
    fn text_width_excludes_trailing_gap() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 3);
        assert_eq!(text_width("AB", 2), 14);
    }

    #[test]
    fn sparkle_diamond_fades_with_reveal() {
        let black = 0xFF000000;
        let mut buf = vec![black; WIN_W * WIN_H];

        draw_diamond(&mut buf, 100, 100, 4, GOLD, 0.0);
        assert!(buf.iter().all(|&p| p == black));

        draw_diamond(&mut buf, 100, 100, 4, GOLD, 0.5);
        let tip = buf[100 * WIN_W + 104];
        assert_eq!(tip, blend(black, GOLD, 0.5));
        assert_ne!(tip, GOLD);
        assert_eq!(buf[100 * WIN_W + 100], black);
    }

    #[test]
    fn diamond_is_clipped_at_the_edges() {
        let mut buf = vec![0xFF000000; WIN_W * WIN_H];
        draw_diamond(&mut buf, 0, 0, 6, GOLD, 1.0);
        draw_diamond(&mut buf, WIN_W - 1, WIN_H - 1, 6, GOLD, 1.0);
        assert_eq!(buf[6], GOLD);
    }

    #[test]
    fn legend_fits_beside_status() {
        assert!(text_width(LEGEND, STATUS_SCALE) < WIN_W / 2);
    }
}
