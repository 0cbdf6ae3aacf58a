//! Overlay animation state.
//!
//! [`SceneElements`] says what *should* be on screen; the overlays ease
//! toward that over a short transition instead of snapping, the way a
//! stylesheet transition would. Nothing here feeds back into the sunrise
//! logic.

use sunrise_scene::SceneElements;

/// Prompt fade-out / fade-in duration.
pub const PROMPT_FADE_SECS: f32 = 1.0;
/// Title and pop-up reveal duration.
pub const REVEAL_SECS:      f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// Tween — a value easing linearly toward a 0/1 target
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub value: f32,
    /// Seconds for a full 0 → 1 (or 1 → 0) swing.
    duration:  f32,
}

impl Tween {
    pub fn new(value: f32, duration: f32) -> Self {
        Tween { value: value.clamp(0.0, 1.0), duration }
    }

    /// Move toward `on ? 1 : 0` by `dt` seconds' worth.
    pub fn tick(&mut self, on: bool, dt: f32) {
        let target = if on { 1.0 } else { 0.0 };
        let step   = if self.duration > 0.0 { dt.max(0.0) / self.duration } else { 1.0 };
        if self.value < target {
            self.value = (self.value + step).min(target);
        } else {
            self.value = (self.value - step).max(target);
        }
    }

    pub fn settled(&self, on: bool) -> bool {
        self.value == if on { 1.0 } else { 0.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pop-up decorations
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PopupKind {
    /// A crane in flight, drawn as a wide chevron.
    Crane,
    /// A four-point twinkle.
    Sparkle,
    /// A short text banner.
    Banner(&'static str),
}

/// One decoration, placed in normalized window coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Popup {
    pub kind: PopupKind,
    pub x:    f32,
    pub y:    f32,
    /// Relative size; the reveal scales it up from 0.
    pub size: f32,
}

/// The full decoration set. Visibility is set-wide: all or none.
pub const POPUPS: [Popup; 8] = [
    Popup { kind: PopupKind::Crane,   x: 0.14, y: 0.30, size: 1.0 },
    Popup { kind: PopupKind::Crane,   x: 0.22, y: 0.22, size: 0.7 },
    Popup { kind: PopupKind::Crane,   x: 0.80, y: 0.26, size: 0.9 },
    Popup { kind: PopupKind::Sparkle, x: 0.08, y: 0.12, size: 1.0 },
    Popup { kind: PopupKind::Sparkle, x: 0.35, y: 0.36, size: 0.6 },
    Popup { kind: PopupKind::Sparkle, x: 0.92, y: 0.10, size: 0.8 },
    Popup { kind: PopupKind::Banner("HAPPY NEW YEAR"), x: 0.50, y: 0.32, size: 1.0 },
    Popup { kind: PopupKind::Banner("BANZAI!"),        x: 0.84, y: 0.40, size: 0.8 },
];

// ════════════════════════════════════════════════════════════════════════════
// Overlay
// ════════════════════════════════════════════════════════════════════════════

/// Animated opacities / reveal amounts for everything drawn over the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    pub prompt: Tween,
    pub title:  Tween,
    pub popups: Tween,
}

impl Overlay {
    /// Prompt fully shown, decorations hidden.
    pub fn new() -> Self {
        Overlay {
            prompt: Tween::new(1.0, PROMPT_FADE_SECS),
            title:  Tween::new(0.0, REVEAL_SECS),
            popups: Tween::new(0.0, REVEAL_SECS),
        }
    }

    pub fn tick(&mut self, elements: &SceneElements, dt: f32) {
        self.prompt.tick(!elements.prompt_faded, dt);
        self.title.tick(elements.title_visible, dt);
        self.popups.tick(elements.popups_visible, dt);
    }
}

impl Default for Overlay {
    fn default() -> Self { Overlay::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
