//! `level → scene` mapping and the retained element styles it drives.

use crate::filter::FilterParams;
use crate::ramp::{sample, Rgb, SKY_RAMP};

/// Sun's bottom edge at level 0, in percent of the scene height (hidden).
pub const SUN_BOTTOM_START: f64 = -20.0;
/// Sun's bottom edge at level 1.
pub const SUN_BOTTOM_END:   f64 = 70.0;

// ════════════════════════════════════════════════════════════════════════════
// SceneOutput — one frame's worth of visual parameters
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct SceneOutput {
    pub level:            f64,
    /// Sky / page background.
    pub color:            Rgb,
    /// Sun's bottom edge, percent of scene height. Negative is below the
    /// horizon.
    pub sun_offset:       f64,
    pub mountain:         FilterParams,
    /// Title and every pop-up decoration, all together.
    pub show_decorations: bool,
    /// Any progress at all starts the prompt's fade-out.
    pub fade_prompt:      bool,
}

impl SceneOutput {
    /// e.g. `11.5%`.
    pub fn sun_bottom_css(&self) -> String {
        format!("{}%", self.sun_offset)
    }

    pub fn mountain_filter_css(&self) -> String {
        self.mountain.to_css()
    }
}

/// Map a sunrise level to the scene. Pure; call it every frame.
pub fn render(level: f64) -> SceneOutput {
    SceneOutput {
        level,
        color:            sample(&SKY_RAMP, level),
        sun_offset:       SUN_BOTTOM_START + level * (SUN_BOTTOM_END - SUN_BOTTOM_START),
        mountain:         FilterParams::for_level(level),
        show_decorations: level >= 1.0,
        fade_prompt:      level > 0.0,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SceneElements — what is currently on screen
// ════════════════════════════════════════════════════════════════════════════

/// Retained styles of the scene's elements.
///
/// Everything follows the latest [`SceneOutput`] except the prompt: its
/// fade-out is only ever switched *on* by [`apply`](Self::apply) and only
/// switched off by [`clear_prompt_fade`](Self::clear_prompt_fade), which the
/// sunrise reset calls.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneElements {
    pub background:     Rgb,
    pub sun_offset:     f64,
    pub mountain:       FilterParams,
    pub title_visible:  bool,
    pub popups_visible: bool,
    pub prompt_faded:   bool,
}

impl SceneElements {
    /// The scene before any frame has been processed.
    pub fn new() -> Self {
        let night = render(0.0);
        SceneElements {
            background:     night.color,
            sun_offset:     night.sun_offset,
            mountain:       night.mountain,
            title_visible:  false,
            popups_visible: false,
            prompt_faded:   false,
        }
    }

    pub fn apply(&mut self, out: &SceneOutput) {
        self.background     = out.color;
        self.sun_offset     = out.sun_offset;
        self.mountain       = out.mountain;
        self.title_visible  = out.show_decorations;
        self.popups_visible = out.show_decorations;
        if out.fade_prompt {
            self.prompt_faded = true;
        }
    }

    pub fn clear_prompt_fade(&mut self) {
        self.prompt_faded = false;
    }
}

impl Default for SceneElements {
    fn default() -> Self { SceneElements::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
