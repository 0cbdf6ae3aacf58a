//! # sunrise_scene
//!
//! The stateful half and the pure half of the banzai sunrise.
//!
//! * [`SunriseController`] accumulates progress while the banzai gesture is
//!   held, latches at full sunrise, and resets itself once after
//!   [`RESET_DELAY`].
//! * [`render`] maps a progress `level` in `[0, 1]` to everything the scene
//!   shows: sky color, sun height, mountain lighting, and which overlays are
//!   visible.
//! * [`SceneElements`] is the retained style of the on-screen elements, the
//!   thing a renderer actually draws from.
//!
//! ## State machine
//!
//! ```text
//!   ┌──────────────────┐  level reaches 1.0   ┌─────────────┐
//!   │  RISING_OR_IDLE  │─────────────────────►│  COMPLETED  │  gestures ignored
//!   └──────────────────┘                      └─────────────┘
//!      ▲  gesture: level += step                     │
//!      │  no gesture: unchanged                      │ RESET_DELAY later
//!      └──────────── level = 0, completed = false ◄──┘
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use sunrise_scene::{render, SceneElements, SunriseController, RESET_DELAY};
//!
//! let mut ctl = SunriseController::new();
//! let mut elements = SceneElements::new();
//!
//! let now = Duration::ZERO;
//! ctl.advance(true, now);
//! elements.apply(&render(ctl.level()));
//! assert!(elements.prompt_faded);
//!
//! // A reset only ever fires after completion.
//! assert!(ctl.poll_reset(now + RESET_DELAY).is_none());
//! ```

pub mod controller;
pub mod filter;
pub mod ramp;
pub mod render;

pub use controller::{
    ResetFired, ResetTimer, SunriseController, SunriseState, Transition,
    RESET_DELAY, SUNRISE_STEP,
};
pub use filter::FilterParams;
pub use ramp::{sample, ColorStop, Rgb, SKY_RAMP};
pub use render::{render, SceneElements, SceneOutput, SUN_BOTTOM_END, SUN_BOTTOM_START};
