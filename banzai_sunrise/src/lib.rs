//! # banzai_sunrise
//!
//! Raise your hands, raise the sun. A hand detector watches the camera; while
//! at least one wrist is in the upper half of the frame (banzai!), the
//! sunrise advances a little every frame: the sky warms from night blue
//! through pale dawn to red and orange, the sun climbs from behind the
//! mountain, and the mountain lights up. At full sunrise the title and
//! decorations pop in; ten seconds later the night returns.
//!
//! ## Frame → scene pipeline
//!
//! | Stage | Crate | Stateful |
//! |---|---|---|
//! | hand landmarks → banzai? | `banzai_gesture::classify` | no |
//! | banzai? → sunrise level | `sunrise_scene::SunriseController` | yes |
//! | level → colors, positions, reveals | `sunrise_scene::render` | no |
//! | scene → pixels | [`visualizer::Visualizer`] | overlay tweens only |
//!
//! ## Input
//!
//! * (default) — **Simulation**: the window is the camera.
//! * `--replay FILE` — **Replay**: detector output recorded as JSON lines.
//!
//! ### Simulation controls
//!
//! | Input | Simulated detection |
//! |---|---|
//! | `Space` / `Up` held | Both hands raised |
//! | Left mouse held | One hand, wrist at the pointer |
//! | `H` held | No hands in frame |
//! | (nothing) | One hand resting low |
//! | `Q` / `Esc` | Quit |

pub mod error;
pub mod source;
pub mod overlay;
pub mod visualizer;
pub mod app;
