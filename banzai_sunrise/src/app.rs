//! Top-level application state and loop.
//!
//! `AppState` owns the [`SunriseController`] and the retained
//! [`SceneElements`]. Each detector frame runs
//! classify → advance → render → apply; between frames the loop polls the
//! controller's reset timer.

use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use banzai_gesture::{classify, DetectionResults};
use log::{debug, info, warn};
use sunrise_scene::{render, SceneElements, SceneOutput, SunriseController, Transition};

use crate::error::AppError;
use crate::source::{
    spawn_landmark_source, FrameEvent, ReplayLandmarkSource, SimInput, SimLandmarkSource,
    DEFAULT_REPLAY_FPS,
};
use crate::visualizer::Visualizer;

pub const USAGE: &str = "\
usage: banzai_sunrise [--replay FILE [--fps N] [--loop]]

  (no flags)      keyboard/mouse simulation
  --replay FILE   replay detector output, one JSON object per line
  --fps N         replay cadence in frames per second (default 30)
  --loop          start the recording over when it ends
  -h, --help      show this help";

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where detections come from.
#[derive(Clone, Debug, PartialEq)]
pub enum InputMode {
    Simulation,
    Replay { path: PathBuf, fps: u32, looped: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub input: InputMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { input: InputMode::Simulation }
    }
}

impl AppConfig {
    /// Build from command-line arguments (program name already skipped).
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self, AppError> {
        let mut replay: Option<PathBuf> = None;
        let mut fps: Option<u32> = None;
        let mut looped = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--replay" => {
                    let path = args.next()
                        .ok_or_else(|| AppError::Usage("--replay needs a file".into()))?;
                    replay = Some(PathBuf::from(path));
                }
                "--fps" => {
                    let n = args.next()
                        .ok_or_else(|| AppError::Usage("--fps needs a number".into()))?;
                    let f = n.parse::<u32>()
                        .ok()
                        .filter(|f| (1..=240).contains(f))
                        .ok_or_else(|| AppError::Usage(format!("bad --fps value: {}", n)))?;
                    fps = Some(f);
                }
                "--loop" => looped = true,
                other    => return Err(AppError::Usage(format!("unknown argument: {}", other))),
            }
        }

        let input = match replay {
            Some(path) => InputMode::Replay {
                path,
                fps: fps.unwrap_or(DEFAULT_REPLAY_FPS),
                looped,
            },
            None if looped => {
                return Err(AppError::Usage("--loop only applies to --replay".into()));
            }
            None if fps.is_some() => {
                return Err(AppError::Usage("--fps only applies to --replay".into()));
            }
            None => InputMode::Simulation,
        };
        Ok(AppConfig { input })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    controller:  SunriseController,
    elements:    SceneElements,
    last_output: SceneOutput,
    banzai:      bool,
    frames:      u64,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            controller:  SunriseController::new(),
            elements:    SceneElements::new(),
            last_output: render(0.0),
            banzai:      false,
            frames:      0,
        }
    }

    // ── per-frame detector callback ──────────────────────────────────────

    /// Process one frame of detections at session time `now`.
    pub fn on_results(&mut self, results: &DetectionResults, now: Duration) -> Transition {
        self.frames += 1;

        let banzai = classify(&results.multi_hand_landmarks);
        if banzai != self.banzai {
            debug!("frame {}: banzai {} ({} hands)",
                   self.frames, if banzai { "up" } else { "down" }, results.hand_count());
            self.banzai = banzai;
        }

        let transition = self.controller.advance(banzai, now);
        self.refresh_scene();
        transition
    }

    // ── timers ───────────────────────────────────────────────────────────

    /// Fire the sunrise reset if it is due. Returns true if it fired.
    pub fn poll_timers(&mut self, now: Duration) -> bool {
        if self.controller.poll_reset(now).is_none() { return false; }
        self.elements.clear_prompt_fade();
        self.refresh_scene();
        true
    }

    fn refresh_scene(&mut self) {
        self.last_output = render(self.controller.level());
        self.elements.apply(&self.last_output);
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn elements(&self)   -> &SceneElements      { &self.elements }
    pub fn output(&self)     -> &SceneOutput        { &self.last_output }
    pub fn controller(&self) -> &SunriseController  { &self.controller }
    pub fn level(&self)      -> f64                 { self.controller.level() }
    pub fn frames(&self)     -> u64                 { self.frames }

    /// One-line summary for the status bar.
    pub fn status_line(&self, now: Duration) -> String {
        let pct = (self.level() * 100.0).round() as u32;
        match self.controller.reset_remaining(now) {
            Some(left) => {
                let secs = (left.as_millis() + 999) / 1000;
                format!("SUNRISE {}%  COMPLETE - RESET IN {}S", pct, secs)
            }
            None if self.banzai => format!("SUNRISE {}%  BANZAI!", pct),
            None => format!("SUNRISE {}%", pct),
        }
    }
}

impl Default for AppState {
    fn default() -> Self { AppState::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the landmark source (simulation by default, replay with
/// `--replay`), the visualizer, and drives the frame/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Landmark source ───────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let frame_rx = match cfg.input {
        InputMode::Simulation => {
            info!("input: keyboard/mouse simulation");
            spawn_landmark_source(SimLandmarkSource { rx: sim_rx })
        }
        InputMode::Replay { path, fps, looped } => {
            // The window still produces poses; nobody listens to them.
            drop(sim_rx);
            let source = ReplayLandmarkSource::open(&path, fps, looped)?;
            info!("input: replay of {} ({} frames @ {} fps)",
                  path.display(), source.frame_count(), fps);
            spawn_landmark_source(source)
        }
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    let mut app = AppState::new();
    let start = Instant::now();
    let mut last_frame = Duration::ZERO;
    let mut source_open = true;

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Window input → simulated pose
        if !vis.poll_input() { break; }

        // 2. Timers run between detector callbacks, never during one
        let now = start.elapsed();
        app.poll_timers(now);

        // 3. Drain detector frames
        while source_open {
            match frame_rx.try_recv() {
                Ok(FrameEvent::Quit) => return Ok(()),
                Ok(FrameEvent::Detected(results)) => {
                    app.on_results(&results, start.elapsed());
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("landmark source ended; the scene keeps running");
                    source_open = false;
                }
            }
        }

        // 4. Render
        vis.render(app.elements(), &app.status_line(now), now - last_frame);
        last_frame = now;
    }

    info!("window closed after {} frames", app.frames());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use banzai_gesture::HandLandmarkSet;
    use sunrise_scene::{Rgb, RESET_DELAY};

    const FRAME: Duration = Duration::from_millis(33);

    fn raised() -> DetectionResults {
        DetectionResults::new(vec![HandLandmarkSet::synthetic(0.5, 0.3)])
    }

    fn lowered() -> DetectionResults {
        DetectionResults::new(vec![HandLandmarkSet::synthetic(0.5, 0.8)])
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Feed raised-hand frames until complete; returns completion time.
    fn raise_until_complete(app: &mut AppState) -> Duration {
        let mut now = Duration::ZERO;
        for _ in 0..200 {
            now += FRAME;
            if app.on_results(&raised(), now) == Transition::Completed {
                return now;
            }
        }
        panic!("never completed");
    }

    // ── AppState ─────────────────────────────────────────────────────────
    #[test]
    fn starts_at_night_with_prompt() {
        let app = AppState::new();
        assert_eq!(app.level(), 0.0);
        assert_eq!(app.elements().background, Rgb::new(10, 10, 40));
        assert!(!app.elements().prompt_faded);
    }

    #[test]
    fn raised_hands_brighten_and_fade_prompt() {
        let mut app = AppState::new();
        for i in 1..=10 {
            assert_eq!(app.on_results(&raised(), FRAME * i), Transition::Rising);
        }
        assert!((app.level() - 0.10).abs() < 1e-9);
        assert!(app.elements().prompt_faded);
        assert_ne!(app.elements().background, Rgb::new(10, 10, 40));
    }

    #[test]
    fn lowered_hands_and_empty_frames_hold_progress() {
        let mut app = AppState::new();
        for i in 1..=20 { app.on_results(&raised(), FRAME * i); }
        let held = app.level();
        for i in 21..=80 {
            app.on_results(&lowered(), FRAME * i);
            app.on_results(&DetectionResults::empty(), FRAME * i);
        }
        assert_eq!(app.level(), held);
        assert!(app.elements().prompt_faded);
    }

    #[test]
    fn completion_shows_decorations() {
        let mut app = AppState::new();
        raise_until_complete(&mut app);
        assert_eq!(app.level(), 1.0);
        assert!(app.elements().title_visible);
        assert!(app.elements().popups_visible);
        assert_eq!(app.elements().background, Rgb::new(255, 80, 0));
        assert!(app.controller().reset_pending());
    }

    #[test]
    fn reset_after_delay_brings_back_night_and_prompt() {
        let mut app = AppState::new();
        let done = raise_until_complete(&mut app);

        assert!(!app.poll_timers(done + RESET_DELAY - FRAME));
        assert!(app.elements().prompt_faded);

        assert!(app.poll_timers(done + RESET_DELAY));
        assert_eq!(app.level(), 0.0);
        assert!(!app.elements().prompt_faded);
        assert!(!app.elements().title_visible);
        assert_eq!(app.output(), &render(0.0));
    }

    #[test]
    fn status_line_reports_progress_and_countdown() {
        let mut app = AppState::new();
        assert_eq!(app.status_line(Duration::ZERO), "SUNRISE 0%");
        app.on_results(&raised(), FRAME);
        assert_eq!(app.status_line(FRAME), "SUNRISE 1%  BANZAI!");

        let done = raise_until_complete(&mut app);
        assert_eq!(app.status_line(done), "SUNRISE 100%  COMPLETE - RESET IN 10S");
        assert_eq!(app.status_line(done + Duration::from_millis(9_500)),
                   "SUNRISE 100%  COMPLETE - RESET IN 1S");
    }

    // ── AppConfig ────────────────────────────────────────────────────────
    #[test]
    fn no_args_is_simulation() {
        assert_eq!(AppConfig::from_args(args(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn replay_args() {
        let cfg = AppConfig::from_args(args(&["--replay", "rec.jsonl", "--fps", "60", "--loop"]))
            .unwrap();
        assert_eq!(cfg.input, InputMode::Replay {
            path: PathBuf::from("rec.jsonl"), fps: 60, looped: true,
        });
    }

    #[test]
    fn replay_fps_defaults_to_webcam_rate() {
        let cfg = AppConfig::from_args(args(&["--replay", "rec.jsonl"])).unwrap();
        assert_eq!(cfg.input, InputMode::Replay {
            path: PathBuf::from("rec.jsonl"), fps: DEFAULT_REPLAY_FPS, looped: false,
        });
    }

    #[test]
    fn fps_without_replay_is_rejected() {
        match AppConfig::from_args(args(&["--fps", "60"])) {
            Err(AppError::Usage(msg)) => assert!(msg.contains("--fps"), "{}", msg),
            other => panic!("expected a usage error, got {:?}", other),
        }
    }

    #[test]
    fn bad_args_are_usage_errors() {
        let cases: [&[&str]; 4] = [&["--fps", "0"], &["--replay"], &["--bogus"], &["--loop"]];
        for bad in cases {
            assert!(matches!(AppConfig::from_args(args(bad)), Err(AppError::Usage(_))),
                    "{:?} should be rejected", bad);
        }
    }
}
