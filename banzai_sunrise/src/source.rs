//! Landmark sources — where per-frame hand detections come from.
//!
//! The public interface is [`FrameEvent`] delivered over a `mpsc` channel.
//! The app loop doesn't need to know whether detections were synthesized
//! from the keyboard and mouse or replayed from a recording.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use banzai_gesture::{DetectionResults, HandLandmarkSet};
use log::{debug, info, warn};

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent
// ════════════════════════════════════════════════════════════════════════════

/// One message from a landmark source.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    /// The detector's results for one camera frame.
    Detected(DetectionResults),

    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FrameEvent`]s over a channel.
///
/// A source ends by returning from `run`; the dropped sender shows up as a
/// disconnected channel on the receiving side.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<FrameEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation
// ════════════════════════════════════════════════════════════════════════════

/// What the simulated person in front of the camera is doing this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimPose {
    /// Nobody in frame.
    NoHands,
    /// One hand resting low in the frame.
    Lowered,
    /// Banzai: both hands well above the middle of the frame.
    BothRaised,
    /// One hand whose wrist follows the pointer (normalized coordinates).
    Pointer { x: f32, y: f32 },
}

impl SimPose {
    /// The detections a hand detector would report for this pose.
    pub fn to_results(self) -> DetectionResults {
        match self {
            SimPose::NoHands    => DetectionResults::empty(),
            SimPose::Lowered    => DetectionResults::new(vec![
                HandLandmarkSet::synthetic(0.62, 0.88),
            ]),
            SimPose::BothRaised => DetectionResults::new(vec![
                HandLandmarkSet::synthetic(0.30, 0.28),
                HandLandmarkSet::synthetic(0.70, 0.26),
            ]),
            SimPose::Pointer { x, y } => DetectionResults::new(vec![
                HandLandmarkSet::synthetic(x, y),
            ]),
        }
    }
}

/// Raw input from the simulation window, one `Pose` per window frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    Pose(SimPose),
    Quit,
}

/// Landmark source driven by [`SimInput`] events from the visualizer's
/// window.
///
/// The window is the "camera": it sends one pose per rendered frame and this
/// translator turns each into a detector result.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        for input in self.rx {
            let event = match input {
                SimInput::Pose(pose) => FrameEvent::Detected(pose.to_results()),
                SimInput::Quit       => {
                    let _ = tx.send(FrameEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayLandmarkSource — JSON-lines recording
// ════════════════════════════════════════════════════════════════════════════

/// Default replay cadence, a typical webcam rate.
pub const DEFAULT_REPLAY_FPS: u32 = 30;

/// Replays a recording of detector output, one JSON object per line:
///
/// ```text
/// {"multiHandLandmarks":[[{"x":0.51,"y":0.32,"z":0.0}, … 21 points …]]}
/// {"multiHandLandmarks":[]}
/// ```
///
/// Blank lines are skipped. A hand with the wrong number of points is dropped
/// on its own; the frame keeps its other hands. A line that fails to parse
/// at all is delivered as a frame with no hands, so a corrupt recording just
/// reads as "gesture not held" for that frame.
pub struct ReplayLandmarkSource {
    path:     PathBuf,
    lines:    Vec<String>,
    interval: Duration,
    looped:   bool,
}

impl ReplayLandmarkSource {
    /// Read the whole recording up front so I/O problems surface at start-up.
    pub fn open(path: &Path, fps: u32, looped: bool) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|source| AppError::Replay {
            path: path.to_path_buf(),
            source,
        })?;
        let lines = text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        Ok(ReplayLandmarkSource {
            path: path.to_path_buf(),
            lines,
            interval: Duration::from_secs(1) / fps.max(1),
            looped,
        })
    }

    pub fn frame_count(&self) -> usize { self.lines.len() }

    /// Parse every line, in order, substituting empty frames for bad lines.
    pub fn frames(&self) -> Vec<DetectionResults> {
        self.lines.iter().enumerate().map(|(i, line)| {
            DetectionResults::from_json_line(line).unwrap_or_else(|e| {
                warn!("{}:{}: {}; treating as no hands", self.path.display(), i + 1, e);
                DetectionResults::empty()
            })
        }).collect()
    }
}

impl LandmarkSource for ReplayLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        let frames = self.frames();
        if frames.is_empty() {
            warn!("{}: recording has no frames", self.path.display());
            return;
        }
        info!("replaying {} frames from {}{}",
              frames.len(), self.path.display(),
              if self.looped { " (looping)" } else { "" });

        loop {
            for frame in &frames {
                if tx.send(FrameEvent::Detected(frame.clone())).is_err() { return; }
                thread::sleep(self.interval);
            }
            if !self.looped { break; }
            debug!("replay wrapped around");
        }
        info!("replay of {} finished", self.path.display());
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_recording(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("banzai_sunrise_{}_{}.jsonl", name, std::process::id()));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    /// One frame with a single raised hand, as a recording line.
    fn raised_line() -> String {
        let hand = HandLandmarkSet::synthetic(0.5, 0.2);
        let pts: Vec<String> = hand.points().iter()
            .map(|p| format!(r#"{{"x":{},"y":{},"z":{}}}"#, p.x, p.y, p.z))
            .collect();
        format!(r#"{{"multiHandLandmarks":[[{}]]}}"#, pts.join(","))
    }

    // ── SimPose ──────────────────────────────────────────────────────────
    #[test]
    fn sim_poses_classify_as_expected() {
        assert!(!SimPose::NoHands.to_results().is_banzai());
        assert!(!SimPose::Lowered.to_results().is_banzai());
        assert!(SimPose::BothRaised.to_results().is_banzai());
        assert_eq!(SimPose::BothRaised.to_results().hand_count(), 2);
        assert!(SimPose::Pointer { x: 0.5, y: 0.1 }.to_results().is_banzai());
        assert!(!SimPose::Pointer { x: 0.5, y: 0.9 }.to_results().is_banzai());
    }

    #[test]
    fn sim_source_translates_and_quits() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_landmark_source(SimLandmarkSource { rx: sim_rx });
        sim_tx.send(SimInput::Pose(SimPose::BothRaised)).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();

        match rx.recv().unwrap() {
            FrameEvent::Detected(r) => assert!(r.is_banzai()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(rx.recv().unwrap(), FrameEvent::Quit);
        assert!(rx.recv().is_err());
    }

    // ── ReplayLandmarkSource ─────────────────────────────────────────────
    #[test]
    fn replay_parses_and_substitutes_bad_lines() {
        let body = format!("{}\n\nnot json\n{{\"multiHandLandmarks\":[]}}\n", raised_line());
        let path = write_recording("parse", &body);
        let src = ReplayLandmarkSource::open(&path, 30, false).unwrap();
        assert_eq!(src.frame_count(), 3);

        let frames = src.frames();
        assert!(frames[0].is_banzai());
        assert_eq!(frames[1], DetectionResults::empty());
        assert_eq!(frames[2], DetectionResults::empty());
        fs::remove_file(path).ok();
    }

    #[test]
    fn replay_keeps_raised_hand_next_to_short_one() {
        let line = raised_line().replace("]]}", r#"],[{"x":0.5,"y":0.9}]]}"#);
        let path = write_recording("mixed", &format!("{}\n", line));
        let frames = ReplayLandmarkSource::open(&path, 30, false).unwrap().frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].hand_count(), 1);
        assert!(frames[0].is_banzai());
        fs::remove_file(path).ok();
    }

    #[test]
    fn replay_delivers_every_frame_then_disconnects() {
        let body = format!("{}\n{}\n", raised_line(), raised_line());
        let path = write_recording("deliver", &body);
        let src = ReplayLandmarkSource::open(&path, 1000, false).unwrap();
        let rx = spawn_landmark_source(src);

        let got: Vec<FrameEvent> = rx.iter().collect();
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|e| matches!(e, FrameEvent::Detected(r) if r.is_banzai())));
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_recording_is_an_error() {
        let path = std::env::temp_dir().join("banzai_sunrise_definitely_missing.jsonl");
        match ReplayLandmarkSource::open(&path, 30, false) {
            Err(AppError::Replay { path: p, .. }) => assert_eq!(p, path),
            Err(e) => panic!("wrong error: {}", e),
            Ok(_)  => panic!("expected an error"),
        }
    }
}
