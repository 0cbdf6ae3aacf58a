//! # banzai_gesture
//!
//! Hand-landmark types as delivered by a 21-point hand-pose detector, and the
//! single heuristic that turns them into a "banzai" (raised hands) signal.
//!
//! Coordinates are normalized to the camera frame: `x` and `y` lie in
//! `[0, 1]` with `y = 0` at the **top** of the frame, so a raised hand has a
//! *small* `y`.
//!
//! ## Quick start
//!
//! ```rust
//! use banzai_gesture::{classify, DetectionResults, HandLandmarkSet};
//!
//! let raised  = HandLandmarkSet::synthetic(0.5, 0.30);
//! let lowered = HandLandmarkSet::synthetic(0.5, 0.85);
//!
//! assert!(classify(&[lowered.clone(), raised]));
//! assert!(!classify(&[lowered]));
//! assert!(!classify(&[]));
//!
//! let frame = DetectionResults::from_json_line(r#"{"multiHandLandmarks":[]}"#).unwrap();
//! assert!(!frame.is_banzai());
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one detected hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A wrist above this normalized `y` (i.e. in the upper half of the frame)
/// counts as a raised hand.
pub const WRIST_RAISED_Y: f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("hand must have {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("malformed detection results: {0}")]
    Json(#[from] serde_json::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One normalized point in camera-frame coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; absent in some detector outputs.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmark — fixed semantic indices
// ════════════════════════════════════════════════════════════════════════════

/// The 21 fixed positions of a hand landmark set, in detector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist           = 0,
    ThumbCmc        = 1,
    ThumbMcp        = 2,
    ThumbIp         = 3,
    ThumbTip        = 4,
    IndexMcp        = 5,
    IndexPip        = 6,
    IndexDip        = 7,
    IndexTip        = 8,
    MiddleMcp       = 9,
    MiddlePip       = 10,
    MiddleDip       = 11,
    MiddleTip       = 12,
    RingMcp         = 13,
    RingPip         = 14,
    RingDip         = 15,
    RingTip         = 16,
    PinkyMcp        = 17,
    PinkyPip        = 18,
    PinkyDip        = 19,
    PinkyTip        = 20,
}

impl HandLandmark {
    /// Raw index into a [`HandLandmarkSet`].
    pub fn index(self) -> usize { self as usize }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// Exactly [`HAND_LANDMARK_COUNT`] landmarks for one detected hand.
///
/// On the wire (JSON) a hand is a plain array of points; any length other
/// than 21 is rejected during deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarkSet {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

/// Offsets from the wrist for an upright, open hand, in normalized frame
/// units. Fingers point up the frame (negative `dy`).
const UPRIGHT_HAND: [(f32, f32); HAND_LANDMARK_COUNT] = [
    ( 0.000,  0.000),                                                   // wrist
    (-0.030, -0.030), (-0.055, -0.060), (-0.070, -0.090), (-0.085, -0.115), // thumb
    (-0.025, -0.110), (-0.030, -0.160), (-0.033, -0.190), (-0.035, -0.215), // index
    ( 0.000, -0.115), ( 0.000, -0.170), ( 0.000, -0.205), ( 0.000, -0.235), // middle
    ( 0.022, -0.108), ( 0.026, -0.158), ( 0.028, -0.190), ( 0.030, -0.215), // ring
    ( 0.042, -0.095), ( 0.050, -0.135), ( 0.055, -0.160), ( 0.060, -0.180), // pinky
];

impl HandLandmarkSet {
    pub fn new(points: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        HandLandmarkSet { points }
    }

    /// An upright open hand whose wrist sits at `(wrist_x, wrist_y)`.
    ///
    /// Finger points are not clamped to the frame; only the wrist is ever
    /// consulted by the classifier.
    pub fn synthetic(wrist_x: f32, wrist_y: f32) -> Self {
        let mut points = [Landmark::default(); HAND_LANDMARK_COUNT];
        for (p, &(dx, dy)) in points.iter_mut().zip(UPRIGHT_HAND.iter()) {
            *p = Landmark::new(wrist_x + dx, wrist_y + dy, 0.0);
        }
        HandLandmarkSet { points }
    }

    pub fn get(&self, which: HandLandmark) -> Landmark {
        self.points[which.index()]
    }

    pub fn wrist(&self) -> Landmark {
        self.get(HandLandmark::Wrist)
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        let actual = points.len();
        let points: [Landmark; HAND_LANDMARK_COUNT] = points.try_into()
            .map_err(|_| LandmarkError::WrongCount {
                expected: HAND_LANDMARK_COUNT,
                actual,
            })?;
        Ok(HandLandmarkSet { points })
    }
}

impl From<HandLandmarkSet> for Vec<Landmark> {
    fn from(set: HandLandmarkSet) -> Self {
        set.points.to_vec()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectionResults — one detector callback
// ════════════════════════════════════════════════════════════════════════════

/// Everything the hand detector reports for one camera frame.
///
/// Hands are validated one at a time while reading: a hand without exactly
/// [`HAND_LANDMARK_COUNT`] points is dropped with a warning and the rest of
/// the frame is kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireResults")]
pub struct DetectionResults {
    /// Zero or more hands. A missing field means no hands were found.
    #[serde(rename = "multiHandLandmarks")]
    pub multi_hand_landmarks: Vec<HandLandmarkSet>,
}

/// Detector output as it appears on the wire, before per-hand checks.
#[derive(Deserialize)]
struct WireResults {
    #[serde(rename = "multiHandLandmarks", default)]
    multi_hand_landmarks: Vec<Vec<Landmark>>,
}

impl From<WireResults> for DetectionResults {
    fn from(wire: WireResults) -> Self {
        let hands = wire.multi_hand_landmarks.into_iter()
            .enumerate()
            .filter_map(|(i, points)| match HandLandmarkSet::try_from(points) {
                Ok(hand) => Some(hand),
                Err(e) => {
                    warn!("dropping hand {}: {}", i, e);
                    None
                }
            })
            .collect();
        DetectionResults { multi_hand_landmarks: hands }
    }
}

impl DetectionResults {
    pub fn new(hands: Vec<HandLandmarkSet>) -> Self {
        DetectionResults { multi_hand_landmarks: hands }
    }

    /// A frame in which the detector found nothing.
    pub fn empty() -> Self {
        DetectionResults::default()
    }

    /// Parse one line of a JSON-lines recording.
    pub fn from_json_line(line: &str) -> Result<Self, LandmarkError> {
        Ok(serde_json::from_str(line.trim())?)
    }

    pub fn hand_count(&self) -> usize {
        self.multi_hand_landmarks.len()
    }

    /// Shorthand for [`classify`] over this frame's hands.
    pub fn is_banzai(&self) -> bool {
        classify(&self.multi_hand_landmarks)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

/// True if this hand's wrist is in the upper half of the frame.
pub fn is_hand_raised(hand: &HandLandmarkSet) -> bool {
    hand.wrist().y < WRIST_RAISED_Y
}

/// Banzai check for one frame: at least one hand is raised.
///
/// No range validation is done; out-of-range coordinates simply land on one
/// side of the threshold.
pub fn classify(hands: &[HandLandmarkSet]) -> bool {
    hands.iter().any(is_hand_raised)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
