//! Detection records and their tile-augmented form.

use crate::geometry::BBox;
use crate::tile::TileIds;
use crate::util::{RoiNmsError, RoiNmsResult};

/// One candidate object instance in one frame.
///
/// `F` is the frame key used to group detections; any `Eq + Hash + Clone`
/// type works (integer indices, timestamps, file names).
#[derive(Clone, Debug, PartialEq)]
pub struct Detection<F> {
    pub frame: F,
    pub bbox: BBox,
    /// Confidence used for ranking only; no range is assumed.
    pub score: f64,
}

impl<F> Detection<F> {
    /// Creates a detection without validation.
    pub fn new(frame: F, bbox: BBox, score: f64) -> Self {
        Self { frame, bbox, score }
    }

    /// Creates a detection, rejecting a malformed box or a non-finite score.
    pub fn try_new(frame: F, bbox: BBox, score: f64) -> RoiNmsResult<Self> {
        let det = Self::new(frame, bbox, score);
        det.validate()?;
        Ok(det)
    }

    /// Checks the box ordering and that the score is finite.
    pub fn validate(&self) -> RoiNmsResult<()> {
        self.bbox.validate()?;
        if !self.score.is_finite() {
            return Err(RoiNmsError::malformed(format!(
                "score {} is not finite",
                self.score
            )));
        }
        Ok(())
    }
}

/// A detection kept by suppression, with its computed tile membership.
///
/// The caller's record is cloned, never modified.
#[derive(Clone, Debug, PartialEq)]
pub struct RoiDetection<F> {
    pub detection: Detection<F>,
    pub tile_ids: TileIds,
    /// Position of the detection in the slice passed to the filter call.
    pub source_index: usize,
}

impl<F> RoiDetection<F> {
    /// Frame key of the kept detection.
    pub fn frame(&self) -> &F {
        &self.detection.frame
    }

    /// Box of the kept detection.
    pub fn bbox(&self) -> &BBox {
        &self.detection.bbox
    }

    /// Score of the kept detection.
    pub fn score(&self) -> f64 {
        self.detection.score
    }
}

/// Validates every detection, tagging failures with their slice position.
pub(crate) fn validate_all<F>(detections: &[Detection<F>]) -> RoiNmsResult<()> {
    for (idx, det) in detections.iter().enumerate() {
        det.validate().map_err(|err| err.at_index(idx))?;
    }
    Ok(())
}
