//! Tile-aware greedy non-maximum suppression for a single frame.
//!
//! A lower-scoring detection is dropped only when its IoU with a selected
//! detection reaches the threshold and the two share at least one tile.
//! Detections that overlap in image coordinates but were seen through
//! disjoint tiles both survive.

use crate::detection::{validate_all, Detection, RoiDetection};
use crate::tile::{TileIds, TileLayout};
use crate::trace::{stage_event, stage_span};
use crate::util::{RoiNmsError, RoiNmsResult};
use std::cmp::Ordering;

/// Default IoU at or above which a detection can be suppressed.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Parameters for tile-aware suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct NmsConfig {
    /// Suppress when `iou >= iou_threshold`. Must lie in `[0, 1]`.
    pub iou_threshold: f64,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

impl NmsConfig {
    /// Config with the given threshold; checked by [`NmsConfig::validate`].
    pub fn new(iou_threshold: f64) -> Self {
        Self { iou_threshold }
    }

    /// Rejects thresholds outside `[0, 1]`, including NaN.
    pub fn validate(&self) -> RoiNmsResult<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(RoiNmsError::config(format!(
                "iou_threshold {} is outside [0, 1]",
                self.iou_threshold
            )));
        }
        Ok(())
    }
}

/// Runs tile-aware NMS on detections from one frame.
///
/// Returns the kept detections in selection order (descending score, equal
/// scores in input order). Frame keys are not inspected; callers that mix
/// frames should go through [`crate::pipeline::filter_all`].
pub fn suppress<F: Clone>(
    detections: &[Detection<F>],
    layout: &TileLayout,
    iou_threshold: f64,
) -> RoiNmsResult<Vec<RoiDetection<F>>> {
    let cfg = NmsConfig::new(iou_threshold);
    cfg.validate()?;
    validate_all(detections)?;
    suppress_validated(detections, layout, &cfg)
}

/// Suppression core; inputs must already be validated.
pub(crate) fn suppress_validated<F: Clone>(
    detections: &[Detection<F>],
    layout: &TileLayout,
    cfg: &NmsConfig,
) -> RoiNmsResult<Vec<RoiDetection<F>>> {
    let _span = stage_span!("nms_frame", detections = detections.len()).entered();

    let tile_ids: Vec<TileIds> = detections
        .iter()
        .map(|det| layout.overlapping(&det.bbox))
        .collect();

    let order = rank_by_score(detections);
    let mut active = vec![true; order.len()];
    let mut kept = Vec::new();

    for (rank, &best) in order.iter().enumerate() {
        if !active[rank] {
            continue;
        }
        kept.push(best);

        let best_box = &detections[best].bbox;
        for (other_rank, &other) in order.iter().enumerate().skip(rank + 1) {
            if !active[other_rank] {
                continue;
            }
            let iou = best_box.iou(&detections[other].bbox)?;
            if iou >= cfg.iou_threshold && tile_ids[best].shares_tile(&tile_ids[other]) {
                active[other_rank] = false;
            }
        }
    }

    stage_event!(
        "nms_frame_done",
        input = detections.len(),
        kept = kept.len(),
        suppressed = detections.len() - kept.len()
    );

    Ok(kept
        .into_iter()
        .map(|idx| RoiDetection {
            detection: detections[idx].clone(),
            tile_ids: tile_ids[idx].clone(),
            source_index: idx,
        })
        .collect())
}

/// Indices of `detections` by descending score.
///
/// `sort_by` is stable, so equal scores keep their input order. Scores are
/// finite after validation.
fn rank_by_score<F>(detections: &[Detection<F>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| {
        detections[b]
            .score
            .partial_cmp(&detections[a].score)
            .unwrap_or(Ordering::Equal)
    });
    order
}
