//! Per-frame grouping and batch filtering.
//!
//! Detections are bucketed by frame key in first-encounter order, each bucket
//! is suppressed independently, and the kept detections are concatenated in
//! bucket order. Frames never interact.

use crate::detection::{validate_all, Detection, RoiDetection};
use crate::nms::{suppress_validated, NmsConfig};
use crate::tile::TileLayout;
use crate::trace::{stage_event, stage_span};
use crate::util::RoiNmsResult;
use std::collections::HashMap;
use std::hash::Hash;

/// Per-frame counts from one filter run.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSummary<F> {
    pub frame: F,
    /// Detections seen for this frame.
    pub input: usize,
    pub kept: usize,
    pub suppressed: usize,
}

/// Kept detections plus per-frame counts.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterReport<F> {
    /// Kept detections, frames concatenated in first-encounter order.
    pub detections: Vec<RoiDetection<F>>,
    /// One entry per frame, same order as `detections`.
    pub frames: Vec<FrameSummary<F>>,
}

impl<F> FilterReport<F> {
    /// Detections across all frames.
    pub fn total_input(&self) -> usize {
        self.frames.iter().map(|f| f.input).sum()
    }

    /// Detections kept across all frames.
    pub fn total_kept(&self) -> usize {
        self.detections.len()
    }

    /// Detections dropped across all frames.
    pub fn total_suppressed(&self) -> usize {
        self.total_input() - self.total_kept()
    }
}

/// Reusable filter bound to a tile layout and suppression parameters.
#[derive(Clone, Debug)]
pub struct FramePipeline {
    layout: TileLayout,
    cfg: NmsConfig,
}

impl FramePipeline {
    /// Creates a pipeline with the default [`NmsConfig`].
    pub fn new(layout: TileLayout) -> Self {
        Self {
            layout,
            cfg: NmsConfig::default(),
        }
    }

    /// Replaces the suppression parameters.
    pub fn with_config(mut self, cfg: NmsConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Tile layout used for membership.
    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    /// Current suppression parameters.
    pub fn config(&self) -> &NmsConfig {
        &self.cfg
    }

    /// Filters every frame and returns the concatenated kept detections.
    pub fn filter_all<F>(&self, detections: &[Detection<F>]) -> RoiNmsResult<Vec<RoiDetection<F>>>
    where
        F: Eq + Hash + Clone,
    {
        Ok(self.filter_with_report(detections)?.detections)
    }

    /// Filters every frame and also reports per-frame counts.
    ///
    /// All input is validated before any frame is processed; on error nothing
    /// is returned.
    pub fn filter_with_report<F>(&self, detections: &[Detection<F>]) -> RoiNmsResult<FilterReport<F>>
    where
        F: Eq + Hash + Clone,
    {
        self.cfg.validate()?;
        validate_all(detections)?;

        let buckets = group_by_frame(detections);
        let _span = stage_span!(
            "nms_batch",
            detections = detections.len(),
            frames = buckets.len()
        )
        .entered();

        let mut kept_all = Vec::new();
        let mut frames = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let members: Vec<Detection<F>> =
                bucket.iter().map(|&idx| detections[idx].clone()).collect();
            let kept = suppress_validated(&members, &self.layout, &self.cfg)?;

            frames.push(FrameSummary {
                frame: members[0].frame.clone(),
                input: members.len(),
                kept: kept.len(),
                suppressed: members.len() - kept.len(),
            });
            // Map bucket-local positions back to positions in `detections`.
            kept_all.extend(kept.into_iter().map(|mut det| {
                det.source_index = bucket[det.source_index];
                det
            }));
        }

        stage_event!(
            "nms_batch_done",
            frames = frames.len(),
            kept = kept_all.len(),
            input = detections.len()
        );

        Ok(FilterReport {
            detections: kept_all,
            frames,
        })
    }
}

/// Filters a multi-frame batch with tile-aware NMS.
///
/// Equivalent to `FramePipeline::new(layout.clone())` with the given
/// threshold; see [`FramePipeline::filter_all`].
pub fn filter_all<F>(
    detections: &[Detection<F>],
    layout: &TileLayout,
    iou_threshold: f64,
) -> RoiNmsResult<Vec<RoiDetection<F>>>
where
    F: Eq + Hash + Clone,
{
    FramePipeline::new(layout.clone())
        .with_config(NmsConfig::new(iou_threshold))
        .filter_all(detections)
}

/// Groups detection indices by frame, buckets in first-encounter order.
fn group_by_frame<F: Eq + Hash>(detections: &[Detection<F>]) -> Vec<Vec<usize>> {
    let mut bucket_of: HashMap<&F, usize> = HashMap::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (idx, det) in detections.iter().enumerate() {
        let slot = *bucket_of.entry(&det.frame).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(idx);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::{filter_all, group_by_frame, FramePipeline};
    use crate::detection::Detection;
    use crate::geometry::BBox;
    use crate::nms::NmsConfig;
    use crate::tile::TileLayout;
    use crate::util::RoiNmsError;

    fn det(frame: &'static str, bbox: [f64; 4], score: f64) -> Detection<&'static str> {
        Detection::new(frame, BBox::from(bbox), score)
    }

    fn layout() -> TileLayout {
        TileLayout::from_tlwh(&[[0.0, 0.0, 20.0, 20.0]]).unwrap()
    }

    #[test]
    fn groups_follow_first_encounter_order() {
        let dets = vec![
            det("b", [0.0, 0.0, 1.0, 1.0], 0.1),
            det("a", [0.0, 0.0, 1.0, 1.0], 0.2),
            det("b", [0.0, 0.0, 1.0, 1.0], 0.3),
            det("c", [0.0, 0.0, 1.0, 1.0], 0.4),
            det("a", [0.0, 0.0, 1.0, 1.0], 0.5),
        ];
        assert_eq!(
            group_by_frame(&dets),
            vec![vec![0, 2], vec![1, 4], vec![3]]
        );
    }

    #[test]
    fn source_index_points_into_full_batch() {
        let dets = vec![
            det("a", [0.0, 0.0, 10.0, 10.0], 0.9),
            det("b", [0.0, 0.0, 10.0, 10.0], 0.4),
            det("b", [1.0, 1.0, 9.0, 9.0], 0.8),
        ];
        let kept = filter_all(&dets, &layout(), 0.5).unwrap();
        let idx: Vec<usize> = kept.iter().map(|d| d.source_index).collect();
        assert_eq!(idx, vec![0, 2]);
        assert_eq!(*kept[1].frame(), "b");
    }

    #[test]
    fn report_counts_per_frame() {
        let dets = vec![
            det("a", [0.0, 0.0, 10.0, 10.0], 0.9),
            det("a", [1.0, 1.0, 9.0, 9.0], 0.5),
            det("b", [0.0, 0.0, 10.0, 10.0], 0.7),
        ];
        let report = FramePipeline::new(layout())
            .filter_with_report(&dets)
            .unwrap();
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.frames[0].frame, "a");
        assert_eq!(
            (report.frames[0].input, report.frames[0].kept, report.frames[0].suppressed),
            (2, 1, 1)
        );
        assert_eq!(report.frames[1].kept, 1);
        assert_eq!(report.total_input(), 3);
        assert_eq!(report.total_kept(), 2);
        assert_eq!(report.total_suppressed(), 1);
    }

    #[test]
    fn invalid_threshold_fails_before_any_frame() {
        let dets = vec![det("a", [0.0, 0.0, 1.0, 1.0], 0.9)];
        let pipeline = FramePipeline::new(layout()).with_config(NmsConfig::new(2.0));
        assert!(matches!(
            pipeline.filter_all(&dets),
            Err(RoiNmsError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn malformed_record_in_later_frame_fails_whole_batch() {
        let dets = vec![
            det("a", [0.0, 0.0, 1.0, 1.0], 0.9),
            det("b", [5.0, 0.0, 1.0, 1.0], 0.9),
        ];
        assert!(matches!(
            filter_all(&dets, &layout(), 0.5),
            Err(RoiNmsError::MalformedDetection { index: Some(1), .. })
        ));
    }
}
