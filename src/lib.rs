//! roinms filters object detections from multi-tile camera frames with a
//! tile-aware variant of non-maximum suppression.
//!
//! A composite frame is stitched from several overlapping capture tiles, and
//! a subject near a tile boundary can be detected once per tile. Standard NMS
//! would also remove true detections that merely overlap in image
//! coordinates. Here a lower-scoring detection is suppressed only when its
//! IoU with a kept detection reaches the threshold *and* both share a tile.
//!
//! ```
//! use roinms::{filter_all, BBox, Detection, TileLayout};
//!
//! let layout = TileLayout::from_tlwh(&[[0.0, 0.0, 20.0, 20.0]])?;
//! let detections = vec![
//!     Detection::new(0, BBox::new(0.0, 0.0, 10.0, 10.0), 0.9),
//!     Detection::new(0, BBox::new(1.0, 1.0, 9.0, 9.0), 0.5),
//! ];
//! let kept = filter_all(&detections, &layout, 0.5)?;
//! assert_eq!(kept.len(), 1);
//! # Ok::<(), roinms::RoiNmsError>(())
//! ```

pub mod detection;
pub mod geometry;
pub mod nms;
pub mod pipeline;
pub mod tile;
mod trace;
pub mod util;

pub use detection::{Detection, RoiDetection};
pub use geometry::{iou, BBox, Tile};
pub use nms::{suppress, NmsConfig, DEFAULT_IOU_THRESHOLD};
pub use pipeline::{filter_all, FilterReport, FramePipeline, FrameSummary};
pub use tile::{tiles_overlapping, TileIds, TileLayout};
pub use util::{RoiNmsError, RoiNmsResult};
