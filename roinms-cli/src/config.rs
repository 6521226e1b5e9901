use roinms::{NmsConfig, RoiNmsResult, TileLayout, DEFAULT_IOU_THRESHOLD};
use serde::Deserialize;

pub const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

/// Capture tiles of the ten-camera stadium rig, `[left, top, width, height]`.
pub const REFERENCE_RIG_TLWH: [[f64; 4]; 10] = [
    [36.0, 82.0, 1776.0, 1776.0],
    [1705.0, 80.0, 1532.0, 1532.0],
    [3126.0, 168.0, 1280.0, 1280.0],
    [4310.0, 80.0, 1532.0, 1532.0],
    [5774.0, 82.0, 1776.0, 1776.0],
    [1036.0, 1322.0, 5464.0, 1500.0],
    [0.0, 2852.0, 1938.0, 1938.0],
    [1848.0, 2852.0, 1938.0, 1938.0],
    [3786.0, 2852.0, 1938.0, 1938.0],
    [5638.0, 2852.0, 1938.0, 1938.0],
];

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tiles: Vec<[f64; 4]>,
    pub iou_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tiles: REFERENCE_RIG_TLWH.to_vec(),
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

impl Config {
    pub fn layout(&self) -> RoiNmsResult<TileLayout> {
        TileLayout::from_tlwh(&self.tiles)
    }

    pub fn nms(&self) -> NmsConfig {
        NmsConfig::new(self.iou_threshold)
    }
}
