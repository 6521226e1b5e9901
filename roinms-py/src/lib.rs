//! Python bindings for the roinms tile-aware NMS library.
//!
//! Boxes, scores and tiles are passed as numpy arrays; results come back as
//! indices into the input rows so callers can slice their own record arrays.

use numpy::ndarray::{ArrayView1, ArrayView2};
use numpy::{PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use roinms::{
    filter_all as rust_filter_all, suppress as rust_suppress, BBox, Detection, RoiNmsError,
    TileLayout,
};

/// Convert a RoiNmsError to a Python exception.
fn to_py_err(err: RoiNmsError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn check_cols(name: &str, arr: &ArrayView2<'_, f64>) -> PyResult<()> {
    if arr.ncols() != 4 {
        return Err(PyValueError::new_err(format!(
            "{name} must have shape (N, 4), got (N, {})",
            arr.ncols()
        )));
    }
    Ok(())
}

fn layout_from(tiles: ArrayView2<'_, f64>) -> PyResult<TileLayout> {
    check_cols("tiles", &tiles)?;
    let rows: Vec<[f64; 4]> = tiles
        .rows()
        .into_iter()
        .map(|r| [r[0], r[1], r[2], r[3]])
        .collect();
    TileLayout::from_tlwh(&rows).map_err(to_py_err)
}

fn detections_from<F: Clone>(
    frames: impl Iterator<Item = F>,
    boxes: ArrayView2<'_, f64>,
    scores: ArrayView1<'_, f64>,
) -> PyResult<Vec<Detection<F>>> {
    check_cols("boxes", &boxes)?;
    if boxes.nrows() != scores.len() {
        return Err(PyValueError::new_err(format!(
            "boxes has {} rows but scores has {} entries",
            boxes.nrows(),
            scores.len()
        )));
    }
    Ok(frames
        .zip(boxes.rows())
        .zip(scores.iter())
        .map(|((frame, r), &score)| Detection::new(frame, BBox::new(r[0], r[1], r[2], r[3]), score))
        .collect())
}

/// Tile-aware NMS over detections from a single frame.
///
/// Args:
///     boxes: (N, 4) float64 array of [x_min, y_min, x_max, y_max]
///     scores: (N,) float64 array of confidences
///     tiles: (T, 4) float64 array of [left, top, width, height]
///     iou_threshold: Suppress at IoU >= threshold (default: 0.5)
///
/// Returns:
///     Tuple (keep, tile_ids): indices of kept rows in selection order, and
///     the tile indices each kept box overlaps
#[pyfunction]
#[pyo3(signature = (boxes, scores, tiles, iou_threshold = 0.5))]
fn roi_nms(
    boxes: PyReadonlyArray2<'_, f64>,
    scores: PyReadonlyArray1<'_, f64>,
    tiles: PyReadonlyArray2<'_, f64>,
    iou_threshold: f64,
) -> PyResult<(Vec<usize>, Vec<Vec<usize>>)> {
    let layout = layout_from(tiles.as_array())?;
    let boxes = boxes.as_array();
    let detections = detections_from(std::iter::repeat(()), boxes, scores.as_array())?;

    let kept = rust_suppress(&detections, &layout, iou_threshold).map_err(to_py_err)?;
    Ok(kept
        .into_iter()
        .map(|det| (det.source_index, det.tile_ids.to_vec()))
        .unzip())
}

/// Tile-aware NMS over a multi-frame batch.
///
/// Args:
///     frames: (N,) int64 array of frame identifiers
///     boxes: (N, 4) float64 array of [x_min, y_min, x_max, y_max]
///     scores: (N,) float64 array of confidences
///     tiles: (T, 4) float64 array of [left, top, width, height]
///     iou_threshold: Suppress at IoU >= threshold (default: 0.5)
///
/// Returns:
///     Indices of kept rows, frames in first-encounter order
#[pyfunction]
#[pyo3(signature = (frames, boxes, scores, tiles, iou_threshold = 0.5))]
fn filter_frames(
    frames: PyReadonlyArray1<'_, i64>,
    boxes: PyReadonlyArray2<'_, f64>,
    scores: PyReadonlyArray1<'_, f64>,
    tiles: PyReadonlyArray2<'_, f64>,
    iou_threshold: f64,
) -> PyResult<Vec<usize>> {
    let layout = layout_from(tiles.as_array())?;
    let frames = frames.as_array();
    if frames.len() != scores.as_array().len() {
        return Err(PyValueError::new_err(format!(
            "frames has {} entries but scores has {}",
            frames.len(),
            scores.as_array().len()
        )));
    }
    let detections = detections_from(frames.iter().copied(), boxes.as_array(), scores.as_array())?;

    let kept = rust_filter_all(&detections, &layout, iou_threshold).map_err(to_py_err)?;
    Ok(kept.into_iter().map(|det| det.source_index).collect())
}

/// Python module for roinms.
#[pymodule]
fn _roinms(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(roi_nms, m)?)?;
    m.add_function(wrap_pyfunction!(filter_frames, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
