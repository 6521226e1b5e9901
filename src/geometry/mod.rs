//! Axis-aligned box types and overlap measures.
//!
//! Two coordinate conventions are in play and each has its own type:
//! detection boxes are corner based (`[x_min, y_min, x_max, y_max]`, see
//! [`BBox`]) while capture tiles are stored as origin plus size
//! (`[left, top, width, height]`, see [`Tile`]). Tiles are converted to
//! corner form before any overlap test, so every comparison happens in a
//! single convention.

use crate::util::{RoiNmsError, RoiNmsResult};

/// Detection bounding box in corner form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BBox {
    /// Creates a box without validation.
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Creates a box, rejecting non-finite coordinates and inverted axes.
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> RoiNmsResult<Self> {
        let bbox = Self::new(x_min, y_min, x_max, y_max);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Creates a box from exactly four ordered coordinates.
    pub fn from_slice(coords: &[f64]) -> RoiNmsResult<Self> {
        match *coords {
            [x_min, y_min, x_max, y_max] => Self::try_new(x_min, y_min, x_max, y_max),
            _ => Err(RoiNmsError::malformed(format!(
                "bbox must have exactly 4 coordinates, got {}",
                coords.len()
            ))),
        }
    }

    /// Checks that coordinates and area are finite and `min <= max` on both
    /// axes.
    pub fn validate(&self) -> RoiNmsResult<()> {
        if !self.to_array().iter().all(|v| v.is_finite()) {
            return Err(RoiNmsError::malformed(format!(
                "bbox {:?} has non-finite coordinates",
                self.to_array()
            )));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(RoiNmsError::malformed(format!(
                "bbox {:?} is not ordered as [x_min, y_min, x_max, y_max]",
                self.to_array()
            )));
        }
        if !self.area().is_finite() {
            return Err(RoiNmsError::malformed(format!(
                "bbox {:?} area overflows",
                self.to_array()
            )));
        }
        Ok(())
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Enclosed area; zero for line or point boxes.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true when the box encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }

    /// Returns the coordinates as `[x_min, y_min, x_max, y_max]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    /// Intersection over union with `other`; see [`iou`].
    pub fn iou(&self, other: &BBox) -> RoiNmsResult<f64> {
        iou(self, other)
    }

    /// Returns true when the open interiors of both boxes intersect.
    ///
    /// Boxes that only touch along an edge or at a corner do not overlap.
    pub fn overlaps_strictly(&self, other: &BBox) -> bool {
        let x1 = self.x_min.max(other.x_min);
        let y1 = self.y_min.max(other.y_min);
        let x2 = self.x_max.min(other.x_max);
        let y2 = self.y_max.min(other.y_max);
        x1 < x2 && y1 < y2
    }
}

impl From<[f64; 4]> for BBox {
    fn from(value: [f64; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

/// Capture tile in origin-plus-size form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Tile {
    /// Creates a tile from its origin and size.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a tile from `[left, top, width, height]`.
    pub fn from_array(tlwh: [f64; 4]) -> Self {
        Self::new(tlwh[0], tlwh[1], tlwh[2], tlwh[3])
    }

    /// Returns the tile corners as a [`BBox`].
    pub fn to_bbox(&self) -> BBox {
        BBox::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Returns the tile as `[left, top, width, height]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.top, self.width, self.height]
    }
}

/// Intersection over union of two corner-form boxes.
///
/// The intersection extents are clamped at zero, so disjoint boxes score
/// `0.0`. Fails with [`RoiNmsError::DegenerateBox`] when the union area is
/// zero, which only happens when both boxes have zero area. Boxes whose
/// area overflows `f64` fail with [`RoiNmsError::MalformedDetection`].
pub fn iou(a: &BBox, b: &BBox) -> RoiNmsResult<f64> {
    let inter_w = (a.x_max.min(b.x_max) - a.x_min.max(b.x_min)).max(0.0);
    let inter_h = (a.y_max.min(b.y_max) - a.y_min.max(b.y_min)).max(0.0);
    let inter = inter_w * inter_h;

    let union = a.area() + b.area() - inter;
    if !union.is_finite() {
        return Err(RoiNmsError::malformed(format!(
            "union of {:?} and {:?} is not finite",
            a.to_array(),
            b.to_array()
        )));
    }
    if union <= 0.0 {
        return Err(RoiNmsError::DegenerateBox {
            a: a.to_array(),
            b: b.to_array(),
        });
    }
    Ok(inter / union)
}

#[cfg(test)]
mod tests {
    use super::{iou, BBox, Tile};
    use crate::util::RoiNmsError;

    #[test]
    fn iou_of_nested_boxes() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(1.0, 1.0, 9.0, 9.0);
        let value = iou(&a, &b).unwrap();
        assert!((value - 0.64).abs() < 1e-12);
    }

    #[test]
    fn iou_is_zero_for_touching_boxes() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(iou(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn iou_with_one_degenerate_box_is_zero() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let point = BBox::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(iou(&a, &point).unwrap(), 0.0);
    }

    #[test]
    fn iou_rejects_two_degenerate_boxes() {
        let a = BBox::new(0.0, 0.0, 0.0, 5.0);
        let b = BBox::new(3.0, 3.0, 3.0, 3.0);
        let err = iou(&a, &b).unwrap_err();
        assert_eq!(
            err,
            RoiNmsError::DegenerateBox {
                a: [0.0, 0.0, 0.0, 5.0],
                b: [3.0, 3.0, 3.0, 3.0],
            }
        );
    }

    #[test]
    fn iou_rejects_overflowing_area() {
        let huge = BBox::new(-1e200, -1e200, 1e200, 1e200);
        assert!(matches!(
            iou(&huge, &huge),
            Err(RoiNmsError::MalformedDetection { .. })
        ));
        assert!(matches!(
            huge.validate(),
            Err(RoiNmsError::MalformedDetection { .. })
        ));
        assert!(BBox::try_new(-1e150, -1e150, 1e150, 1e150).is_ok());
    }

    #[test]
    fn from_slice_requires_four_coordinates() {
        assert!(BBox::from_slice(&[0.0, 0.0, 1.0]).is_err());
        assert!(BBox::from_slice(&[0.0, 0.0, 1.0, 1.0, 2.0]).is_err());
        assert_eq!(
            BBox::from_slice(&[0.0, 1.0, 2.0, 3.0]).unwrap(),
            BBox::new(0.0, 1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn try_new_rejects_inverted_axes() {
        assert!(BBox::try_new(5.0, 0.0, 1.0, 1.0).is_err());
        assert!(BBox::try_new(0.0, 5.0, 1.0, 1.0).is_err());
        assert!(BBox::try_new(0.0, 0.0, f64::NAN, 1.0).is_err());
        assert!(BBox::try_new(1.0, 1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn tile_converts_to_corners() {
        let tile = Tile::new(36.0, 82.0, 1776.0, 1776.0);
        assert_eq!(tile.to_bbox(), BBox::new(36.0, 82.0, 1812.0, 1858.0));
    }

    #[test]
    fn strict_overlap_excludes_shared_edges() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps_strictly(&BBox::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!a.overlaps_strictly(&BBox::new(10.0, 10.0, 20.0, 20.0)));
        assert!(a.overlaps_strictly(&BBox::new(9.5, 9.5, 20.0, 20.0)));
    }
}
