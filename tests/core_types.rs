use roinms::{iou, BBox, Detection, NmsConfig, RoiNmsError, Tile, TileLayout};

#[test]
fn bbox_rejects_wrong_arity() {
    let err = BBox::from_slice(&[1.0, 2.0, 3.0]).err().unwrap();
    assert_eq!(
        err,
        RoiNmsError::MalformedDetection {
            index: None,
            reason: "bbox must have exactly 4 coordinates, got 3".to_string(),
        }
    );
}

#[test]
fn bbox_rejects_unordered_corners() {
    let err = BBox::try_new(10.0, 0.0, 0.0, 10.0).err().unwrap();
    assert!(matches!(err, RoiNmsError::MalformedDetection { .. }));
}

#[test]
fn bbox_reports_size() {
    let bbox = BBox::new(2.0, 3.0, 7.0, 11.0);
    assert_eq!(bbox.width(), 5.0);
    assert_eq!(bbox.height(), 8.0);
    assert_eq!(bbox.area(), 40.0);
    assert!(!bbox.is_degenerate());
    assert!(BBox::new(2.0, 3.0, 2.0, 11.0).is_degenerate());
}

#[test]
fn degenerate_iou_names_both_boxes() {
    let a = BBox::new(1.0, 1.0, 1.0, 1.0);
    let b = BBox::new(4.0, 4.0, 9.0, 4.0);
    let err = iou(&a, &b).err().unwrap();
    assert_eq!(
        err,
        RoiNmsError::DegenerateBox {
            a: [1.0, 1.0, 1.0, 1.0],
            b: [4.0, 4.0, 9.0, 4.0],
        }
    );
}

#[test]
fn tile_round_trips_through_array() {
    let tile = Tile::from_array([1036.0, 1322.0, 5464.0, 1500.0]);
    assert_eq!(tile.to_array(), [1036.0, 1322.0, 5464.0, 1500.0]);
    assert_eq!(tile.to_bbox().to_array(), [1036.0, 1322.0, 6500.0, 2822.0]);
}

#[test]
fn layout_error_names_offending_tile() {
    let err = TileLayout::from_tlwh(&[[0.0, 0.0, 10.0, 10.0], [5.0, 5.0, 4.0, -1.0]])
        .err()
        .unwrap();
    assert_eq!(
        err,
        RoiNmsError::InvalidConfiguration {
            reason: "tile 1 has negative size 4x-1".to_string(),
        }
    );
}

#[test]
fn default_threshold_is_one_half() {
    assert_eq!(NmsConfig::default().iou_threshold, 0.5);
    assert!(NmsConfig::default().validate().is_ok());
}

#[test]
fn detection_validate_catches_infinite_score() {
    let det = Detection::new(0u8, BBox::new(0.0, 0.0, 1.0, 1.0), f64::NEG_INFINITY);
    assert!(matches!(
        det.validate(),
        Err(RoiNmsError::MalformedDetection { .. })
    ));
}
