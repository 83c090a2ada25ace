// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use mini_detection_node::detection::{
    corners_to_box, nms, resolve_detections, DetectionError, LabelTable, RawDetection,
};
use std::io::Write;

fn raw(class_index: usize, confidence: f32, corners: [f32; 4]) -> RawDetection {
    RawDetection {
        class_index,
        confidence,
        corners,
    }
}

#[test]
fn test_box_derivation_from_corners() {
    assert_eq!(
        corners_to_box([10.0, 20.0, 50.0, 80.0]).unwrap(),
        [10.0, 20.0, 40.0, 60.0]
    );
}

#[test]
fn test_negative_geometry_is_dropped_not_fatal() {
    let labels = LabelTable::coco();
    let detections = resolve_detections(
        vec![
            raw(0, 0.9, [10.0, 20.0, 50.0, 80.0]),
            raw(2, 0.8, [60.0, 10.0, 20.0, 40.0]),
            raw(7, 0.7, [0.0, 0.0, 5.0, 5.0]),
        ],
        &labels,
    )
    .unwrap();

    let names: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(names, vec!["person", "truck"]);
}

#[test]
fn test_unknown_class_index_is_fatal() {
    let labels = LabelTable::coco();
    let err = resolve_detections(vec![raw(120, 0.9, [0.0, 0.0, 1.0, 1.0])], &labels).unwrap_err();
    match err {
        DetectionError::UnknownClassIndex { index, table_len } => {
            assert_eq!(index, 120);
            assert_eq!(table_len, 80);
        }
        other => panic!("Expected UnknownClassIndex, got {:?}", other),
    }
}

#[test]
fn test_custom_label_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "helmet").unwrap();
    writeln!(file, "vest").unwrap();

    let labels = LabelTable::from_file(file.path()).unwrap();
    let detections = resolve_detections(vec![raw(1, 0.6, [1.0, 1.0, 3.0, 4.0])], &labels).unwrap();
    assert_eq!(detections[0].label, "vest");
    assert_eq!(detections[0].bbox, [1.0, 1.0, 2.0, 3.0]);

    assert!(resolve_detections(vec![raw(2, 0.6, [0.0, 0.0, 1.0, 1.0])], &labels).is_err());
}

#[test]
fn test_emission_order_is_preserved() {
    let labels = LabelTable::coco();
    let detections = resolve_detections(
        vec![
            raw(16, 0.3, [0.0, 0.0, 1.0, 1.0]),
            raw(0, 0.9, [0.0, 0.0, 1.0, 1.0]),
        ],
        &labels,
    )
    .unwrap();
    assert_eq!(detections[0].label, "dog");
    assert_eq!(detections[1].label, "person");
}

#[test]
fn test_nms_keeps_distinct_classes() {
    let kept = nms(
        vec![
            raw(0, 0.9, [0.0, 0.0, 100.0, 100.0]),
            raw(0, 0.8, [2.0, 2.0, 100.0, 100.0]),
            raw(16, 0.7, [0.0, 0.0, 100.0, 100.0]),
        ],
        0.45,
        300,
    );
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].class_index, 0);
    assert_eq!(kept[1].class_index, 16);
}
