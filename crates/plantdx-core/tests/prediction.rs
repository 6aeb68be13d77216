//! End-to-end prediction tests with scripted interpreters.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use image::ImageFormat;
use plantdx_core::inference::{argmax, decode_image};
use plantdx_core::{predict, preprocess, Error, CLASS_NAMES};
use plantdx_test_support::{FixedScoresInterpreter, FnInterpreter, SyntheticLeafBuilder};

fn assert_unit_range(values: &[f32]) {
    assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_green_rgba_leaf_is_spot() {
    let leaf = SyntheticLeafBuilder::solid_rgba(512, 512, [0, 255, 0, 255]);
    let handle = FixedScoresInterpreter::new(vec![0.0, 0.0, 0.0, 0.0, 1.0]);

    let prediction = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();

    assert_eq!(prediction.label, "Spot");
    assert_eq!(prediction.index, 4);
    assert_eq!(format!("{:.2}", prediction.confidence), "1.00");
    assert_eq!(handle.calls(), 1);
}

#[test]
fn test_highest_score_wins() {
    let leaf = SyntheticLeafBuilder::spotted_leaf(300, 200);
    let handle = FixedScoresInterpreter::new(vec![0.1, 0.1, 0.6, 0.1, 0.1]);

    let prediction = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();

    assert_eq!(prediction.index, 2);
    assert_eq!(prediction.label, "Rust");
    assert_eq!(prediction.confidence, 0.6);
    assert_eq!(prediction.scores.len(), 5);
    assert!(prediction.inference_ms >= 0.0);
}

#[test]
fn test_ties_resolve_to_lowest_index() {
    let leaf = SyntheticLeafBuilder::solid_rgb(64, 64, [10, 20, 30]);
    let handle = FixedScoresInterpreter::new(vec![0.1, 0.4, 0.1, 0.4, 0.0]);

    let prediction = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();
    assert_eq!(prediction.label, "Powdery");
    assert_eq!(argmax(&[0.4, 0.4]), Some(0));
}

#[test]
fn test_predict_is_deterministic() {
    let leaf = SyntheticLeafBuilder::gradient_rgb(320, 240);
    let handle = FnInterpreter::channel_means(5);

    let first = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();
    let second = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();

    assert_eq!(first.label, second.label);
    assert_eq!(first.index, second.index);
    assert_eq!(first.scores, second.scores);
}

#[test]
fn test_class_table_mismatch_is_inference_error() {
    let leaf = SyntheticLeafBuilder::solid_rgb(32, 32, [0, 200, 0]);
    let handle = FixedScoresInterpreter::new(vec![0.2, 0.3, 0.5]);

    let err = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[test]
fn test_non_finite_scores_are_rejected() {
    let leaf = SyntheticLeafBuilder::solid_rgb(32, 32, [0, 200, 0]);
    let handle = FixedScoresInterpreter::new(vec![0.1, f32::NAN, 0.1, 0.1, 0.1]);

    let err = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[test]
fn test_predict_uses_handle_input_size() {
    let leaf = SyntheticLeafBuilder::solid_rgb(100, 80, [0, 200, 0]);
    // The fixed interpreter rejects tensors of any other shape
    let handle = FixedScoresInterpreter::with_input(vec![1.0, 0.0, 0.0, 0.0, 0.0], 96, 128);

    let prediction = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();
    assert_eq!(prediction.label, "Healthy");
}

#[test]
fn test_tensor_shape_and_range_per_color_mode() {
    let leaves = [
        SyntheticLeafBuilder::gradient_rgb(640, 480),
        SyntheticLeafBuilder::solid_rgba(512, 512, [0, 255, 0, 0]),
        SyntheticLeafBuilder::solid_gray(50, 70, 128),
        SyntheticLeafBuilder::solid_gray_alpha(224, 224, 200, 10),
        SyntheticLeafBuilder::gradient_rgb16(33, 17),
    ];

    for leaf in &leaves {
        let tensor = preprocess(&leaf.image, (224, 224)).unwrap();
        assert_eq!(tensor.dims(), &[1, 224, 224, 3], "{}", leaf.path);
        assert_eq!(tensor.dtype(), candle_core::DType::F32);

        let values = tensor.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert_unit_range(&values);
    }
}

#[test]
fn test_encoded_round_trip_predicts() {
    let leaf = SyntheticLeafBuilder::spotted_leaf(256, 256);
    let bytes = SyntheticLeafBuilder::encode(&leaf, ImageFormat::Png);
    let decoded = decode_image("leaf.png", &bytes).unwrap();
    assert_eq!((decoded.width, decoded.height), (256, 256));

    let handle = FnInterpreter::channel_means(5);
    let from_memory = predict(&leaf.image, &CLASS_NAMES, &handle).unwrap();
    let from_file = predict(&decoded.image, &CLASS_NAMES, &handle).unwrap();
    assert_eq!(from_memory.scores, from_file.scores);
}

#[test]
fn test_undecodable_bytes() {
    let err = decode_image("leaf.jpg", b"definitely not a jpeg").unwrap_err();
    match err {
        Error::ImageDecode(msg) => assert!(msg.starts_with("leaf.jpg")),
        other => panic!("expected ImageDecode, got {other:?}"),
    }
}
