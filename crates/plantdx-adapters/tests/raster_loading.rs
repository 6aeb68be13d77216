//! Integration tests for loading leaf photos from disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use plantdx_adapters::FsImageSource;
use plantdx_core::{Error, ImageSource};

fn write_rgb(path: &Path, format: ImageFormat) {
    RgbImage::from_pixel(8, 6, Rgb([40, 160, 40]))
        .save_with_format(path, format)
        .expect("write fixture");
}

fn fixtures() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_rgb(&dir.path().join("leaf.jpg"), ImageFormat::Jpeg);
    write_rgb(&dir.path().join("leaf.png"), ImageFormat::Png);
    RgbaImage::from_pixel(8, 6, Rgba([0, 255, 0, 128]))
        .save_with_format(dir.path().join("alpha.png"), ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_rgb(&nested.join("deep.jpeg"), ImageFormat::Jpeg);
    dir
}

#[test]
fn test_load_jpeg() {
    let dir = fixtures();
    let source = FsImageSource::new(vec![dir.path().join("leaf.jpg")], false);

    let images: Vec<_> = source.images().collect();
    assert_eq!(images.len(), 1);

    let leaf = images.into_iter().next().unwrap().expect("should load JPEG");
    assert_eq!(leaf.width, 8);
    assert_eq!(leaf.height, 6);
    assert!(leaf.path.ends_with("leaf.jpg"));
}

#[test]
fn test_load_png_with_alpha() {
    let dir = fixtures();
    let source = FsImageSource::new(vec![dir.path().join("alpha.png")], false);

    let leaf = source.images().next().unwrap().expect("should load PNG");
    assert_eq!(leaf.dimensions().width, 8);
    assert!(leaf.image.color().has_alpha());
}

#[test]
fn test_directory_scan_is_sorted_and_filtered() {
    let dir = fixtures();
    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);

    let paths: Vec<String> = source.images().map(|r| r.unwrap().path).collect();
    assert_eq!(paths.len(), 3);
    assert!(paths[0].ends_with("alpha.png"));
    assert!(paths[1].ends_with("leaf.jpg"));
    assert!(paths[2].ends_with("leaf.png"));
    assert_eq!(source.count_hint(), Some(3));
}

#[test]
fn test_recursive_scan() {
    let dir = fixtures();
    let source = FsImageSource::new(vec![dir.path().to_path_buf()], true);

    let paths: Vec<String> = source.images().map(|r| r.unwrap().path).collect();
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().any(|p| p.ends_with("deep.jpeg")));
}

#[test]
fn test_missing_path_yields_nothing() {
    let source = FsImageSource::new(vec![PathBuf::from("/nonexistent/leaf.jpg")], false);
    assert_eq!(source.images().count(), 0);
    assert_eq!(source.count_hint(), Some(0));
}

#[test]
fn test_corrupt_image_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

    let source = FsImageSource::new(vec![path], false);
    let result = source.images().next().unwrap();
    match result {
        Err(Error::ImageDecode(msg)) => assert!(msg.contains("broken.png")),
        other => panic!("expected ImageDecode, got {other:?}"),
    }
}
