//! Integration tests for raster image loading.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pixelguard_adapters::FsImageSource;
use pixelguard_core::{ImageInfo, ImageSource};
use std::path::{Path, PathBuf};

fn sample_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(8, 6, |x, y| {
        Rgb([(x * 30) as u8, (y * 40) as u8, 128])
    }))
}

fn write_image(dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    sample_image()
        .save_with_format(&path, format)
        .expect("should encode fixture");
    path
}

fn load_single(path: PathBuf) -> ImageInfo {
    let source = FsImageSource::new(vec![path], false);
    let images: Vec<_> = source.images().collect();
    assert_eq!(images.len(), 1);
    images.into_iter().next().unwrap().expect("should load")
}

#[test]
fn test_load_png() {
    let dir = tempfile::tempdir().unwrap();
    let info = load_single(write_image(dir.path(), "test.png", ImageFormat::Png));
    assert_eq!((info.width, info.height), (8, 6));
    assert!(info.path.ends_with("test.png"));
    assert_eq!(info.image.to_rgb8(), sample_image().to_rgb8());
}

#[test]
fn test_load_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let info = load_single(write_image(dir.path(), "test.jpg", ImageFormat::Jpeg));
    assert_eq!((info.width, info.height), (8, 6));
    assert!(info.path.ends_with("test.jpg"));
}

#[test]
fn test_load_bmp_and_tiff() {
    let dir = tempfile::tempdir().unwrap();
    let bmp = load_single(write_image(dir.path(), "test.bmp", ImageFormat::Bmp));
    let tiff = load_single(write_image(dir.path(), "test.tiff", ImageFormat::Tiff));
    assert_eq!(bmp.width, 8);
    assert_eq!(tiff.height, 6);
}

#[test]
fn test_load_directory_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "b.png", ImageFormat::Png);
    write_image(dir.path(), "a.jpg", ImageFormat::Jpeg);
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    assert_eq!(source.count_hint(), Some(2));

    let paths: Vec<String> = source
        .images()
        .map(|r| r.expect("fixtures should load").path)
        .collect();
    assert!(paths[0].ends_with("a.jpg"));
    assert!(paths[1].ends_with("b.png"));
}

#[test]
fn test_recursive_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_image(dir.path(), "top.png", ImageFormat::Png);
    write_image(&nested, "deep.png", ImageFormat::Png);

    let flat = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    let recursive = FsImageSource::new(vec![dir.path().to_path_buf()], true);

    assert_eq!(flat.count_hint(), Some(1));
    assert_eq!(recursive.count_hint(), Some(2));
}

#[test]
fn test_corrupt_file_is_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let source = FsImageSource::new(vec![path], false);
    let failure = source
        .images()
        .next()
        .unwrap()
        .expect_err("corrupt file should fail");

    assert!(failure.path.ends_with("broken.png"));
    assert!(failure.to_string().contains("Failed to open image"));
}
