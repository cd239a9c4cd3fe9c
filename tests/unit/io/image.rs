//! Validates PNG export

use image::{Rgba, RgbaImage};
use stampede::io::image::export_png;
use tempfile::TempDir;

#[test]
fn test_export_round_trips_pixel_data() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("painting.png");
    let image = RgbaImage::from_fn(9, 7, |x, y| Rgba([x as u8 * 20, y as u8 * 30, 5, 255]));

    export_png(&image, &path).expect("export succeeds");

    let loaded = image::open(&path).expect("file decodes").to_rgba8();
    assert_eq!(loaded.dimensions(), (9, 7));
    assert_eq!(loaded.as_raw(), image.as_raw());
}

#[test]
fn test_export_creates_missing_parent_directories() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("deep").join("nested").join("painting.png");
    let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));

    export_png(&image, &path).expect("export creates parents");
    assert!(path.exists());
}

#[test]
fn test_export_through_a_file_as_directory_fails() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "plain file").expect("file writes");
    let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
    assert!(export_png(&image, &blocker.join("painting.png")).is_err());
}
