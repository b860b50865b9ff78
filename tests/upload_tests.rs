use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use circular_gallery::upload::loader::{self, UploadEvent, UploadWorker};
use uuid::Uuid;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 40, 40, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("circular-gallery-upload-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn image_paths_are_recognised_by_extension() {
    assert!(loader::is_image_path(Path::new("holiday.png")));
    assert!(loader::is_image_path(Path::new("/photos/cat.jpg")));
    assert!(loader::is_image_path(Path::new("scan.jpeg")));
    assert!(!loader::is_image_path(Path::new("notes.txt")));
    assert!(!loader::is_image_path(Path::new("README")));
    assert_eq!(loader::display_name(Path::new("/photos/cat.jpg")), "cat.jpg");
}

#[test]
fn decode_bytes_keeps_small_images_and_shrinks_large_ones() {
    let small = loader::decode_bytes(&png_bytes(4, 2), 512).expect("decode small");
    assert_eq!(small.size, [4, 2]);
    assert_eq!(small.pixels.len(), 8);

    let large = loader::decode_bytes(&png_bytes(64, 32), 16).expect("decode large");
    assert_eq!(large.size, [16, 8]);

    // Zero keeps the original resolution
    let full = loader::decode_bytes(&png_bytes(64, 32), 0).expect("decode full");
    assert_eq!(full.size, [64, 32]);
}

#[test]
fn decode_rejects_non_image_data() {
    assert!(loader::decode_bytes(b"definitely not a picture", 512).is_err());
    assert!(loader::decode_path(Path::new("/nonexistent/circular-gallery.png"), 512).is_err());
}

#[test]
fn worker_decodes_images_and_skips_everything_else() {
    let dir = scratch_dir();
    let photo = dir.join("sunset.png");
    let text = dir.join("notes.txt");
    let broken = dir.join("broken.png");
    std::fs::write(&photo, png_bytes(8, 8)).expect("write png");
    std::fs::write(&text, "hello").expect("write txt");
    std::fs::write(&broken, "not really a png").expect("write broken");

    let mut worker = UploadWorker::new();
    assert!(!worker.is_busy());
    worker.spawn(vec![text, photo.clone(), broken], 512, None);
    assert!(worker.is_busy());

    let mut names = Vec::new();
    let mut finished = None;
    for _ in 0..500 {
        for event in worker.poll() {
            match event {
                UploadEvent::Decoded(p) => {
                    assert_eq!(p.image.size, [8, 8]);
                    assert_eq!(p.src, photo.display().to_string());
                    names.push(p.name);
                }
                UploadEvent::Finished { decoded, skipped } => finished = Some((decoded, skipped)),
            }
        }
        if finished.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(finished, Some((1, 2)));
    assert_eq!(names, vec!["sunset.png".to_string()]);
    assert!(!worker.is_busy());

    // Empty batches never start a thread
    worker.spawn(Vec::new(), 512, None);
    assert!(!worker.is_busy());

    let _ = std::fs::remove_dir_all(dir);
}
