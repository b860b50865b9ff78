use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Context as _;
use eframe::egui;
use image::{imageops::FilterType, ImageFormat};
use log::{debug, info, warn};

/// Extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga"];

/// Pixels decoded off the UI thread, ready to become a texture.
pub struct DecodedPhoto {
    pub name: String,
    pub src: String,
    pub image: egui::ColorImage,
}

pub enum UploadEvent {
    Decoded(DecodedPhoto),
    // One per batch, after every file in it was handled
    Finished { decoded: usize, skipped: usize },
}

pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

/// Dropped files without a MIME type are let through and judged by decoding.
pub fn is_image_mime(mime: &str) -> bool {
    mime.is_empty() || mime.starts_with("image/")
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .unwrap_or_else(|| path.display().to_string())
}

/// Open the native multi-select picker restricted to image files.
pub fn pick_photos(start_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Upload Photos")
        .add_filter("Images", IMAGE_EXTENSIONS);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_files().unwrap_or_default()
}

/// Decode any supported image and shrink it to fit inside `max_dim` pixels.
/// A `max_dim` of zero keeps the original resolution.
pub fn decode_bytes(bytes: &[u8], max_dim: u32) -> anyhow::Result<egui::ColorImage> {
    let img = image::load_from_memory(bytes).context("unrecognised image data")?;
    let img = if max_dim > 0 && (img.width() > max_dim || img.height() > max_dim) {
        img.resize(max_dim, max_dim, FilterType::Triangle)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

pub fn decode_path(path: &Path, max_dim: u32) -> anyhow::Result<DecodedPhoto> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let image = decode_bytes(&bytes, max_dim).with_context(|| format!("decoding {}", path.display()))?;
    Ok(DecodedPhoto {
        name: display_name(path),
        src: path.display().to_string(),
        image,
    })
}

/// Background decoder for upload batches.
///
/// Each batch runs on its own thread and reports back through a channel the
/// UI drains once per frame. Files that are not images are skipped without
/// surfacing an error.
pub struct UploadWorker {
    tx: Sender<UploadEvent>,
    rx: Receiver<UploadEvent>,
    in_flight: usize,
}

impl Default for UploadWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWorker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, in_flight: 0 }
    }

    pub fn spawn(&mut self, paths: Vec<PathBuf>, max_dim: u32, ctx: Option<egui::Context>) {
        if paths.is_empty() {
            return;
        }
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("photo-upload".into())
            .spawn(move || run_batch(paths, max_dim, tx, ctx));
        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(e) => warn!("could not start upload thread: {}", e),
        }
    }

    /// Drain everything the workers have produced so far.
    pub fn poll(&mut self) -> Vec<UploadEvent> {
        let events: Vec<UploadEvent> = self.rx.try_iter().collect();
        let finished = events
            .iter()
            .filter(|e| matches!(e, UploadEvent::Finished { .. }))
            .count();
        self.in_flight = self.in_flight.saturating_sub(finished);
        events
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

fn run_batch(paths: Vec<PathBuf>, max_dim: u32, tx: Sender<UploadEvent>, ctx: Option<egui::Context>) {
    let mut decoded = 0usize;
    let mut skipped = 0usize;
    for path in paths {
        if !is_image_path(&path) {
            debug!("skipping non-image upload {}", path.display());
            skipped += 1;
            continue;
        }
        match decode_path(&path, max_dim) {
            Ok(photo) => {
                decoded += 1;
                if tx.send(UploadEvent::Decoded(photo)).is_err() {
                    // Receiver dropped: the app is shutting down
                    return;
                }
                if let Some(ctx) = &ctx {
                    ctx.request_repaint();
                }
            }
            Err(e) => {
                warn!("skipping upload: {:#}", e);
                skipped += 1;
            }
        }
    }
    info!("upload batch done: {} decoded, {} skipped", decoded, skipped);
    let _ = tx.send(UploadEvent::Finished { decoded, skipped });
    if let Some(ctx) = &ctx {
        ctx.request_repaint();
    }
}
