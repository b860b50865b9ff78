use std::collections::HashMap;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use log::{debug, info, warn};

use crate::gallery::model::{ConnectionStyle, Gallery, PhotoId};
use crate::layout::circle::{self, LayoutPosition};
use crate::persistence::settings::AppSettings;
use crate::upload::loader::{self, DecodedPhoto, UploadEvent, UploadWorker};

use super::interaction::{ConnectionEditor, DropOutcome};
use super::line_style::{self, LINE_BLUE};

// Midpoint button that opens a connection's menu
const CONTROL_SIZE: f32 = 24.0;
// Menu opens just right of and above the control
const MENU_OFFSET: Vec2 = Vec2::new(10.0, -10.0);
const TILE_ROUNDING: f32 = 8.0;
const TOAST_DURATION: Duration = Duration::from_secs(3);

const UPLOAD_SHORTCUT: egui::KeyboardShortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MenuAction {
    Delete,
    Restyle(ConnectionStyle),
}

pub struct GalleryApp {
    gallery: Gallery,
    // Decoded pixels for each photo, uploaded to the GPU once
    textures: HashMap<PhotoId, egui::TextureHandle>,
    editor: ConnectionEditor,
    uploads: UploadWorker,
    app_settings: AppSettings,
    // Canvas size from the previous frame; a change closes the open menu
    last_canvas_size: Option<Vec2>,
    last_info: Option<String>,
    last_info_time: Option<Instant>,
}

impl GalleryApp {
    pub fn new(ctx: &egui::Context, app_settings: AppSettings) -> Self {
        apply_theme(ctx, app_settings.dark_mode);
        Self {
            gallery: Gallery::new(),
            textures: HashMap::new(),
            editor: ConnectionEditor::new(),
            uploads: UploadWorker::new(),
            app_settings,
            last_canvas_size: None,
            last_info: None,
            last_info_time: None,
        }
    }

    fn notify(&mut self, msg: String) {
        self.last_info = Some(msg);
        self.last_info_time = Some(Instant::now());
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn editor(&self) -> &ConnectionEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ConnectionEditor {
        &mut self.editor
    }

    /// Record this frame's canvas size; any change closes the open menu.
    pub fn observe_canvas_size(&mut self, size: Vec2) {
        if let Some(prev) = self.last_canvas_size
            && prev != size
        {
            self.editor.close_menu();
        }
        self.last_canvas_size = Some(size);
    }

    fn save_settings(&self) {
        match self.app_settings.save() {
            Ok(path) => debug!("settings written to {}", path.display()),
            Err(e) => warn!("saving settings failed: {:#}", e),
        }
    }

    pub fn menu_upload(&mut self, ctx: &egui::Context) {
        let start = self.app_settings.last_upload_dir.clone();
        let paths = loader::pick_photos(start.as_deref());
        if paths.is_empty() {
            return;
        }
        if let Some(dir) = paths[0].parent() {
            self.app_settings.last_upload_dir = Some(dir.to_path_buf());
            self.save_settings();
        }
        info!("uploading {} file(s)", paths.len());
        self.uploads.spawn(paths, self.app_settings.max_photo_dimension, Some(ctx.clone()));
    }

    fn insert_photo(&mut self, ctx: &egui::Context, photo: DecodedPhoto) {
        let DecodedPhoto { name, src, image } = photo;
        let id = self.gallery.add_photo(name, src);
        let texture = ctx.load_texture(format!("photo-{}", id), image, egui::TextureOptions::LINEAR);
        self.textures.insert(id, texture);
    }

    pub fn remove_photo(&mut self, id: PhotoId) {
        if self.gallery.remove_photo(id) {
            self.textures.remove(&id);
            self.editor.close_menu();
            if self.editor.drag_source() == Some(id) {
                self.editor.cancel_drag();
            }
        }
    }

    fn poll_uploads(&mut self, ctx: &egui::Context) {
        let mut added = 0usize;
        for event in self.uploads.poll() {
            match event {
                UploadEvent::Decoded(photo) => self.insert_photo(ctx, photo),
                UploadEvent::Finished { decoded, .. } => added += decoded,
            }
        }
        if added > 0 {
            self.notify(format!("Added {}", counted(added, "photo", "photos")));
        }
    }

    // Files dropped onto the window take the same route as picked ones
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            self.accept_dropped_files(ctx, dropped);
        }
    }

    /// Decode byte-backed drops now and queue path-backed drops for the worker.
    /// Drops whose MIME type says they are not images are ignored.
    pub fn accept_dropped_files(&mut self, ctx: &egui::Context, dropped: Vec<egui::DroppedFile>) {
        let mut paths = Vec::new();
        for file in dropped {
            if !loader::is_image_mime(&file.mime) {
                debug!("ignoring dropped {} ({})", file.name, file.mime);
                continue;
            }
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                match loader::decode_bytes(&bytes, self.app_settings.max_photo_dimension) {
                    Ok(image) => {
                        let photo = DecodedPhoto { name: file.name.clone(), src: file.name, image };
                        self.insert_photo(ctx, photo);
                    }
                    Err(e) => debug!("ignoring dropped {}: {:#}", file.name, e),
                }
            }
        }
        self.uploads.spawn(paths, self.app_settings.max_photo_dimension, Some(ctx.clone()));
    }

    fn header_ui(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        ui.horizontal(|ui| {
            ui.heading("Circular Gallery");
            ui.separator();
            if ui
                .add(egui::Button::new("Upload Photos…").shortcut_text(ctx.format_shortcut(&UPLOAD_SHORTCUT)))
                .clicked()
            {
                self.menu_upload(&ctx);
            }
            ui.menu_button("View", |ui| {
                if ui.checkbox(&mut self.app_settings.show_instructions, "Show instructions").changed() {
                    self.save_settings();
                }
                if ui.checkbox(&mut self.app_settings.dark_mode, "Dark mode").changed() {
                    apply_theme(&ctx, self.app_settings.dark_mode);
                    self.save_settings();
                }
            });
            if self.uploads.is_busy() {
                ui.spinner();
                ui.small("Decoding photos…");
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(format!(
                    "{} · {}",
                    counted(self.gallery.photo_count(), "photo", "photos"),
                    counted(self.gallery.connection_count(), "line", "lines")
                ));
            });
        });
    }

    fn empty_state_ui(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.label(RichText::new("⬆").size(48.0).color(Color32::from_gray(150)));
            ui.label("Upload photos to create a circular layout");
            ui.small("or drop image files onto this window");
            ui.add_space(8.0);
            if ui.button("Upload Photos…").clicked() {
                self.menu_upload(&ctx);
            }
        });
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        let origin = available.min.to_vec2();
        self.observe_canvas_size(available.size());
        self.editor.forget_stale_menu(self.gallery.connection_count());

        // Positions are derived every frame from the photo count and canvas size
        let ids = self.gallery.photo_ids();
        let positions = circle::layout_photos(&ids, available.size());
        let _bg = ui.allocate_rect(available, Sense::hover());
        let painter = ui.painter_at(available);
        let pointer = ui.ctx().pointer_interact_pos();
        let local_pointer = pointer.map(|p| p - origin);
        let hovered = local_pointer.and_then(|p| circle::hit_test(&ids, &positions, p));
        let mut click_consumed = false;

        // Connections first so tiles cover their ends
        let mut midpoints: Vec<(usize, Pos2)> = Vec::new();
        for (index, conn) in self.gallery.connections().iter().enumerate() {
            let (Some(a), Some(b)) = (positions.get(&conn.from), positions.get(&conn.to)) else {
                continue;
            };
            let a = a.center() + origin;
            let b = b.center() + origin;
            line_style::paint_line(&painter, a, b, &line_style::line_style(conn.style));
            midpoints.push((index, a.lerp(b, 0.5)));
        }

        if let Some(line) = self.editor.temp_line() {
            line_style::paint_line(&painter, line.from + origin, line.to + origin, &line_style::temp_line_style());
        }

        let mut to_remove: Option<PhotoId> = None;
        for id in &ids {
            let Some(pos) = positions.get(id) else { continue };
            let rect = pos.rect().translate(origin);
            let resp = ui.interact(rect, ui.id().with(("photo", *id)), Sense::click_and_drag());
            if resp.drag_started() {
                self.editor.begin_drag(*id, pos.center());
            }

            self.paint_tile(&painter, *id, rect, hovered);

            if !self.editor.is_dragging() {
                if let Some(btn_rect) = delete_button_rect(pos, rect)
                    && pointer.is_some_and(|p| rect.union(btn_rect).contains(p))
                {
                    let glyph = RichText::new("✕").size((pos.size / 8.0).max(10.0)).color(Color32::WHITE);
                    let btn = ui.put(
                        btn_rect,
                        egui::Button::new(glyph)
                            .fill(line_style::LINE_RED)
                            .corner_radius(btn_rect.width() * 0.5)
                            .min_size(btn_rect.size()),
                    );
                    if btn.clicked() {
                        to_remove = Some(*id);
                        click_consumed = true;
                    }
                }
                resp.on_hover_ui(|ui| {
                    if let Some(photo) = self.gallery.photo(*id) {
                        ui.label(RichText::new(&photo.name).strong());
                        ui.small(format!("links: {}", self.gallery.connections_of(*id)));
                        ui.small("Drag onto another photo to connect");
                    }
                });
            }
        }

        if self.editor.is_dragging() {
            if let Some(p) = local_pointer {
                self.editor.drag_to(p);
            }
            let (released, down) = ui.input(|i| (i.pointer.primary_released(), i.pointer.primary_down()));
            if released {
                match self.editor.release_over(hovered, &mut self.gallery) {
                    DropOutcome::Connected(index) => info!("added connection #{}", index),
                    DropOutcome::Duplicate => debug!("drop ignored: photos already connected"),
                    DropOutcome::Cancelled => {}
                }
            } else if !down {
                // Release happened outside the window
                self.editor.cancel_drag();
            }
            ui.ctx().request_repaint();
        }

        // Midpoint controls sit above tiles so they stay clickable
        let mut open_menu_at: Option<(usize, Pos2)> = None;
        for (index, mid) in midpoints {
            let open = self.editor.is_menu_open(index);
            let rect = Rect::from_center_size(mid, Vec2::splat(CONTROL_SIZE));
            let resp = ui.put(rect, egui::Button::new("").corner_radius(CONTROL_SIZE * 0.5).min_size(rect.size()));
            paint_chevron(ui.painter(), rect, open, ui.visuals().text_color());
            if resp.clicked() {
                self.editor.toggle_menu(index);
                click_consumed = true;
            }
            if open {
                open_menu_at = Some((index, mid));
            }
        }

        if let Some((index, mid)) = open_menu_at
            && self.connection_menu_ui(ui.ctx(), index, mid, pointer)
        {
            click_consumed = true;
        }

        if let Some(id) = to_remove {
            self.remove_photo(id);
        }

        if self.editor.active_menu().is_some() && !click_consumed && ui.input(|i| i.pointer.primary_clicked()) {
            self.editor.click_outside();
        }

        // Highlight the canvas while files hover over the window
        if ui.ctx().input(|i| !i.raw.hovered_files.is_empty()) {
            painter.rect_filled(available, 0.0, Color32::from_rgba_unmultiplied(59, 130, 246, 40));
            painter.text(
                available.center(),
                egui::Align2::CENTER_CENTER,
                "Drop photos to add them",
                egui::FontId::proportional(20.0),
                ui.visuals().strong_text_color(),
            );
        }
    }

    fn paint_tile(&self, painter: &egui::Painter, id: PhotoId, rect: Rect, hovered: Option<PhotoId>) {
        match self.textures.get(&id) {
            Some(texture) => {
                painter.image(texture.id(), rect, circle::cover_uv(texture.size()), Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, TILE_ROUNDING, Color32::from_gray(200));
            }
        }
        // Outline the tile a drag would connect to
        let is_target = hovered == Some(id)
            && self.editor.is_dragging()
            && self.editor.drag_source() != Some(id);
        let stroke = if is_target {
            Stroke::new(3.0, LINE_BLUE)
        } else if self.editor.drag_source() == Some(id) {
            Stroke::new(2.0, LINE_BLUE)
        } else {
            Stroke::new(1.0, Color32::from_gray(160))
        };
        painter.rect_stroke(rect, TILE_ROUNDING, stroke, egui::StrokeKind::Outside);
    }

    // Returns true when the pointer interacted with the menu this frame
    fn connection_menu_ui(&mut self, ctx: &egui::Context, index: usize, mid: Pos2, pointer: Option<Pos2>) -> bool {
        let current = self.gallery.connection(index).map(|c| c.style);
        let mut action: Option<MenuAction> = None;
        let area = egui::Area::new(egui::Id::new(("connection_menu", index)))
            .order(egui::Order::Foreground)
            .fixed_pos(mid + MENU_OFFSET)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(150.0);
                    ui.label(RichText::new("Line options").strong());
                    if ui.button(RichText::new("🗑 Delete line").color(line_style::LINE_RED)).clicked() {
                        action = Some(MenuAction::Delete);
                    }
                    ui.separator();
                    ui.small("Change style");
                    for style in ConnectionStyle::ALL {
                        let clicked = ui
                            .horizontal(|ui| {
                                style_swatch(ui, style);
                                ui.selectable_label(current == Some(style), style.label()).clicked()
                            })
                            .inner;
                        if clicked {
                            action = Some(MenuAction::Restyle(style));
                        }
                    }
                });
            });

        match action {
            Some(MenuAction::Delete) => {
                if let Some(conn) = self.editor.delete_connection(&mut self.gallery, index) {
                    debug!("deleted connection {} <-> {}", conn.from, conn.to);
                }
            }
            Some(MenuAction::Restyle(style)) => {
                self.editor.select_style(&mut self.gallery, index, style);
            }
            None => {}
        }
        action.is_some() || pointer.is_some_and(|p| area.response.rect.contains(p))
    }

    fn toast_ui(&self, ctx: &egui::Context) {
        // Bottom-right transient info toast
        if let (Some(msg), Some(when)) = (&self.last_info, self.last_info_time) {
            if Instant::now().duration_since(when) <= TOAST_DURATION {
                let margin = egui::vec2(12.0, 12.0);
                egui::Area::new("bottom_right_toast".into())
                    .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-margin.x, -margin.y))
                    .interactable(false)
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style())
                            .corner_radius(egui::CornerRadius::same(8))
                            .stroke(Stroke { width: 0.5, color: Color32::from_gray(60) })
                            .fill(Color32::from_rgba_premultiplied(20, 20, 20, 170))
                            .inner_margin(egui::Margin::symmetric(8, 6))
                            .show(ui, |ui| {
                                ui.small(RichText::new(msg).color(Color32::from_gray(200)));
                            });
                    });
                ctx.request_repaint_after(Duration::from_millis(250));
            }
        }
    }

    // Keep the window size for the next launch
    fn track_window_size(&mut self, ctx: &egui::Context) {
        if let Some(inner) = ctx.input(|i| i.viewport().inner_rect) {
            self.app_settings.window_width = inner.width();
            self.app_settings.window_height = inner.height();
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_uploads(ctx);
        self.handle_dropped_files(ctx);
        self.track_window_size(ctx);

        if ctx.input_mut(|i| i.consume_shortcut(&UPLOAD_SHORTCUT)) {
            self.menu_upload(ctx);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.header_ui(ui);
        });

        if !self.gallery.is_empty() && self.app_settings.show_instructions {
            egui::TopBottomPanel::bottom("instructions").show(ctx, instructions_ui);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.gallery.is_empty() {
                self.empty_state_ui(ui);
            } else {
                self.canvas_ui(ui);
            }
        });

        self.toast_ui(ctx);

        if self.uploads.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save_settings();
    }
}

/// "1 photo", "3 photos"
pub fn counted(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

fn apply_theme(ctx: &egui::Context, dark: bool) {
    ctx.set_visuals(if dark { egui::Visuals::dark() } else { egui::Visuals::light() });
}

fn instructions_ui(ui: &mut egui::Ui) {
    ui.add_space(4.0);
    ui.label(RichText::new("How to use").strong());
    for line in [
        "• Photos are arranged on a circle automatically",
        "• Photo size adapts to the number of photos and the window size",
        "• Drag from one photo onto another to connect them",
        "• Click the control in the middle of a line for its options",
        "• Delete a line or change its style from that menu",
        "• Hover a photo and click the red ✕ to remove it",
    ] {
        ui.small(line);
    }
    ui.add_space(4.0);
}

// Delete button straddling the tile's top-right corner
fn delete_button_rect(pos: &LayoutPosition, tile: Rect) -> Option<Rect> {
    if pos.size <= 0.0 {
        return None;
    }
    let glyph = (pos.size / 8.0).max(10.0);
    let padding = (pos.size / 24.0).max(4.0);
    Some(Rect::from_center_size(tile.right_top(), Vec2::splat(glyph + padding * 2.0)))
}

fn paint_chevron(painter: &egui::Painter, rect: Rect, open: bool, color: Color32) {
    let c = rect.center();
    let w = rect.width() * 0.2;
    let h = rect.height() * 0.12;
    let (tip_y, arm_y) = if open { (c.y - h, c.y + h) } else { (c.y + h, c.y - h) };
    let stroke = Stroke::new(1.5, color);
    painter.line_segment([Pos2::new(c.x - w, arm_y), Pos2::new(c.x, tip_y)], stroke);
    painter.line_segment([Pos2::new(c.x, tip_y), Pos2::new(c.x + w, arm_y)], stroke);
}

fn style_swatch(ui: &mut egui::Ui, style: ConnectionStyle) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(32.0, 12.0), Sense::hover());
    line_style::paint_line(ui.painter(), rect.left_center(), rect.right_center(), &line_style::line_style(style));
}
