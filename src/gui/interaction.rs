use eframe::egui::Pos2;
use log::debug;

use crate::gallery::model::{Connection, ConnectionStyle, Gallery, PhotoId};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragStart {
    pub photo_id: PhotoId,
    // Center of the source tile, in canvas coordinates
    pub anchor: Pos2,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TempLine {
    pub from: Pos2,
    pub to: Pos2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Connected(usize),
    Duplicate,
    Cancelled,
}

/// Transient state for drawing connections and editing their style.
///
/// Dragging and the style menu are independent: a drag can start while a
/// menu is open (the menu closes) and the menu never affects a drag.
#[derive(Debug, Default)]
pub struct ConnectionEditor {
    drag: Option<DragStart>,
    temp_line: Option<TempLine>,
    active_menu: Option<usize>,
}

impl ConnectionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_drag(&mut self, source: PhotoId, anchor: Pos2) {
        self.active_menu = None;
        self.drag = Some(DragStart { photo_id: source, anchor });
        self.temp_line = None;
    }

    pub fn drag_to(&mut self, pointer: Pos2) {
        if let Some(start) = self.drag {
            self.temp_line = Some(TempLine { from: start.anchor, to: pointer });
        }
    }

    /// Finish a drag with the pointer over `target` (or over nothing).
    pub fn release_over(&mut self, target: Option<PhotoId>, gallery: &mut Gallery) -> DropOutcome {
        self.temp_line = None;
        let Some(start) = self.drag.take() else {
            return DropOutcome::Cancelled;
        };
        let target = match target {
            Some(t) if t != start.photo_id => t,
            _ => return DropOutcome::Cancelled,
        };
        if gallery.connection_exists(start.photo_id, target) {
            debug!("connection {} <-> {} already exists", start.photo_id, target);
            return DropOutcome::Duplicate;
        }
        match gallery.add_connection(start.photo_id, target) {
            Some(index) => {
                debug!("connected {} -> {} as #{}", start.photo_id, target, index);
                DropOutcome::Connected(index)
            }
            None => DropOutcome::Cancelled,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
        self.temp_line = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_source(&self) -> Option<PhotoId> {
        self.drag.map(|d| d.photo_id)
    }

    pub fn temp_line(&self) -> Option<TempLine> {
        self.temp_line
    }

    pub fn toggle_menu(&mut self, index: usize) {
        if self.active_menu == Some(index) {
            self.active_menu = None;
        } else {
            self.active_menu = Some(index);
        }
    }

    pub fn select_style(&mut self, gallery: &mut Gallery, index: usize, style: ConnectionStyle) -> bool {
        self.active_menu = None;
        gallery.set_connection_style(index, style)
    }

    pub fn delete_connection(&mut self, gallery: &mut Gallery, index: usize) -> Option<Connection> {
        self.active_menu = None;
        gallery.remove_connection(index)
    }

    pub fn click_outside(&mut self) {
        self.active_menu = None;
    }

    pub fn close_menu(&mut self) {
        self.active_menu = None;
    }

    pub fn active_menu(&self) -> Option<usize> {
        self.active_menu
    }

    pub fn is_menu_open(&self, index: usize) -> bool {
        self.active_menu == Some(index)
    }

    // A menu pointing past the end of the list refers to a deleted connection
    pub fn forget_stale_menu(&mut self, connection_count: usize) {
        if self.active_menu.is_some_and(|i| i >= connection_count) {
            self.active_menu = None;
        }
    }
}
