use uuid::Uuid;

// Basic type aliases for clarity
pub type PhotoId = Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    pub id: PhotoId,
    // Where the pixels came from (file path or dropped file name)
    pub src: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionStyle {
    #[default]
    Default,
    Dashed,
    Dotted,
    Thick,
    Red,
    Green,
}

impl ConnectionStyle {
    /// Every style in menu order.
    pub const ALL: [ConnectionStyle; 6] = [
        ConnectionStyle::Default,
        ConnectionStyle::Dashed,
        ConnectionStyle::Dotted,
        ConnectionStyle::Thick,
        ConnectionStyle::Red,
        ConnectionStyle::Green,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStyle::Default => "default",
            ConnectionStyle::Dashed => "dashed",
            ConnectionStyle::Dotted => "dotted",
            ConnectionStyle::Thick => "thick",
            ConnectionStyle::Red => "red",
            ConnectionStyle::Green => "green",
        }
    }

    /// Human readable name for menus.
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStyle::Default => "Default",
            ConnectionStyle::Dashed => "Dashed",
            ConnectionStyle::Dotted => "Dotted",
            ConnectionStyle::Thick => "Thick",
            ConnectionStyle::Red => "Red",
            ConnectionStyle::Green => "Green",
        }
    }

    // Unknown names fall back to the default look
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub from: PhotoId,
    pub to: PhotoId,
    pub style: ConnectionStyle,
}

impl Connection {
    pub fn involves(&self, id: PhotoId) -> bool {
        self.from == id || self.to == id
    }

    // Direction is ignored when comparing endpoints
    pub fn joins(&self, a: PhotoId, b: PhotoId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Photos in upload order plus the user-drawn links between them.
///
/// Connections are addressed by index because the style menu refers to the
/// connection it was opened on by position.
#[derive(Clone, Debug, Default)]
pub struct Gallery {
    photos: Vec<Photo>,
    connections: Vec<Connection>,
}

impl Gallery {
    // Instantiate a new, empty gallery
    pub fn new() -> Self {
        Gallery {
            photos: Vec::new(),
            connections: Vec::new(),
        }
    }

    // Append a photo and return its new ID
    pub fn add_photo(&mut self, name: String, src: String) -> PhotoId {
        let id = Uuid::now_v7();
        self.photos.push(Photo { id, src, name });
        id
    }

    pub fn remove_photo(&mut self, id: PhotoId) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        if self.photos.len() == before {
            return false;
        }
        // Cascade delete connections involving this photo
        self.connections.retain(|c| !c.involves(id));
        true
    }

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photo_ids(&self) -> Vec<PhotoId> {
        self.photos.iter().map(|p| p.id).collect()
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn contains_photo(&self, id: PhotoId) -> bool {
        self.photos.iter().any(|p| p.id == id)
    }

    pub fn index_of(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    pub fn connection_exists(&self, a: PhotoId, b: PhotoId) -> bool {
        self.connections.iter().any(|c| c.joins(a, b))
    }

    /// Link two photos with the default style.
    ///
    /// Returns the index of the new connection, or `None` when the endpoints
    /// are the same photo, either endpoint is unknown, or the pair is already
    /// connected in either direction.
    pub fn add_connection(&mut self, from: PhotoId, to: PhotoId) -> Option<usize> {
        if from == to || !self.contains_photo(from) || !self.contains_photo(to) {
            return None;
        }
        if self.connection_exists(from, to) {
            return None;
        }
        self.connections.push(Connection { from, to, style: ConnectionStyle::Default });
        Some(self.connections.len() - 1)
    }

    pub fn remove_connection(&mut self, index: usize) -> Option<Connection> {
        if index < self.connections.len() {
            Some(self.connections.remove(index))
        } else {
            None
        }
    }

    pub fn set_connection_style(&mut self, index: usize, style: ConnectionStyle) -> bool {
        if let Some(conn) = self.connections.get_mut(index) {
            conn.style = style;
            true
        } else {
            false
        }
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // Number of links touching a photo
    pub fn connections_of(&self, id: PhotoId) -> usize {
        self.connections.iter().filter(|c| c.involves(id)).count()
    }
}
