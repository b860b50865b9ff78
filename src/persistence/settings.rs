use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    // Window size restored on the next launch
    pub window_width: f32,
    pub window_height: f32,
    // Footer with usage hints under the canvas
    pub show_instructions: bool,
    #[serde(default)]
    pub dark_mode: bool,
    // Uploads are downscaled to fit this many pixels per side (0 keeps full size)
    #[serde(default = "AppSettings::default_max_photo_dimension")]
    pub max_photo_dimension: u32,
    // If None, the file picker opens in the OS default location
    #[serde(default)]
    pub last_upload_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            window_width: 1100.0,
            window_height: 760.0,
            show_instructions: true,
            dark_mode: false,
            max_photo_dimension: Self::default_max_photo_dimension(),
            last_upload_dir: None,
        }
    }
}

impl AppSettings {
    fn config_dir() -> PathBuf {
        // Cross-platform user config dir
        #[cfg(target_os = "macos")]
        {
            // ~/Library/Application Support/Circular-Gallery
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join("Library").join("Application Support").join("Circular-Gallery");
        }
        #[cfg(target_os = "windows")]
        {
            // %APPDATA%\Circular-Gallery
            if let Ok(appdata) = std::env::var("APPDATA") {
                return PathBuf::from(appdata).join("Circular-Gallery");
            }
            return PathBuf::from("Circular-Gallery");
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // $XDG_CONFIG_HOME/Circular-Gallery or ~/.config/Circular-Gallery
            if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg).join("Circular-Gallery");
            }
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join(".config").join("Circular-Gallery");
        }
    }

    pub fn settings_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Read settings from `path`, returning defaults when the file does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut f = fs::File::open(path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        let v: Self = serde_json::from_str(&s)?;
        Ok(v)
    }

    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::settings_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let s = serde_json::to_string_pretty(self)?;
        let mut f = fs::File::create(path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    pub(crate) fn default_max_photo_dimension() -> u32 { 512 }
}
