use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// One launchable entry point as reported by the application registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRecord {
    pub display_name: String,
    /// Desktop file ID, e.g. `org.gnome.Calculator.desktop`. Never empty.
    pub identifier: String,
    #[serde(serialize_with = "serialize_icon_path")]
    pub icon: Option<Icon>,
}

impl AppRecord {
    pub fn new(display_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            identifier: identifier.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// A decoded icon, already scaled down to thumbnail size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub path: PathBuf,
    pub pixels: IconPixels,
}

/// Row-major RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl IconPixels {
    /// RGBA of the pixel at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

fn serialize_icon_path<S: Serializer>(icon: &Option<Icon>, s: S) -> Result<S::Ok, S::Error> {
    match icon {
        Some(icon) => s.serialize_some(&icon.path),
        None => s.serialize_none(),
    }
}

/// How the presentation list orders records by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Unicode-lowercased comparison, raw name as tie-break.
    #[default]
    CaseInsensitive,
    /// Plain `str` ordering.
    CaseSensitive,
}

/// Discovery settings derived from the command line.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Extra applications directories, searched after the XDG ones.
    pub extra_dirs: Vec<PathBuf>,
    /// Hide `NoDisplay=true` entries instead of listing every match.
    pub respect_no_display: bool,
    pub load_icons: bool,
    /// Terminal command used for `Terminal=true` entries.
    pub terminal: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extra_dirs: Vec::new(),
            respect_no_display: false,
            load_icons: true,
            terminal: "x-terminal-emulator".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LauncherEvent {
    DiscoveryStarted,
    DiscoveryCompleted { apps: Vec<AppRecord> },
    Info(InfoEvent),
}

/// Structured info events emitted by the orchestrator and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    RescanScheduled,
    DiscoveryFailed(String),
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::RescanScheduled => "Rescan queued".to_string(),
            InfoEvent::DiscoveryFailed(reason) => format!("Scan failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_serializes_icon_as_path() {
        let icon = Icon {
            path: PathBuf::from("/usr/share/pixmaps/zeta.png"),
            pixels: IconPixels {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            },
        };
        let with = AppRecord::new("Zeta", "pkg.z.desktop").with_icon(icon);
        let without = AppRecord::new("Alpha", "pkg.a.desktop");

        let v = serde_json::to_value([&with, &without]).unwrap();
        assert_eq!(v[0]["icon"], "/usr/share/pixmaps/zeta.png");
        assert!(v[1]["icon"].is_null());
        assert_eq!(v[1]["identifier"], "pkg.a.desktop");
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let px = IconPixels {
            width: 2,
            height: 1,
            rgba: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        assert_eq!(px.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(px.pixel(2, 0), None);
        assert_eq!(px.pixel(0, 1), None);
    }
}
