//! XDG desktop entry registry.
//!
//! Applications are the `Type=Application` entries under the `applications/`
//! subdirectory of each XDG data directory. Directories are listed highest
//! precedence first; the raw scan keeps every file, so an ID overridden in a
//! higher-precedence directory shows up once per directory.

use super::exec::{self, ExecContext};
use super::icon;
use super::AppRegistry;
use crate::model::{AppRecord, DiscoveryConfig};
use freedesktop_entry_parser::parse_entry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const SECTION: &str = "Desktop Entry";

/// Fields of a matching desktop entry needed for listing and launching.
#[derive(Debug, Clone, Default)]
pub(crate) struct LaunchEntry {
    pub name: Option<String>,
    pub exec: String,
    pub icon: Option<String>,
    pub terminal: bool,
    pub working_dir: Option<PathBuf>,
    pub no_display: bool,
    pub only_show_in: Vec<String>,
    pub not_show_in: Vec<String>,
}

impl LaunchEntry {
    /// Whether a default (non-exhaustive) query would show this entry.
    pub fn visible_by_default(&self, current_desktops: &[String]) -> bool {
        if self.no_display {
            return false;
        }
        let in_current = |list: &[String]| list.iter().any(|d| current_desktops.contains(d));
        if !self.only_show_in.is_empty() && !in_current(&self.only_show_in) {
            return false;
        }
        !in_current(&self.not_show_in)
    }
}

fn parse_bool(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true"))
}

fn parse_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// What a single desktop file contributes for its identifier.
#[derive(Debug)]
pub(crate) enum EntryStatus {
    Launchable(LaunchEntry),
    /// `Hidden=true`: the identifier is deleted, including lower-precedence copies.
    Deleted,
    /// Unreadable, not an application, or missing `Exec`.
    Unusable,
}

/// Read a desktop file and classify it.
pub(crate) fn read_entry(path: &Path, locales: &[String]) -> EntryStatus {
    let entry = match parse_entry(path) {
        Ok(entry) => entry,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable desktop file");
            return EntryStatus::Unusable;
        }
    };
    let section = entry.section(SECTION);

    // Checked before Type: a bare `Hidden=true` override is enough to delete an entry.
    if parse_bool(section.attr("Hidden")) {
        return EntryStatus::Deleted;
    }
    if section.attr("Type").map(str::trim) != Some("Application") {
        return EntryStatus::Unusable;
    }
    let Some(exec) = non_empty(section.attr("Exec")) else {
        return EntryStatus::Unusable;
    };

    let name = locales
        .iter()
        .find_map(|locale| non_empty(section.attr_with_param("Name", locale.as_str())))
        .or_else(|| non_empty(section.attr("Name")));

    EntryStatus::Launchable(LaunchEntry {
        name,
        exec,
        icon: non_empty(section.attr("Icon")),
        terminal: parse_bool(section.attr("Terminal")),
        working_dir: non_empty(section.attr("Path")).map(PathBuf::from),
        no_display: parse_bool(section.attr("NoDisplay")),
        only_show_in: parse_list(section.attr("OnlyShowIn")),
        not_show_in: parse_list(section.attr("NotShowIn")),
    })
}

/// Desktop file ID: the path below `base` with `/` replaced by `-`.
pub(crate) fn desktop_file_id(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    let id = parts.join("-");
    let stem = id.strip_suffix(".desktop")?;
    (!stem.is_empty()).then_some(id)
}

/// Label used when an entry has no usable `Name`.
pub(crate) fn fallback_label(identifier: &str) -> String {
    identifier
        .strip_suffix(".desktop")
        .unwrap_or(identifier)
        .to_string()
}

/// Locale match candidates in lookup order, e.g. `sr_YU@Latn` gives
/// `sr_YU@Latn`, `sr_YU`, `sr@Latn`, `sr`.
pub(crate) fn locale_candidates(raw: &str) -> Vec<String> {
    let (rest, modifier) = match raw.split_once('@') {
        Some((rest, m)) => (rest, Some(m)),
        None => (raw, None),
    };
    let rest = rest.split('.').next().unwrap_or_default();
    let (lang, country) = match rest.split_once('_') {
        Some((l, c)) => (l, Some(c)),
        None => (rest, None),
    };
    if lang.is_empty() || lang == "C" || lang == "POSIX" {
        return Vec::new();
    }

    let mut out = Vec::new();
    if let (Some(c), Some(m)) = (country, modifier) {
        out.push(format!("{lang}_{c}@{m}"));
    }
    if let Some(c) = country {
        out.push(format!("{lang}_{c}"));
    }
    if let Some(m) = modifier {
        out.push(format!("{lang}@{m}"));
    }
    out.push(lang.to_string());
    out
}

fn env_locales() -> Vec<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty())
        .map(|v| locale_candidates(&v))
        .unwrap_or_default()
}

fn current_desktops() -> Vec<String> {
    std::env::var("XDG_CURRENT_DESKTOP")
        .map(|v| {
            v.split(':')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// `applications/` directories in XDG precedence order.
pub fn xdg_application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    let data_home = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(dirs::data_local_dir);
    if let Some(home) = data_home.as_ref() {
        dirs.push(home.join("applications"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    dirs.extend(
        data_dirs
            .split(':')
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .map(|p| p.join("applications")),
    );

    if let Some(home) = data_home {
        dirs.push(home.join("flatpak/exports/share/applications"));
    }
    dirs.push(PathBuf::from("/var/lib/flatpak/exports/share/applications"));

    dirs.dedup();
    dirs
}

/// Walk `dir` below `base`. Directories are tracked by canonical path so symlink
/// loops are entered once.
fn collect_desktop_files(
    base: &Path,
    dir: &Path,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<(String, PathBuf)>,
) {
    let Ok(canonical) = std::fs::canonicalize(dir) else {
        return;
    };
    if !visited.insert(canonical) {
        debug!(dir = %dir.display(), "skipping already visited directory");
        return;
    }
    let Ok(read) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = read.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_desktop_files(base, &path, visited, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("desktop") {
            if let Some(id) = desktop_file_id(base, &path) {
                out.push((id, path));
            }
        }
    }
}

/// Application registry backed by XDG desktop entries.
pub struct DesktopRegistry {
    cfg: DiscoveryConfig,
    dirs: Vec<PathBuf>,
    locales: Vec<String>,
    current_desktops: Vec<String>,
}

impl DesktopRegistry {
    /// Registry over the XDG search path followed by `cfg.extra_dirs`.
    pub fn new(cfg: DiscoveryConfig) -> Self {
        let mut dirs = xdg_application_dirs();
        dirs.extend(cfg.extra_dirs.iter().cloned());
        Self::with_dirs(cfg, dirs)
    }

    /// Registry over an explicit list of directories, highest precedence first.
    pub fn with_dirs(cfg: DiscoveryConfig, dirs: Vec<PathBuf>) -> Self {
        Self {
            cfg,
            dirs,
            locales: env_locales(),
            current_desktops: current_desktops(),
        }
    }

    #[cfg(test)]
    pub fn with_locales(mut self, locales: Vec<String>) -> Self {
        self.locales = locales;
        self
    }

    #[cfg(test)]
    pub fn with_current_desktops(mut self, desktops: Vec<String>) -> Self {
        self.current_desktops = desktops;
        self
    }

    /// Every `(identifier, path)` pair in precedence order, duplicates included.
    fn scan(&self) -> Vec<(String, PathBuf)> {
        let mut out = Vec::new();
        for dir in &self.dirs {
            let mut visited = HashSet::new();
            collect_desktop_files(dir, dir, &mut visited, &mut out);
        }
        out
    }

    /// The first launchable file for `identifier`, unless the highest-precedence
    /// file deletes it with `Hidden=true`.
    fn resolve(&self, identifier: &str) -> Option<(PathBuf, LaunchEntry)> {
        let candidates = self.scan().into_iter().filter(|(id, _)| id == identifier);
        for (rank, (_, path)) in candidates.enumerate() {
            match read_entry(&path, &self.locales) {
                EntryStatus::Launchable(entry) => return Some((path, entry)),
                EntryStatus::Deleted if rank == 0 => return None,
                EntryStatus::Deleted | EntryStatus::Unusable => {}
            }
        }
        None
    }
}

impl AppRegistry for DesktopRegistry {
    fn list_launchable(&self) -> Vec<AppRecord> {
        let started = Instant::now();
        let mut apps = Vec::new();
        // Identifiers whose winning file deletes or hides them.
        let mut masked: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (identifier, path) in self.scan() {
            if masked.contains(&identifier) {
                continue;
            }
            let winner = seen.insert(identifier.clone());
            let entry = match read_entry(&path, &self.locales) {
                EntryStatus::Launchable(entry) => entry,
                EntryStatus::Deleted => {
                    if winner {
                        debug!(identifier, path = %path.display(), "identifier deleted by override");
                        masked.insert(identifier);
                    }
                    continue;
                }
                EntryStatus::Unusable => continue,
            };
            if self.cfg.respect_no_display && !entry.visible_by_default(&self.current_desktops) {
                if winner {
                    masked.insert(identifier);
                }
                continue;
            }

            let display_name = entry
                .name
                .clone()
                .unwrap_or_else(|| fallback_label(&identifier));
            let mut record = AppRecord::new(display_name, identifier);
            if self.cfg.load_icons {
                if let Some(icon) = entry.icon.as_deref().and_then(icon::load_icon) {
                    record = record.with_icon(icon);
                }
            }
            apps.push(record);
        }

        info!(
            count = apps.len(),
            dirs = self.dirs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "discovery pass complete"
        );
        apps
    }

    fn launch(&self, identifier: &str) {
        let Some((path, entry)) = self.resolve(identifier) else {
            debug!(identifier, "no launch target for identifier");
            return;
        };

        let ctx = ExecContext {
            name: entry.name.as_deref(),
            icon: entry.icon.as_deref(),
            desktop_file: Some(&path),
        };
        let cmd = match exec::build_launch_command(
            &entry.exec,
            entry.terminal,
            &self.cfg.terminal,
            &ctx,
        ) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!(identifier, error = %e, "cannot build launch command");
                return;
            }
        };

        match exec::spawn_detached(&cmd, entry.working_dir.as_deref()) {
            Ok(pid) => info!(identifier, pid, program = %cmd.program, "launched"),
            Err(e) => warn!(identifier, program = %cmd.program, error = %e, "launch failed"),
        }
    }
}
