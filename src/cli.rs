use crate::model::{DiscoveryConfig, SortOrder};
use crate::presentation::sort_for_display;
use crate::registry::{AppRegistry, DesktopRegistry};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "subtract",
    version,
    about = "Minimal grayscale application launcher with a terminal UI"
)]
pub struct Cli {
    /// Print `name<TAB>identifier` for every app in display order and exit (no TUI)
    #[arg(long, conflicts_with_all = ["json", "launch"])]
    pub list: bool,

    /// Print the app list as JSON and exit (no TUI)
    #[arg(long, conflicts_with = "launch")]
    pub json: bool,

    /// Launch the app with this desktop file ID and exit
    #[arg(long, value_name = "ID")]
    pub launch: Option<String>,

    /// Sort names by plain string order instead of ignoring case
    #[arg(long)]
    pub case_sensitive: bool,

    /// Hide entries marked NoDisplay or limited to other desktops
    #[arg(long)]
    pub respect_no_display: bool,

    /// Skip icon lookup and decoding
    #[arg(long)]
    pub no_icons: bool,

    /// Additional applications directory, searched after the XDG ones (repeatable)
    #[arg(long = "extra-dir", value_name = "DIR")]
    pub extra_dirs: Vec<PathBuf>,

    /// Terminal used to run entries with Terminal=true
    #[arg(long, default_value = "x-terminal-emulator")]
    pub terminal: String,

    /// Rescan installed apps periodically while the TUI is open (e.g. 30s, 5m)
    #[arg(long)]
    pub rescan_interval: Option<humantime::Duration>,

    /// Quit the TUI after launching an app
    #[arg(long)]
    pub exit_on_launch: bool,

    /// Log file for TUI mode (defaults to the user state directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether this invocation takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        cfg!(feature = "tui") && !self.list && !self.json && self.launch.is_none()
    }

    pub fn sort_order(&self) -> SortOrder {
        if self.case_sensitive {
            SortOrder::CaseSensitive
        } else {
            SortOrder::CaseInsensitive
        }
    }
}

/// Build a `DiscoveryConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> DiscoveryConfig {
    DiscoveryConfig {
        extra_dirs: args.extra_dirs.clone(),
        respect_no_display: args.respect_no_display,
        // Plain text listing never shows icons.
        load_icons: !args.no_icons && !args.list,
        terminal: args.terminal.clone(),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if let Some(identifier) = args.launch.as_deref() {
        run_launch(&args, identifier);
        return Ok(());
    }

    if !args.list && !args.json {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_listing(args).await;
        }
    }

    run_listing(args).await
}

/// Launch one identifier directly. Unknown identifiers are a silent no-op.
fn run_launch(args: &Cli, identifier: &str) {
    let registry = DesktopRegistry::new(build_config(args));
    info!(identifier, "launch requested from command line");
    registry.launch(identifier);
}

async fn run_listing(args: Cli) -> Result<()> {
    let registry = DesktopRegistry::new(build_config(&args));
    let apps = tokio::task::spawn_blocking(move || registry.list_launchable())
        .await
        .context("discovery task failed")?;
    let apps = sort_for_display(apps, args.sort_order());

    let stdout = std::io::stdout();
    let mut out = std::io::LineWriter::new(stdout.lock());
    if args.json {
        let json = crate::text_summary::build_json_listing(&apps, time::OffsetDateTime::now_utc())?;
        writeln!(out, "{json}").context("write listing")?;
    } else {
        for line in crate::text_summary::build_text_listing(&apps).lines {
            writeln!(out, "{line}").context("write listing")?;
        }
    }
    out.flush().context("flush listing")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_the_tui_with_icons() {
        let args = Cli::parse_from(["subtract"]);
        assert_eq!(args.is_interactive(), cfg!(feature = "tui"));
        assert_eq!(args.sort_order(), SortOrder::CaseInsensitive);

        let cfg = build_config(&args);
        assert!(cfg.load_icons);
        assert!(!cfg.respect_no_display);
        assert_eq!(cfg.terminal, "x-terminal-emulator");
    }

    #[test]
    fn list_mode_skips_icons() {
        let args = Cli::parse_from(["subtract", "--list", "--case-sensitive"]);
        assert!(!args.is_interactive());
        assert!(!build_config(&args).load_icons);
        assert_eq!(args.sort_order(), SortOrder::CaseSensitive);
    }

    #[test]
    fn repeated_extra_dirs_and_rescan_interval() {
        let args = Cli::parse_from([
            "subtract",
            "--extra-dir",
            "/opt/apps",
            "--extra-dir",
            "/srv/apps",
            "--rescan-interval",
            "30s",
        ]);
        assert_eq!(
            build_config(&args).extra_dirs,
            vec![PathBuf::from("/opt/apps"), PathBuf::from("/srv/apps")]
        );
        assert_eq!(
            args.rescan_interval.map(std::time::Duration::from),
            Some(std::time::Duration::from_secs(30))
        );
    }

    #[test]
    fn list_and_json_are_exclusive() {
        assert!(Cli::try_parse_from(["subtract", "--list", "--json"]).is_err());
        assert!(Cli::try_parse_from(["subtract", "--json", "--launch", "x.desktop"]).is_err());
    }
}
