//! Clipboard access for the TUI.
//!
//! X11 and Wayland serve a selection from the process that set it, so one
//! background thread keeps the last `Clipboard` alive until the next copy.

use anyhow::{Context, Result};
use arboard::Clipboard;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::OnceLock;
use tracing::{debug, warn};

static REQUESTS: OnceLock<Option<Sender<String>>> = OnceLock::new();

fn serve(requests: Receiver<String>) {
    let mut owner: Option<Clipboard> = None;
    for text in requests {
        if owner.is_none() {
            owner = match Clipboard::new() {
                Ok(clipboard) => Some(clipboard),
                Err(e) => {
                    debug!(error = %e, "clipboard unavailable");
                    None
                }
            };
        }
        let Some(clipboard) = owner.as_mut() else {
            continue;
        };
        if let Err(e) = clipboard.set_text(text) {
            debug!(error = %e, "clipboard write failed");
            // Reconnect on the next request.
            owner = None;
        }
    }
}

fn requests() -> Option<&'static Sender<String>> {
    REQUESTS
        .get_or_init(|| {
            let (tx, rx) = mpsc::channel();
            match std::thread::Builder::new()
                .name("clipboard".into())
                .spawn(move || serve(rx))
            {
                Ok(_) => Some(tx),
                Err(e) => {
                    warn!(error = %e, "cannot start clipboard thread");
                    None
                }
            }
        })
        .as_ref()
}

/// Queue `text` for the clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    requests()
        .context("clipboard thread unavailable")?
        .send(text.to_owned())
        .context("clipboard thread stopped")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_requests_are_queued_without_blocking() {
        // Without a display the owner thread just logs; queuing still succeeds.
        copy_to_clipboard("org.example.Editor.desktop").unwrap();
        copy_to_clipboard("org.example.Files.desktop").unwrap();
        assert!(requests().is_some());
    }
}
