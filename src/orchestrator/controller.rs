//! Discovery pass controller.
//!
//! Runs discovery passes on the blocking pool and emits events for presentation layers.

use crate::model::{AppRecord, InfoEvent, LauncherEvent};
use crate::registry::AppRegistry;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Refresh,
    Quit,
}

/// Spawn one discovery pass and announce it.
fn start_pass(
    registry: &Arc<dyn AppRegistry>,
    event_tx: &UnboundedSender<LauncherEvent>,
) -> JoinHandle<Vec<AppRecord>> {
    debug!("starting discovery pass");
    let _ = event_tx.send(LauncherEvent::DiscoveryStarted);
    let registry = Arc::clone(registry);
    tokio::task::spawn_blocking(move || registry.list_launchable())
}

/// Drive discovery passes from UI commands (and the optional rescan timer) until
/// the UI quits or drops its command channel.
pub(crate) async fn run_controller(
    registry: Arc<dyn AppRegistry>,
    rescan_interval: Option<Duration>,
    event_tx: UnboundedSender<LauncherEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut pass = Some(start_pass(&registry, &event_tx));
    // Refreshes that arrive mid-pass collapse into a single follow-up pass.
    let mut rescan_pending = false;
    let mut ticker = rescan_interval.map(|every| {
        let mut t = tokio::time::interval_at(Instant::now() + every, every);
        t.set_missed_tick_behavior(MissedTickBehavior::Skip);
        t
    });

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Refresh) => {
                        if pass.is_some() {
                            rescan_pending = true;
                            let _ = event_tx.send(LauncherEvent::Info(InfoEvent::RescanScheduled));
                        } else {
                            pass = Some(start_pass(&registry, &event_tx));
                        }
                    }
                    // A blocking pass cannot be interrupted; dropping its handle detaches it.
                    Some(UiCommand::Quit) | None => break,
                }
            }
            // Keep the JoinHandle in place until this branch wins so a losing branch
            // never drops the only handle to the pass.
            done = async {
                if let Some(h) = pass.as_mut() {
                    return Some(h.await);
                }
                futures::future::pending().await
            } => {
                pass = None;
                let event = match done {
                    Some(Ok(apps)) => LauncherEvent::DiscoveryCompleted { apps },
                    Some(Err(e)) => {
                        warn!(error = %e, "discovery pass failed");
                        LauncherEvent::Info(InfoEvent::DiscoveryFailed(e.to_string()))
                    }
                    None => continue,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
                if rescan_pending {
                    rescan_pending = false;
                    pass = Some(start_pass(&registry, &event_tx));
                }
            }
            _ = async {
                match ticker.as_mut() {
                    Some(t) => {
                        t.tick().await;
                    }
                    None => futures::future::pending::<()>().await,
                }
            } => {
                if pass.is_none() {
                    info!("periodic rescan");
                    pass = Some(start_pass(&registry, &event_tx));
                }
            }
        }
    }

    Ok(())
}
