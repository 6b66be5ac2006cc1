mod clipboard;
mod help;
mod icon;
mod state;

use crate::cli::{build_config, Cli};
use crate::model::{AppRecord, InfoEvent, LauncherEvent};
use crate::orchestrator::{self, UiCommand};
use crate::registry::{AppRegistry, DesktopRegistry};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use state::{UiState, ROW_HEIGHT};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Raw mode, alternate screen and mouse capture for as long as the UI is up.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

fn restore_terminal(out: &mut impl io::Write) {
    disable_raw_mode().ok();
    execute!(out, DisableMouseCapture, LeaveAlternateScreen).ok();
}

impl TerminalSession {
    fn start() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            restore_terminal(&mut stdout);
            return Err(e).context("enter alternate screen");
        }

        let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(t) => t,
            Err(e) => {
                restore_terminal(&mut io::stdout());
                return Err(e).context("create terminal");
            }
        };
        terminal.clear().ok();
        Ok(Self {
            terminal,
            active: true,
        })
    }

    fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        restore_terminal(self.terminal.backend_mut());
        self.terminal.show_cursor().ok();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.stop();
    }
}

enum Flow {
    Continue,
    Quit,
}

pub async fn run(args: Cli) -> Result<()> {
    let registry: Arc<dyn AppRegistry> = Arc::new(DesktopRegistry::new(build_config(&args)));
    let (event_tx, event_rx) = mpsc::unbounded_channel::<LauncherEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // The UI owns the terminal on its own thread; discovery stays on the runtime.
    let ui_registry = Arc::clone(&registry);
    let ui_args = args.clone();
    let ui_handle =
        std::thread::spawn(move || run_threaded(ui_args, ui_registry, event_rx, cmd_tx));

    let rescan = args.rescan_interval.map(Duration::from);
    let res = orchestrator::run_controller(registry, rescan, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    args: Cli,
    registry: Arc<dyn AppRegistry>,
    mut event_rx: UnboundedReceiver<LauncherEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    let mut session = TerminalSession::start()?;

    // UiState is owned by the UI thread only.
    let mut state = UiState {
        sort_order: args.sort_order(),
        scanning: true,
        ..Default::default()
    };

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
            dirty = true;
        }

        let area = session
            .terminal
            .size()
            .map(|s| Rect::new(0, 0, s.width, s.height))
            .unwrap_or_default();
        state.set_viewport_rows(viewport_rows(area));

        if dirty || last_tick.elapsed() >= tick_rate {
            session.terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
            dirty = false;
        }

        // Short poll keeps discovery results flowing in while idle.
        if !event::poll(Duration::from_millis(20)).unwrap_or(false) {
            continue;
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        dirty = true;

        let flow = match ev {
            Event::Key(k) => handle_key(&args, &mut state, k, registry.as_ref(), &cmd_tx),
            Event::Mouse(m) => handle_mouse(&args, &mut state, m, area, registry.as_ref()),
            _ => Flow::Continue,
        };
        if let Flow::Quit = flow {
            let _ = cmd_tx.send(UiCommand::Quit);
            break Ok(());
        }
    };

    session.stop();
    res
}

fn apply_event(state: &mut UiState, ev: LauncherEvent) {
    match ev {
        LauncherEvent::DiscoveryStarted => state.scanning = true,
        LauncherEvent::DiscoveryCompleted { apps } => {
            debug!(count = apps.len(), "discovery results received");
            state.apply_apps(apps);
            state.info.clear();
        }
        LauncherEvent::Info(info) => {
            if matches!(info, InfoEvent::DiscoveryFailed(_)) {
                state.scanning = false;
            }
            state.info = info.to_message();
        }
    }
}

/// Launch the row at `index`. Activation leaves no visible trace in the list.
fn activate(args: &Cli, state: &mut UiState, index: usize, registry: &dyn AppRegistry) -> Flow {
    let Some(app) = state.apps.activate(index, registry) else {
        return Flow::Continue;
    };
    info!(identifier = %app.identifier, name = %app.display_name, "row activated");
    if args.exit_on_launch {
        Flow::Quit
    } else {
        Flow::Continue
    }
}

fn handle_key(
    args: &Cli,
    state: &mut UiState,
    k: KeyEvent,
    registry: &dyn AppRegistry,
    cmd_tx: &UnboundedSender<UiCommand>,
) -> Flow {
    if k.kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    match (k.modifiers, k.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            return Flow::Quit
        }
        (_, KeyCode::Esc) => {
            if !state.show_help {
                return Flow::Quit;
            }
            state.show_help = false;
        }
        (_, KeyCode::Char('?')) => state.show_help = !state.show_help,
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => state.select_prev(),
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => state.select_next(),
        (_, KeyCode::PageUp) => state.page_up(),
        (_, KeyCode::PageDown) => state.page_down(),
        (_, KeyCode::Home) | (_, KeyCode::Char('g')) => state.select_first(),
        (_, KeyCode::End) | (_, KeyCode::Char('G')) => state.select_last(),
        (_, KeyCode::Enter) => {
            if !state.show_help {
                let index = state.selected;
                return activate(args, state, index, registry);
            }
        }
        (_, KeyCode::Char('r')) => {
            state.scanning = true;
            state.info = "Rescanning…".into();
            let _ = cmd_tx.send(UiCommand::Refresh);
        }
        (_, KeyCode::Char('y')) => {
            if let Some(app) = state.selected_app() {
                let id = app.identifier.clone();
                state.info = match clipboard::copy_to_clipboard(&id) {
                    Ok(()) => format!("✓ Copied to clipboard: {id}"),
                    Err(e) => format!("Clipboard copy failed: {e:#}"),
                };
            }
        }
        _ => {}
    }
    Flow::Continue
}

fn handle_mouse(
    args: &Cli,
    state: &mut UiState,
    m: MouseEvent,
    area: Rect,
    registry: &dyn AppRegistry,
) -> Flow {
    if state.show_help {
        return Flow::Continue;
    }
    match m.kind {
        MouseEventKind::ScrollDown => state.select_next(),
        MouseEventKind::ScrollUp => state.select_prev(),
        MouseEventKind::Down(MouseButton::Left) => {
            let inner = list_inner(area);
            let inside = m.column >= inner.x
                && m.column < inner.x + inner.width
                && m.row >= inner.y
                && m.row < inner.y + inner.height;
            if let Some(index) = inside.then(|| state.row_at(m.row - inner.y)).flatten() {
                state.selected = index;
                return activate(args, state, index, registry);
            }
        }
        _ => {}
    }
    Flow::Continue
}

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);
    (chunks[0], chunks[1])
}

fn list_inner(area: Rect) -> Rect {
    let (list, _) = split(area);
    Block::default().borders(Borders::ALL).inner(list)
}

fn viewport_rows(area: Rect) -> usize {
    (list_inner(area).height / ROW_HEIGHT) as usize
}

fn draw(area: Rect, f: &mut Frame, state: &UiState) {
    let (list_area, status_area) = split(area);
    if state.show_help {
        help::draw_help(list_area, f);
    } else {
        draw_list(list_area, f, state);
    }
    draw_status(status_area, f, state);
}

fn row_lines(app: &AppRecord, selected: bool) -> Vec<Line<'static>> {
    let (marker, name_style) = if selected {
        (
            "▌ ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Color::White))
    };

    let mut icon_rows = icon::icon_lines(app.icon.as_ref()).into_iter();
    let mut name_line = vec![Span::raw(marker)];
    name_line.extend(icon_rows.next().unwrap_or_default());
    name_line.push(Span::raw("  "));
    name_line.push(Span::styled(app.display_name.clone(), name_style));

    let mut id_line = vec![Span::raw(marker)];
    id_line.extend(icon_rows.next().unwrap_or_default());
    id_line.push(Span::raw("  "));
    id_line.push(Span::styled(
        app.identifier.clone(),
        Style::default().fg(Color::DarkGray),
    ));

    vec![Line::from(name_line), Line::from(id_line)]
}

fn draw_list(area: Rect, f: &mut Frame, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("subtract ({})", state.apps.len()));

    let placeholder = if !state.loaded_once {
        Some("Scanning applications…")
    } else if state.apps.is_empty() {
        Some("No launchable applications found")
    } else {
        None
    };
    if let Some(text) = placeholder {
        let p = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let lines: Vec<Line> = state
        .apps
        .rows()
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .take(state.viewport_rows)
        .flat_map(|(index, app)| row_lines(app, index == state.selected))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState) {
    let hint = Style::default().fg(Color::White);
    let mut spans = Vec::new();
    if state.scanning {
        spans.push(Span::styled("Scanning… ", Style::default().fg(Color::Gray)));
    }
    spans.extend([
        Span::styled("Enter", hint),
        Span::raw(": launch  "),
        Span::styled("r", hint),
        Span::raw(": rescan  "),
        Span::styled("?", hint),
        Span::raw(": help  "),
        Span::styled("q", hint),
        Span::raw(": quit"),
    ]);
    if !state.info.is_empty() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::raw(state.info.clone()));
    }
    let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}
