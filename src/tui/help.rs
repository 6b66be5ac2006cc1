use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(Color::White))
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            key("↑/↓"),
            Span::raw(" or "),
            key("j/k"),
            Span::raw("    Move highlight"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("PgUp/PgDn"),
            Span::raw("     Move one page"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("Home/End"),
            Span::raw("      First / last app"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("Enter"),
            Span::raw(" / "),
            key("click"),
            Span::raw(" Launch app"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("r"),
            Span::raw("             Rescan installed apps"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("y"),
            Span::raw("             Copy identifier to clipboard"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("?"),
            Span::raw("             Toggle this help"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            key("q"),
            Span::raw(" / "),
            key("Esc"),
            Span::raw(" / "),
            key("Ctrl-C"),
            Span::raw("  Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Apps come from the XDG applications directories.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
