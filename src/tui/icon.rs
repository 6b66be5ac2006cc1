//! Grayscale half-block rendering of icon thumbnails.
//!
//! Each terminal cell shows two vertically stacked pixels using `▀`/`▄`.

use crate::model::Icon;
use crate::presentation::desaturate;
use ratatui::{
    style::{Color, Style},
    text::Span,
};

pub const ICON_COLS: u16 = 4;
pub const ICON_ROWS: u16 = 2;

/// Pixels at or below this alpha are drawn as background.
const ALPHA_CUTOFF: u8 = 64;

fn gray_at(icon: &Icon, x: u32, y: u32) -> Option<Color> {
    let [r, g, b, a] = icon.pixels.pixel(x, y)?;
    if a <= ALPHA_CUTOFF {
        return None;
    }
    let v = desaturate(r, g, b);
    Some(Color::Rgb(v, v, v))
}

fn cell(top: Option<Color>, bottom: Option<Color>) -> Span<'static> {
    match (top, bottom) {
        (Some(t), Some(b)) => Span::styled("▀", Style::default().fg(t).bg(b)),
        (Some(t), None) => Span::styled("▀", Style::default().fg(t)),
        (None, Some(b)) => Span::styled("▄", Style::default().fg(b)),
        (None, None) => Span::raw(" "),
    }
}

fn placeholder() -> Vec<Vec<Span<'static>>> {
    let style = Style::default().fg(Color::DarkGray);
    vec![
        vec![Span::styled("┌──┐", style)],
        vec![Span::styled("└──┘", style)],
    ]
}

/// Spans for each of the `ICON_ROWS` lines of a row's icon column, `ICON_COLS` cells wide.
/// Rows without an icon get a placeholder box.
pub fn icon_lines(icon: Option<&Icon>) -> Vec<Vec<Span<'static>>> {
    let Some(icon) = icon else {
        return placeholder();
    };

    (0..u32::from(ICON_ROWS))
        .map(|row| {
            (0..u32::from(ICON_COLS))
                .map(|col| cell(gray_at(icon, col, row * 2), gray_at(icon, col, row * 2 + 1)))
                .collect()
        })
        .collect()
}
