//! Header strip: live price, fear & greed, the news ticker, and the
//! rotation dots.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{DashboardState, NewsTicker, Rotation, View};
use crate::theme::{
    direction_arrow, direction_color, C_ACCENT, C_BRIGHT, C_DIM, C_GOLD, C_SELL,
};

pub fn render_header(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    rotation: &Rotation,
    ticker: &NewsTicker,
) {
    let mut lines = Vec::with_capacity(4);
    lines.push(price_line(state));
    lines.push(ticker_line(state, ticker));
    lines.push(dots_line(rotation));
    lines.push(Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_DIM),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

fn price_line(state: &DashboardState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "VIGIL TV  ",
        Style::default().fg(C_DIM).add_modifier(Modifier::BOLD),
    )];

    match (state.spot_price(), state.price_change()) {
        (Some(price), change) => {
            let change = change.unwrap_or(0.0);
            let color = direction_color(change);
            spans.push(Span::styled(
                format!("${:>12.2}", price),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!("  {} {:+.2}%  ", direction_arrow(change), change * 100.0),
                Style::default().fg(color),
            ));
            spans.push(Span::styled("24H", Style::default().fg(C_DIM)));
        }
        _ => spans.push(Span::styled(
            "Market data feed reconnecting...",
            Style::default().fg(C_DIM),
        )),
    }

    if let Some(fng) = &state.fear_greed {
        spans.push(Span::styled("   F&G ", Style::default().fg(C_DIM)));
        spans.push(Span::styled(
            format!("{}", fng.value),
            Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", fng.classification),
            Style::default().fg(C_BRIGHT),
        ));
    }

    spans.push(Span::styled("   ", Style::default()));
    if state.live_connected {
        spans.push(Span::styled("● LIVE", Style::default().fg(C_ACCENT)));
    } else {
        spans.push(Span::styled("○ DELAYED", Style::default().fg(C_DIM)));
    }

    if state.order_book.as_ref().is_some_and(|b| b.simulated) {
        spans.push(Span::styled(
            "  [BOOK SIMULATED]",
            Style::default().fg(C_SELL),
        ));
    }

    Line::from(spans)
}

fn ticker_line(state: &DashboardState, ticker: &NewsTicker) -> Line<'static> {
    let window = ticker.window(&state.news);
    if window.is_empty() {
        return Line::from(Span::styled(
            "Fetching headlines...",
            Style::default().fg(C_DIM),
        ));
    }

    let mut spans = Vec::with_capacity(window.len() * 3);
    for item in window {
        spans.push(Span::styled(
            format!("⚡{} ", item.lead_tag().to_uppercase()),
            Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            item.title.clone(),
            Style::default().fg(C_BRIGHT),
        ));
        spans.push(Span::styled("   ", Style::default()));
    }

    Line::from(spans)
}

fn dots_line(rotation: &Rotation) -> Line<'static> {
    let dots: String = (0..View::ALL.len())
        .map(|i| if i == rotation.index() { "● " } else { "○ " })
        .collect();

    let mut spans = vec![
        Span::styled("LIVE FEED: ", Style::default().fg(C_DIM)),
        Span::styled(dots, Style::default().fg(C_ACCENT)),
        Span::styled(
            format!(
                " {} ({}/{})",
                rotation.current().title(),
                rotation.index() + 1,
                View::ALL.len()
            ),
            Style::default().fg(C_BRIGHT),
        ),
    ];

    if rotation.is_paused() {
        spans.push(Span::styled(
            "  [PAUSED - space resumes]",
            Style::default().fg(C_GOLD),
        ));
    }

    Line::from(spans)
}
