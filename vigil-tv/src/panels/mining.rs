//! Mining view: network hash rate and the miner capitulation signal.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};
use vigil_analytics::{latest_valid, rolling_mean};

use crate::app::DashboardState;
use crate::theme::{C_BRIGHT, C_DIM, C_GREEN, C_SELL};
use crate::widgets::render_card;

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    if state.hashrate.is_empty() {
        let waiting = Paragraph::new(Span::styled(
            "Syncing node data...",
            Style::default().fg(C_DIM),
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(waiting, area);
        return;
    }

    let ehs: Vec<f64> = state.hashrate.iter().map(|s| s.ehs()).collect();
    let ma30 = rolling_mean(&ehs, 30);
    let ma60 = rolling_mean(&ehs, 60);

    let current = *ehs.last().unwrap_or(&0.0);
    let ma30_last = latest_valid(&ma30);
    let ma60_last = latest_valid(&ma60);

    // MA30 under MA60 marks a miner capitulation phase
    let capitulation = match (ma30_last, ma60_last) {
        (Some(fast), Some(slow)) => fast < slow,
        _ => false,
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(area);

    render_cards(f, cols[0], current, capitulation);
    render_history(f, cols[1], &ehs, ma30_last, ma60_last);
}

fn render_cards(f: &mut Frame, area: Rect, current: f64, capitulation: bool) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_card(
        f,
        halves[0],
        "Total Hashrate",
        &format!("{:.0}", current),
        "Exahashes/s",
        C_BRIGHT,
    );

    let (status, color) = if capitulation {
        ("⚠ CAPITULATION", C_SELL)
    } else {
        ("▲ HEALTHY EXPANSION", C_GREEN)
    };
    render_card(f, halves[1], "Miner Cycle", status, "MA30 vs MA60", color);
}

fn render_history(
    f: &mut Frame,
    area: Rect,
    ehs: &[f64],
    ma30: Option<f64>,
    ma60: Option<f64>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    let data: Vec<u64> = ehs.iter().map(|v| v.max(0.0) as u64).collect();
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(" HASH RATE (1Y) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(C_DIM)),
        )
        .data(&data)
        .style(Style::default().fg(C_GREEN));
    f.render_widget(sparkline, chunks[0]);

    let fmt = |v: Option<f64>| v.map(|v| format!("{:.0} EH/s", v)).unwrap_or("--".to_string());
    let line = Line::from(vec![
        Span::styled("MA30: ", Style::default().fg(C_DIM)),
        Span::styled(fmt(ma30), Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD)),
        Span::styled("   MA60: ", Style::default().fg(C_DIM)),
        Span::styled(fmt(ma60), Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD)),
    ]);
    f.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(C_DIM)),
        ),
        chunks[1],
    );
}
