//! Risk radar view: volatility regime, mean-reversion z-score, macro
//! comparison, and the derivatives strip.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};
use vigil_analytics::{latest_valid, normalized_performance, pearson};
use vigil_data::MacroAsset;

use crate::app::DashboardState;
use crate::theme::{
    direction_arrow, direction_color, C_ACCENT, C_BRIGHT, C_DIM, C_GOLD, C_GREEN, C_NEUTRAL,
    C_PURPLE, C_SELL,
};
use crate::widgets::rail_gauge;

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(4)])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    render_volatility(f, cols[0], state);
    render_zscore(f, cols[1], state);
    render_macro(f, cols[2], state);
    render_derivatives(f, rows[1], state);
}

fn render_volatility(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" VOLATILITY REGIME ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(2)])
        .split(inner);

    let rv = latest_valid(&state.indicators.realized_vol);
    let iv = latest_valid(&state.indicators.implied_vol);

    let mut lines = Vec::new();
    match rv {
        Some(rv) => {
            let (regime, color) = if rv > 0.60 {
                ("CRISIS", C_SELL)
            } else if rv > 0.40 {
                ("ELEVATED", C_NEUTRAL)
            } else {
                ("CALM", C_GREEN)
            };
            lines.push(Line::from(vec![
                Span::styled("Realized (30D): ", Style::default().fg(C_DIM)),
                Span::styled(
                    format!("{:.1}%", rv * 100.0),
                    Style::default().fg(C_GREEN).add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(iv) = iv {
                lines.push(Line::from(vec![
                    Span::styled("Implied proxy:  ", Style::default().fg(C_DIM)),
                    Span::styled(format!("{:.1}%", iv * 100.0), Style::default().fg(C_GOLD)),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("Regime: ", Style::default().fg(C_DIM)),
                Span::styled(regime, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "Warming up volatility window...",
            Style::default().fg(C_DIM),
        ))),
    }
    f.render_widget(Paragraph::new(lines), chunks[0]);

    // Vol history, permille so small percentages survive the u64 cast
    let data: Vec<u64> = state
        .indicators
        .realized_vol
        .iter()
        .rev()
        .take(180)
        .rev()
        .filter(|v| v.is_finite())
        .map(|v| (v * 1000.0).max(0.0) as u64)
        .collect();

    if !data.is_empty() {
        let sparkline = Sparkline::default()
            .data(&data)
            .style(Style::default().fg(C_GREEN));
        f.render_widget(sparkline, chunks[1]);
    }
}

fn render_zscore(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" MEAN REVERSION (Z-SCORE 200D) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    match latest_valid(&state.indicators.z_score) {
        Some(z) => {
            let (label, color) = if z > 3.0 {
                ("OVERHEATED", C_SELL)
            } else if z < -3.0 {
                ("DEEP VALUE", C_GREEN)
            } else if z > 0.0 {
                ("ABOVE TREND", C_NEUTRAL)
            } else {
                ("BELOW TREND", C_ACCENT)
            };

            lines.push(Line::from(vec![
                Span::styled("Current: ", Style::default().fg(C_DIM)),
                Span::styled(
                    format!("{:+.2}σ", z),
                    Style::default().fg(C_PURPLE).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(""));

            let width = (inner.width as usize).saturating_sub(10).max(10);
            lines.push(Line::from(vec![
                Span::styled("-3σ ", Style::default().fg(C_GREEN)),
                Span::styled(rail_gauge(z, -3.0, 3.0, width), Style::default().fg(C_PURPLE)),
                Span::styled(" +3σ", Style::default().fg(C_SELL)),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "±3σ marks the historical exhaustion zones",
                Style::default().fg(C_DIM),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "Warming up 200-day window...",
            Style::default().fg(C_DIM),
        ))),
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_macro(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" MACRO (6M NORMALIZED) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.macro_series.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Loading macro data...",
                Style::default().fg(C_DIM),
            )),
            inner,
        );
        return;
    }

    let bar_width = (inner.width as usize).saturating_sub(30).max(8);
    let max_abs = state
        .macro_series
        .iter()
        .filter_map(|s| {
            let closes: Vec<f64> = s.points.iter().map(|p| p.close).collect();
            normalized_performance(&closes).last().copied()
        })
        .map(f64::abs)
        .fold(1.0_f64, f64::max);

    let mut lines = Vec::new();
    for series in &state.macro_series {
        let closes: Vec<f64> = series.points.iter().map(|p| p.close).collect();
        let perf = normalized_performance(&closes);
        let Some(&last) = perf.last() else { continue };

        let color = direction_color(last);
        let ratio = (last / max_abs + 1.0) / 2.0;
        let filled = (ratio.clamp(0.0, 1.0) * bar_width as f64) as usize;
        let bar: String = (0..bar_width)
            .map(|i| {
                if i == bar_width / 2 {
                    '│'
                } else if i < filled.min(bar_width) && i >= bar_width / 2 {
                    '█'
                } else if i >= filled && i < bar_width / 2 {
                    '█'
                } else {
                    '░'
                }
            })
            .collect();

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", series.asset.label()),
                Style::default().fg(C_DIM),
            ),
            Span::styled(
                format!("{} {:>+7.1}% ", direction_arrow(last), last),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(bar, Style::default().fg(color)),
        ]));
    }

    // BTC vs S&P correlation over the shared window
    let btc = series_closes(state, MacroAsset::Bitcoin);
    let spx = series_closes(state, MacroAsset::Sp500);
    let corr = pearson(&btc, &spx, 100);
    if corr != 0.0 {
        let corr_color = if corr >= 0.8 {
            C_GREEN
        } else if corr >= 0.5 {
            C_ACCENT
        } else if corr >= 0.0 {
            C_NEUTRAL
        } else {
            C_SELL
        };
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("CORR BTC/S&P: ", Style::default().fg(C_DIM)),
            Span::styled(
                format!("{:.2}", corr),
                Style::default().fg(corr_color).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn series_closes(state: &DashboardState, asset: MacroAsset) -> Vec<f64> {
    state
        .macro_series
        .iter()
        .find(|s| s.asset == asset)
        .map(|s| s.points.iter().map(|p| p.close).collect())
        .unwrap_or_default()
}

fn render_derivatives(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" DERIVATIVES ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(d) = &state.derivatives else {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Loading derivatives...",
                Style::default().fg(C_DIM),
            )),
            inner,
        );
        return;
    };

    let mut spans = vec![
        Span::styled("FUNDING ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("{:+.4}%", d.funding_rate_pct),
            Style::default()
                .fg(direction_color(d.funding_rate_pct))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   OPEN INTEREST ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("${:.2}B", d.open_interest_billions),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({:+.2}%)", d.oi_change_pct),
            Style::default().fg(direction_color(d.oi_change_pct)),
        ),
        Span::styled("   PUT/CALL ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("{:.2}", d.put_call_ratio),
            Style::default()
                .fg(if d.put_call_ratio > 1.0 { C_SELL } else { C_GREEN })
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if d.simulated {
        spans.push(Span::styled("   [STATIC FALLBACK]", Style::default().fg(C_SELL)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}
