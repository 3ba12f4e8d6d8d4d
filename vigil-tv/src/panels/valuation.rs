//! Valuation view: the power-law corridor and the monthly seasonality
//! heatmap.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use vigil_analytics::{days_since_genesis, valuation};

use crate::app::DashboardState;
use crate::theme::{C_BRIGHT, C_BUY, C_DIM, C_GOLD, C_GREEN, C_PURPLE, C_SELL};
use crate::widgets::{rail_gauge, thousands};

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_power_law(f, cols[0], state);
    render_seasonality(f, cols[1], state);
}

fn render_power_law(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" POWER LAW CORRIDOR (LOG-LOG) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (Some(fit), Some(last)) = (state.power_law, state.full_history.last()) else {
        f.render_widget(
            Paragraph::new(Span::styled("Loading history...", Style::default().fg(C_DIM))),
            inner,
        );
        return;
    };
    let Some(days) = days_since_genesis(last.time) else {
        return;
    };

    let spot = state.spot_price().unwrap_or(last.close);
    let fair = fit.fair_value(days);
    let support = fit.band(days, valuation::SUPPORT_OFFSET);
    let resistance = fit.band(days, valuation::RESISTANCE_OFFSET);
    let deviation = (spot / fair - 1.0) * 100.0;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(2)])
        .split(inner);

    let price_row = |label: &str, value: f64, color| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Style::default().fg(C_DIM)),
            Span::styled(
                format!("${:>10}", thousands(value)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let mut lines = vec![
        price_row("Resistance", resistance, C_PURPLE),
        price_row("Fair value", fair, C_GREEN),
        price_row("Support", support, C_SELL),
        price_row("Spot", spot, C_GOLD),
        Line::from(vec![
            Span::styled("Deviation     ", Style::default().fg(C_DIM)),
            Span::styled(
                format!("{:+.1}% vs fair value", deviation),
                Style::default().fg(if deviation >= 0.0 { C_PURPLE } else { C_GREEN }),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(position) = fit.corridor_position(days, spot) {
        let width = (inner.width as usize).saturating_sub(14).max(10);
        lines.push(Line::from(vec![
            Span::styled("SUP ", Style::default().fg(C_SELL)),
            Span::styled(
                rail_gauge(position, 0.0, 1.0, width),
                Style::default().fg(C_GOLD),
            ),
            Span::styled(" RES", Style::default().fg(C_PURPLE)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), chunks[0]);

    // Corridor position over the last year of samples
    let data: Vec<u64> = state
        .full_history
        .iter()
        .rev()
        .take(365)
        .rev()
        .filter_map(|p| {
            let d = days_since_genesis(p.time)?;
            let pos = fit.corridor_position(d, p.close)?;
            Some((pos.clamp(0.0, 1.2) * 100.0) as u64)
        })
        .collect();

    if !data.is_empty() {
        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .title(" CORRIDOR POSITION (1Y) ")
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(C_DIM)),
            )
            .data(&data)
            .style(Style::default().fg(C_GOLD));
        f.render_widget(sparkline, chunks[1]);
    }
}

const MONTH_HEADERS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn render_seasonality(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" MONTHLY RETURNS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    if state.seasonality.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(Span::styled("Loading history...", Style::default().fg(C_DIM))),
            inner,
        );
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from("YEAR").style(Style::default().fg(C_GOLD)))
            .chain(MONTH_HEADERS.iter().map(|m| {
                Cell::from(*m).style(Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD))
            })),
    )
    .height(1);

    // Most recent years that fit the panel
    let visible_years = (area.height as usize).saturating_sub(3).max(1);
    let matrix = &state.seasonality;
    let skip = matrix.years.len().saturating_sub(visible_years);

    let rows = matrix
        .years
        .iter()
        .zip(matrix.cells.iter())
        .skip(skip)
        .map(|(year, cells)| {
            let year_cell =
                Cell::from(year.to_string()).style(Style::default().fg(C_BRIGHT));
            let month_cells = cells.iter().map(|cell| match cell {
                Some(pct) => {
                    let color = if *pct >= 0.0 { C_BUY } else { C_SELL };
                    Cell::from(format!("{:+.0}", pct * 100.0))
                        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                }
                None => Cell::from("·").style(Style::default().fg(C_DIM)),
            });
            Row::new(std::iter::once(year_cell).chain(month_cells)).height(1)
        });

    let mut widths = vec![Constraint::Length(5)];
    widths.extend(std::iter::repeat(Constraint::Length(4)).take(12));

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
