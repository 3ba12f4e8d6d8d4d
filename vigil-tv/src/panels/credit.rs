//! Credit stress-test view: the institutional loan simulator plus a
//! parametric VaR table.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};
use vigil_analytics::{latest_valid, parametric_var, Confidence, CreditStress};

use crate::app::DashboardState;
use crate::config;
use crate::theme::{C_BRIGHT, C_DIM, C_GOLD, C_GREEN, C_SELL};
use crate::widgets::{render_card, thousands};

/// VaR horizon shown in the table.
const VAR_HORIZON_DAYS: f64 = 30.0;

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let Some(spot) = state.spot_price() else {
        let waiting = Paragraph::new(Span::styled(
            "Waiting for a spot price...",
            Style::default().fg(C_DIM),
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(waiting, area);
        return;
    };

    let inputs = config::credit_inputs();
    let Some(stress) = CreditStress::evaluate(spot, inputs) else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(7)])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    render_deal_column(f, cols[0], inputs.loan_usd, inputs.haircut, inputs.ltv);
    render_collateral_column(f, cols[1], &stress, inputs.haircut);
    render_risk_column(f, cols[2], &stress, inputs.liq_threshold);
    render_var_table(f, rows[1], state, spot);
}

fn render_deal_column(f: &mut Frame, area: Rect, loan_usd: f64, haircut: f64, ltv: f64) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_card(
        f,
        halves[0],
        "Principal Loan",
        &format!("${:.1}M", loan_usd / 1_000_000.0),
        "USD currency",
        C_BRIGHT,
    );
    render_card(
        f,
        halves[1],
        "Risk Policy",
        &format!("{:.0}% HC", haircut * 100.0),
        &format!("Effective LTV: {:.0}%", ltv * 100.0),
        C_BRIGHT,
    );
}

fn render_collateral_column(f: &mut Frame, area: Rect, stress: &CreditStress, haircut: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .title(" REQUIRED COLLATERAL ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_GOLD));
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{:.2} BTC", stress.collateral_btc),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(Span::styled(
            format!("Market value ${}", thousands(stress.collateral_market_usd)),
            Style::default().fg(C_BRIGHT),
        ))
        .centered(),
        Line::from(Span::styled(
            format!("Lending price ${}", thousands(stress.lending_price)),
            Style::default().fg(C_DIM),
        ))
        .centered(),
    ];
    f.render_widget(Paragraph::new(lines), inner);

    let recognition = 1.0 - haircut;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" BANK RECOGNITION ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(C_DIM)),
        )
        .gauge_style(Style::default().fg(C_GREEN))
        .ratio(recognition.clamp(0.0, 1.0))
        .label(format!("{:.0}%", recognition * 100.0));
    f.render_widget(gauge, chunks[1]);
}

fn render_risk_column(f: &mut Frame, area: Rect, stress: &CreditStress, liq_threshold: f64) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let color = if stress.is_critical() { C_SELL } else { C_GREEN };
    let status = if stress.is_critical() {
        "CRITICAL"
    } else {
        "SAFE ZONE"
    };

    render_card(
        f,
        halves[0],
        "Liquidation Price",
        &format!("${}", thousands(stress.liquidation_price)),
        &format!("Threshold: {:.0}%", liq_threshold * 100.0),
        color,
    );
    render_card(
        f,
        halves[1],
        "Safety Buffer",
        &format!("{:.2}%", stress.buffer_pct * 100.0),
        &format!("Status: {}", status),
        color,
    );
}

fn render_var_table(f: &mut Frame, area: Rect, state: &DashboardState, spot: f64) {
    let block = Block::default()
        .title(" PARAMETRIC VAR (30D HORIZON) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    let Some(vol) = latest_valid(&state.indicators.realized_vol) else {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(Span::styled(
                "Warming up volatility window...",
                Style::default().fg(C_DIM),
            )),
            inner,
        );
        return;
    };

    let header = Row::new(
        ["CONFIDENCE", "MAX DRAWDOWN", "PRICE AT VAR"].iter().map(|h| {
            Cell::from(*h).style(Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD))
        }),
    )
    .height(1);

    let rows = Confidence::ALL.iter().map(|confidence| {
        let var = parametric_var(spot, vol, VAR_HORIZON_DAYS, *confidence);
        let severity = if var.loss_pct > 0.25 { C_SELL } else { C_BRIGHT };
        Row::new(vec![
            Cell::from(confidence.label()).style(Style::default().fg(C_DIM)),
            Cell::from(format!("-{:.2}%", var.loss_pct * 100.0))
                .style(Style::default().fg(severity)),
            Cell::from(format!("${}", thousands(var.price_at_var)))
                .style(Style::default().fg(severity)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}
