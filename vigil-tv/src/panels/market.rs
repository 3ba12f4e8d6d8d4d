//! Market structure view: candle columns with auto-Fibonacci levels,
//! session volume, and the quick metrics row.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};
use vigil_analytics::{fib_levels, latest_valid, FibLevel};
use vigil_data::Candle;

use crate::app::DashboardState;
use crate::theme::{C_BRIGHT, C_BUY, C_DIM, C_GOLD, C_PURPLE, C_SELL};
use crate::widgets::{render_card, thousands};

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    if state.market.len() < 2 {
        let waiting = Paragraph::new(Span::styled(
            "Waiting for market data...",
            Style::default().fg(C_DIM),
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(waiting, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(5),
            Constraint::Length(5),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(26)])
        .split(rows[0]);

    render_candles(f, top[0], state);
    render_fib_table(f, top[1], state);
    render_volume(f, rows[1], state);
    render_metrics(f, rows[2], state);
}

/// Price label gutter inside the candle chart.
const LABEL_WIDTH: usize = 11;

/// Bars backing the auto-Fibonacci range (one year, matching the chart's
/// reference window even when the terminal shows fewer columns).
const FIB_WINDOW: usize = 365;

fn fib_range(state: &DashboardState) -> (f64, f64) {
    let candles = visible_candles(state, FIB_WINDOW);
    let high = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    (high, low)
}

fn visible_candles(state: &DashboardState, width: usize) -> &[Candle] {
    let n = state.market.len();
    &state.market[n.saturating_sub(width)..]
}

fn render_candles(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" PRICE STRUCTURE ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width as usize <= LABEL_WIDTH || inner.height == 0 {
        return;
    }

    let cols = inner.width as usize - LABEL_WIDTH;
    let candles = visible_candles(state, cols);
    let rows = inner.height as usize;

    let high = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    if !(high > low) {
        return;
    }

    let pad = (high - low) * 0.02;
    let top = high + pad;
    let bottom = low - pad;
    let step = (top - bottom) / rows as f64;

    let (fib_high, fib_low) = fib_range(state);
    let fibs = fib_levels(fib_high, fib_low);

    let mut lines = Vec::with_capacity(rows);
    for row in 0..rows {
        let row_hi = top - row as f64 * step;
        let row_lo = row_hi - step;

        let label = if row % 3 == 1 {
            format!("{:>9.0} ▕", (row_hi + row_lo) / 2.0)
        } else {
            format!("{:>9} ▕", "")
        };

        let mut cells: Vec<(char, Style)> = Vec::with_capacity(cols);
        for candle in candles {
            cells.push(candle_cell(candle, row_lo, row_hi, &fibs));
        }

        let mut spans = vec![Span::styled(label, Style::default().fg(C_DIM))];
        spans.extend(compress_cells(cells));
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn candle_cell(candle: &Candle, row_lo: f64, row_hi: f64, fibs: &[FibLevel]) -> (char, Style) {
    let bull = candle.close >= candle.open;
    let color = if bull { C_BUY } else { C_SELL };

    let body_top = candle.open.max(candle.close);
    let body_bot = candle.open.min(candle.close);

    if body_top >= row_lo && body_bot <= row_hi {
        return ('█', Style::default().fg(color));
    }
    if candle.high >= row_lo && candle.low <= row_hi {
        return ('│', Style::default().fg(color));
    }
    if let Some(fib) = fibs.iter().find(|l| l.price >= row_lo && l.price < row_hi) {
        let style = if fib.golden {
            Style::default().fg(C_GOLD)
        } else {
            Style::default().fg(C_DIM)
        };
        return ('┄', style);
    }

    (' ', Style::default())
}

/// Merge runs of equally-styled cells into single spans.
fn compress_cells(cells: Vec<(char, Style)>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for (ch, style) in cells {
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }

    spans
}

fn render_fib_table(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" AUTO-FIB ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (high, low) = fib_range(state);

    let mut lines = Vec::new();
    for level in fib_levels(high, low) {
        let tag = match level.ratio {
            r if r == 0.0 => "MAX ".to_string(),
            r if r == 1.0 => "MIN ".to_string(),
            r => format!("{:.3}", r),
        };
        let style = if level.golden {
            Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_BRIGHT)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}  ", tag), Style::default().fg(C_DIM)),
            Span::styled(format!("${:>10.0}", level.price), style),
            if level.golden {
                Span::styled("  ◀ golden", Style::default().fg(C_GOLD))
            } else {
                Span::raw("")
            },
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_volume(f: &mut Frame, area: Rect, state: &DashboardState) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let candles = visible_candles(state, inner_width.max(1));

    let data: Vec<u64> = candles.iter().map(|c| c.volume.max(0.0) as u64).collect();

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(" VOLUME ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(C_DIM)),
        )
        .data(&data)
        .style(Style::default().fg(C_PURPLE));
    f.render_widget(sparkline, area);
}

fn render_metrics(f: &mut Frame, area: Rect, state: &DashboardState) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let high = state.day_high().unwrap_or(0.0);
    let low = state.day_low().unwrap_or(0.0);
    render_card(f, cards[0], "24h High", &format!("${}", thousands(high)), "", C_BRIGHT);
    render_card(f, cards[1], "24h Low", &format!("${}", thousands(low)), "", C_BRIGHT);

    match state.trend_bullish() {
        Some(true) => render_card(f, cards[2], "Trend (SMA50)", "BULLISH", "spot > mean", C_BUY),
        Some(false) => render_card(f, cards[2], "Trend (SMA50)", "BEARISH", "spot < mean", C_SELL),
        None => render_card(f, cards[2], "Trend (SMA50)", "--", "warming up", C_DIM),
    }

    match latest_valid(&state.indicators.realized_vol) {
        Some(vol) => render_card(
            f,
            cards[3],
            "Volatility",
            &format!("{:.1}%", vol * 100.0),
            "realized 30D",
            C_GOLD,
        ),
        None => render_card(f, cards[3], "Volatility", "--", "warming up", C_DIM),
    }

    match &state.etf {
        Some(etf) => render_card(
            f,
            cards[4],
            &format!("{} RVOL", etf.symbol),
            &format!("{:.2}x", etf.rvol),
            &format!("{:+.2}% day", etf.change * 100.0),
            if etf.rvol > 1.5 { C_GOLD } else { C_BRIGHT },
        ),
        None => match latest_valid(&state.indicators.sma_200) {
            Some(sma) => render_card(
                f,
                cards[4],
                "SMA 200",
                &format!("${}", thousands(sma)),
                "long trend",
                C_PURPLE,
            ),
            None => render_card(f, cards[4], "SMA 200", "--", "warming up", C_DIM),
        },
    }
}
