//! Liquidity density view: binned bid/ask depth around spot.
//!
//! Mirrors the venue cascade's contract: a real book renders under the
//! venue's name, a fabricated one renders with a red SIMULATION banner.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use vigil_data::OrderBook;

use crate::app::DashboardState;
use crate::theme::{C_BRIGHT, C_BUY, C_DIM, C_SELL};
use crate::widgets::thousands;

/// Zoom window around spot (fraction of price each side).
const ZOOM: f64 = 0.02;
/// Bins snap to this price quantum.
const BIN_QUANTUM: f64 = 10.0;

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let Some(book) = &state.order_book else {
        let waiting = Paragraph::new(Span::styled(
            "Waiting for liquidity data feed...",
            Style::default().fg(C_DIM),
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(waiting, area);
        return;
    };

    let (title, border_color) = if book.simulated {
        (" ⚠ LIQUIDITY MAP (SIMULATION) ".to_string(), C_SELL)
    } else {
        (format!(" LIQUIDITY DENSITY ({}) ", book.venue.to_uppercase()), C_DIM)
    };

    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(border_color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(mid) = book.mid_price().or(state.spot_price()) else {
        return;
    };
    if inner.height < 5 || inner.width < 30 {
        return;
    }

    let lines = depth_lines(book, mid, inner.height as usize, inner.width as usize);
    f.render_widget(Paragraph::new(lines), inner);
}

/// One aggregated depth row.
struct DepthBin {
    price: f64,
    amount: f64,
    is_ask: bool,
}

fn depth_lines(book: &OrderBook, mid: f64, rows: usize, width: usize) -> Vec<Line<'static>> {
    // One row is the spot marker; split the rest between the sides
    let side_rows = (rows - 1) / 2;
    if side_rows == 0 {
        return Vec::new();
    }

    let span = mid * ZOOM;
    let raw_bin = span / side_rows as f64;
    let bin = (raw_bin / BIN_QUANTUM).ceil().max(1.0) * BIN_QUANTUM;

    let mut bins: Vec<DepthBin> = Vec::with_capacity(side_rows * 2);

    // Ask rows descend toward the spot line
    for i in (0..side_rows).rev() {
        let lo = mid + i as f64 * bin;
        bins.push(DepthBin {
            price: lo,
            amount: side_amount(&book.asks, lo, lo + bin),
            is_ask: true,
        });
    }
    for i in 0..side_rows {
        let hi = mid - i as f64 * bin;
        bins.push(DepthBin {
            price: hi - bin,
            amount: side_amount(&book.bids, hi - bin, hi),
            is_ask: false,
        });
    }

    let max_amount = bins
        .iter()
        .map(|b| b.amount)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    // Layout: price gutter | bar | amount
    let bar_width = width.saturating_sub(26).max(10);

    let mut lines = Vec::with_capacity(rows);
    let spot_row = side_rows;
    let mut bin_iter = bins.into_iter();

    for row in 0..rows.min(side_rows * 2 + 1) {
        if row == spot_row {
            let marker = format!("── SPOT ${} ", thousands(mid));
            let fill = "─".repeat(width.saturating_sub(marker.chars().count()));
            lines.push(Line::from(Span::styled(
                format!("{}{}", marker, fill),
                Style::default().fg(C_BRIGHT),
            )));
            continue;
        }

        let Some(b) = bin_iter.next() else { break };
        let color = if b.is_ask { C_SELL } else { C_BUY };
        let filled = ((b.amount / max_amount) * bar_width as f64).round() as usize;
        let bar = format!(
            "{}{}",
            "█".repeat(filled.min(bar_width)),
            "░".repeat(bar_width - filled.min(bar_width))
        );

        lines.push(Line::from(vec![
            Span::styled(format!("{:>10} ", thousands(b.price)), Style::default().fg(C_DIM)),
            Span::styled(bar, Style::default().fg(color)),
            Span::styled(format!(" {:>8.2} BTC", b.amount), Style::default().fg(C_DIM)),
        ]));
    }

    lines
}

fn side_amount(levels: &[vigil_data::Level], lo: f64, hi: f64) -> f64 {
    levels
        .iter()
        .filter(|l| {
            let p = l.price_f64();
            p >= lo && p < hi
        })
        .map(|l| l.amount_f64())
        .sum()
}
