//! The rotating views and their shared layout.

pub mod credit;
pub mod header;
pub mod liquidity;
pub mod market;
pub mod mining;
pub mod risk;
pub mod valuation;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{DashboardState, NewsTicker, Rotation, View};

/// Render the full dashboard: header strip plus the active view.
pub fn render_dashboard(
    f: &mut Frame,
    state: &DashboardState,
    rotation: &Rotation,
    ticker: &NewsTicker,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(f.area());

    header::render_header(f, chunks[0], state, rotation, ticker);

    match rotation.current() {
        View::MarketStructure => market::render(f, chunks[1], state),
        View::Liquidity => liquidity::render(f, chunks[1], state),
        View::RiskRadar => risk::render(f, chunks[1], state),
        View::CreditStress => credit::render(f, chunks[1], state),
        View::Valuation => valuation::render(f, chunks[1], state),
        View::Mining => mining::render(f, chunks[1], state),
    }
}
