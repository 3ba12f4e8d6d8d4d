//! Shared palette for every panel.

use ratatui::style::Color;

pub const C_BUY: Color = Color::Rgb(100, 220, 100);
pub const C_SELL: Color = Color::Rgb(220, 100, 100);
pub const C_NEUTRAL: Color = Color::Rgb(180, 180, 100);
pub const C_DIM: Color = Color::Rgb(120, 120, 120);
pub const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
pub const C_ACCENT: Color = Color::Rgb(100, 180, 220);
pub const C_GOLD: Color = Color::Rgb(245, 158, 11);
pub const C_PURPLE: Color = Color::Rgb(139, 92, 246);
pub const C_GREEN: Color = Color::Rgb(16, 185, 129);

/// Green for gains, red for losses.
pub fn direction_color(value: f64) -> Color {
    if value >= 0.0 {
        C_BUY
    } else {
        C_SELL
    }
}

/// Arrow matching `direction_color`.
pub fn direction_arrow(value: f64) -> &'static str {
    if value >= 0.0 {
        "▲"
    } else {
        "▼"
    }
}
