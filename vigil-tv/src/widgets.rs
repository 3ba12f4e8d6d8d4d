//! Small reusable render helpers: metric cards, fill bars, rail gauges.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme::{C_BRIGHT, C_DIM};

/// Render a TV metric card: dim title, large value, dim subtitle.
pub fn render_card(f: &mut Frame, area: Rect, title: &str, value: &str, sub: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            title.to_uppercase(),
            Style::default().fg(C_DIM),
        )),
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub.to_string(), Style::default().fg(C_BRIGHT))),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}

/// Fill bar from 0..=1: `████░░░░░░`.
pub fn fill_bar(ratio: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Rail gauge: position marker on a min..max scale: `═══●═══`.
pub fn rail_gauge(value: f64, min: f64, max: f64, width: usize) -> String {
    if width < 5 || max <= min {
        return String::new();
    }

    let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
    let position = (normalized * (width - 1) as f64).round() as usize;

    let mut gauge = String::new();
    for i in 0..width {
        if i == position {
            gauge.push('●');
        } else {
            gauge.push('═');
        }
    }
    gauge
}

/// Round to whole units and group digits: 1234567.8 -> "1,234,568".
pub fn thousands(value: f64) -> String {
    let negative = value < 0.0;
    let mut n = value.abs().round() as u64;

    let mut groups = Vec::new();
    loop {
        let group = n % 1000;
        n /= 1000;
        if n == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();

    let body = groups.join(",");
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1_000.0), "1,000");
        assert_eq!(thousands(1_234_567.8), "1,234,568");
        assert_eq!(thousands(-67_432.1), "-67,432");
    }

    #[test]
    fn test_fill_bar() {
        assert_eq!(fill_bar(0.5, 10), "█████░░░░░");
        assert_eq!(fill_bar(-1.0, 4), "░░░░");
        assert_eq!(fill_bar(2.0, 4), "████");
        assert_eq!(fill_bar(1.0, 0), "");
    }

    #[test]
    fn test_rail_gauge_marker_position() {
        let gauge = rail_gauge(0.0, -1.0, 1.0, 11);
        // Marker lands mid-rail for a centred value
        assert_eq!(gauge.chars().nth(5), Some('●'));
        assert_eq!(gauge.chars().filter(|&c| c == '●').count(), 1);
    }

    #[test]
    fn test_rail_gauge_clamps_out_of_range() {
        let gauge = rail_gauge(5.0, -1.0, 1.0, 11);
        assert_eq!(gauge.chars().last(), Some('●'));
        let gauge = rail_gauge(-5.0, -1.0, 1.0, 11);
        assert_eq!(gauge.chars().next(), Some('●'));
    }

    #[test]
    fn test_rail_gauge_degenerate() {
        assert_eq!(rail_gauge(0.0, 1.0, 1.0, 11), "");
        assert_eq!(rail_gauge(0.0, -1.0, 1.0, 3), "");
    }
}
