/// Vigil TV - Rotating Bitcoin Market Terminal
///
/// A passive-display ("TV mode") dashboard: six views rotate on a
/// wall-clock dwell while background loops keep every data source fresh.
///
/// The library provides:
/// - Dashboard state plus the rotation and news-ticker engines
/// - Background refresh loops over the vigil-data providers
/// - The ratatui panels for each view
pub mod app;
pub mod config;
pub mod panels;
pub mod refresh;
pub mod theme;
pub mod widgets;

// Re-export commonly used types for convenience
pub use app::{DashboardState, Indicators, NewsTicker, Rotation, View};
pub use refresh::spawn_refresh_tasks;
