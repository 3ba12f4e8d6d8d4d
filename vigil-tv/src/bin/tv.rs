/// Vigil TV entrypoint: terminal lifecycle, the 1s heartbeat loop, and
/// operator keys (q quits, space pauses rotation, arrows jump views).
use std::{error::Error, io, sync::Arc, time::Duration, time::Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;
use vigil_data::{spawn_live_price, ConnectionStatus};
use vigil_tv::{
    app::{DashboardState, NewsTicker, Rotation},
    config, panels, spawn_refresh_tasks,
};

/// Initialize logging into a file: stdout belongs to the TUI.
fn init_logging() {
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("vigil-tv.log")
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let state = Arc::new(Mutex::new(DashboardState::new()));
    let _refresh_handles = spawn_refresh_tasks(Arc::clone(&state));
    let (price_rx, status_rx, _live_handle) = spawn_live_price();

    let mut rotation = Rotation::new();
    let mut ticker = NewsTicker::new();

    // TV heartbeat: redraw once per second to drive the rotation timers
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        if last_tick.elapsed() >= tick_rate {
            rotation.tick(config::view_dwell());
            ticker.tick(config::news_advance());

            {
                let mut guard = state.lock().await;
                guard.live_price = *price_rx.borrow();
                guard.live_connected = *status_rx.borrow() == ConnectionStatus::Connected;
            }

            let guard = state.lock().await;
            terminal.draw(|f| panels::render_dashboard(f, &guard, &rotation, &ticker))?;
            drop(guard);
            last_tick = Instant::now();
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') => rotation.toggle_pause(),
                    KeyCode::Right | KeyCode::Char('n') => rotation.next(),
                    KeyCode::Left | KeyCode::Char('p') => rotation.prev(),
                    _ => {}
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
