mod app;
mod chart;
mod format;
mod views;

use anyhow::Context;
use app::{App, UiMsg};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use pulse_client::{PulseClient, DEFAULT_BASE_URL};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drives the debounce timer and the news reveal animation.
const TICK: Duration = Duration::from_millis(100);

fn init_tracing() -> anyhow::Result<()> {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pulse_terminal=info".into());

    // The raw-mode terminal owns stdout, so logs go to a file.
    let path = std::env::var("PULSE_LOG_FILE").unwrap_or_else(|_| "pulse-terminal.log".into());
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating log file {path}"))?;
    let writer = Arc::new(file);

    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();
    }
    Ok(())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(
        std::io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let base_url =
        std::env::var("PULSE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let client = PulseClient::new(base_url);

    // A panic mid-frame would otherwise leave the shell in raw mode.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(
        std::io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let result = run(&mut terminal, client).await;

    restore_terminal();
    terminal.show_cursor()?;
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    client: PulseClient,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<UiMsg>();
    let mut app = App::new(client, tx);
    app.refresh_dashboard();

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    while !app.should_quit() {
        let now = Instant::now();
        terminal.draw(|frame| app.draw(frame, now))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => app.handle_event(event, Instant::now()),
                Some(Err(e)) => tracing::warn!("terminal event error: {e}"),
                None => break,
            },
            Some(msg) = rx.recv() => app.apply(msg, Instant::now()),
            _ = tick.tick() => app.on_tick(Instant::now()),
        }
    }
    Ok(())
}
