#[cfg(not(unix))]
compile_error!("wizbot-player drives mpv over a unix domain socket");

mod auth;
mod config;
mod control;
mod controller;
mod logging;
mod model;
mod player;
mod view;

use std::io;
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

use auth::CredentialStore;
use config::AppConfig;
use control::ControlSurface;
use controller::{start_polling, AppController, APP_TITLE};
use model::{AppEvent, ControlCommand, QueueClient, SurfaceUpdate};
use player::{MpvWidget, PlayerSurface};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Wizbot Player Starting ===");

    let config = AppConfig::from_env();
    tracing::info!(
        api = %config.api_base_url,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "Configuration loaded"
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (surface_tx, mut surface_rx) = mpsc::unbounded_channel();
    let (directive_tx, directive_rx) = mpsc::unbounded_channel();
    let (widget_tx, widget_rx) = mpsc::unbounded_channel();

    // Step 1: Start the playback surface
    let widget = MpvWidget::launch(&config.mpv_path, widget_tx)?;
    let player_task = tokio::spawn(
        PlayerSurface::new(widget, event_tx.clone()).run(directive_rx, widget_rx),
    );

    // Step 2: Restore the session and start the orchestrator
    let queue_client = QueueClient::new(config.api_base_url.clone());
    let mut controller = AppController::new(
        queue_client,
        CredentialStore::user_default(),
        config.login_url.clone(),
        surface_tx,
        directive_tx,
        event_tx.clone(),
    );
    controller.restore_session();

    // Login callback handed over by the OS protocol handler
    for arg in std::env::args().skip(1).filter(|a| auth::is_callback_url(a)) {
        tracing::info!("Received login callback on the command line");
        let _ = event_tx.send(AppEvent::Command(ControlCommand::AuthCallback(arg)));
    }

    let cancel = CancellationToken::new();
    let poller = start_polling(config.poll_interval, event_tx.clone(), cancel.clone());
    let controller_task = tokio::spawn(controller.run(event_rx));

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(APP_TITLE))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let surface = ControlSurface::new(event_tx.clone());
    surface.dispatch(ControlCommand::RequestSnapshot);

    let res = run_app(&mut terminal, surface, &mut surface_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    cancel.cancel();
    let _ = event_tx.send(AppEvent::Shutdown);
    drop(event_tx);

    let (poller_res, controller_res, player_res) = futures::join!(poller, controller_task, player_task);
    for (name, res) in [("poller", poller_res), ("orchestrator", controller_res), ("player", player_res)] {
        if let Err(e) = res {
            tracing::warn!(task = name, error = %e, "Task ended abnormally");
        }
    }

    tracing::info!("Wizbot Player shutting down");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut surface: ControlSurface,
    updates: &mut UnboundedReceiver<SurfaceUpdate>,
) -> io::Result<()> {
    loop {
        surface.drain_updates(updates);

        if let Some(title) = surface.take_title() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &surface);
        })?;

        // Short poll so broadcasts show up promptly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                surface.handle_key_event(key);
            }
        }

        if surface.should_quit() {
            break;
        }
    }

    Ok(())
}
