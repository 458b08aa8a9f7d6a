//! Main entry point for Glyphcam

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    panic,
    sync::Arc,
    time::{Duration, Instant},
};

use glyphcam::{
    config::Config,
    input,
    session::Session,
    source::{FrameSource, SyntheticSource},
    ui::{self, Theme},
    worker::{spawn_workers, WorkerHandle},
};

/// Target frame time for the draw loop (60 FPS).
const FRAME_TIME_MS: u64 = 16;

fn main() -> Result<()> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Load configuration
    let config = Config::load().unwrap_or_default();

    // The frame source is a capability; the built-in synthetic source keeps
    // the whole pipeline usable without capture hardware.
    let source: Arc<dyn FrameSource> = Arc::new(SyntheticSource::default());
    let devices = source.devices();
    if devices.is_empty() {
        anyhow::bail!(glyphcam::source::SourceError::NoDevices);
    }

    // Spawn capture and export workers
    let workers = spawn_workers(Arc::clone(&source), config.export.directory.clone());

    // Create session state and open the default device
    let mut session = Session::new(
        &config,
        devices,
        workers.capture_tx.clone(),
        workers.export_tx.clone(),
    );

    // Initialize terminal
    let mut terminal = setup_terminal()?;
    let size = terminal.size()?;
    session.set_viewport(size.width, size.height);
    session.start();

    // Run main event loop
    let result = run_event_loop(&mut terminal, &mut session, &workers);

    // Cleanup
    cleanup_terminal(terminal)?;

    // Shutdown workers
    workers.shutdown();

    // Persist the mode and filter in use as the next session's defaults
    let mut config = config;
    config.render.default_mode = session.mode;
    config.render.default_filter = session.filter;
    if let Err(e) = config.save() {
        eprintln!("Warning: Failed to save config: {}", e);
    }

    result
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - handles input, drains worker events, draws the view
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: &mut Session,
    workers: &WorkerHandle,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_TIME_MS);
    let theme = Theme::default();

    loop {
        let frame_start = Instant::now();

        // Draw the view
        terminal.draw(|frame| ui::render(frame, session, &theme))?;

        // Poll for input with the remaining frame time
        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;

            if let Event::Resize(width, height) = event {
                session.set_viewport(width, height);
            }

            if let Some(command) = input::map_event(&event) {
                session.handle_command(command);
            }
        }

        // Drain worker events (non-blocking)
        while let Ok(event) = workers.events_rx.try_recv() {
            session.handle_event(event);
        }

        // Expire transient status messages
        session.tick(Instant::now());

        if session.should_quit {
            break;
        }
    }

    Ok(())
}
