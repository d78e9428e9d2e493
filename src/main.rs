//! Buildwheel - Entry Point
//!
//! Initializes the terminal, loads the catalog and preferences, and runs
//! the frame loop that drives the wheels.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};

use buildwheel::randomizer::Randomizer;
use buildwheel::ui::App;

/// Target frames per second for the render loop
const TARGET_FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

const LOG_FILE: &str = "buildwheel.log";

fn main() -> Result<()> {
    // Log to a file so output doesn't interfere with the TUI
    let log_target: Box<dyn Write + Send> = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE)
    {
        Ok(file) => Box::new(file),
        Err(_) => match File::options().write(true).open("/dev/null") {
            Ok(null) => Box::new(null),
            Err(_) => Box::new(io::sink()),
        },
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .target(env_logger::Target::Pipe(log_target))
    .init();

    log::info!("Starting Buildwheel v{}", env!("CARGO_PKG_VERSION"));

    // Load everything before touching the terminal so errors print normally
    let mut randomizer = Randomizer::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    let result = run_loop(&mut terminal, &mut app, &mut randomizer);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    if let Some(record) = randomizer.latest_result() {
        println!("Last spin: {}", record.label());
    }

    log::info!("Buildwheel shut down cleanly");
    result
}

/// Main frame loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    randomizer: &mut Randomizer,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        // Handle input
        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key, randomizer) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }

        // Advance wheel animations and timers
        randomizer.update(delta);

        terminal.draw(|frame| {
            app.render(frame, randomizer);
        })?;

        if randomizer.should_quit() {
            break;
        }

        // Frame rate limiting
        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }

    Ok(())
}
