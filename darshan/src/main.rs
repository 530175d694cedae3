//! Darshan TUI application.
//!
//! A vim-style terminal interface for exploring Indian heritage monuments
//! with an AI guide. Pressing 1-4 places a monument model on the marker
//! panel, Enter opens its info card, and `i` starts a question for the
//! guide chatbot.

mod app;
mod events;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use darshan_core::{GuideSession, SendOutcome};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Check for --help
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    init_logging()?;
    tracing::info!("starting darshan");

    // Check for API key
    if std::env::var("GEMINI_API_KEY").is_err() {
        eprintln!("Error: GEMINI_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export GEMINI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let session = match GuideSession::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start the guide: {e}");
            std::process::exit(1);
        }
    };

    let models_dir = std::env::var("DARSHAN_MODELS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(session, models_dir)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Send traces to a log file so they do not tear the TUI.
fn init_logging() -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("darshan.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Process any pending chat message asynchronously
        if let Some(input) = app.pending_chat.take() {
            // Show the typing indicator before the request goes out
            app.chat_pending = true;
            app.scroll_to_bottom();
            terminal.draw(|f| render(f, &app))?;

            let outcome = app.session.send_chat(&input).await;
            app.chat_pending = false;
            app.scroll_to_bottom();

            if outcome == SendOutcome::Failed {
                app.set_status("The guide could not be reached");
            }
            app.enter_normal_mode();
        }

        // Poll for events with a timeout so async work is picked up
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;

            match handle_event(&mut app, ev) {
                EventResult::Quit => {
                    return Ok(());
                }
                EventResult::ProcessChat
                | EventResult::NeedsRedraw
                | EventResult::Continue => {
                    // pending_chat is picked up at the top of the loop
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Darshan - AI-guided tour of Indian heritage monuments");
    println!();
    println!("USAGE:");
    println!("  darshan [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("  GEMINI_API_KEY       API key for the generative language service (required)");
    println!("  DARSHAN_MODELS_DIR   Directory holding models/<site>/scene.glb files");
    println!("                       (default: current directory; missing models fall");
    println!("                       back to a colored placeholder shape)");
    println!("  RUST_LOG             Log filter, written to darshan.log (default: info)");
    println!();
    println!("KEYS:");
    println!("  1-4      View a monument     Enter    Tap the model for info");
    println!("  i        Ask a question      t        Ask about the current monument");
    println!("  j/k      Scroll the chat     ?        Help");
    println!("  :q       Quit");
}
