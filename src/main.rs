mod app;
mod cli;
mod config;
mod editor;
mod error;
mod logging;
mod ui;
mod view;

use std::io;

use anyhow::{Context, bail};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};

use app::App;
use config::HttpConfigApi;
use editor::ConfigEditor;
use ui::{handle_input, render};

fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let log_path = logging::initialize_logging(&matches)?;

    let base_url = matches
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(cli::DEFAULT_URL);
    let api = HttpConfigApi::new(base_url).context("Failed to build HTTP client")?;
    let endpoint = api.endpoint().to_string();
    info!("🚀 Editing configuration at {} (log: {})", endpoint, log_path.display());

    match matches.subcommand_name() {
        Some("show") => run_show(api),
        _ => run_editor(api, endpoint),
    }
}

/// Load once and print both lists
fn run_show(api: HttpConfigApi) -> anyhow::Result<()> {
    let mut editor = ConfigEditor::new(api);
    if !editor.load() {
        let reason = editor
            .get_status()
            .map(|s| s.text.clone())
            .unwrap_or_else(|| "Failed to load configuration".to_string());
        bail!(reason);
    }
    print!("{}", view::format_view(&editor.view()));
    Ok(())
}

fn run_editor(api: HttpConfigApi, endpoint: String) -> anyhow::Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run application
    let result = run_app(&mut terminal, App::new(api, endpoint));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("❌ Editor stopped: {:#}", e);
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<HttpConfigApi>,
) -> anyhow::Result<()> {
    loop {
        // Draw screen
        terminal.draw(|f| render(f, &mut app))?;

        // Network calls run after the busy screen is on display
        if app.is_busy() {
            app.execute_pending();
            continue;
        }

        // Handle user input
        if handle_input(&mut app)? {
            break;
        }
    }

    info!("🏁 Editor closed");
    Ok(())
}
