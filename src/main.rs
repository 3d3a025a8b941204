//! relpick - Main entry point.
//!
//! Terminal pickers for related WordPress content.
//!
//! Usage: relpick [OPTIONS] <COMMAND>
//!
//! The confirmed selection is printed to stdout as JSON. Exits with
//! status 1 when the picker is cancelled.

use std::io;
use std::panic;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use relpick::api::{HttpRestClient, RestClient};
use relpick::app::{AppOutcome, PickerApp};
use relpick::cli::{Cli, Command};
use relpick::config::Config;
use relpick::endpoint::EndpointResolver;
use relpick::logging;
use relpick::picker::{PickerController, PickerPreset, SelectionValue};
use relpick::source::SearchQuery;

/// Maximum iterations for main loop (safety bound).
const MAX_MAIN_ITERATIONS: usize = 10_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.site.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.site.apply(&mut config);

    if let Err(e) = logging::init(&config.log_config) {
        eprintln!("Warning: file logging disabled: {}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let client: Arc<dyn RestClient> = Arc::new(HttpRestClient::new(config.http_timeout()));
    let resolver = Arc::new(EndpointResolver::new(
        Arc::clone(&client),
        config.environment(),
    ));
    let endpoint = config.endpoint_config();

    let result = match &cli.command {
        Command::Resolve => {
            println!("{}", runtime.block_on(resolver.resolve(&endpoint)));
            Ok(true)
        }
        Command::Search { kind, text } => {
            let source = kind.preset().source(client, resolver, None);
            let query = SearchQuery::new(text.clone()).with_token(endpoint.token().map(str::to_string));
            let records = runtime.block_on(async {
                let url = source.endpoint(&endpoint).await;
                source.search(&url, &query).await
            })?;
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
            Ok(true)
        }
        command => match command.interactive() {
            Some((preset, seed)) => {
                let options = preset
                    .options(seed)
                    .with_endpoint(endpoint)
                    .with_debounce(config.debounce())
                    .with_insert_policy(config.insert_policy);
                let source = preset.source(client, resolver, None);
                let controller = PickerController::new(source, options, runtime.handle().clone());
                run_interactive(controller, preset)
            }
            None => Ok(true),
        },
    };

    runtime.shutdown_background();

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => Err(e),
    }
}

/// Runs the picker UI. Returns false when the user cancelled.
fn run_interactive(
    controller: PickerController,
    preset: PickerPreset,
) -> Result<bool, Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("[APP] Starting {:?} picker", preset);
    let mut app = PickerApp::new(controller);
    let loop_result = event_loop(&mut terminal, &mut app);

    restore_terminal()?;
    loop_result?;

    match app.into_outcome() {
        AppOutcome::Confirmed(value) => {
            println!("{}", selection_json(&value)?);
            Ok(true)
        }
        AppOutcome::Cancelled => Ok(false),
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PickerApp,
) -> io::Result<()> {
    let mut iterations = 0;
    while app.is_running() && iterations < MAX_MAIN_ITERATIONS {
        terminal.draw(|frame| app.render(frame))?;
        app.update()?;
        iterations += 1;
    }
    Ok(())
}

fn selection_json(value: &SelectionValue) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
