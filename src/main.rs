use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{event, execute, terminal};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use metaphor_unpacker::analysis::SuggestionPatch;
use metaphor_unpacker::clients::GeminiClient;
use metaphor_unpacker::config::Config;
use metaphor_unpacker::suggest::SuggestionClient;
use metaphor_unpacker::summary;
use metaphor_unpacker::tui::{Action, App, ui};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StartView {
    Home,
    Example,
    Wizard,
}

#[derive(Parser)]
#[command(name = "metaphor-unpacker")]
#[command(about = "Critical-thinking walkthrough for unpacking metaphors", long_about = None)]
struct Cli {
    /// View to open first
    #[arg(long, value_enum, default_value_t = StartView::Home)]
    start: StartView,
    /// Prefill the wizard's metaphor (implies --start wizard)
    #[arg(long)]
    sentence: Option<String>,
    /// Write logs here; the terminal itself is reserved for the UI
    #[arg(long, env = "UNPACKER_LOG_FILE")]
    log_file: Option<PathBuf>,
    /// Print the finished analysis as markdown on exit
    #[arg(long)]
    print_summary: bool,
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metaphor_unpacker=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = Config::load()?;
    let gemini = GeminiClient::from_config(&config)?;
    let ai_enabled = gemini.has_api_key();
    let client = SuggestionClient::new(Arc::new(gemini), config.generation.model.clone());
    info!(model = %client.model(), ai_enabled, "Starting Metaphor Unpacker");

    let mut app = App::new(ai_enabled);
    match (cli.start, cli.sentence.as_deref()) {
        (_, Some(sentence)) => app.open_wizard(Some(sentence)),
        (StartView::Example, None) => app.open_walkthrough(),
        (StartView::Wizard, None) => app.open_wizard(None),
        (StartView::Home, None) => {}
    }

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, client).await;

    terminal::disable_raw_mode()?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
    result?;

    if cli.print_summary {
        match &app.finished {
            Some(record) => println!("{}", summary::to_markdown(record)),
            None => eprintln!("No analysis was finished."),
        }
    }
    Ok(())
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: SuggestionClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, SuggestionPatch)>();

    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        while let Ok((session, patch)) = rx.try_recv() {
            app.on_suggestion(session, patch);
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let event::Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != event::KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => break,
            Action::Suggest { session, request } => {
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let patch = request.run(&client).await;
                    if tx.send((session, patch)).is_err() {
                        warn!(session, "UI loop gone before suggestion completed");
                    }
                });
            }
        }
    }

    info!("Exiting");
    Ok(())
}
