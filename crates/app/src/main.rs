use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use directories::ProjectDirs;
use folio_application::AppState;
use folio_client::ApiClient;
use folio_core::Settings;
use folio_storage::Storage;
use folio_ui::Ui;

mod cli;
mod executor;
mod headless;
mod logging;

use cli::{Cli, Command, GlobalArgs};
use executor::Executor;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config_dir = config_dir(&cli.global)?;
            let log_file = cli
                .global
                .log_file
                .clone()
                .unwrap_or_else(|| config_dir.join("folio.log"));
            logging::init_file(&log_file).context("init logging")?;
            tracing::debug!(global = ?cli.global, "parsed cli");
            run_tui(&cli.global, &config_dir)
        }
        Some(command) => {
            logging::init_stderr().context("init logging")?;
            tracing::debug!(?command, "parsed cli");
            run_headless(&cli.global, command).await
        }
    }
}

fn config_dir(global: &GlobalArgs) -> anyhow::Result<PathBuf> {
    let dir = match &global.config_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("dev", "folio", "folio")
            .context("resolve project dirs")?
            .config_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&dir).with_context(|| format!("create config dir {}", dir.display()))?;
    Ok(dir)
}

fn open_storage(config_dir: &std::path::Path) -> anyhow::Result<Storage> {
    Storage::open(config_dir.join("folio.db"))
}

fn settings(global: &GlobalArgs, storage: Option<&Storage>) -> anyhow::Result<Settings> {
    let mut settings = Settings {
        theme: match storage {
            Some(storage) => storage.load_theme()?,
            None => Default::default(),
        },
        lines_per_page: global.lines_per_page,
        summary_words: global.top_words,
        recommendation_count: global.recommendations,
    };
    settings.normalize();
    Ok(settings)
}

fn run_tui(global: &GlobalArgs, config_dir: &std::path::Path) -> anyhow::Result<()> {
    let storage = open_storage(config_dir)?;
    let settings = settings(global, Some(&storage))?;
    let client = ApiClient::new(&global.api_url)?;
    tracing::info!(api = client.base_url(), theme = %settings.theme, "starting ui");

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let executor = Executor::new(tokio::runtime::Handle::current(), client, storage, tx);
    let ui = Ui::new(AppState::new(settings), executor, rx);

    let state = tokio::task::block_in_place(|| ui.run())?;
    tracing::info!(theme = %state.theme(), "ui closed");
    Ok(())
}

async fn run_headless(global: &GlobalArgs, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Theme { action } => {
            let storage = open_storage(&config_dir(global)?)?;
            headless::theme(&storage, action)
        }
        Command::Books { filter } => {
            let client = ApiClient::new(&global.api_url)?;
            headless::books(&client, filter.as_deref()).await
        }
        Command::Summary { book } => {
            let client = ApiClient::new(&global.api_url)?;
            headless::summary(&client, &settings(global, None)?, &book).await
        }
        Command::Recommend { book } => {
            let client = ApiClient::new(&global.api_url)?;
            headless::recommend(&client, &settings(global, None)?, &book).await
        }
        Command::Read { book, page } => {
            let client = ApiClient::new(&global.api_url)?;
            headless::read(&client, &settings(global, None)?, &book, page).await
        }
    }
}
