use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use distro_core::{
    api::{AdminApi, HttpClient},
    config::Settings,
    logger::init_logger,
};
use distro_tui::{
    state::Dispatcher,
    termination::{Interrupted, create_termination},
    ui::{UiManager, init_panic_hook},
};
use tokio::sync::mpsc;

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "distro-tui", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// The root URL of the backend, e.g. `https://api.example.com/v1`
    #[clap(long, env = "DISTRO_BASE_URL", value_hint = clap::ValueHint::Url)]
    base_url: Option<String>,
    /// Bearer token to authenticate with
    #[clap(long, env = "DISTRO_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Path to the config file, defaults to `Distro.toml` in the config directory
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Set the log level
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// Where to write logs, the terminal belongs to the interface
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();
    init_panic_hook();

    let flags = Flags::parse();

    let config_file = match flags.config {
        Some(config) => config,
        None => Settings::get_config_path()?,
    };
    let mut settings = Settings::init(config_file, flags.base_url, flags.log_level)?;
    if let Some(token) = flags.token {
        settings.client.token = Some(token);
    }
    settings.client.resolve_token()?;

    let log_file = match flags.log_file {
        Some(path) => path,
        None => {
            let data_dir = distro_core::get_data_dir()?;
            std::fs::create_dir_all(&data_dir)?;
            data_dir.join("distro-tui.log")
        }
    };
    init_logger(settings.client.log_level, Some(&log_file))?;
    log::info!("connecting to {}", settings.client.base_url);

    let api: Arc<dyn AdminApi> = Arc::new(HttpClient::new(settings.context())?);

    // initialize the signal handlers
    let (terminator, mut interrupt_rx) = create_termination();
    let (dispatcher, state_receivers) = Dispatcher::new(&settings);
    let (action_tx, action_rx) = mpsc::unbounded_channel();

    if let Err(e) = tokio::try_join!(
        dispatcher.main_loop(
            api,
            terminator,
            action_tx.clone(),
            action_rx,
            interrupt_rx.resubscribe()
        ),
        UiManager::new(action_tx).main_loop(settings, state_receivers, interrupt_rx.resubscribe()),
    ) {
        eprintln!("unexpected error: {e:?}");
    } else if let Ok(reason) = interrupt_rx.recv().await {
        match reason {
            Interrupted::UserInt => println!("exited per user request"),
            Interrupted::OsSigInt => println!("exited because of an os sig int"),
            Interrupted::OsSigTerm => println!("exited because of an os sig term"),
            Interrupted::OsSigQuit => println!("exited because of an os sig quit"),
        }
    } else {
        eprintln!("exited because of an unexpected error");
    }

    Ok(())
}
