mod action;
mod app;
mod auth;
mod config;
mod error;
mod event;
mod fetch;
mod forge;
mod github;
mod navigate;
mod tabs;
mod tui;
mod types;
mod ui;

#[cfg(test)]
mod test_support;

use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::fetch::PrParams;
use crate::forge::Forge;
use crate::github::GitHub;
use crate::navigate::{BrowserNavigator, Navigator};
use crate::tui::EventHandler;

/// Review and merge a single GitHub pull request from the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// Pull request number
    number: u64,
    /// Path to a config file (defaults to ~/.config/prview/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match &config.general.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let token = auth::load_token(&config.github)?;
    let forge: Arc<dyn Forge> = Arc::new(GitHub::new(&config.github, token)?);
    let navigator: Arc<dyn Navigator> = Arc::new(BrowserNavigator::new(Arc::clone(&forge)));
    let params = PrParams::new(cli.owner, cli.repo, cli.number);
    tracing::info!(pr = %params, "starting");

    let result = run(&config, params, forge, navigator).await;

    tui::restore()?;

    result
}

async fn run(
    config: &Config,
    params: PrParams,
    forge: Arc<dyn Forge>,
    navigator: Arc<dyn Navigator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(params, forge, navigator, action_tx.clone());

    let tick_rate = Duration::from_millis(config.general.tick_rate_ms);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render | Event::Resize => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
