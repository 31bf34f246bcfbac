mod api;
mod app;
mod config;
mod constants;
mod display;
mod fallback;
mod focus;
mod graphics;
mod input;
mod model;
mod tasks;
mod theme;
mod timeline;
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use api::EpgClient;
use app::{App, AppEvent, Settings};
use config::Config;
use constants::constants;
use display::CliThumbnailMode;
use theme::THEMES;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Terminal TV guide", long_about = None)]
struct Args {
  /// Base URL of the guide backend
  #[arg(long, env = "EPG_BACKEND_URL")]
  backend_url: Option<String>,

  /// Thumbnail rendering: 'auto', 'blocks', 'ascii', or 'off' (default: prefs, then auto-detect)
  #[arg(short, long)]
  thumbnails: Option<CliThumbnailMode>,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<clap_complete::Shell>,
}

// --- Logging ---

/// Log to `tvguide.log` in the data directory; the terminal belongs to the UI.
fn init_logging() -> Option<WorkerGuard> {
  let dirs = ProjectDirs::from("", "", "tvguide")?;
  let log_dir = dirs.data_local_dir();
  std::fs::create_dir_all(log_dir).ok()?;
  let appender = tracing_appender::rolling::never(log_dir, "tvguide.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_writer(writer).with_ansi(false).with_env_filter(filter).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "tvguide", &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = init_logging();
  let mut config = Config::load();

  let backend_url = config.resolve_backend_url(args.backend_url.as_deref());
  let client = EpgClient::new(&backend_url, Duration::from_secs(constants().request_timeout_secs))
    .with_context(|| format!("Invalid backend URL: {}", backend_url))?;

  let cli_mode = args
    .thumbnails
    .or_else(|| config.thumbnails.as_deref().map(CliThumbnailMode::from_config))
    .unwrap_or(CliThumbnailMode::Auto);
  let settings = Settings {
    thumbnail_mode: display::resolve_thumbnail_mode(cli_mode),
    theme_index: config
      .theme_name
      .as_deref()
      .and_then(|name| THEMES.iter().position(|t| t.name == name))
      .unwrap_or(0),
  };
  info!(backend = %client.base_url(), thumbnails = settings.thumbnail_mode.label(), "tvguide: starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, &client, App::new(settings, Local::now()), &mut config).await;
  ratatui::restore();
  if let Err(e) = &result {
    warn!(err = %format!("{:#}", e), "tvguide: exited with error");
  }
  result
}

async fn run(terminal: &mut DefaultTerminal, client: &EpgClient, mut app: App, config: &mut Config) -> Result<()> {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let clock = tasks::spawn_clock(tx.clone());

  for command in app.start() {
    tasks::dispatch(client, command, &tx);
  }

  loop {
    while let Ok(event) = rx.try_recv() {
      for command in app.update(event) {
        tasks::dispatch(client, command, &tx);
      }
    }

    if app.prefs_dirty {
      config.theme_name = Some(app.theme().name.to_string());
      config.save();
      app.prefs_dirty = false;
    }

    if app.should_quit {
      break;
    }

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(50))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          let _ = tx.send(AppEvent::Key(key));
        }
        _ => {}
      }
    }
  }

  clock.abort();
  info!("tvguide: quit");
  Ok(())
}
