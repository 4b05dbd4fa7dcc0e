use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use clipsort_core::keyboard::InputPort;
use clipsort_core::{ClassificationApi, HttpApi, SessionContext, config_file};

mod action;
mod app;
mod backend;
mod input;
mod player;
mod theme;
mod tui_event;
mod view;

use app::App;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// clipsort TUI: listen to recordings and classify them from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the classification service
    #[arg(long)]
    api_url: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Player command; the file URL is appended (e.g. "ffplay -nodisp -autoexit")
    #[arg(long)]
    player: Option<String>,

    /// Seconds between health probes on the sign-in screen
    #[arg(long)]
    health_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // The terminal belongs to the UI; logs go to a file.
    let log_dir = dirs::cache_dir()
        .map(|d| d.join("clipsort"))
        .unwrap_or_else(|| std::env::temp_dir().join("clipsort"));
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("tui.log"))?;
    let (writer, _log_guard) = tracing_appender::non_blocking(log_file);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter)
        .init();

    // Resolve config from CLI flags > env vars > config file > defaults
    let mut settings = config_file::load_config().resolve();
    if let Some(url) = args
        .api_url
        .or_else(|| std::env::var("CLIPSORT_API_URL").ok())
    {
        settings.base_url = url;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(cmd) = args.player {
        let parts: Vec<String> = cmd.split_whitespace().map(String::from).collect();
        if parts.is_empty() {
            anyhow::bail!("--player must name a program");
        }
        settings.player_command = Some(parts);
    }
    if let Some(secs) = args.health_interval {
        if secs == 0 {
            anyhow::bail!("--health-interval must be at least 1 second");
        }
        settings.health_interval = Duration::from_secs(secs);
    }
    tracing::info!(base_url = %settings.base_url, theme = %settings.theme, "starting clipsort TUI");

    let context = Arc::new(match SessionContext::default_path() {
        Some(path) => SessionContext::load(path),
        None => SessionContext::in_memory(),
    });
    let api: Arc<dyn ClassificationApi> =
        Arc::new(HttpApi::new(settings.base_url.clone(), context.clone()));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut terminal_input = input::TerminalInput;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while let Ok(Some(_)) = terminal_input.poll_event(Duration::from_millis(50)) {}

    let player = player::from_command(settings.player_command.as_deref());
    let mut app = App::new(
        settings.controller(),
        theme::Theme::by_name(&settings.theme),
        player,
    );
    app.server = settings.base_url.clone();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run(
        api,
        context.clone(),
        settings.health_interval,
        cmd_rx,
        event_tx,
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // A stored token skips the sign-in form
    if context.is_authenticated() {
        app.enter_classification(context.role());
    } else {
        app.enter_auth();
    }

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if let Err(e) = app.poll_input(&mut terminal_input, tick_rate) {
                    tracing::warn!(error = %e, "failed to read terminal input");
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            break;
        }
    }

    app.shutdown();
    cancel.cancel();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
