use clap::Parser;
use std::sync::Arc;
use streamdash::api::http::HttpPanelClient;
use streamdash::coordinator::DashboardSession;
use streamdash::core::DashboardConfig;
use streamdash::display::console::ConsoleAdapter;
use streamdash::logger::{ self, LogTag };
use streamdash::paths;
use tokio::sync::Notify;

/// Terminal viewer for the panel's live statistics dashboard
///
/// Mounts one dashboard session against the panel backend: cached stats render
/// immediately, a quick database-only load follows, and a silent full refresh
/// runs every 30 seconds until Ctrl-C.
#[derive(Parser)]
#[command(name = "streamdash", version, about)]
struct Args {
    /// Base URL of the panel backend (e.g. http://localhost:3000)
    #[arg(long)]
    url: String,

    /// API key sent as X-Api-Key, if the backend requires one
    #[arg(long)]
    api_key: Option<String>,

    /// Perform one visible refresh after mount, then exit
    #[arg(long)]
    once: bool,

    /// Show debug output for one module (cache, prefs, dashboard, api, display)
    #[arg(long = "debug", value_name = "MODULE")]
    debug: Vec<String>,

    /// Show all verbose output
    #[arg(long)]
    verbose: bool,

    /// Warnings and errors only
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Directories must exist before logger initialization (the logger needs
    // the logs directory to create log files)
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    let args = Args::parse();

    // Normalize `--debug cache` to the `--debug-cache` form the logger scans,
    // then let the logger pick up --verbose/--quiet straight from CMD_ARGS
    let mut cmd_args = streamdash::arguments::get_cmd_args();
    for module in &args.debug {
        cmd_args.push(format!("--debug-{}", module));
    }
    if args.verbose {
        cmd_args.push("--verbose".to_string());
    }
    if args.quiet {
        cmd_args.push("--quiet".to_string());
    }
    streamdash::arguments::set_cmd_args(cmd_args);
    logger::init();

    logger::info(LogTag::System, "🚀 streamdash starting up");

    let client = Arc::new(HttpPanelClient::new(&args.url, args.api_key.clone())?);
    let adapter = Arc::new(ConsoleAdapter::new());

    let session = DashboardSession::new(
        client.clone(),
        client,
        adapter.clone(),
        DashboardConfig::default(),
    );

    adapter.attach(session.tracker().clone(), session.prefs().clone());

    // Console sessions start with the overview and live streams expanded
    session.tracker().set_region_open("overview", true);
    session.tracker().set_region_open("live-streams", true);

    session.mount().await;

    if args.once {
        session.refresh().await;
        session.unmount();
        logger::flush();
        return Ok(());
    }

    // Block until Ctrl-C, then unmount cleanly
    let shutdown = Arc::new(Notify::new());
    let shutdown_handler = shutdown.clone();
    ctrlc
        ::set_handler(move || {
            shutdown_handler.notify_one();
        })
        .expect("Failed to install Ctrl-C handler");

    shutdown.notified().await;

    logger::info(LogTag::System, "👋 Shutting down");
    session.unmount();
    logger::flush();
    Ok(())
}
