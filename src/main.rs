use clap::Parser;
use dialogix::core::config::{self, CliOverrides, DialogixConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "dialogix", about = "Chat with a cast of AI personas")]
struct Args {
    /// Open a chat with this persona directly (e.g. captain, zen, dev)
    #[arg(short, long)]
    persona: Option<String>,

    /// Use canned replies instead of the backend services
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to dialogix.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("dialogix.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Config unavailable, using defaults: {}", e);
        DialogixConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            persona: args.persona.as_deref(),
            offline: args.offline,
        },
    );

    log::info!(
        "Dialogix starting up (persona={:?}, offline={})",
        resolved.persona,
        resolved.offline
    );

    dialogix::tui::run(resolved)
}
