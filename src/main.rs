//! KOL Signal Relay
//!
//! Fetches one batch of chat messages, extracts trading calls and relays
//! the new ones. Scheduling is left to cron or a systemd timer.

use chrono::Utc;
use clap::{Parser, Subcommand};
use kol_signal_relay::{
    config::Config,
    ingester::{FileSource, HttpSource, MessageSource, RawMessage},
    notify::{SignalSink, StdoutSink, WebhookSink},
    parser::parse_message,
    quality::assess,
    relay::{format, Relay},
    storage::{DedupStore, JsonFileBackend},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "kol-signal-relay")]
#[command(about = "Parse, score and relay KOL trading calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "relay.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one batch and deliver new signals
    Run,
    /// Parse a single message and print the scored record
    Parse {
        /// Message content
        text: String,
        /// Structured hint text
        #[arg(long)]
        hint: Option<String>,
        /// Analysis text
        #[arg(long)]
        analysis: Option<String>,
        /// Source platform (discord, kook, ...)
        #[arg(long, default_value = "discord")]
        platform: String,
        /// Display zone offset in hours
        #[arg(long, default_value = "8")]
        utc_offset_hours: i32,
    },
    /// Show dedup store status
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = Config::load(&cli.config)?;
            run_batch(config).await
        }
        Commands::Parse {
            text,
            hint,
            analysis,
            platform,
            utc_offset_hours,
        } => parse_one(text, hint, analysis, platform, utc_offset_hours),
        Commands::Stats => {
            let config = Config::load(&cli.config)?;
            show_stats(config)
        }
    }
}

async fn run_batch(config: Config) -> anyhow::Result<()> {
    let source: Box<dyn MessageSource> = match (&config.source.input_file, &config.source.url) {
        (Some(path), _) if !path.trim().is_empty() => {
            Box::new(FileSource::new(shellexpand::tilde(path).into_owned()))
        }
        (_, Some(url)) => Box::new(HttpSource::new(url.clone(), &config.source)?),
        _ => anyhow::bail!("No message source configured"),
    };

    let sink: Box<dyn SignalSink> = match &config.sink.webhook_url {
        Some(url) if !url.trim().is_empty() => Box::new(WebhookSink::new(url.clone())),
        _ => Box::new(StdoutSink),
    };

    let backend = JsonFileBackend::new(config.storage.resolved_path());
    tracing::info!("Dedup record at {}", backend.path().display());
    let store = DedupStore::open(Box::new(backend), config.storage.retain);

    let mut relay = Relay::new(config.relay.clone(), store);
    tracing::info!("Relaying from {} to {}", source.name(), sink.name());

    let stats = relay.run_once(source.as_ref(), sink.as_ref()).await?;
    if stats.delivery_failed > 0 {
        tracing::warn!("{} signals will be retried next run", stats.delivery_failed);
    }
    Ok(())
}

fn parse_one(
    text: String,
    hint: Option<String>,
    analysis: Option<String>,
    platform: String,
    utc_offset_hours: i32,
) -> anyhow::Result<()> {
    let message = RawMessage {
        id: "cli".to_string(),
        platform: Some(platform),
        author_nickname: Some("cli".to_string()),
        message_content: Some(text),
        signal: hint,
        analysis,
        timestamp: Some(Utc::now().timestamp_millis()),
        ..Default::default()
    };

    let Some(signal) = parse_message(&message) else {
        anyhow::bail!("Message has no content to parse");
    };
    let signal = assess(signal);
    tracing::debug!("Parsed via {:?}", signal.strategy);

    let outbound = format::to_outbound(&signal, format::zone(utc_offset_hours), Utc::now());
    println!("{}", serde_json::to_string_pretty(&outbound)?);
    Ok(())
}

fn show_stats(config: Config) -> anyhow::Result<()> {
    let path = config.storage.resolved_path();
    let store = DedupStore::open(Box::new(JsonFileBackend::new(&path)), config.storage.retain);

    println!("Dedup record:   {}", path.display());
    println!("Delivered ids:  {}/{}", store.len(), config.storage.retain);
    println!(
        "Last modified:  {}",
        store.last_modified().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Max age:        {} days (not enforced, retention is count-based)",
        config.storage.max_age_days
    );
    Ok(())
}
