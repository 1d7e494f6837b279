//! Lyrion CLI
//!
//! Command-line interface for lyrics scraping and Genius lookups.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lyrion_api::{ApiServer, LyricsService, OpResult, ServiceConfig};
use lyrion_core::types::{AnnotationBatch, AnnotationRecord, ArtistDetails, SearchResults, SongDetails};

/// Crates whose logs follow the configured level.
const LOG_TARGETS: &[&str] = &[
    "lyrion",
    "lyrion_api",
    "lyrion_cache",
    "lyrion_genius",
    "lyrion_scraper",
    "tower_http",
];

/// Lyrion - lyrics with inline annotation ids
#[derive(Parser)]
#[command(name = "lyrion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Rate-limit bucket to charge requests to
    #[arg(long, global = true, env = "LYRION_CLIENT_ID")]
    client_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch lyrics with [ID: n] annotation markers
    Lyrics {
        /// Song name
        song: String,
        /// Artist name
        artist: String,
    },

    /// Look up one or more annotations
    Annotation {
        /// Annotation id(s); several ids are fetched as a batch
        #[arg(required = true, allow_hyphen_values = true)]
        ids: Vec<String>,
    },

    /// Search songs
    Search {
        /// Search text
        query: String,
        /// Number of results
        #[arg(short, long, allow_hyphen_values = true)]
        limit: Option<String>,
    },

    /// Show song details
    Song {
        /// Song id
        id: String,
    },

    /// Show artist details
    Artist {
        /// Artist id
        id: String,
    },

    /// Show configuration, cache and quota
    Status,

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env().context("Invalid configuration")?;
    if cli.verbose {
        config.log_level = "DEBUG".into();
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(config, port, &bind).await,
        command => {
            let service =
                LyricsService::from_config(config).context("Failed to initialize service")?;
            run(&service, command, cli.client_id.as_deref(), cli.json).await
        }
    }
}

/// Runs one service operation and prints its result.
async fn run(service: &LyricsService, command: Commands, caller: Option<&str>, json: bool) -> Result<()> {
    match command {
        Commands::Lyrics { song, artist } => {
            let text = emit(service.get_lyrics(&song, &artist, caller).await)?;
            println!("{}", text);
        }
        Commands::Annotation { ids } => {
            if let [id] = ids.as_slice() {
                let record = emit(service.get_annotation(id, caller).await)?;
                show(json, &record, print_annotation)?;
            } else {
                let batch = emit(service.get_annotations(&batch_ids(&ids), caller).await)?;
                show(json, &batch, print_batch)?;
            }
        }
        Commands::Search { query, limit } => {
            let results = emit(service.search_songs(&query, limit.as_deref(), caller).await)?;
            show(json, &results, print_search)?;
        }
        Commands::Song { id } => {
            let song = emit(service.get_song(&id, caller).await)?;
            show(json, &song, print_song)?;
        }
        Commands::Artist { id } => {
            let artist = emit(service.get_artist(&id, caller).await)?;
            show(json, &artist, print_artist)?;
        }
        Commands::Status => {
            println!("{}", serde_json::to_string_pretty(&service.status(caller))?);
        }
        Commands::Serve { .. } => {}
    }

    Ok(())
}

/// Filter directives for a `LOG_LEVEL` value.
fn default_filter(log_level: &str) -> String {
    let level = match log_level {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "WARN" | "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    };

    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".into());
    directives.join(",")
}

/// Numeric arguments become JSON integers; anything else stays text for the
/// service to reject.
fn batch_ids(ids: &[String]) -> Vec<Value> {
    ids.iter()
        .map(|id| {
            let id = id.trim();
            id.parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(id.to_string()))
        })
        .collect()
}

/// Prints a failed operation's report as JSON on stderr.
fn emit<T>(result: OpResult<T>) -> Result<T> {
    result.map_err(|report| {
        eprintln!("{} {}", "✗".red().bold(), report.error.red().bold());
        if let Ok(body) = serde_json::to_string_pretty(&report) {
            eprintln!("{}", body);
        }
        anyhow::Error::new(report)
    })
}

fn show<T: Serialize>(json: bool, value: &T, pretty: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        pretty(value);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

fn print_annotation(record: &AnnotationRecord) {
    if !record.success {
        println!(
            "{} {} {}",
            "✗".red(),
            format!("[{}]", record.annotation_id).dimmed(),
            record.error.as_deref().unwrap_or("lookup failed").red()
        );
        return;
    }

    println!("{} {}", format!("[ID: {}]", record.annotation_id).cyan().bold(), record.url.dimmed());
    println!("   {} {}", "Lyric:".yellow(), record.lyric);
    println!("   {} {}", "Explanation:".yellow(), record.explanation);
}

fn print_batch(batch: &AnnotationBatch) {
    for record in &batch.annotations {
        print_annotation(record);
        println!();
    }
    println!(
        "{} {}/{} succeeded in {:.2}s",
        "Summary:".green().bold(),
        batch.successful,
        batch.total_requested,
        batch.processing_time
    );
}

fn print_search(results: &SearchResults) {
    println!(
        "{} {} result(s) for \"{}\"",
        "🔍".cyan(),
        results.results_count,
        results.query
    );
    for hit in &results.results {
        let marker = if hit.has_lyrics { "♪".green() } else { "·".dimmed() };
        let id = hit.id.map(|id| format!("#{}", id)).unwrap_or_default();
        println!("   {} {} - {} {}", marker, hit.artist.bold(), hit.title, id.dimmed());
    }
}

fn print_song(song: &SongDetails) {
    println!("{} - {}", song.artist.bold(), song.title.cyan().bold());
    if let Some(album) = &song.album {
        println!("   {} {}", "Album:".dimmed(), album);
    }
    if let Some(date) = &song.release_date {
        println!("   {} {}", "Released:".dimmed(), date);
    }
    if let Some(views) = song.pageviews {
        println!("   {} {}", "Page views:".dimmed(), views);
    }
    if !song.featured_artists.is_empty() {
        println!("   {} {}", "Featuring:".dimmed(), song.featured_artists.join(", "));
    }
    for media in &song.media {
        println!("   {} {} {}", "Media:".dimmed(), media.provider, media.url);
    }
    println!("   {} {}", "URL:".dimmed(), song.url);
}

fn print_artist(artist: &ArtistDetails) {
    println!("{} {}", artist.name.cyan().bold(), format!("#{}", artist.id).dimmed());
    println!("   {} {}", "Followers:".dimmed(), artist.followers_count);
    if !artist.alternate_names.is_empty() {
        println!("   {} {}", "Also known as:".dimmed(), artist.alternate_names.join(", "));
    }
    let social = [
        ("Facebook", &artist.social.facebook),
        ("Instagram", &artist.social.instagram),
        ("Twitter", &artist.social.twitter),
    ];
    for (network, handle) in social {
        if let Some(handle) = handle {
            println!("   {} {}", format!("{}:", network).dimmed(), handle);
        }
    }
    println!("   {} {}", "URL:".dimmed(), artist.url);
    if let Some(bio) = &artist.bio {
        println!("\n{}", bio);
    }
}

/// Run API server
async fn cmd_serve(config: ServiceConfig, port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting Lyrion API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    if config.genius.has_token() {
        println!("   {} configured", "Genius API:".dimmed());
    } else {
        println!("   {} no token, API lookups are unauthenticated", "Genius API:".yellow());
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to initialize server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter("DEBUG").contains("lyrion_api=debug"));
        assert!(default_filter("WARNING").contains("lyrion_scraper=warn"));
        assert!(default_filter("INFO").ends_with(",warn"));
    }

    #[test]
    fn test_parse_batch_annotation() {
        let cli = Cli::try_parse_from(["lyrion", "annotation", "1", "2", "3"]).unwrap();
        match cli.command {
            Commands::Annotation { ids } => assert_eq!(ids, vec!["1", "2", "3"]),
            _ => panic!("expected annotation command"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "lyrion", "search", "rap god", "--limit", "3", "--client-id", "alice", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.client_id.as_deref(), Some("alice"));
        match cli.command {
            Commands::Search { query, limit } => {
                assert_eq!(query, "rap god");
                assert_eq!(limit.as_deref(), Some("3"));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_non_numeric_limit() {
        let cli = Cli::try_parse_from(["lyrion", "search", "rap", "--limit", "abc"]).unwrap();
        match cli.command {
            Commands::Search { limit, .. } => assert_eq!(limit.as_deref(), Some("abc")),
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_batch_ids_keep_malformed_text() {
        let ids = batch_ids(&["1".into(), " 42 ".into(), "abc".into(), "-5".into()]);
        assert_eq!(ids, vec![Value::from(1), Value::from(42), Value::from("abc"), Value::from(-5)]);
    }

    #[test]
    fn test_annotation_requires_id() {
        assert!(Cli::try_parse_from(["lyrion", "annotation"]).is_err());
    }
}
