mod cli;
mod config;
mod domain;
mod feed;
mod infra;
mod matching;
mod media;
mod workflows;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;
use feed::{label_items, write_feed_file};
use infra::tvdb::TvdbClient;
use media::{scan_media_dir, FilenameParser};
use workflows::orchestrator::Orchestrator;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "episode_feed=debug"
    } else {
        "episode_feed=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli)?;
    let parser = FilenameParser::new(&config.filename_pattern)?;

    let items = scan_media_dir(&config.media_path, config.recursive, &parser)?;
    println!(
        "Found {} episode file(s) in {}",
        items.len(),
        config.media_path.display()
    );

    let shows = if items.is_empty() {
        warn!("no episode files found, writing an empty feed");
        Default::default()
    } else {
        let mut client = TvdbClient::new(config.tvdb_api_key.clone(), config.request_timeout)?
            .with_base_url(config.tvdb_base_url.as_str());
        client.login().context("TVDB login failed")?;

        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(workers) = config.workers {
            pool = pool.num_threads(workers);
        }
        let pool = pool.build().context("Failed to start worker pool")?;
        info!(workers = pool.current_num_threads(), "starting lookups");

        pool.install(|| Orchestrator::new(&client, &client).run(&items))
    };

    let feed_items = label_items(items, &shows);
    write_feed_file(&config.feed_path, &config.feed, &feed_items, Utc::now())?;
    println!(
        "Wrote {} item(s) to {}",
        feed_items.len(),
        config.feed_path.display()
    );

    Ok(())
}
