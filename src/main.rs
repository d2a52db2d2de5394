use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use siteaudit::cli::{Cli, Command};
use siteaudit::config::{self, AuditConfig};
use siteaudit::discovery::network::HttpFetcher;
use siteaudit::site::SiteRoot;
use siteaudit::tools::{self, Outcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Exit code for configuration and I/O failures, distinct from a failed audit.
const EXIT_FATAL: i32 = 2;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(outcome) => std::process::exit(outcome.code()),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(EXIT_FATAL);
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    if let Command::Completions { shell } = cli.command {
        siteaudit::cli::print_completions(shell);
        return Ok(Outcome::Pass);
    }

    let site = SiteRoot::new(&cli.root);
    let config = config::load(&site, cli.config.as_deref()).context("failed to load configuration")?;
    log::debug!("project root {}", site.root().display());

    match cli.command {
        Command::Performance => Ok(tools::performance::run(&site, &config, cli.json)?),
        Command::Crawl {
            continuous,
            interval,
        } => cmd_crawl(&site, &config, cli.json, continuous, interval),
        Command::CrawlTest => {
            let fetcher = fetcher(&config)?;
            Ok(tools::crawl_test::run(&site, &config, &fetcher, cli.json)?)
        }
        Command::SeoQa => Ok(tools::seo_qa::run(&site, &config, cli.json)?),
        Command::Images => Ok(tools::images::run(&site, &config, cli.json)?),
        Command::Completions { .. } => Ok(Outcome::Pass),
    }
}

fn fetcher(config: &AuditConfig) -> Result<HttpFetcher> {
    HttpFetcher::new(
        &config.network.user_agent,
        Duration::from_secs(config.network.timeout_secs),
    )
    .context("failed to build HTTP client")
}

fn cmd_crawl(
    site: &SiteRoot,
    config: &AuditConfig,
    json: bool,
    continuous: bool,
    interval: Option<u64>,
) -> Result<Outcome> {
    let fetcher = fetcher(config)?;
    if !continuous {
        return Ok(tools::crawl::run(site, config, &fetcher, json)?);
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .context("failed to set signal handler")?;

    let interval = Duration::from_secs(interval.unwrap_or(config.network.interval_secs));
    Ok(tools::crawl::run_continuous(
        site, config, &fetcher, json, interval, &shutdown,
    )?)
}
