use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "siteaudit",
    about = "SEO and crawlability audits for a marketing site source tree and its live endpoints",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project root that every configured path is resolved from
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Use only this config file instead of the user and project files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the report document as JSON instead of the console summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Audit page metadata, the not-found page and image usage.
    /// Exits 1 on any critical finding.
    Performance,

    /// Check the live endpoint table. Exits 1 when critical-endpoint health is below 80%
    Crawl {
        /// Re-run on a fixed interval until interrupted
        #[arg(long)]
        continuous: bool,

        /// Seconds between runs in continuous mode (default: network.interval_secs)
        #[arg(long, requires = "continuous", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Validate local robots/sitemap/pages and blend with live endpoint health
    CrawlTest,

    /// Validate sitemaps, robots and the static build output (no report file)
    SeoQa,

    /// Write an image optimization plan (IMAGE_OPTIMIZATION_PLAN.md)
    Images,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: siteaudit completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(2);
    });
    clap_complete::generate(shell, &mut Cli::command(), "siteaudit", &mut std::io::stdout());
}
