//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for streaming sitemap files.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use sumi_sitemap::config::{load_config, Config, FormatSetting, OutputConfig};
use sumi_sitemap::source::SitemapStream;
use sumi_sitemap::{Discovered, IndexEntry, PageEntry, SitemapIterator, SitemapSource};
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: stream entries out of sitemap files
///
/// Reads an XML sitemap index, an XML urlset or a plain-text URL list and
/// prints one tab-separated line per entry.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version)]
#[command(about = "Streams entries out of sitemap files", long_about = None)]
struct Cli {
    /// Sitemap file to read
    #[arg(value_name = "FILE")]
    sitemap: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Input format: auto, index, urlset or text (overrides the config file)
    #[arg(short, long)]
    format: Option<FormatSetting>,

    /// Fail on the first entry with anomalous optional fields
    #[arg(long)]
    strict: bool,

    /// Stop after this many entries
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    // Command-line flags win over the config file
    if let Some(format) = cli.format {
        config.reader.format = format;
    }
    if cli.strict {
        config.output.fail_on_warning = true;
    }
    if let Some(limit) = cli.limit {
        config.output.limit = limit;
    }

    let file = File::open(&cli.sitemap)
        .with_context(|| format!("Failed to open {}", cli.sitemap.display()))?;

    let mut source =
        SitemapSource::from_reader(file).max_line_length(config.reader.max_line_length);
    if let Some(format) = config.reader.format.format() {
        source = source.format(format);
    }

    let stream = source
        .open()
        .with_context(|| format!("Failed to open sitemap {}", cli.sitemap.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let count = match stream {
        SitemapStream::Index(it) => print_entries(it, &config.output, &mut out, render_index)?,
        SitemapStream::Pages(it) => print_entries(it, &config.output, &mut out, render_page)?,
    };

    tracing::info!("Read {} entries from {}", count, cli.sitemap.display());
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Writes every entry of `iterator` to `out`, one line each
fn print_entries<I, W>(
    iterator: I,
    output: &OutputConfig,
    out: &mut W,
    render: fn(&I::Item) -> String,
) -> anyhow::Result<usize>
where
    I: SitemapIterator,
    W: Write,
{
    let limit = if output.limit == 0 {
        usize::MAX
    } else {
        output.limit
    };

    let mut count = 0;
    for result in iterator.entries().take(limit) {
        let Discovered { entry, warning } = result.context("Sitemap stream failed")?;

        if let Some(warning) = warning {
            if output.fail_on_warning {
                return Err(anyhow::Error::new(warning)
                    .context("Entry has anomalous fields and --strict is set"));
            }
        }

        writeln!(out, "{}", render(&entry))?;
        count += 1;
    }

    out.flush()?;
    Ok(count)
}

fn render_index(entry: &IndexEntry) -> String {
    format!(
        "{}\t{}",
        entry.location(),
        entry
            .last_modified()
            .map_or_else(|| "-".to_string(), |ts| ts.to_rfc3339())
    )
}

fn render_page(entry: &PageEntry) -> String {
    let change_frequency = match entry.change_frequency() {
        "" => "-",
        value => value,
    };
    format!(
        "{}\t{}\t{}\t{:.1}",
        entry.location(),
        entry
            .last_modified()
            .map_or_else(|| "-".to_string(), |ts| ts.to_rfc3339()),
        change_frequency,
        entry.priority()
    )
}
