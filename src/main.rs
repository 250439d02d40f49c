//! # pagemeta CLI
//!
//! Command-line front end for the pagemeta library.
//!
//! - `fetch <url>`: Fetch a page and print its head metadata as JSON
//! - `parse <file> --url <base>`: Extract metadata from a saved HTML file
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` or `--verbose`.

mod telemetry;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use pagemeta::Page;
use pagemeta::fetch::{Client, FetchConfig};
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "Extract title, OpenGraph and favicon metadata from a web page", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print the JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a page over HTTP and extract its metadata
    Fetch(FetchArgs),

    /// Extract metadata from a local HTML file
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// URL to fetch
    #[arg(required = true)]
    url: String,

    /// User agent to send
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Extra request header as NAME=VALUE (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Do not negotiate gzip transport encoding
    #[arg(long)]
    no_gzip: bool,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// HTML file to read
    #[arg(required = true)]
    file: PathBuf,

    /// Address the document was served from, used to resolve relative URLs
    #[arg(short, long)]
    url: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing_subscriber(if cli.verbose { "debug" } else { "warn" });

    let page = match cli.command {
        Commands::Fetch(args) => fetch_command(args)?,
        Commands::Parse(args) => parse_command(args)?,
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&page)?
    } else {
        serde_json::to_string(&page)?
    };

    match cli.output {
        Some(output_file) => {
            std::fs::write(&output_file, json)
                .with_context(|| format!("writing {}", output_file.display()))?;
            eprintln!("Saved page metadata to {}", output_file.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[instrument]
fn fetch_command(args: FetchArgs) -> anyhow::Result<Page> {
    let mut builder = FetchConfig::builder()
        .timeout_secs(args.timeout)
        .gzip(!args.no_gzip);
    if let Some(user_agent) = args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    for header in &args.headers {
        let (name, value) = parse_header(header)?;
        builder = builder.header(name, value);
    }

    let client = Client::new(builder.build())?;
    let page = client
        .fetch(&args.url)
        .with_context(|| format!("fetching {}", args.url))?;
    Ok(page)
}

#[instrument]
fn parse_command(args: ParseArgs) -> anyhow::Result<Page> {
    let file =
        File::open(&args.file).with_context(|| format!("opening {}", args.file.display()))?;
    let page = pagemeta::extract(BufReader::new(file), &args.url)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    Ok(page)
}

fn parse_header(header: &str) -> anyhow::Result<(&str, &str)> {
    header
        .split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow!("invalid header {:?}, expected NAME=VALUE", header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept-Language = en").unwrap(),
            ("Accept-Language", "en")
        );
        assert_eq!(parse_header("X-Token=a=b").unwrap(), ("X-Token", "a=b"));
        assert!(parse_header("no-separator").is_err());
        assert!(parse_header("=value").is_err());
    }

    #[test]
    fn test_parse_command_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<html><head><title>Saved</title><meta property="og:image" content="a.jpg"></head></html>"#
        )
        .unwrap();

        let page = parse_command(ParseArgs {
            file: file.path().to_path_buf(),
            url: "https://example.com/dir/page.html".to_string(),
        })
        .unwrap();

        assert_eq!(page.title, "Saved");
        assert_eq!(page.open_graph.images[0].url, "https://example.com/dir/a.jpg");
        assert_eq!(page.favicons, ["https://example.com/favicon.ico"]);
    }

    #[test]
    fn test_cli_parses_fetch_flags() {
        let cli = Cli::try_parse_from([
            "pagemeta",
            "--pretty",
            "fetch",
            "https://example.com/",
            "-H",
            "Accept-Language=en",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert!(cli.pretty);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.url, "https://example.com/");
                assert_eq!(args.headers, ["Accept-Language=en"]);
                assert_eq!(args.timeout, 5);
                assert!(!args.no_gzip);
            }
            Commands::Parse(_) => panic!("expected fetch"),
        }
    }
}
