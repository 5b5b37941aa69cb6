// ABOUTME: CLI binary for chunking web pages and running proxied web searches.
// ABOUTME: Chunks local HTML files or fetched URLs, and renders search results as text.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use pagechunk_chunker::{Chunker, DEFAULT_MAX_SIZE, MAX_LINK_LEN};
use pagechunk_scrape::{
    Fetcher, ProxyConfig, SearchClient, SearchConfig, SearchType, SnippetStyle, DEFAULT_RETRIES,
    UNBLOCKER_PREFIX,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Separator line between chunks in plain output.
const CHUNK_SEPARATOR: &str = "\n---\n";

#[derive(Parser, Debug)]
#[command(name = "pagechunk")]
#[command(about = "Split web pages into size-bounded text chunks and run web searches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk a local HTML file or a URL fetched through the unblocker proxy
    Chunk(ChunkArgs),
    /// Query the search backend and print snippet text
    Search(SearchArgs),
}

#[derive(Args, Debug)]
struct ChunkArgs {
    /// URL to fetch (fetch mode)
    url: Option<String>,

    /// HTML file to chunk instead of fetching
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Maximum chunk size in characters
    #[arg(long = "max-size", default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Longest href kept in a chunk's link list
    #[arg(long = "max-link-len", default_value_t = MAX_LINK_LEN)]
    max_link_len: usize,

    /// Extra fetch attempts after a failure
    #[arg(long = "retries", default_value_t = DEFAULT_RETRIES)]
    retries: u32,

    /// Output as JSON instead of separated chunks
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Rendering: answer (default) or digest
    #[arg(long = "style", default_value = "answer")]
    style: String,

    /// Number of results rendered
    #[arg(short = 'k', long = "k")]
    k: Option<usize>,

    /// Search type: search, news, places or images
    #[arg(long = "type", default_value = "search")]
    search_type: String,

    /// Search API base URL (default: SERP_ENDPOINT or https://<SERP_HOST>)
    #[arg(long = "endpoint")]
    endpoint: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run_chunk(args: &ChunkArgs) -> Result<String> {
    let chunker = Chunker::builder()
        .max_size(args.max_size)
        .max_link_len(args.max_link_len)
        .build();

    let (source, chunks) = match (&args.html, &args.url) {
        (Some(_), Some(_)) => bail!("cannot use both --html and a URL"),
        (None, None) => bail!("a URL is required, or use --html with a file"),
        (Some(path), None) => {
            let html = fs::read_to_string(path)
                .with_context(|| format!("reading file {:?}", path))?;
            (path.display().to_string(), chunker.chunk_html(&html))
        }
        (None, Some(url)) => {
            let proxy = ProxyConfig::from_env(UNBLOCKER_PREFIX)?;
            let fetcher = Fetcher::builder().proxy(proxy).build()?;
            let chunks = fetcher.scrape_chunks(url, args.retries, &chunker).await?;
            (url.clone(), chunks)
        }
    };

    tracing::info!(source = %source, count = chunks.len(), "chunked page");

    if args.json_output {
        let output = json!({
            "source": source,
            "max_size": args.max_size,
            "count": chunks.len(),
            "chunks": chunks,
        });
        Ok(serde_json::to_string_pretty(&output)?)
    } else {
        Ok(chunks.join(CHUNK_SEPARATOR))
    }
}

fn search_config(args: &SearchArgs) -> Result<SearchConfig> {
    let mut config = match &args.endpoint {
        // An explicit endpoint may be reached directly; the proxy and key are optional.
        Some(endpoint) => SearchConfig::direct_from_env(endpoint.clone())?,
        None => SearchConfig::from_env()?,
    };
    config = config.with_search_type(SearchType::from(args.search_type.as_str()));
    if let Some(k) = args.k {
        config = config.with_k(k);
    }
    Ok(config)
}

async fn run_search(args: &SearchArgs) -> Result<String> {
    let config = search_config(args)?;
    let client = SearchClient::with_style(config, SnippetStyle::from(args.style.as_str()))?;
    Ok(client.run(&args.query).await?)
}

fn emit(output: &str, path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("writing to {:?}", path))?;
        }
        None => println!("{}", output),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let start = Instant::now();

    let result = match &cli.command {
        Command::Chunk(args) => run_chunk(args)
            .await
            .and_then(|output| emit(&output, args.output.as_ref())),
        Command::Search(args) => run_search(args).await.and_then(|output| emit(&output, None)),
    };

    if let Command::Chunk(ChunkArgs { timing: true, .. }) = &cli.command {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", start.elapsed().as_millis());
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
