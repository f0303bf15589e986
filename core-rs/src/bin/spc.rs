//! spc - SPARQL cache CLI
//!
//! Runs queries through the cache and inspects or prunes cached responses.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sparql_cache::cache::{hash, CacheKey, CacheKind, CacheManager, CacheStrategy};
use sparql_cache::config::DEFAULT_CONFIG_FILE;
use sparql_cache::sparql::{substitute, QueryArg, QueryIndex, DEFAULT_QUERIES_DIR};
use sparql_cache::{BuildContext, SiteConfig, DEFAULT_SNOWMAN_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spc")]
#[command(version)]
#[command(about = "SPARQL client with an on-disk response cache", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a SELECT query and print its rows as JSON
    Query {
        /// Query location relative to the queries directory
        identifier: String,
        /// Positional arguments substituted for {{.}}
        args: Vec<String>,
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        #[arg(long, default_value = DEFAULT_QUERIES_DIR)]
        queries: PathBuf,
        /// Cache strategy: available or never
        #[arg(long, default_value = "available")]
        cache: CacheStrategy,
        #[arg(long = "snowman-directory", short = 'd', default_value = DEFAULT_SNOWMAN_DIR)]
        snowman_directory: PathBuf,
    },
    /// Inspect or clear cached responses
    Cache {
        #[command(subcommand)]
        kind: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// SPARQL response cache
    Sparql {
        #[command(subcommand)]
        action: SparqlCacheAction,
    },
    /// Remote resource cache
    Resources {
        #[command(subcommand)]
        action: ResourcesCacheAction,
    },
}

#[derive(Subcommand)]
enum SparqlCacheAction {
    /// Count entries, list unused ones, or print a cached response
    Inspect {
        #[command(flatten)]
        target: SparqlTarget,
    },
    /// Remove all, unused, per-query or single entries
    Clear {
        #[command(flatten)]
        target: SparqlTarget,
    },
}

#[derive(clap::Args)]
struct SparqlTarget {
    /// Only entries not used by the last build
    #[arg(long)]
    unused: bool,
    /// Query location
    query: Option<String>,
    /// Arguments selecting one cached response of a parameterized query
    args: Vec<String>,
    #[arg(long, default_value = DEFAULT_QUERIES_DIR)]
    queries: PathBuf,
    #[arg(long = "snowman-directory", short = 'd', default_value = DEFAULT_SNOWMAN_DIR)]
    snowman_directory: PathBuf,
}

#[derive(Subcommand)]
enum ResourcesCacheAction {
    /// Count entries, list unused ones, or print a cached resource
    Inspect {
        #[command(flatten)]
        target: ResourcesTarget,
    },
    /// Remove all, unused or single entries
    Clear {
        #[command(flatten)]
        target: ResourcesTarget,
    },
}

#[derive(clap::Args)]
struct ResourcesTarget {
    /// Only entries not used by the last build
    #[arg(long)]
    unused: bool,
    /// Resource URL
    url: Option<String>,
    #[arg(long = "snowman-directory", short = 'd', default_value = DEFAULT_SNOWMAN_DIR)]
    snowman_directory: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Query {
            identifier,
            args,
            config,
            queries,
            cache,
            snowman_directory,
        } => {
            let site = SiteConfig::load(&config)
                .with_context(|| format!("Failed to load {}", config.display()))?;
            let mut ctx = BuildContext::open(&site, &snowman_directory, &queries, cache)?;

            let args: Vec<QueryArg> = args.into_iter().map(QueryArg::from).collect();
            let rows = ctx.query(&identifier, &args)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);

            ctx.teardown().context("Failed to write cache ledgers")?;
        }

        Commands::Cache { kind } => match kind {
            CacheCommands::Sparql { action } => match action {
                SparqlCacheAction::Inspect { target } => inspect_sparql(&target)?,
                SparqlCacheAction::Clear { target } => clear_sparql(&target)?,
            },
            CacheCommands::Resources { action } => match action {
                ResourcesCacheAction::Inspect { target } => inspect_resources(&target)?,
                ResourcesCacheAction::Clear { target } => clear_resources(&target)?,
            },
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_cache(kind: CacheKind, root: &Path) -> anyhow::Result<CacheManager> {
    // Strategy is irrelevant for maintenance, but Available indexes entries
    CacheManager::new(kind, CacheStrategy::Available, root)
        .with_context(|| format!("Failed to open {} cache in {}", kind, root.display()))
}

/// Key of one parameterized response, resolved against the query document
fn sparql_key(target: &SparqlTarget, query: &str) -> anyhow::Result<CacheKey> {
    let index = QueryIndex::load(&target.queries)?;
    let Some(template) = index.get(query) else {
        bail!("The given query could not be found: {}", query);
    };

    let args: Vec<QueryArg> = target.args.iter().cloned().map(QueryArg::from).collect();
    let (resolved, _) = substitute(template, &args);
    Ok(CacheKey::new(query, &resolved))
}

fn inspect_sparql(target: &SparqlTarget) -> anyhow::Result<()> {
    let cache = open_cache(CacheKind::Sparql, &target.snowman_directory)?;

    match (&target.query, target.args.is_empty()) {
        (None, _) => inspect_summary(&cache, target.unused),
        (Some(query), true) => {
            let entries = cache.entries_for_resource(query)?;
            match entries.as_slice() {
                [] => bail!("No cache items for {}", query),
                [single] => print_entry(single),
                many => {
                    println!(
                        "{} represents a parameterized query with {} cache items.",
                        query,
                        many.len()
                    );
                    Ok(())
                }
            }
        }
        (Some(query), false) => {
            let key = sparql_key(target, query)?;
            print_entry(&cache.entry_path(&key))
        }
    }
}

fn clear_sparql(target: &SparqlTarget) -> anyhow::Result<()> {
    let mut cache = open_cache(CacheKind::Sparql, &target.snowman_directory)?;

    match (&target.query, target.args.is_empty()) {
        (None, _) => clear_summary(&mut cache, target.unused),
        (Some(query), true) => {
            if !cache.clear_resource(query)? {
                bail!("No cache items for {}", query);
            }
            println!("✓ Cleared cache items for {}", query);
            Ok(())
        }
        (Some(query), false) => {
            let key = sparql_key(target, query)?;
            if !cache.clear_entry(&key)? {
                bail!("No cache item at {}", cache.entry_path(&key).display());
            }
            println!("✓ Cleared {}", key);
            Ok(())
        }
    }
}

fn inspect_resources(target: &ResourcesTarget) -> anyhow::Result<()> {
    let cache = open_cache(CacheKind::Resources, &target.snowman_directory)?;

    match &target.url {
        None => inspect_summary(&cache, target.unused),
        Some(url) => print_entry(&cache.entry_path(&CacheKey::for_url(url)?)),
    }
}

fn clear_resources(target: &ResourcesTarget) -> anyhow::Result<()> {
    let mut cache = open_cache(CacheKind::Resources, &target.snowman_directory)?;

    match &target.url {
        None => clear_summary(&mut cache, target.unused),
        Some(url) => {
            let key = CacheKey::for_url(url)?;
            if !cache.clear_entry(&key)? {
                bail!("No cache item for {}", url);
            }
            println!("✓ Cleared {} ({})", url, hash(url));
            Ok(())
        }
    }
}

fn inspect_summary(cache: &CacheManager, unused: bool) -> anyhow::Result<()> {
    if unused {
        let paths = cache.unused_cache_paths()?;
        for path in &paths {
            println!("{}", path.display());
        }
        println!("Found {} unused cache items.", paths.len());
    } else {
        println!("There are {} cache items.", cache.count_items()?);
    }
    Ok(())
}

fn clear_summary(cache: &mut CacheManager, unused: bool) -> anyhow::Result<()> {
    if unused {
        for path in cache.clear_unused()? {
            println!("Removing: {}", path.display());
        }
    } else {
        let removed = cache.clear_all()?;
        println!("✓ Removed {} cached resources", removed);
    }
    Ok(())
}

fn print_entry(path: &Path) -> anyhow::Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("No cache item at {}", path.display()))?;
    println!("{}", path.display());
    print!("{}", content);
    Ok(())
}
