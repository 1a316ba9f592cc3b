use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sqlnest::config::{CliConfig, RenderConfig};
use sqlnest::query_cache::QueryCache;
use sqlnest::query_plan::QueryPlan;
use sqlnest::sql_generator::{compile_plan, BasicExpressionRenderer, Dialect};
use sqlnest::storage::OsFs;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// SQLNest - render the column and JSON layers of a nested query plan
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Query plan file (.yaml, .yml or .json)
    plan: PathBuf,

    /// YAML configuration file (defaults to SQLNEST_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target dialect: postgres or mysql
    #[arg(long)]
    dialect: Option<Dialect>,

    /// Numeric server version, e.g. 140000
    #[arg(long)]
    server_version: Option<u32>,

    /// Compiled plan cache directory
    #[arg(long)]
    cache_dir: Option<String>,

    /// Always recompile and leave the cache untouched
    #[arg(long)]
    no_cache: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        CliConfig {
            dialect: cli.dialect,
            server_version: cli.server_version,
            cache_dir: cli.cache_dir.clone(),
            no_cache: cli.no_cache,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => RenderConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::from_env().context("reading SQLNEST_* environment")?,
    };
    let config = base.with_cli(CliConfig::from(&cli))?;
    log::info!(
        "Rendering {} for {} {}",
        cli.plan.display(),
        config.dialect,
        config.server_version
    );

    let plan = QueryPlan::from_file(&cli.plan)
        .with_context(|| format!("loading plan {}", cli.plan.display()))?;
    let dialect_config = config.dialect_config();

    let compiled = if config.cache_enabled {
        let cache = QueryCache::new(OsFs::new(&config.cache_dir), true);
        let compiled = cache.get_or_compile(&plan, &dialect_config, &BasicExpressionRenderer)?;
        let stats = cache.stats();
        log::info!("Plan cache: {} hits, {} misses", stats.hits, stats.misses);
        compiled
    } else {
        compile_plan(&plan, &dialect_config, &BasicExpressionRenderer)?
    };

    match cli.format {
        OutputFormat::Text => print!("{}", compiled.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&compiled)?),
    }
    Ok(())
}
