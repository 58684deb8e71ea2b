//! Saucier - caching proxy for a recipe-search API
//!
//! Saucier sits in front of an upstream recipe-search HTTP service and
//! adds read-through result caching plus a parallel enhanced-search mode
//! that fans one query out to several upstream strategies and merges the
//! results.

use clap::{Parser, Subcommand};
use saucier_core::{ProxyConfig, Result};
use saucier_infra::{init_logger, logger_config_from_env};
use saucier_serve::ProxyServer;
use tracing::error;

#[derive(Parser)]
#[command(name = "saucier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Caching proxy for recipe search APIs with parallel enhanced search")]
#[command(long_about = r#"
Saucier proxies a recipe-search HTTP API, caching search results in redis
with a configurable TTL and offering an enhanced search endpoint that
runs the general, ingredient and dish strategies upstream in parallel,
then merges, deduplicates and ranks their results.

If redis is unavailable at startup the proxy comes up with caching
disabled and keeps serving every request by calling upstream directly.
A connection that drops later is retried by the connection manager.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Serve {
        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Upstream recipe-search API base URL
        #[arg(long)]
        upstream_url: Option<String>,

        /// Redis URL for the result cache
        #[arg(long)]
        redis_url: Option<String>,

        /// Cache entry TTL in seconds
        #[arg(long)]
        cache_ttl: Option<u64>,

        /// Per-call upstream timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Disable the CORS layer
        #[arg(long)]
        no_cors: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logger_config = logger_config_from_env();
    logger_config.level = cli.log_level.clone();
    logger_config.json_format = logger_config.json_format || cli.json_logs;

    if let Err(e) = init_logger(logger_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Environment variables provide the base configuration; CLI flags
    // win over them
    let mut config = ProxyConfig::from_env()?;

    if let Some(Commands::Serve {
        host,
        port,
        upstream_url,
        redis_url,
        cache_ttl,
        timeout,
        no_cors,
    }) = cli.command
    {
        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port;
        }
        if let Some(url) = upstream_url {
            config.upstream_base_url = url;
        }
        if let Some(url) = redis_url {
            config.redis_url = url;
        }
        if let Some(ttl) = cache_ttl {
            config.cache_ttl_seconds = ttl;
        }
        if let Some(timeout) = timeout {
            config.request_timeout_seconds = timeout;
        }
        if no_cors {
            config.cors_enabled = false;
        }
    }

    config.validate()?;

    let server = ProxyServer::new(config).await?;
    server.start().await
}
