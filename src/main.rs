//! Lab Router - Privacy-aware Nostr event routing
//!
//! Command-line access to the classifier and relay resolver, a one-shot
//! publisher, and the HTTP query API used by the web client.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lab_router::{
    api::build_app,
    config::RouterConfig,
    relay::WebSocketTransport,
    signer::{KeySigner, Keys},
    EventDraft, Kind, PublishOptions, Publisher, RelayResolver, Tags,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lab-router")]
#[command(version)]
#[command(about = "Privacy-aware Nostr event routing for the LaB")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LAB_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an event by kind and tags
    Classify {
        /// Event kind
        #[arg(short, long)]
        kind: u16,

        /// Tag as comma-separated values, e.g. `t,journal` (repeatable)
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<TagArg>,
    },

    /// Show the relays an event would be published to
    Resolve {
        /// Event kind
        #[arg(short, long)]
        kind: u16,

        /// Tag as comma-separated values (repeatable)
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<TagArg>,

        /// Request public sharing
        #[arg(long)]
        public: bool,
    },

    /// Sign and publish an event
    Publish {
        /// Event kind
        #[arg(short, long)]
        kind: u16,

        /// Event content
        #[arg(short = 'm', long)]
        content: String,

        /// Tag as comma-separated values (repeatable)
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<TagArg>,

        /// Request public sharing
        #[arg(long)]
        public: bool,

        /// Hex secret key
        #[arg(long, env = "LAB_ROUTER_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },

    /// Serve the routing query API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lab_router={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Classify { kind, tags } => {
            classify(&config, kind, tags)?;
        }
        Commands::Resolve { kind, tags, public } => {
            resolve(&config, kind, tags, public)?;
        }
        Commands::Publish {
            kind,
            content,
            tags,
            public,
            secret_key,
        } => {
            publish(&config, kind, content, tags, public, &secret_key).await?;
        }
        Commands::Serve { host, port } => {
            serve(&config, host, port).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<RouterConfig> {
    let path = path.or_else(|| RouterConfig::default_path().filter(|p| p.exists()));
    match path {
        Some(path) => RouterConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(RouterConfig::default()),
    }
}

/// A tag row given on the command line
#[derive(Debug, Clone)]
struct TagArg(Vec<String>);

fn parse_tag(value: &str) -> std::result::Result<TagArg, String> {
    let row: Vec<String> = value.split(',').map(str::to_string).collect();
    if row[0].is_empty() {
        return Err("tag name must not be empty".to_string());
    }
    Ok(TagArg(row))
}

fn to_tags(args: Vec<TagArg>) -> Tags {
    Tags::from_rows(args.into_iter().map(|arg| arg.0))
}

fn classify(config: &RouterConfig, kind: u16, tags: Vec<TagArg>) -> Result<()> {
    let resolver = RelayResolver::from_config(config)?;
    let result = resolver
        .policy()
        .classifier()
        .explain(Kind(kind), &to_tags(tags));
    println!("classification: {}", result.class);
    println!("reason:         {}", result.reason.describe());
    println!("shareable:      {}", result.class.is_shareable());
    Ok(())
}

fn resolve(config: &RouterConfig, kind: u16, tags: Vec<TagArg>, public: bool) -> Result<()> {
    let resolver = RelayResolver::from_config(config)?;
    let decision = resolver.route(Kind(kind), &to_tags(tags), public);
    if decision.vetoed() {
        println!(
            "public sharing vetoed: {}",
            decision.evaluation.classification.reason.describe()
        );
    }
    for relay in decision.relays.iter() {
        println!("{}", relay);
    }
    Ok(())
}

async fn publish(
    config: &RouterConfig,
    kind: u16,
    content: String,
    tags: Vec<TagArg>,
    public: bool,
    secret_key: &str,
) -> Result<()> {
    let keys = Keys::from_hex(secret_key).context("invalid LAB_ROUTER_SECRET_KEY")?;
    let publisher = Publisher::new(
        config,
        Arc::new(KeySigner::new(keys)),
        Arc::new(WebSocketTransport::new()),
    )?;

    let draft = EventDraft::new(Kind(kind), content, to_tags(tags));
    let options = PublishOptions {
        share_to_public: public,
    };
    let outcome = match publisher.publish(draft, options).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_retryable() => {
            return Err(anyhow::Error::new(e).context("publish failed; relays may recover, try again"));
        }
        Err(e) => return Err(e.into()),
    };

    println!("published {}", outcome.event.id);
    for relay in &outcome.accepted {
        println!("  ok      {}", relay);
    }
    for failure in &outcome.failed {
        println!("  failed  {}", failure);
    }
    Ok(())
}

async fn serve(config: &RouterConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let resolver = Arc::new(RelayResolver::from_config(config)?);
    let app = build_app(resolver, &config.server.cors_origins);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;
    tracing::info!("Lab Router API listening on {}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

fn show_config(config: Option<&RouterConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
