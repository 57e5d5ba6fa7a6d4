use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the portfolio binary.
#[derive(Debug, Parser)]
#[command(
    name = "portfolio",
    version,
    about = "Portfolio project pages generated from Contentful"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PORTFOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub contentful: ContentfulOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve project pages over HTTP with background regeneration.
    Serve(Box<ServeArgs>),
    /// Write every project page to a directory as static HTML.
    Build(BuildArgs),
    /// Print the slug of every project page, one per line.
    Paths,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ContentfulOverrides {
    /// Contentful space identifier.
    #[arg(
        long = "contentful-space-id",
        env = "CONTENTFUL_SPACE_ID",
        value_name = "ID",
        global = true,
        hide_env_values = true
    )]
    pub space_id: Option<String>,

    /// Content Delivery API access token.
    #[arg(
        long = "contentful-access-token",
        env = "CONTENTFUL_DELIVERY_API",
        value_name = "TOKEN",
        global = true,
        hide_env_values = true
    )]
    pub access_token: Option<String>,

    /// Contentful environment to read entries from.
    #[arg(long = "contentful-environment", value_name = "NAME", global = true)]
    pub environment: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override how long a generated page is served before it is regenerated.
    #[arg(long = "revalidate-seconds", value_name = "SECONDS")]
    pub revalidate_seconds: Option<u64>,

    /// Override how never-generated pages are served (placeholder|blocking).
    #[arg(long = "fallback", value_name = "MODE")]
    pub fallback: Option<String>,

    /// Toggle generating every page before the listener starts.
    #[arg(
        long = "prerender",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub prerender: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Directory receiving `<slug>/index.html` for every page.
    #[arg(value_name = "OUT_DIR", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Maximum number of pages rendered concurrently.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(usize))]
    pub concurrency: usize,
}
