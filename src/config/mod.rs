//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{net::SocketAddr, num::NonZeroU32, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::pages::Fallback;

pub use cli::{BuildArgs, CliArgs, Command, ContentfulOverrides, ServeArgs, ServeOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "portfolio";
const ENV_PREFIX: &str = "PORTFOLIO";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CONTENTFUL_ENVIRONMENT: &str = "master";
const DEFAULT_CONTENTFUL_BASE_URL: &str = "https://cdn.contentful.com";
const DEFAULT_CONTENTFUL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REVALIDATE_SECS: u64 = 1;
const DEFAULT_PRERENDER: bool = true;
const DEFAULT_CACHE_PAGE_LIMIT: usize = 500;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub contentful: ContentfulSettings,
    pub pages: PagesSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Clone)]
pub struct ContentfulSettings {
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    pub base_url: Url,
    pub timeout: Duration,
}

impl std::fmt::Debug for ContentfulSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentfulSettings")
            .field("space_id", &self.space_id)
            .field("access_token", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PagesSettings {
    pub revalidate: Duration,
    pub fallback: Fallback,
    pub prerender: bool,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub page_limit: usize,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_contentful_overrides(&cli.contentful);
    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Build(_)) | Some(Command::Paths) => {}
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    contentful: RawContentfulSettings,
    pages: RawPagesSettings,
    cache: RawCacheSettings,
}

impl RawSettings {
    fn apply_contentful_overrides(&mut self, overrides: &ContentfulOverrides) {
        if let Some(space_id) = overrides.space_id.as_ref() {
            self.contentful.space_id = Some(space_id.clone());
        }
        if let Some(token) = overrides.access_token.as_ref() {
            self.contentful.access_token = Some(token.clone());
        }
        if let Some(environment) = overrides.environment.as_ref() {
            self.contentful.environment = Some(environment.clone());
        }
    }

    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(seconds) = overrides.revalidate_seconds {
            self.pages.revalidate_seconds = Some(seconds);
        }
        if let Some(fallback) = overrides.fallback.as_ref() {
            self.pages.fallback = Some(fallback.clone());
        }
        if let Some(prerender) = overrides.prerender {
            self.pages.prerender = Some(prerender);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            contentful,
            pages,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            contentful: build_contentful_settings(contentful)?,
            pages: build_pages_settings(pages)?,
            cache: build_cache_settings(cache),
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }
    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;
    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };
    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    Ok(LoggingSettings { level, format })
}

fn build_contentful_settings(
    contentful: RawContentfulSettings,
) -> Result<ContentfulSettings, LoadError> {
    let space_id = required_text(contentful.space_id).ok_or_else(|| {
        LoadError::invalid(
            "contentful.space_id",
            "must be set (or provide CONTENTFUL_SPACE_ID)",
        )
    })?;
    let access_token = required_text(contentful.access_token).ok_or_else(|| {
        LoadError::invalid(
            "contentful.access_token",
            "must be set (or provide CONTENTFUL_DELIVERY_API)",
        )
    })?;
    let environment = required_text(contentful.environment)
        .unwrap_or_else(|| DEFAULT_CONTENTFUL_ENVIRONMENT.to_string());

    let base_url_value = contentful
        .base_url
        .unwrap_or_else(|| DEFAULT_CONTENTFUL_BASE_URL.to_string());
    let base_url = Url::parse(base_url_value.trim()).map_err(|err| {
        LoadError::invalid(
            "contentful.base_url",
            format!("invalid url `{base_url_value}`: {err}"),
        )
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "contentful.base_url",
            "scheme must be http or https",
        ));
    }

    let timeout_secs = contentful
        .timeout_seconds
        .unwrap_or(DEFAULT_CONTENTFUL_TIMEOUT_SECS);
    let timeout = non_zero_u32(timeout_secs, "contentful.timeout_seconds")?;

    Ok(ContentfulSettings {
        space_id,
        access_token,
        environment,
        base_url,
        timeout: Duration::from_secs(timeout.get().into()),
    })
}

fn build_pages_settings(pages: RawPagesSettings) -> Result<PagesSettings, LoadError> {
    let revalidate_secs = pages
        .revalidate_seconds
        .unwrap_or(DEFAULT_REVALIDATE_SECS);
    let revalidate = non_zero_u32(revalidate_secs, "pages.revalidate_seconds")?;

    let fallback = match pages.fallback.as_deref().map(str::trim) {
        None | Some("placeholder") => Fallback::Placeholder,
        Some("blocking") => Fallback::Blocking,
        Some(other) => {
            return Err(LoadError::invalid(
                "pages.fallback",
                format!("expected `placeholder` or `blocking`, got `{other}`"),
            ));
        }
    };

    Ok(PagesSettings {
        revalidate: Duration::from_secs(revalidate.get().into()),
        fallback,
        prerender: pages.prerender.unwrap_or(DEFAULT_PRERENDER),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> CacheSettings {
    CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        page_limit: cache.page_limit.unwrap_or(DEFAULT_CACHE_PAGE_LIMIT),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentfulSettings {
    space_id: Option<String>,
    access_token: Option<String>,
    environment: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for RawContentfulSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawContentfulSettings")
            .field("space_id", &self.space_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPagesSettings {
    revalidate_seconds: Option<u64>,
    fallback: Option<String>,
    prerender: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    page_limit: Option<usize>,
}

fn required_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
