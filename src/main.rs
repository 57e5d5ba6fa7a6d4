use std::{process, sync::Arc};

use portfolio::{
    application::{content::ContentSource, error::AppError, pages::ProjectPages},
    cache::{CacheConfig, PageCache},
    config,
    infra::{
        contentful::ContentfulClient,
        error::InfraError,
        export::export_pages,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let pages = build_project_pages(&settings)?;

    match command {
        config::Command::Serve(_) => run_serve(settings, pages).await,
        config::Command::Build(args) => run_build(pages, args).await,
        config::Command::Paths => run_paths(pages).await,
    }
}

fn build_project_pages(settings: &config::Settings) -> Result<ProjectPages, AppError> {
    let client: Arc<dyn ContentSource> = Arc::new(ContentfulClient::new(&settings.contentful)?);

    Ok(ProjectPages::new(client)
        .with_revalidate(settings.pages.revalidate)
        .with_fallback(settings.pages.fallback))
}

async fn run_serve(settings: config::Settings, pages: ProjectPages) -> Result<(), AppError> {
    let cache = PageCache::new(pages, CacheConfig::from(&settings.cache));

    if settings.pages.prerender && settings.cache.enabled {
        let paths = cache.warm().await?;
        info!(
            target = "portfolio::serve",
            pages = paths.paths.len(),
            "Prerendered project pages"
        );
    }

    let router = http::build_router(HttpState { cache });
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "portfolio::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_build(pages: ProjectPages, args: config::BuildArgs) -> Result<(), AppError> {
    let summary = export_pages(&pages, &args.out_dir, args.concurrency).await?;
    if summary.written == 0 {
        info!(
            target = "portfolio::build",
            out_dir = %args.out_dir.display(),
            "No project pages to write"
        );
    }
    Ok(())
}

async fn run_paths(pages: ProjectPages) -> Result<(), AppError> {
    let paths = pages.enumerate_paths().await?;
    for params in paths.paths {
        println!("{}", params.slug);
    }
    Ok(())
}
