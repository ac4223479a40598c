use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use rowview::{
    cli::Cli,
    config::Config,
    models::DisplayState,
    source::{PostgrestSource, RemoteDataSource, StaticSource},
    tui,
    view::RecordListView,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "rowview=info");
    }

    // Log to a file so the TUI stays clean; CLI mode also logs to stderr
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let file_appender = tracing_appender::rolling::never(".", "rowview.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(cli.cli.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        }))
        .init();

    let config = cli.apply(Config::from_env()?);
    config.validate()?;

    let source: Arc<dyn RemoteDataSource> = match &cli.fixture {
        Some(path) => {
            info!("Serving rows from fixture {}", path.display());
            Arc::new(StaticSource::from_file(path).await?)
        }
        None => Arc::new(PostgrestSource::from_config(&config)?),
    };
    let source_label = source.describe();

    let view = RecordListView::new(source, config.table.clone(), config.limit);

    if cli.cli {
        return run_once(view).await;
    }

    match tui::run_tui(view, source_label).await {
        Ok(_) => info!("TUI exited successfully"),
        Err(e) => {
            error!("TUI failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Mount the view, wait for it to settle and print the result
async fn run_once(mut view: RecordListView) -> Result<()> {
    view.mount();
    let state = view.settled().await;

    println!("{}", rowview::render(&state).to_text());

    if let DisplayState::Failed { .. } = state {
        std::process::exit(1);
    }
    Ok(())
}
