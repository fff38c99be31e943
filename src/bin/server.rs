use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use budget_tracker::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The REST API server for the budget tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The local timezone as a canonical timezone name, used to work out the current month.
    #[arg(long, env = "TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// File path for the debug log.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database file {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let app_state = match AppState::new(conn, &args.timezone) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_path: &str) -> Result<(), std::io::Error> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
