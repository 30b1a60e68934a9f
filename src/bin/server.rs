use std::{env, net::SocketAddr};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use budget_calendar::{
    AppState, CookieSettings, build_router, cors_layer, graceful_shutdown, logging_middleware,
};

/// The REST API server for budget_calendar.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The IP address to serve the API from.
    #[arg(long, default_value = "127.0.0.1")]
    address: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// The origin of the web client that is allowed to call the API.
    #[arg(long, env = "CLIENT_ORIGIN", default_value = "http://localhost:3000")]
    client_origin: String,

    /// Set to 'production' to only send cookies over HTTPS.
    #[arg(long, env = "APP_ENV", default_value = "development")]
    app_env: String,
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine, the variables may be set some other way.
    let _ = dotenvy::dotenv();

    setup_logging();

    let args = Args::parse();

    let addr: SocketAddr = format!("{}:{}", args.address, args.port)
        .parse()
        .expect("Could not parse the server address.");

    let client_origin = HeaderValue::from_str(&args.client_origin)
        .expect("The client origin must be a valid header value.");

    let cookie_settings = if args.app_env == "production" {
        CookieSettings::production()
    } else {
        CookieSettings::development()
    };

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let app_state =
        AppState::new(conn, &secret, cookie_settings).expect("Could not initialize the database.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(app_state)
            .layer(middleware::from_fn(logging_middleware))
            .layer(cors_layer(client_origin)),
    );

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
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
        // By default, `TraceLayer` will log 5xx responses but errors are
        // already logged when their response is built.
        .on_failure(());

    router.layer(tracing_layer)
}
