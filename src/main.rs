use axum::http::{self, HeaderValue, Method};
use dotenvy::dotenv;
use env_logger::Builder;
use log::LevelFilter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use party_server::app;
use party_server::utils::config::CONFIG;

fn init_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("party_server", LevelFilter::Debug)
        .filter_module("tower_http", LevelFilter::Debug)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; every variable has a default
    let _ = dotenv();

    init_logger();

    let origins = ["http://localhost:3000".parse::<HeaderValue>()?];
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE]);

    let app = app::create_app().layer(cors).layer(
        TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    );

    let addr = CONFIG.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("party server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
