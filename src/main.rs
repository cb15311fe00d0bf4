use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use todo_tracker::api::swagger_main;
use todo_tracker::{SharedData, api, app_env, db, logging, persistence};
use tokio::net::TcpListener;
use tracing::info;
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Running without a .env file.");
    }

    let otel_exporters = match logging::exporter_endpoints_from_env() {
        Some((span_url, metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        None => None,
    };
    logging::setup_logging_and_tracing(
        logging::init_env_filter(LevelFilter::INFO)?,
        otel_exporters,
    );

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("the {} environment variable must be set", app_env::DB_URL))?;
    let pool = db::connect_sqlx(&db_url).await?;
    db::migrate(&pool).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    });
    let router = api::api_routes()
        .merge(swagger_main::build_documentation())
        .with_state(shared_data);
    let router = logging::attach_tracing_http(router);

    let listen_addr =
        env::var(app_env::LISTEN_ADDR).unwrap_or_else(|_| app_env::DEFAULT_LISTEN_ADDR.to_owned());
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding to {listen_addr}"))?;

    info!("Starting server on {listen_addr}");
    axum::serve(listener, router)
        .await
        .context("serving HTTP requests")?;

    Ok(())
}
