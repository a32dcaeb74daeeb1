use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use dag_store::api::HasPool;

#[derive(Clone)]
struct DemoApp {
    pool: Arc<PgPool>,
}

impl HasPool for DemoApp {
    fn pool(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = env::var("DATABASE_URL")
        .context("DATABASE_URL is required to run demos/graph_api_server.rs")?;
    let bind = env::var("GRAPH_BIND").unwrap_or_else(|_| "127.0.0.1:4010".to_string());
    let bind_addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid GRAPH_BIND '{}'", bind))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to postgres")?;

    dag_store::db::create_graph_tables(&pool)
        .await
        .context("failed to run graph migrations")?;

    let app_state = DemoApp {
        pool: Arc::new(pool),
    };

    let app = Router::new()
        .route("/healthz", get(health_handler))
        .merge(dag_store::api::routes::<DemoApp>())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", bind_addr))?;

    tracing::info!("dag_store demo server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .await
        .context("demo server failed")
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok"
    }))
}
