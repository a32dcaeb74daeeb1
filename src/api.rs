use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use crate::error::{ErrorKind, LibError};
use crate::models::{AdjacencyView, CreateGraphPayload, GraphCreated, GraphId};
use crate::store::GraphStore;

#[derive(Debug)]
pub struct AppError(pub LibError);

impl From<LibError> for AppError {
    fn from(value: LibError) -> Self {
        Self(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Database => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(
            kind = ?self.0.kind,
            code = self.0.code,
            error = %self.0.source,
            "graph api request failed"
        );
        let body = json!({
            "message": self.0.public,
            "code": self.0.code,
            "detail": self.0.details,
        });
        (status, Json(body)).into_response()
    }
}

pub trait HasPool {
    fn pool(&self) -> Arc<sqlx::PgPool>;
}

async fn create_graph_handler<S>(
    State(app): State<S>,
    Json(payload): Json<CreateGraphPayload>,
) -> Result<impl IntoResponse, AppError>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    let graph = GraphStore::new(app.pool()).create(payload).await?;
    Ok((StatusCode::CREATED, Json(GraphCreated { id: graph.id })))
}

async fn get_graph_handler<S>(
    State(app): State<S>,
    Path(graph_id): Path<GraphId>,
) -> Result<impl IntoResponse, AppError>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    let graph = GraphStore::new(app.pool()).get(graph_id).await?;
    Ok(Json(graph))
}

async fn adjacency_handler<S>(
    State(app): State<S>,
    Path(graph_id): Path<GraphId>,
) -> Result<impl IntoResponse, AppError>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    let adjacency = GraphStore::new(app.pool()).forward_adjacency(graph_id).await?;
    Ok(Json(AdjacencyView { adjacency }))
}

async fn reverse_adjacency_handler<S>(
    State(app): State<S>,
    Path(graph_id): Path<GraphId>,
) -> Result<impl IntoResponse, AppError>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    let adjacency = GraphStore::new(app.pool()).reverse_adjacency(graph_id).await?;
    Ok(Json(AdjacencyView { adjacency }))
}

async fn delete_node_handler<S>(
    State(app): State<S>,
    Path((graph_id, node_name)): Path<(GraphId, String)>,
) -> Result<impl IntoResponse, AppError>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    let store = GraphStore::new(app.pool());

    // Caller-side policy: a stored graph must keep at least one node, so
    // deleting the only node is rejected here before the engine runs.
    let graph = store.get(graph_id).await?;
    if graph.nodes.len() == 1 && graph.nodes[0].name == node_name {
        return Err(AppError(LibError::invalid_with_details(
            "last_node",
            "Cannot delete the last node of a graph",
            None,
            anyhow!("refusing to delete the only node of graph {}", graph_id),
        )));
    }

    store.delete_node(graph_id, &node_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_graph_handler<S>(
    State(app): State<S>,
    Path(graph_id): Path<GraphId>,
) -> Result<impl IntoResponse, AppError>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    GraphStore::new(app.pool()).delete_graph(graph_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes<S>() -> Router<S>
where
    S: HasPool + Clone + Send + Sync + 'static,
{
    tracing::info!("Registering route /api/graph [POST]");
    tracing::info!("Registering route /api/graph/{{graph_id}} [GET,DELETE]");
    tracing::info!("Registering route /api/graph/{{graph_id}}/adjacency [GET]");
    tracing::info!("Registering route /api/graph/{{graph_id}}/reverse_adjacency [GET]");
    tracing::info!("Registering route /api/graph/{{graph_id}}/node/{{node_name}} [DELETE]");

    Router::new()
        .route("/api/graph", post(create_graph_handler::<S>))
        .route(
            "/api/graph/{graph_id}",
            get(get_graph_handler::<S>).delete(delete_graph_handler::<S>),
        )
        .route(
            "/api/graph/{graph_id}/adjacency",
            get(adjacency_handler::<S>),
        )
        .route(
            "/api/graph/{graph_id}/reverse_adjacency",
            get(reverse_adjacency_handler::<S>),
        )
        .route(
            "/api/graph/{graph_id}/node/{node_name}",
            delete(delete_node_handler::<S>),
        )
}
