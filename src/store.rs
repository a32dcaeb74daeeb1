use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;

use crate::algorithms;
use crate::db;
use crate::error::Result;
use crate::models::{CreateGraphPayload, DirectedGraph, GraphId};

/// High-level mutation engine over the persisted representation.
///
/// Mutating calls run inside storage transactions, so either a whole graph
/// (or a whole node-plus-incident-edges cascade) becomes visible, or
/// nothing does. Creates of distinct graphs never block each other.
#[derive(Clone)]
pub struct GraphStore {
    pool: Arc<PgPool>,
}

impl GraphStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn from_pool(pool: &PgPool) -> Self {
        Self {
            pool: Arc::new(pool.clone()),
        }
    }

    pub fn pool(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// Validates the candidate and persists it atomically; invalid input
    /// never reaches storage. Returns the stored graph with its fresh id.
    pub async fn create(&self, payload: CreateGraphPayload) -> Result<DirectedGraph> {
        let definition = payload.normalize()?;
        let graph_id = db::create_graph(&self.pool, &definition).await?;
        db::get_graph(&self.pool, graph_id).await
    }

    pub async fn get(&self, graph_id: GraphId) -> Result<DirectedGraph> {
        db::get_graph(&self.pool, graph_id).await
    }

    /// Removes a node and its incident edges as one atomic step. Requires
    /// only that the graph and node exist; the "last node" policy belongs
    /// to the request-handling layer.
    pub async fn delete_node(&self, graph_id: GraphId, node_name: &str) -> Result<()> {
        db::delete_node(&self.pool, graph_id, node_name).await
    }

    pub async fn delete_graph(&self, graph_id: GraphId) -> Result<()> {
        db::delete_graph(&self.pool, graph_id).await
    }

    pub async fn forward_adjacency(
        &self,
        graph_id: GraphId,
    ) -> Result<HashMap<String, Vec<String>>> {
        let graph = db::get_graph(&self.pool, graph_id).await?;
        Ok(algorithms::forward_adjacency(
            &graph.node_names(),
            &graph.edge_pairs(),
        ))
    }

    pub async fn reverse_adjacency(
        &self,
        graph_id: GraphId,
    ) -> Result<HashMap<String, Vec<String>>> {
        let graph = db::get_graph(&self.pool, graph_id).await?;
        Ok(algorithms::reverse_adjacency(
            &graph.node_names(),
            &graph.edge_pairs(),
        ))
    }
}
