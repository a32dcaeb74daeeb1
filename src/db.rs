use std::collections::HashMap;

use anyhow::anyhow;
use once_cell::sync::Lazy;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{FromRow, PgPool};

use crate::error::{LibError, Result};
use crate::models::{DirectedGraph, GraphDefinition, GraphEdge, GraphId, GraphNode};

pub static MIGRATOR: Lazy<Migrator> = Lazy::new(|| {
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(true);
    migrator
});

pub async fn create_graph_tables(pool: &PgPool) -> std::result::Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[derive(Debug, Clone, FromRow)]
struct GraphRow {
    id: i64,
    created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
struct NodeRow {
    name: String,
}

#[derive(Debug, Clone, FromRow)]
struct NodeIdRow {
    id: i64,
    name: String,
}

#[derive(Debug, Clone, FromRow)]
struct EdgeRow {
    source: String,
    target: String,
}

#[derive(Debug, Clone, FromRow)]
struct EdgeRefRow {
    id: i64,
    source_id: i64,
    target_id: i64,
}

fn hydrate_graph(row: GraphRow, nodes: Vec<NodeRow>, edges: Vec<EdgeRow>) -> DirectedGraph {
    DirectedGraph {
        id: GraphId(row.id),
        created_at: row.created_at,
        nodes: nodes
            .into_iter()
            .map(|node| GraphNode { name: node.name })
            .collect(),
        edges: edges
            .into_iter()
            .map(|edge| GraphEdge {
                source: edge.source,
                target: edge.target,
            })
            .collect(),
    }
}

fn db_err(public: &'static str, err: sqlx::Error) -> LibError {
    LibError::database(public, anyhow!(err))
}

/// Constraint violations on writes are integrity defects: validation already
/// accepted the input, so a fired constraint is a server-side problem.
fn write_err(public: &'static str, err: sqlx::Error) -> LibError {
    let constraint = matches!(
        &err,
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation()
    );
    if constraint {
        LibError::integrity(anyhow!(err))
    } else {
        LibError::database(public, anyhow!(err))
    }
}

/// Edge rows to remove when `node_id` goes away: every edge where the node
/// is source or target. Pure so the cascade rule is testable without a
/// database and portable across storage backends.
fn incident_edge_ids(node_id: i64, edges: &[EdgeRefRow]) -> Vec<i64> {
    edges
        .iter()
        .filter(|edge| edge.source_id == node_id || edge.target_id == node_id)
        .map(|edge| edge.id)
        .collect()
}

/// Persists a validation-accepted graph atomically: insert the graph row,
/// bulk-insert the nodes, resolve name to id, insert the edges, all inside
/// one transaction. Nothing is observable until the commit.
pub async fn create_graph(pool: &PgPool, definition: &GraphDefinition) -> Result<GraphId> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|err| db_err("Failed to start transaction", err))?;

    let graph: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO graph.graphs DEFAULT VALUES
        RETURNING id
        "#,
    )
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| db_err("Failed to create graph", err))?;
    let graph_id = GraphId(graph.0);

    sqlx::query(
        r#"
        INSERT INTO graph.nodes (graph_id, name)
        SELECT $1, unnest($2::varchar[])
        "#,
    )
    .bind(graph_id.0)
    .bind(&definition.names)
    .execute(&mut *tx)
    .await
    .map_err(|err| write_err("Failed to write graph nodes", err))?;

    let rows = sqlx::query_as::<_, NodeIdRow>(
        r#"
        SELECT id, name
        FROM graph.nodes
        WHERE graph_id = $1
        "#,
    )
    .bind(graph_id.0)
    .fetch_all(&mut *tx)
    .await
    .map_err(|err| db_err("Failed to resolve graph node ids", err))?;
    let name_to_id: HashMap<String, i64> = rows.into_iter().map(|row| (row.name, row.id)).collect();

    for (source, target) in &definition.edges {
        let (Some(&source_id), Some(&target_id)) = (name_to_id.get(source), name_to_id.get(target))
        else {
            return Err(LibError::unknown(
                "Graph write lost a node",
                anyhow!(
                    "edge ({} -> {}) references a node missing after insert into graph {}",
                    source,
                    target,
                    graph_id
                ),
            ));
        };
        sqlx::query(
            r#"
            INSERT INTO graph.edges (graph_id, source_id, target_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(graph_id.0)
        .bind(source_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(|err| write_err("Failed to write graph edges", err))?;
    }

    tx.commit()
        .await
        .map_err(|err| db_err("Failed to commit transaction", err))?;

    Ok(graph_id)
}

pub async fn get_graph(pool: &PgPool, graph_id: GraphId) -> Result<DirectedGraph> {
    let row = sqlx::query_as::<_, GraphRow>(
        r#"
        SELECT id, created_at
        FROM graph.graphs
        WHERE id = $1
        "#,
    )
    .bind(graph_id.0)
    .fetch_optional(pool)
    .await
    .map_err(|err| db_err("Failed to query graph", err))?;

    let Some(row) = row else {
        return Err(LibError::graph_not_found(anyhow!(
            "graph {} not found",
            graph_id
        )));
    };

    let nodes = sqlx::query_as::<_, NodeRow>(
        r#"
        SELECT name
        FROM graph.nodes
        WHERE graph_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(graph_id.0)
    .fetch_all(pool)
    .await
    .map_err(|err| db_err("Failed to query graph nodes", err))?;

    let edges = sqlx::query_as::<_, EdgeRow>(
        r#"
        SELECT s.name AS source, t.name AS target
        FROM graph.edges e
        JOIN graph.nodes s ON s.id = e.source_id
        JOIN graph.nodes t ON t.id = e.target_id
        WHERE e.graph_id = $1
        ORDER BY e.id ASC
        "#,
    )
    .bind(graph_id.0)
    .fetch_all(pool)
    .await
    .map_err(|err| db_err("Failed to query graph edges", err))?;

    Ok(hydrate_graph(row, nodes, edges))
}

/// Removes the named node and every edge incident to it as one atomic step.
/// The graph row is locked for the duration, serializing concurrent
/// mutations of the same graph.
pub async fn delete_node(pool: &PgPool, graph_id: GraphId, node_name: &str) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|err| db_err("Failed to start transaction", err))?;

    let locked: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM graph.graphs
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(graph_id.0)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|err| db_err("Failed to query graph", err))?;

    if locked.is_none() {
        return Err(LibError::graph_not_found(anyhow!(
            "graph {} not found",
            graph_id
        )));
    }

    let node: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM graph.nodes
        WHERE graph_id = $1
          AND name = $2
        "#,
    )
    .bind(graph_id.0)
    .bind(node_name)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|err| db_err("Failed to query graph node", err))?;

    let Some((node_id,)) = node else {
        return Err(LibError::node_not_found(anyhow!(
            "node '{}' not found in graph {}",
            node_name,
            graph_id
        )));
    };

    let edges = sqlx::query_as::<_, EdgeRefRow>(
        r#"
        SELECT id, source_id, target_id
        FROM graph.edges
        WHERE graph_id = $1
        "#,
    )
    .bind(graph_id.0)
    .fetch_all(&mut *tx)
    .await
    .map_err(|err| db_err("Failed to query graph edges", err))?;

    let doomed_edges = incident_edge_ids(node_id, &edges);
    if !doomed_edges.is_empty() {
        sqlx::query(
            r#"
            DELETE FROM graph.edges
            WHERE id = ANY($1)
            "#,
        )
        .bind(&doomed_edges)
        .execute(&mut *tx)
        .await
        .map_err(|err| db_err("Failed to delete node edges", err))?;
    }

    sqlx::query(
        r#"
        DELETE FROM graph.nodes
        WHERE id = $1
        "#,
    )
    .bind(node_id)
    .execute(&mut *tx)
    .await
    .map_err(|err| write_err("Failed to delete node", err))?;

    tx.commit()
        .await
        .map_err(|err| db_err("Failed to commit transaction", err))?;

    Ok(())
}

/// Whole-graph destruction by id; storage cascades to nodes and edges.
pub async fn delete_graph(pool: &PgPool, graph_id: GraphId) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM graph.graphs
        WHERE id = $1
        "#,
    )
    .bind(graph_id.0)
    .execute(pool)
    .await
    .map_err(|err| db_err("Failed to delete graph", err))?;

    if result.rows_affected() == 0 {
        return Err(LibError::graph_not_found(anyhow!(
            "graph {} not found",
            graph_id
        )));
    }

    Ok(())
}
