pub mod algorithms;
#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod models;
#[cfg(feature = "sqlx")]
pub mod store;
pub mod validate;

pub mod prelude {
    pub use crate::algorithms::{forward_adjacency, has_cycle, reverse_adjacency};
    #[cfg(feature = "api")]
    pub use crate::api::{AppError, HasPool};
    #[cfg(feature = "sqlx")]
    pub use crate::db::{create_graph, create_graph_tables, delete_graph, delete_node, get_graph};
    pub use crate::error::{ErrorKind, LibError, Result};
    pub use crate::models::{
        AdjacencyView, CreateGraphPayload, DirectedGraph, GraphCreated, GraphDefinition, GraphEdge,
        GraphId, GraphNode, NewGraphEdge, NewGraphNode,
    };
    #[cfg(feature = "sqlx")]
    pub use crate::store::GraphStore;
    pub use crate::validate::{ValidationError, ensure_valid_graph, validate};
}
