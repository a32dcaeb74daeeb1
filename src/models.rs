use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct GraphId(pub i64);

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GraphId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        i64::from_str(s).map(Self)
    }
}

impl From<i64> for GraphId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A vertex of a stored graph. Names are unique within their owning graph,
/// not globally, and carry no payload beyond identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
}

/// A directed edge referencing two node names of the same graph. The pair
/// does not own its endpoints; both must exist for the edge to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// A persisted graph as read back from storage: nodes and edges in
/// creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectedGraph {
    pub id: GraphId,
    pub created_at: NaiveDateTime,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DirectedGraph {
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.name.clone()).collect()
    }

    pub fn edge_pairs(&self) -> Vec<(String, String)> {
        self.edges
            .iter()
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGraphNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGraphEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGraphPayload {
    pub nodes: Vec<NewGraphNode>,
    pub edges: Vec<NewGraphEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphCreated {
    pub id: GraphId,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdjacencyView {
    pub adjacency: HashMap<String, Vec<String>>,
}

/// A validation-accepted candidate: the only input the persistence layer
/// accepts, so an invalid graph can never transition into storage.
#[derive(Debug, Clone)]
pub struct GraphDefinition {
    pub names: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl CreateGraphPayload {
    /// Flattens the wire shape and runs full structural validation.
    /// Edge order is preserved for deterministic echo-back.
    pub fn normalize(self) -> Result<GraphDefinition> {
        let names: Vec<String> = self.nodes.into_iter().map(|node| node.name).collect();
        let edges: Vec<(String, String)> = self
            .edges
            .into_iter()
            .map(|edge| (edge.source, edge.target))
            .collect();

        validate::ensure_valid_graph(&names, &edges)?;

        Ok(GraphDefinition { names, edges })
    }
}
