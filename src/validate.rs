//! Structural validation of a candidate `(names, edges)` pair.
//!
//! Checks run in a fixed order and stop at the first failure, so callers
//! always see a single, deterministic reason when several rules are broken
//! at once: non-empty vertex set, per-name length then charset (input
//! order), name uniqueness, edge endpoint existence (input order), edge
//! uniqueness (input order, first repeat wins), acyclicity.

use std::collections::HashSet;

use anyhow::anyhow;
use serde::Serialize;

use crate::algorithms;
use crate::error::{LibError, Result};

pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationError {
    EmptyGraph,
    InvalidNameLength { name: String },
    InvalidNameCharset { name: String },
    DuplicateNodeName { name: String },
    DanglingEdgeEndpoint { source: String, target: String },
    DuplicateEdge { source: String, target: String },
    CycleDetected,
}

impl ValidationError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyGraph => "graph_empty",
            ValidationError::InvalidNameLength { .. } => "node_name_length",
            ValidationError::InvalidNameCharset { .. } => "node_name_charset",
            ValidationError::DuplicateNodeName { .. } => "node_name_duplicate",
            ValidationError::DanglingEdgeEndpoint { .. } => "edge_unknown_endpoint",
            ValidationError::DuplicateEdge { .. } => "edge_duplicate",
            ValidationError::CycleDetected => "graph_cycle",
        }
    }

    pub const fn public_message(&self) -> &'static str {
        match self {
            ValidationError::EmptyGraph => "There must be at least one node",
            ValidationError::InvalidNameLength { .. } => {
                "Node name must be between 1 and 255 characters long"
            }
            ValidationError::InvalidNameCharset { .. } => {
                "Node name must consist only of Latin letters"
            }
            ValidationError::DuplicateNodeName { .. } => "Node names must be unique",
            ValidationError::DanglingEdgeEndpoint { .. } => {
                "Edge references a node that does not exist"
            }
            ValidationError::DuplicateEdge { .. } => "Duplicate edges are not allowed",
            ValidationError::CycleDetected => "Graph must not contain cycles",
        }
    }
}

/// Pure read of the candidate data; no side effects on any failure.
pub fn validate(
    names: &[String],
    edges: &[(String, String)],
) -> std::result::Result<(), ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::EmptyGraph);
    }

    for name in names {
        let length = name.chars().count();
        if length == 0 || length > MAX_NAME_LEN {
            return Err(ValidationError::InvalidNameLength { name: name.clone() });
        }
        if !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidNameCharset { name: name.clone() });
        }
    }

    let mut seen_names = HashSet::with_capacity(names.len());
    for name in names {
        if !seen_names.insert(name.as_str()) {
            return Err(ValidationError::DuplicateNodeName { name: name.clone() });
        }
    }

    for (source, target) in edges {
        if !seen_names.contains(source.as_str()) || !seen_names.contains(target.as_str()) {
            return Err(ValidationError::DanglingEdgeEndpoint {
                source: source.clone(),
                target: target.clone(),
            });
        }
    }

    let mut seen_edges = HashSet::with_capacity(edges.len());
    for (source, target) in edges {
        if !seen_edges.insert((source.as_str(), target.as_str())) {
            return Err(ValidationError::DuplicateEdge {
                source: source.clone(),
                target: target.clone(),
            });
        }
    }

    if algorithms::has_cycle(names, edges) {
        return Err(ValidationError::CycleDetected);
    }

    Ok(())
}

/// Bridges a validation failure into the crate error, carrying the
/// serialized reason so the api layer can echo it in the response detail.
pub fn ensure_valid_graph(names: &[String], edges: &[(String, String)]) -> Result<()> {
    if let Err(violation) = validate(names, edges) {
        let details = serde_json::to_value(&violation).ok();
        return Err(LibError::invalid_with_details(
            violation.error_code(),
            violation.public_message(),
            details,
            anyhow!("graph validation failed: {:?}", violation),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|name| name.to_string()).collect()
    }

    fn edges(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect()
    }

    #[test]
    fn accepts_simple_dag() {
        assert_eq!(
            validate(&names(&["a", "b", "c"]), &edges(&[("a", "b"), ("b", "c")])),
            Ok(()),
        );
    }

    #[test]
    fn accepts_single_vertex_without_edges() {
        assert_eq!(validate(&names(&["a"]), &[]), Ok(()));
    }

    #[test]
    fn accepts_both_directions_between_distinct_pairs_of_a_dag() {
        // (a,b) and (b,a) are distinct directed edges; only the cycle rule
        // rejects their combination, and it does so explicitly.
        assert_eq!(
            validate(&names(&["a", "b"]), &edges(&[("a", "b"), ("b", "a")])),
            Err(ValidationError::CycleDetected),
        );
    }

    #[test]
    fn rejects_empty_vertex_set_before_anything_else() {
        assert_eq!(validate(&[], &[]), Err(ValidationError::EmptyGraph));
        assert_eq!(
            validate(&[], &edges(&[("a", "b")])),
            Err(ValidationError::EmptyGraph),
        );
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(
            validate(&names(&["", "b"]), &[]),
            Err(ValidationError::InvalidNameLength {
                name: String::new()
            }),
        );
    }

    #[test]
    fn rejects_overlong_name() {
        let long = "a".repeat(256);
        assert_eq!(
            validate(&[long.clone(), "b".to_string()], &[]),
            Err(ValidationError::InvalidNameLength { name: long }),
        );
    }

    #[test]
    fn accepts_name_at_the_length_limit() {
        let limit = "a".repeat(255);
        assert_eq!(validate(&[limit], &[]), Ok(()));
    }

    #[test]
    fn length_is_checked_before_charset() {
        let long_digits = "1".repeat(256);
        assert_eq!(
            validate(&[long_digits.clone()], &[]),
            Err(ValidationError::InvalidNameLength { name: long_digits }),
        );
    }

    #[test]
    fn rejects_non_latin_names() {
        for bad in ["a1", "a_a", "a b", "графъ"] {
            assert_eq!(
                validate(&names(&[bad]), &[]),
                Err(ValidationError::InvalidNameCharset {
                    name: bad.to_string()
                }),
                "expected charset rejection for {bad:?}",
            );
        }
    }

    #[test]
    fn rejects_duplicate_node_names() {
        assert_eq!(
            validate(&names(&["a", "a", "b"]), &edges(&[("a", "b")])),
            Err(ValidationError::DuplicateNodeName {
                name: "a".to_string()
            }),
        );
    }

    #[test]
    fn rejects_dangling_edge_endpoints() {
        assert_eq!(
            validate(&names(&["a", "b"]), &edges(&[("c", "d")])),
            Err(ValidationError::DanglingEdgeEndpoint {
                source: "c".to_string(),
                target: "d".to_string(),
            }),
        );
        assert_eq!(
            validate(&names(&["a", "b"]), &edges(&[("a", "c")])),
            Err(ValidationError::DanglingEdgeEndpoint {
                source: "a".to_string(),
                target: "c".to_string(),
            }),
        );
    }

    #[test]
    fn rejects_duplicate_edges() {
        assert_eq!(
            validate(&names(&["a", "b"]), &edges(&[("a", "b"), ("a", "b")])),
            Err(ValidationError::DuplicateEdge {
                source: "a".to_string(),
                target: "b".to_string(),
            }),
        );
    }

    #[test]
    fn rejects_three_node_cycle() {
        assert_eq!(
            validate(
                &names(&["a", "b", "c"]),
                &edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
            ),
            Err(ValidationError::CycleDetected),
        );
    }

    #[test]
    fn rejects_self_loop_as_cycle() {
        // Structurally legal edge shape, always rejected by acyclicity.
        assert_eq!(
            validate(&names(&["a"]), &edges(&[("a", "a")])),
            Err(ValidationError::CycleDetected),
        );
    }

    #[test]
    fn dangling_endpoint_wins_over_later_duplicate() {
        // Endpoint existence is checked over the whole edge list before
        // duplicate detection starts.
        assert_eq!(
            validate(
                &names(&["a", "b"]),
                &edges(&[("a", "b"), ("a", "b"), ("a", "x")]),
            ),
            Err(ValidationError::DanglingEdgeEndpoint {
                source: "a".to_string(),
                target: "x".to_string(),
            }),
        );
    }

    #[test]
    fn ensure_valid_graph_carries_code_message_and_detail() {
        let err = ensure_valid_graph(
            &names(&["a", "b", "c"]),
            &edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
        )
        .expect_err("cycle should be rejected");

        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.code, "graph_cycle");
        assert_eq!(err.public, "Graph must not contain cycles");
        assert_eq!(
            err.details,
            Some(serde_json::json!({"reason": "cycle_detected"})),
        );
    }

    #[test]
    fn ensure_valid_graph_detail_names_the_offender() {
        let err = ensure_valid_graph(&names(&["a", "b"]), &edges(&[("a", "b"), ("a", "b")]))
            .expect_err("duplicate edge should be rejected");

        assert_eq!(err.code, "edge_duplicate");
        assert_eq!(
            err.details,
            Some(serde_json::json!({
                "reason": "duplicate_edge",
                "source": "a",
                "target": "b",
            })),
        );
    }
}
