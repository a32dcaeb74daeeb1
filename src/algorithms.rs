//! Pure traversal helpers over the `(names, edges)` view of a graph.
//!
//! All functions are O(V + E), read-only, and deterministic: vertices are
//! walked in input order and each successor list follows edge-input order.

use std::collections::HashMap;

/// Maps every vertex to its direct successors in edge-input order.
/// Isolated vertices are present with an empty list.
pub fn forward_adjacency(
    names: &[String],
    edges: &[(String, String)],
) -> HashMap<String, Vec<String>> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::with_capacity(names.len());
    for name in names {
        adjacency.entry(name.clone()).or_default();
    }
    for (source, target) in edges {
        if !adjacency.contains_key(target) {
            // Best-effort behavior: skip dangling edges instead of failing
            // the whole computation.
            continue;
        }
        if let Some(successors) = adjacency.get_mut(source) {
            successors.push(target.clone());
        }
    }
    adjacency
}

/// Maps every vertex to its direct predecessors in edge-input order.
pub fn reverse_adjacency(
    names: &[String],
    edges: &[(String, String)],
) -> HashMap<String, Vec<String>> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::with_capacity(names.len());
    for name in names {
        adjacency.entry(name.clone()).or_default();
    }
    for (source, target) in edges {
        if !adjacency.contains_key(source) {
            continue;
        }
        if let Some(predecessors) = adjacency.get_mut(target) {
            predecessors.push(source.clone());
        }
    }
    adjacency
}

/// Depth-first back-edge detection over an explicit frame stack, so deep
/// chains cannot overflow the call stack. A successor already on the active
/// path is a back-edge (cycle, including self-loops); a successor that is
/// visited but off the path is a forward/cross edge and is not re-expanded.
pub fn has_cycle(names: &[String], edges: &[(String, String)]) -> bool {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(names.len());
    for (position, name) in names.iter().enumerate() {
        index.entry(name.as_str()).or_insert(position);
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
    for (source, target) in edges {
        let (Some(&from), Some(&to)) = (index.get(source.as_str()), index.get(target.as_str()))
        else {
            continue;
        };
        successors[from].push(to);
    }

    let mut visited = vec![false; names.len()];
    let mut on_stack = vec![false; names.len()];
    // Frames are (vertex, next-successor-index).
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..names.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        on_stack[start] = true;
        stack.push((start, 0));

        while let Some((vertex, cursor)) = stack.last_mut() {
            let vertex = *vertex;
            if let Some(&next) = successors[vertex].get(*cursor) {
                *cursor += 1;
                if on_stack[next] {
                    return true;
                }
                if !visited[next] {
                    visited[next] = true;
                    on_stack[next] = true;
                    stack.push((next, 0));
                }
            } else {
                on_stack[vertex] = false;
                stack.pop();
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|name| name.to_string()).collect()
    }

    fn edges(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect()
    }

    #[test]
    fn simple_chain_has_no_cycle() {
        assert!(!has_cycle(
            &names(&["a", "b", "c"]),
            &edges(&[("a", "b"), ("b", "c")]),
        ));
    }

    #[test]
    fn two_node_cycle_is_detected() {
        assert!(has_cycle(
            &names(&["a", "b", "c"]),
            &edges(&[("a", "b"), ("b", "a")]),
        ));
    }

    #[test]
    fn self_loop_is_detected() {
        assert!(has_cycle(&names(&["a", "b", "c"]), &edges(&[("a", "a")])));
    }

    #[test]
    fn three_node_cycle_is_detected() {
        assert!(has_cycle(
            &names(&["a", "b", "c"]),
            &edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
        ));
    }

    #[test]
    fn edgeless_graphs_have_no_cycle() {
        assert!(!has_cycle(&names(&["a"]), &[]));
        assert!(!has_cycle(&names(&["a", "b", "c", "d", "e", "f"]), &[]));
    }

    #[test]
    fn diamond_is_acyclic() {
        // b and d both reach c: the second visit sees c off the active path.
        assert!(!has_cycle(
            &names(&["a", "b", "c", "d"]),
            &edges(&[("a", "b"), ("b", "c"), ("a", "d"), ("d", "c")]),
        ));
    }

    #[test]
    fn dag_with_one_back_edge_cycles() {
        assert!(has_cycle(
            &names(&["a", "b", "c", "d"]),
            &edges(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")]),
        ));
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut chain_names = Vec::with_capacity(50_000);
        for idx in 0..50_000usize {
            chain_names.push(format!("n{idx}"));
        }
        let mut chain_edges = Vec::with_capacity(chain_names.len() - 1);
        for pair in chain_names.windows(2) {
            chain_edges.push((pair[0].clone(), pair[1].clone()));
        }
        assert!(!has_cycle(&chain_names, &chain_edges));

        chain_edges.push((
            chain_names[chain_names.len() - 1].clone(),
            chain_names[0].clone(),
        ));
        assert!(has_cycle(&chain_names, &chain_edges));
    }

    #[test]
    fn forward_adjacency_covers_every_vertex() {
        let adjacency = forward_adjacency(
            &names(&["a", "b", "c", "d"]),
            &edges(&[("a", "c"), ("b", "c"), ("c", "d")]),
        );
        assert_eq!(adjacency["a"], vec!["c"]);
        assert_eq!(adjacency["b"], vec!["c"]);
        assert_eq!(adjacency["c"], vec!["d"]);
        assert!(adjacency["d"].is_empty());
    }

    #[test]
    fn forward_adjacency_of_edgeless_graph_is_all_empty() {
        let adjacency = forward_adjacency(&names(&["a", "b", "c"]), &[]);
        assert_eq!(adjacency.len(), 3);
        assert!(adjacency.values().all(Vec::is_empty));
    }

    #[test]
    fn forward_adjacency_keeps_edge_input_order() {
        let adjacency = forward_adjacency(
            &names(&["a", "b", "c", "d"]),
            &edges(&[("a", "b"), ("a", "c"), ("a", "d")]),
        );
        assert_eq!(adjacency["a"], vec!["b", "c", "d"]);
    }

    #[test]
    fn reverse_adjacency_lists_predecessors() {
        let adjacency = reverse_adjacency(
            &names(&["a", "b", "c", "d"]),
            &edges(&[("a", "c"), ("b", "c"), ("c", "d")]),
        );
        assert!(adjacency["a"].is_empty());
        assert!(adjacency["b"].is_empty());
        assert_eq!(adjacency["c"], vec!["a", "b"]);
        assert_eq!(adjacency["d"], vec!["c"]);
    }

    #[test]
    fn reverse_adjacency_star_collects_in_edge_order() {
        let adjacency = reverse_adjacency(
            &names(&["a", "b", "c", "d"]),
            &edges(&[("b", "a"), ("c", "a"), ("d", "a")]),
        );
        assert_eq!(adjacency["a"], vec!["b", "c", "d"]);
    }

    #[test]
    fn single_vertex_adjacency() {
        let forward = forward_adjacency(&names(&["a"]), &[]);
        assert_eq!(forward.len(), 1);
        assert!(forward["a"].is_empty());
    }

    #[test]
    fn forward_and_reverse_of_single_edge() {
        let vertex_names = names(&["a", "b"]);
        let edge_list = edges(&[("a", "b")]);

        let forward = forward_adjacency(&vertex_names, &edge_list);
        assert_eq!(forward["a"], vec!["b"]);
        assert!(forward["b"].is_empty());

        let reverse = reverse_adjacency(&vertex_names, &edge_list);
        assert!(reverse["a"].is_empty());
        assert_eq!(reverse["b"], vec!["a"]);
    }

    #[test]
    fn forward_adjacency_flattens_back_to_the_edge_set() {
        let vertex_names = names(&["a", "b", "c", "d"]);
        let edge_list = edges(&[("a", "b"), ("b", "c"), ("a", "d"), ("d", "c")]);

        let adjacency = forward_adjacency(&vertex_names, &edge_list);
        let mut flattened: Vec<(String, String)> = adjacency
            .iter()
            .flat_map(|(source, targets)| {
                targets
                    .iter()
                    .map(|target| (source.clone(), target.clone()))
            })
            .collect();
        flattened.sort();

        let mut expected = edge_list.clone();
        expected.sort();
        assert_eq!(flattened, expected);

        for name in &vertex_names {
            assert!(adjacency.contains_key(name));
        }
    }
}
