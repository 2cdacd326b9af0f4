//! Spanning-forest conversion from a filament graph to SWC nodes

use super::filament::FilamentGraph;
use crate::geometry::AffineTransform;
use crate::swc::{SwcNode, ROOT_PARENT};
use std::collections::VecDeque;

/// Ordered SWC nodes produced from one filament
///
/// Ids run `1..=len()` in order; every traversal restart is a new root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<SwcNode>,
}

impl Forest {
    pub fn from_nodes(nodes: Vec<SwcNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[SwcNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<SwcNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of trees (root nodes)
    pub fn tree_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.parent == ROOT_PARENT).count()
    }
}

/// Outcome of converting one filament
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub forest: Forest,
    /// Edges dropped because an endpoint was outside the point range
    pub dropped_edges: Vec<(i64, i64)>,
    /// Point count of the source graph
    pub expected: usize,
}

impl Conversion {
    /// The source graph had no points; nothing to export
    pub fn is_empty_input(&self) -> bool {
        self.expected == 0
    }

    /// Fewer nodes were emitted than the graph had points
    pub fn is_truncated(&self) -> bool {
        self.forest.len() < self.expected
    }
}

fn checked_index(raw: i64, len: usize) -> Option<usize> {
    usize::try_from(raw).ok().filter(|&i| i < len)
}

/// Convert a filament graph into a BFS spanning forest
///
/// Points are visited in ascending index order; each unvisited point starts a
/// new tree. Ids are assigned in visit order starting at 1 and continue across
/// trees. A node's parent is the node it was first discovered from, so cycle
/// edges never produce a second parent. Coordinates pass through `transform`.
pub fn convert(graph: &FilamentGraph, transform: &AffineTransform) -> Conversion {
    let n = graph.len();
    let mut conversion = Conversion {
        expected: n,
        ..Default::default()
    };
    if n == 0 {
        return conversion;
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in graph.edges() {
        match (checked_index(a, n), checked_index(b, n)) {
            (Some(i), Some(j)) => {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
            _ => {
                tracing::warn!("Invalid edge ({}, {}) - max index is {}", a, b, n - 1);
                conversion.dropped_edges.push((a, b));
            }
        }
    }

    let positions = graph.positions();
    let radii = graph.radii();
    let mut visited = vec![false; n];
    let mut nodes = Vec::with_capacity(n);
    let mut queue: VecDeque<(usize, i64)> = VecDeque::new();
    let mut next_id: i64 = 1;

    for start in 0..n {
        if visited[start] {
            continue;
        }
        tracing::debug!(start, "starting traversal from new root");
        visited[start] = true;
        queue.push_back((start, ROOT_PARENT));

        while let Some((index, parent)) = queue.pop_front() {
            let id = next_id;
            next_id += 1;

            nodes.push(SwcNode::new(
                id,
                graph.node_type(index),
                transform.apply_forward(positions[index]),
                radii[index],
                parent,
            ));

            for &neighbor in &adjacency[index] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back((neighbor, id));
                }
            }
        }
    }

    if nodes.len() != n {
        tracing::warn!(
            "Processed {} nodes, but expected {}; output truncated",
            nodes.len(),
            n
        );
    }

    conversion.forest = Forest::from_nodes(nodes);
    conversion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DatasetExtent, Point3};

    fn line_graph() -> FilamentGraph {
        FilamentGraph::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            vec![1.0; 3],
            None,
            vec![(0, 1), (1, 2)],
        )
        .unwrap()
    }

    #[test]
    fn three_point_chain_matches_reference_output() {
        let extent = DatasetExtent::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            [2, 0, 0],
        );
        let transform = AffineTransform::from_extent(&extent);
        assert_eq!(transform.scale, [1.0, 1.0, 1.0]);

        let conversion = convert(&line_graph(), &transform);
        let text = crate::swc::to_swc_string(conversion.forest.nodes());
        assert_eq!(
            text,
            "1 3 0.000000 0.000000 0.000000 1.000000 -1\n\
             2 3 1.000000 0.000000 0.000000 1.000000 1\n\
             3 3 2.000000 0.000000 0.000000 1.000000 2\n"
        );
    }

    #[test]
    fn empty_graph_signals_empty_input() {
        let conversion = convert(&FilamentGraph::default(), &AffineTransform::identity());
        assert!(conversion.is_empty_input());
        assert!(conversion.forest.is_empty());
        assert!(!conversion.is_truncated());
    }

    #[test]
    fn isolated_points_become_roots() {
        let graph = FilamentGraph::new(vec![Point3::default(); 3], vec![0.5; 3], None, vec![])
            .unwrap();
        let conversion = convert(&graph, &AffineTransform::identity());
        let parents: Vec<i64> = conversion.forest.nodes().iter().map(|n| n.parent).collect();
        assert_eq!(parents, vec![-1, -1, -1]);
        assert_eq!(conversion.forest.tree_count(), 3);
    }

    #[test]
    fn cycle_edges_do_not_add_parents() {
        // triangle 0-1-2-0
        let graph = FilamentGraph::new(
            vec![Point3::default(); 3],
            vec![1.0; 3],
            None,
            vec![(0, 1), (1, 2), (2, 0)],
        )
        .unwrap();
        let nodes = convert(&graph, &AffineTransform::identity()).forest.into_nodes();
        // BFS from 0 discovers 1 then 2, both from the root
        assert_eq!(nodes[0].parent, -1);
        assert_eq!(nodes[1].parent, 1);
        assert_eq!(nodes[2].parent, 1);
    }

    #[test]
    fn out_of_range_edges_are_dropped() {
        let graph = FilamentGraph::new(
            vec![Point3::default(); 2],
            vec![1.0; 2],
            None,
            vec![(0, 1), (1, 5), (-1, 0)],
        )
        .unwrap();
        let conversion = convert(&graph, &AffineTransform::identity());
        assert_eq!(conversion.dropped_edges, vec![(1, 5), (-1, 0)]);
        assert_eq!(conversion.forest.len(), 2);
        assert_eq!(conversion.forest.nodes()[1].parent, 1);
    }

    #[test]
    fn ids_follow_bfs_order_not_point_order() {
        // 0 - 3, 0 - 1, 3 - 2 : BFS from 0 visits 3, 1, then 2
        let graph = FilamentGraph::new(
            (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect(),
            vec![1.0; 4],
            Some(vec![1, 2, 3, 4]),
            vec![(0, 3), (0, 1), (3, 2)],
        )
        .unwrap();
        let nodes = convert(&graph, &AffineTransform::identity()).forest.into_nodes();
        let xs: Vec<f64> = nodes.iter().map(|n| n.position.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 1.0, 2.0]);
        let types: Vec<i32> = nodes.iter().map(|n| n.node_type).collect();
        assert_eq!(types, vec![1, 4, 2, 3]);
        let parents: Vec<i64> = nodes.iter().map(|n| n.parent).collect();
        assert_eq!(parents, vec![-1, 1, 1, 2]);
    }

    #[test]
    fn ids_continue_across_components() {
        let graph = FilamentGraph::new(
            vec![Point3::default(); 4],
            vec![1.0; 4],
            None,
            vec![(0, 1), (2, 3)],
        )
        .unwrap();
        let nodes = convert(&graph, &AffineTransform::identity()).forest.into_nodes();
        let pairs: Vec<(i64, i64)> = nodes.iter().map(|n| (n.id, n.parent)).collect();
        assert_eq!(pairs, vec![(1, -1), (2, 1), (3, -1), (4, 3)]);
    }
}
