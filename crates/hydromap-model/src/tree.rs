//! Tree view over the stored graph.
//!
//! Roots are nodes that never appear as an edge target; each root is
//! assembled into a nested structure by following outgoing edges in
//! edge-list order. Cyclic graphs are not guarded against here — the API
//! only ever feeds this importer output or operator-edited documents.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::graph::{GraphDocument, Node};

/// A node in the assembled tree view.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: String,

    pub properties: Map<String, Value>,

    /// Children in edge-list order
    pub children: Vec<TreeNode>,
}

/// The assembled tree plus the root ids it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct TreeView {
    pub tree: Vec<TreeNode>,
    pub roots: Vec<String>,
}

/// Assemble the tree view of a graph document.
pub fn build_tree(graph: &GraphDocument) -> TreeView {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let targets: HashSet<&str> = graph.edges.iter().map(|edge| edge.target.as_str()).collect();
    let nodes_by_id: HashMap<&str, &Node> = graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();

    let roots: Vec<String> = graph
        .nodes
        .iter()
        .filter(|node| !targets.contains(node.id.as_str()))
        .map(|node| node.id.clone())
        .collect();

    let tree = roots
        .iter()
        .filter(|root_id| !root_id.is_empty())
        .filter_map(|root_id| build_tree_node(root_id, &nodes_by_id, &adjacency))
        .collect();

    TreeView { tree, roots }
}

fn build_tree_node(
    node_id: &str,
    nodes_by_id: &HashMap<&str, &Node>,
    adjacency: &HashMap<&str, Vec<&str>>,
) -> Option<TreeNode> {
    let node = nodes_by_id.get(node_id)?;

    let children = adjacency
        .get(node_id)
        .map(|child_ids| {
            child_ids
                .iter()
                .filter_map(|child_id| build_tree_node(child_id, nodes_by_id, adjacency))
                .collect()
        })
        .unwrap_or_default();

    Some(TreeNode {
        id: node.id.clone(),
        node_type: node.node_type.clone(),
        properties: node.properties.clone(),
        children,
    })
}
