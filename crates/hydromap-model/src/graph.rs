//! The topology graph document.
//!
//! This is the shape persisted by the graph store and exchanged over the
//! API: a flat list of nodes and a flat list of directed edges. Handle
//! fields keep their camelCase names so the persisted document matches what
//! the frontend canvas expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A 2D canvas position for a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A single node in the topology graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node id
    pub id: String,

    /// Category tag, e.g. "building", "primary-hw", "secondary-hw"
    #[serde(rename = "type")]
    pub node_type: String,

    /// Canvas position; null until the frontend lays the node out
    #[serde(default)]
    pub position: Option<Position>,

    /// Arbitrary display properties
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge id
    pub id: String,

    /// Id of the parent node
    pub source: String,

    /// Id of the child node
    pub target: String,

    /// Attachment point on the source node
    #[serde(rename = "sourceHandle", default)]
    pub source_handle: Option<String>,

    /// Attachment point on the target node
    #[serde(rename = "targetHandle", default)]
    pub target_handle: Option<String>,
}

/// The complete graph document: ordered nodes plus ordered edges.
///
/// Invariant: every edge's `source`/`target` references an existing node id.
/// The API enforces this at edge-creation time; the importer satisfies it by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Find a node by id.
    pub fn find_node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == node_id)
    }

    /// Find a node by id, mutably.
    pub fn find_node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == node_id)
    }

    /// Position of a node in the node list.
    pub fn find_node_index(&self, node_id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == node_id)
    }

    /// Position of an edge in the edge list.
    pub fn find_edge_index(&self, edge_id: &str) -> Option<usize> {
        self.edges.iter().position(|edge| edge.id == edge_id)
    }
}
