//! # Hydromap Model
//!
//! Data model for the Hydromap building topology service. This crate provides
//! the graph document (nodes + edges) persisted and served by the HTTP API,
//! the importer that derives a graph from a declarative YAML building
//! description, and the tree view assembled from the stored graph.
//!
//! ## Example
//!
//! ```
//! use hydromap_model::import_building_yaml;
//!
//! let yaml = r#"
//! building:
//!   name: HQ
//!   hot_water_loops:
//!     - identifier: hwl-1
//!       name: West Riser
//!       primary: true
//!       downstream_loops: [hwl-2]
//!     - identifier: hwl-2
//!       name: Level 2 Branch
//! "#;
//!
//! let graph = import_building_yaml(yaml).unwrap();
//! assert_eq!(graph.nodes.len(), 3);
//! assert_eq!(graph.edges.len(), 2);
//! ```

mod error;

pub mod building;
pub mod graph;
pub mod importer;
pub mod tree;

pub use building::{
    BuildingDocument, BuildingRecord, CurveRecord, LoopRecord, SensorEntry, SensorRecord,
};
pub use error::ImportError;
pub use graph::{Edge, GraphDocument, Node, Position};
pub use importer::{
    graph_from_document, import_building_yaml, CurveSummary, SensorSummary, BUILDING_NODE_ID,
    PRIMARY_HW, SECONDARY_HW, TERTIARY_HW,
};
pub use tree::{build_tree, TreeNode, TreeView};
