//! YAML building description → topology graph transformation.
//!
//! The importer walks the building's hot-water loops from each primary root
//! down through `downstream_loops`, emitting one node per reachable loop and
//! one edge per parent/child pair. Loops that no primary root reaches are
//! dropped, unresolvable references are skipped, and at most one heating
//! curve is attached per loop — all deliberate simplifications of the input
//! format, not validation gaps to close.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::building::{BuildingDocument, BuildingRecord, CurveRecord, LoopRecord, SensorEntry};
use crate::error::ImportError;
use crate::graph::{Edge, GraphDocument, Node};

/// Node id assigned to the building root.
pub const BUILDING_NODE_ID: &str = "building-1";

/// Type tag for loops attached directly to the building.
pub const PRIMARY_HW: &str = "primary-hw";

/// Type tag for loops fed by a primary loop.
pub const SECONDARY_HW: &str = "secondary-hw";

/// Type tag for everything deeper. Depth beyond tertiary keeps this tag.
pub const TERTIARY_HW: &str = "tertiary-hw";

const CHECK: &str = "\u{2713}";
const CROSS: &str = "\u{2717}";
const BLANK: &str = "-";

/// Heating-curve summary embedded in a loop node's properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSummary {
    pub id: String,
    pub label: String,
    pub sensors_count: usize,
    pub equipment: String,
    pub sensors: Vec<SensorSummary>,
}

/// One normalized sensor row inside a curve summary.
///
/// `occupation`, `setpoint`, and `temperature` are display markers: a check
/// or cross for structured records, "-" where the source gave no registers
/// to inspect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSummary {
    pub location: String,
    pub occupation: String,
    pub setpoint: String,
    pub temperature: String,
}

/// Parse a YAML string and transform it into a graph document.
///
/// YAML syntax errors surface as [`ImportError::Yaml`]; a document without a
/// top-level `building` key fails with [`ImportError::MissingBuilding`].
/// Nothing else is validated.
pub fn import_building_yaml(yaml_str: &str) -> Result<GraphDocument, ImportError> {
    let document: BuildingDocument = serde_yaml::from_str(yaml_str)?;
    graph_from_document(document)
}

/// Transform an already-parsed building document into a graph document.
///
/// The first node is always the building root; loop nodes and their edges
/// follow in depth-first pre-order, one subtree per primary loop in source
/// order.
pub fn graph_from_document(document: BuildingDocument) -> Result<GraphDocument, ImportError> {
    let building = document.building.ok_or(ImportError::MissingBuilding)?;

    let mut graph = GraphDocument::default();
    graph.nodes.push(building_node(&building)?);

    let loops_by_id = loop_lookup(&building.hot_water_loops);
    let curves_by_id = curve_lookup(&building.heating_curves);

    let mut visited = HashSet::new();
    for entry in &building.hot_water_loops {
        let Some(record) = parse_record::<LoopRecord>(entry) else {
            continue;
        };
        if record.identifier.is_empty() || !record.primary {
            continue;
        }
        expand_loop_tree(
            &record.identifier,
            &loops_by_id,
            &curves_by_id,
            &mut visited,
            &mut graph,
        )?;
    }

    Ok(graph)
}

/// Build the building root node: all top-level building fields become
/// properties, with `label` prepended (an explicit `label` field wins) and
/// `name` guaranteed present.
fn building_node(building: &BuildingRecord) -> Result<Node, ImportError> {
    let name = display_name(&building.name, "Building");

    let mut properties = Map::new();
    properties.insert("label".to_string(), Value::String(name.clone()));
    merge_record_fields(&mut properties, building)?;
    if properties.get("name").map_or(true, Value::is_null) {
        properties.insert("name".to_string(), Value::String(name));
    }

    Ok(Node {
        id: BUILDING_NODE_ID.to_string(),
        node_type: "building".to_string(),
        position: None,
        properties,
    })
}

/// Walk one primary loop's subtree with an explicit worklist.
///
/// Depth-first pre-order: children are pushed in reverse so they pop in
/// listed order. The visited set keeps cyclic or diamond-shaped
/// `downstream_loops` from emitting a node id twice.
fn expand_loop_tree(
    root_id: &str,
    loops_by_id: &HashMap<String, LoopRecord>,
    curves_by_id: &HashMap<String, CurveRecord>,
    visited: &mut HashSet<String>,
    graph: &mut GraphDocument,
) -> Result<(), ImportError> {
    let mut stack = vec![(
        root_id.to_string(),
        BUILDING_NODE_ID.to_string(),
        PRIMARY_HW,
    )];

    while let Some((loop_id, parent_id, loop_type)) = stack.pop() {
        let Some(record) = loops_by_id.get(&loop_id) else {
            continue;
        };
        if !visited.insert(loop_id.clone()) {
            continue;
        }

        let heating_curve = resolve_heating_curve(record, curves_by_id);
        graph
            .nodes
            .push(loop_node(&loop_id, loop_type, record, heating_curve)?);
        graph.edges.push(parent_edge(&parent_id, &loop_id));

        let child_type = next_loop_type(loop_type);
        for downstream_id in record.downstream_loops.iter().rev() {
            if loops_by_id.contains_key(downstream_id) {
                stack.push((downstream_id.clone(), loop_id.clone(), child_type));
            }
        }
    }

    Ok(())
}

/// Build one loop node. The resolved heating curve (or null) is always the
/// last property written, so it wins over any literal `heating_curve` field.
fn loop_node(
    loop_id: &str,
    loop_type: &str,
    record: &LoopRecord,
    heating_curve: Option<CurveSummary>,
) -> Result<Node, ImportError> {
    let label = display_name(&record.name, &format!("{loop_type} Loop"));

    let mut properties = Map::new();
    properties.insert("label".to_string(), Value::String(label));
    merge_record_fields(&mut properties, record)?;
    properties.insert(
        "heating_curve".to_string(),
        match heating_curve {
            Some(summary) => serde_json::to_value(summary)?,
            None => Value::Null,
        },
    );

    Ok(Node {
        id: loop_id.to_string(),
        node_type: loop_type.to_string(),
        position: None,
        properties,
    })
}

fn parent_edge(parent_id: &str, child_id: &str) -> Edge {
    Edge {
        id: format!("e-{parent_id}-{child_id}"),
        source: parent_id.to_string(),
        target: child_id.to_string(),
        source_handle: Some("bottom".to_string()),
        target_handle: Some("top".to_string()),
    }
}

/// Type tag for the children of a loop with the given tag.
fn next_loop_type(current: &str) -> &'static str {
    match current {
        PRIMARY_HW => SECONDARY_HW,
        SECONDARY_HW => TERTIARY_HW,
        _ => TERTIARY_HW,
    }
}

/// Summarize the first heating curve in the loop's candidate list that
/// resolves; unresolvable ids are skipped, and no candidate means no curve.
fn resolve_heating_curve(
    record: &LoopRecord,
    curves_by_id: &HashMap<String, CurveRecord>,
) -> Option<CurveSummary> {
    for curve_id in &record.heating_curves {
        let Some(curve) = curves_by_id.get(curve_id) else {
            continue;
        };

        let equipment = if curve.equipment.is_empty() {
            "N/A".to_string()
        } else {
            curve.equipment.join(", ")
        };

        return Some(CurveSummary {
            id: curve_id.clone(),
            label: display_name(&curve.name, "Heating Curve"),
            sensors_count: curve.sensors.len(),
            equipment,
            sensors: curve.sensors.iter().map(normalize_sensor).collect(),
        });
    }

    None
}

/// Normalize one polymorphic sensor entry into a display row.
pub fn normalize_sensor(entry: &SensorEntry) -> SensorSummary {
    match entry {
        SensorEntry::Location(location) => SensorSummary {
            location: location.clone(),
            occupation: BLANK.to_string(),
            setpoint: BLANK.to_string(),
            temperature: BLANK.to_string(),
        },
        SensorEntry::Record(record) => {
            let location = record
                .location
                .clone()
                .filter(|location| !location.is_empty())
                .or_else(|| value_display(record.temperature_register.as_ref()))
                .unwrap_or_else(|| "Unknown".to_string());

            SensorSummary {
                location,
                occupation: mark(
                    is_truthy(record.occupation_register.as_ref())
                        || is_truthy(record.occupancy_schedule_override.as_ref()),
                ),
                setpoint: mark(is_truthy(record.setpoint_register.as_ref())),
                temperature: mark(is_truthy(record.temperature_register.as_ref())),
            }
        }
        SensorEntry::Other(_) => SensorSummary {
            location: "Unknown".to_string(),
            occupation: BLANK.to_string(),
            setpoint: BLANK.to_string(),
            temperature: BLANK.to_string(),
        },
    }
}

/// Loop lookup keyed by identifier. Malformed entries and entries without an
/// identifier are skipped; duplicate identifiers keep the last record.
fn loop_lookup(entries: &[Value]) -> HashMap<String, LoopRecord> {
    record_lookup(entries, |record: &LoopRecord| record.identifier.clone())
}

/// Curve lookup keyed by identifier, same skip rules as the loop lookup.
fn curve_lookup(entries: &[Value]) -> HashMap<String, CurveRecord> {
    record_lookup(entries, |record: &CurveRecord| record.identifier.clone())
}

fn record_lookup<T, F>(entries: &[Value], identifier: F) -> HashMap<String, T>
where
    T: serde::de::DeserializeOwned,
    F: Fn(&T) -> String,
{
    let mut lookup = HashMap::new();
    for entry in entries {
        let Some(record) = parse_record::<T>(entry) else {
            continue;
        };
        let id = identifier(&record);
        if id.is_empty() {
            continue;
        }
        lookup.insert(id, record);
    }
    lookup
}

fn parse_record<T: serde::de::DeserializeOwned>(entry: &Value) -> Option<T> {
    serde_json::from_value(entry.clone()).ok()
}

/// Serialize a record and merge its fields into a properties map.
fn merge_record_fields<T: Serialize>(
    properties: &mut Map<String, Value>,
    record: &T,
) -> Result<(), ImportError> {
    if let Value::Object(fields) = serde_json::to_value(record)? {
        for (key, value) in fields {
            properties.insert(key, value);
        }
    }
    Ok(())
}

/// A display name, defaulted when the source name is missing or empty.
fn display_name(name: &Option<String>, fallback: &str) -> String {
    name.clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn mark(present: bool) -> String {
    if present { CHECK } else { CROSS }.to_string()
}

/// Truthiness over YAML scalars: null, false, empty strings, zero, and
/// empty collections are falsy.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

/// Display form of a register value used as a location fallback.
fn value_display(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}
