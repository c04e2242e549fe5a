//! The YAML building description.
//!
//! These types mirror the declarative input format: a `building` mapping
//! holding hot-water loops and heating curves, each referenced by string
//! identifier. The format is deliberately permissive — apart from the
//! required `building` key, missing or malformed fields degrade to defaults
//! rather than failing the import, so most fields carry `#[serde(default)]`
//! and unknown keys are kept in flattened maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level import document. `building` is the only required key.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingDocument {
    #[serde(default)]
    pub building: Option<BuildingRecord>,
}

/// The `building` mapping: a display name plus the loop and curve
/// collections.
///
/// Loop and curve entries stay raw here: a malformed entry is skipped at
/// lookup time instead of failing the whole document, and the building
/// node's properties keep the source shape verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Display name; defaults to "Building"
    #[serde(default)]
    pub name: Option<String>,

    /// Raw hot-water loop entries
    #[serde(default)]
    pub hot_water_loops: Vec<Value>,

    /// Raw heating-curve entries
    #[serde(default)]
    pub heating_curves: Vec<Value>,

    /// Every other top-level building field, carried through to the
    /// building node's properties untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A hot-water circulation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopRecord {
    /// Identifier other loops reference in `downstream_loops`
    #[serde(default)]
    pub identifier: String,

    /// Display name; defaults to "<loop type> Loop"
    #[serde(default)]
    pub name: Option<String>,

    /// Primary loops root the hierarchy under the building
    #[serde(default)]
    pub primary: bool,

    /// Identifiers of loops fed by this one
    #[serde(default)]
    pub downstream_loops: Vec<String>,

    /// Identifiers of candidate heating curves; the first that resolves is
    /// attached to the loop node
    #[serde(default)]
    pub heating_curves: Vec<String>,

    /// Air-handling units served by the loop
    #[serde(default)]
    pub ahus: Vec<Value>,

    /// Boilers feeding the loop
    #[serde(default)]
    pub boilers: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A control curve associated with a loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRecord {
    /// Identifier loops reference in `heating_curves`
    #[serde(default)]
    pub identifier: String,

    /// Display name; defaults to "Heating Curve"
    #[serde(default)]
    pub name: Option<String>,

    /// Equipment tags, joined for display
    #[serde(default)]
    pub equipment: Vec<String>,

    /// Sensor entries in their polymorphic source form
    #[serde(default)]
    pub sensors: Vec<SensorEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One sensor entry under a heating curve.
///
/// The source format is polymorphic: a bare location string, a structured
/// record, or (from hand-edited files) something else entirely. Anything
/// that is neither a string nor a mapping normalizes to an "Unknown" row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorEntry {
    /// A bare location string
    Location(String),

    /// A structured sensor record
    Record(SensorRecord),

    /// Anything else
    Other(Value),
}

/// A structured sensor record.
///
/// Register fields hold whatever scalar the source carried; the importer
/// only cares whether they are truthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Display location; falls back to `temperature_register`
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub temperature_register: Option<Value>,

    #[serde(default)]
    pub occupation_register: Option<Value>,

    #[serde(default)]
    pub occupancy_schedule_override: Option<Value>,

    #[serde(default)]
    pub setpoint_register: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
