use thiserror::Error;

/// All possible errors that can occur while importing a building description
#[derive(Error, Debug)]
pub enum ImportError {
    /// Errors that occur during YAML parsing
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document has no top-level `building` key
    #[error("YAML must contain 'building' key")]
    MissingBuilding,

    /// Errors that occur while re-serializing records into node properties
    #[error("JSON processing error: {0}")]
    Json(#[from] serde_json::Error),
}
