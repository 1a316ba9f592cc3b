use std::path::PathBuf;

use thiserror::Error;

/// Structural invariant violations in a plan.
///
/// These are bugs in the planning stage, never user errors. Rendering stops
/// at the first one so a malformed plan can not produce silently wrong SQL.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error("Duplicate select id {0} (ids must be unique within a plan)")]
    DuplicateSelectId(i32),

    #[error("Select id {id} stored at position {index} (plan arena must be indexed by id)")]
    MisplacedSelectId { id: i32, index: usize },

    #[error("Select {0} not found in plan")]
    SelectNotFound(i32),

    #[error("Select {select_id} references missing child select {child_id}")]
    DanglingSelectId { select_id: i32, child_id: i32 },

    #[error("Select {0} is reachable from itself through its children")]
    ChildCycle(i32),

    #[error("Select {select_id} is listed as a child of both select {first_parent} and select {second_parent}")]
    MultipleParents {
        select_id: i32,
        first_parent: i32,
        second_parent: i32,
    },

    #[error("Select {select_id} declares parent {parent_id} but is listed as a child of select {listed_by}")]
    ParentMismatch {
        select_id: i32,
        parent_id: i32,
        listed_by: i32,
    },

    #[error("Root select {0} is also listed as a child")]
    RootListedAsChild(i32),

    #[error("Field '{field}' of select {select_id} has no bound column")]
    UnboundColumn { select_id: i32, field: String },

    #[error("Field '{field}' of select {select_id} has no bound function")]
    UnboundFunction { select_id: i32, field: String },

    #[error("Column argument of function field '{field}' in select {select_id} has no bound column")]
    UnboundArgColumn { select_id: i32, field: String },

    #[error("Invalid SQL function name '{name}' for field '{field}' in select {select_id}")]
    InvalidFunctionName {
        select_id: i32,
        field: String,
        name: String,
    },

    #[error("Polymorphic relationship '{field}' of select {select_id} has no branches")]
    EmptyPolymorphicRelationship { select_id: i32, field: String },

    #[error("Polymorphic relationship '{field}' of select {select_id} has no discriminator column")]
    MissingDiscriminator { select_id: i32, field: String },

    #[error("Polymorphic relationship '{field}' of select {select_id} can not carry a cursor")]
    PolymorphicCursor { select_id: i32, field: String },

    #[error("Select {select_id} ({table}) ranks by full-text search but its table has no full-text columns")]
    NoFullTextColumns { select_id: i32, table: String },

    #[error("Search field '{field}' of select {select_id} has no 'search' argument to match against")]
    MissingSearchArgument { select_id: i32, field: String },
}

/// Failures while reading a plan file
#[derive(Debug, Error)]
pub enum PlanLoadError {
    #[error("Failed to read plan file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML plan: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON plan: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported plan file extension '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedExtension(String),
}
