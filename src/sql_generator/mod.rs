//! SQL generation for the column and JSON layers of a nested query
//!
//! Each select renders in two phases that reference each other only through
//! the aliases of [`crate::utils::alias_naming`]:
//! 1. the flat row (`render_base_columns`, `render_columns`), in which each
//!    child appears as the json column of its `__sj_<id>` alias
//! 2. the JSON object (`render_json_fields`), read back through `__sr_<id>`

pub mod common;
mod columns;
mod compiler;
mod context;
mod dialect;
mod errors;
mod expression;
mod function_registry;
mod functions;
mod json_builder;
mod params;
mod polymorphic;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use compiler::{compile_plan, CompiledNode, CompiledPlan};
pub use context::RenderContext;
pub use dialect::{Dialect, DialectConfig, UnknownDialect, WEBSEARCH_MIN_VERSION};
pub use errors::SqlGeneratorError;
pub use expression::{BasicExpressionRenderer, ExpressionRenderer};
pub use function_registry::{LEGACY_QUERY_PARSER, WEBSEARCH_QUERY_PARSER};
pub use params::{Param, ParamCollector};
