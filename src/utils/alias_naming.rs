//! Centralized alias naming for rendered selects.
//!
//! **CRITICAL**: every generated alias MUST come from these functions. A
//! parent references its children only through them, so two call sites that
//! disagree on a name produce SQL that compiles but reads the wrong columns.
//!
//! ## Naming Convention
//! A select with id `k` owns:
//! - `__sr_k` - the row alias, exposing the flat column set
//! - `__sj_k` - the json alias, exposing a `json` column (and `__cursor`)
//! - `<table>_k` - the alias of the inner base query over `<table>`
//!
//! Ids are unique per plan, which makes every alias unique per statement.

pub const ROW_ALIAS_PREFIX: &str = "__sr_";
pub const JSON_ALIAS_PREFIX: &str = "__sj_";

/// Column holding a select's JSON object inside its json alias
pub const JSON_COLUMN: &str = "json";
/// Column holding a select's pagination cursor inside its json alias
pub const CURSOR_COLUMN: &str = "__cursor";
/// Output key of the injected type-name field
pub const TYPENAME_FIELD: &str = "__typename";

/// Row alias of a select.
///
/// # Examples
/// ```
/// use sqlnest::utils::alias_naming::row_alias;
///
/// assert_eq!(row_alias(1), "__sr_1");
/// ```
pub fn row_alias(select_id: i32) -> String {
    format!("{}{}", ROW_ALIAS_PREFIX, select_id)
}

/// Json alias of a select.
///
/// # Examples
/// ```
/// use sqlnest::utils::alias_naming::json_alias;
///
/// assert_eq!(json_alias(2), "__sj_2");
/// ```
pub fn json_alias(select_id: i32) -> String {
    format!("{}{}", JSON_ALIAS_PREFIX, select_id)
}

/// Alias of the base query a select reads its table through.
///
/// # Examples
/// ```
/// use sqlnest::utils::alias_naming::table_alias;
///
/// assert_eq!(table_alias("users", 1), "users_1");
/// ```
pub fn table_alias(table: &str, select_id: i32) -> String {
    format!("{}_{}", table, select_id)
}

/// Key under which a cursor travels next to a field.
pub fn cursor_key(field_name: &str) -> String {
    format!("{}_cursor", field_name)
}
