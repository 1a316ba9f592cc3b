//! Common quoting utilities for SQL generation

/// Quote an identifier (table, column or alias name) with double quotes.
///
/// Embedded double quotes are doubled, so any name is safe to emit.
///
/// # Examples
/// ```
/// use sqlnest::sql_generator::common::quote_identifier;
/// assert_eq!(quote_identifier("user_id"), "\"user_id\"");
/// assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal with single quotes, doubling embedded quotes.
///
/// # Examples
/// ```
/// use sqlnest::sql_generator::common::quote_literal;
/// assert_eq!(quote_literal("posts"), "'posts'");
/// assert_eq!(quote_literal("o'brien"), "'o''brien'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Format a qualified column reference: "table"."column"
///
/// # Examples
/// ```
/// use sqlnest::sql_generator::common::qualified_column;
/// assert_eq!(qualified_column("users_1", "id"), "\"users_1\".\"id\"");
/// ```
pub fn qualified_column(table: &str, column: &str) -> String {
    format!("{}.{}", quote_identifier(table), quote_identifier(column))
}
