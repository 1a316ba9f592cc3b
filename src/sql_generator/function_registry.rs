//! Reserved search function registry
//!
//! `search_rank` and `search_headline` are pseudo-functions: they never reach
//! the database under those names. Each maps to a full-text SQL function on
//! dialects that have one and to an inert constant on dialects that don't.

use std::collections::HashMap;

use super::dialect::DialectConfig;

/// Query parser used from `WEBSEARCH_MIN_VERSION` on
pub const WEBSEARCH_QUERY_PARSER: &str = "websearch_to_tsquery";
/// Query parser for older servers
pub const LEGACY_QUERY_PARSER: &str = "to_tsquery";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFunctionKind {
    /// Ranks the concatenated full-text columns of the table
    Rank,
    /// Highlights matches in the field's own column
    Headline,
}

#[derive(Debug, Clone)]
pub struct SearchFunction {
    pub name: &'static str,
    pub kind: SearchFunctionKind,
    /// SQL function on full-text capable dialects
    pub sql_name: &'static str,
    /// Constant emitted when the dialect has no full-text support
    pub fallback: &'static str,
}

pub fn get_search_function(name: &str) -> Option<&'static SearchFunction> {
    SEARCH_FUNCTIONS.get(name)
}

/// Parser function for the search argument, gated on the server version.
pub fn query_parser(config: &DialectConfig) -> &'static str {
    let parser = if config.supports_websearch() {
        WEBSEARCH_QUERY_PARSER
    } else {
        LEGACY_QUERY_PARSER
    };
    log::trace!(
        "search query parser for server version {}: {}",
        config.server_version,
        parser
    );
    parser
}

lazy_static::lazy_static! {
    static ref SEARCH_FUNCTIONS: HashMap<&'static str, SearchFunction> = {
        let mut m = HashMap::new();

        m.insert("search_rank", SearchFunction {
            name: "search_rank",
            kind: SearchFunctionKind::Rank,
            sql_name: "ts_rank",
            fallback: "0",
        });

        m.insert("search_headline", SearchFunction {
            name: "search_headline",
            kind: SearchFunctionKind::Headline,
            sql_name: "ts_headline",
            fallback: "''",
        });

        m
    };
}
