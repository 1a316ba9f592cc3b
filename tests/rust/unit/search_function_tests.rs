//! Search pseudo-functions across dialects and server versions

#[cfg(test)]
mod search_function_tests {
    use sqlnest::query_plan::QueryPlan;
    use sqlnest::sql_generator::{
        compile_plan, BasicExpressionRenderer, Dialect, DialectConfig, Param,
        LEGACY_QUERY_PARSER, WEBSEARCH_MIN_VERSION, WEBSEARCH_QUERY_PARSER,
    };
    use test_case::test_case;

    const SEARCHABLE_POSTS: &str = r#"
selects:
  - id: 0
    table: posts
    field_name: posts
    ti:
      full_text:
        - { table: posts, name: title }
        - { table: posts, name: body }
    args:
      - { name: search, type: variable, val: query }
    fields:
      - field_name: rank
        type: function
        func: { name: search_rank }
      - field_name: snippet
        type: function
        col: { table: posts, name: body }
        func: { name: search_headline }
"#;

    fn base_columns(config: &DialectConfig) -> (String, Vec<Param>) {
        let plan = QueryPlan::from_yaml_str(SEARCHABLE_POSTS).unwrap();
        let mut compiled = compile_plan(&plan, config, &BasicExpressionRenderer).unwrap();
        let node = compiled.nodes.remove(0);
        (node.base_columns, compiled.params)
    }

    #[test_case(WEBSEARCH_MIN_VERSION, WEBSEARCH_QUERY_PARSER ; "exactly at the threshold")]
    #[test_case(WEBSEARCH_MIN_VERSION - 1, LEGACY_QUERY_PARSER ; "just below the threshold")]
    #[test_case(160000, WEBSEARCH_QUERY_PARSER ; "newer server")]
    fn test_postgres_version_gate(version: u32, parser: &str) {
        let (sql, params) = base_columns(&DialectConfig::new(Dialect::Postgres, version));
        assert_eq!(
            sql,
            format!(
                concat!(
                    r#"ts_rank("posts"."title" || "posts"."body", {p}($1)) AS "rank", "#,
                    r#"ts_headline("posts"."body", {p}($1)) AS "snippet""#
                ),
                p = parser
            )
        );
        assert_eq!(params, vec![Param::new("query", "text")]);
    }

    #[test]
    fn test_mysql_renders_inert_fallbacks() {
        let (sql, params) = base_columns(&DialectConfig::new(Dialect::Mysql, 80034));
        assert_eq!(sql, r#"0 AS "rank", '' AS "snippet""#);
        assert!(params.is_empty());
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!(" PostgreSQL ".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::Mysql);
        assert!("sqlite".parse::<Dialect>().is_err());
    }
}
