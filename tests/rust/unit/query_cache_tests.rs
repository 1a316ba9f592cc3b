//! Compiled plan cache over the local filesystem store

#[cfg(test)]
mod query_cache_tests {
    use sqlnest::query_cache::{QueryCache, QueryCacheKey};
    use sqlnest::query_plan::{Exp, QueryPlan, TableInfo};
    use sqlnest::sql_generator::{
        BasicExpressionRenderer, Dialect, DialectConfig, ExpressionRenderer, RenderContext,
        SqlGeneratorError,
    };
    use sqlnest::storage::{ArtifactStore, OsFs, StorageError};

    const PLAN: &str = r#"
selects:
  - id: 0
    table: users
    field_name: users
    fields:
      - field_name: id
        col: { table: users, name: id }
"#;

    const MASKED_PLAN: &str = r#"
selects:
  - id: 0
    table: users
    field_name: users
    fields:
      - field_name: email
        col: { table: users, name: email }
        field_filter: { exp: { raw: is_owner } }
"#;

    /// Renders every predicate as `OTHER`
    struct OtherRenderer;

    impl ExpressionRenderer for OtherRenderer {
        fn render_expression(
            &self,
            ctx: &mut RenderContext<'_>,
            _table: &TableInfo,
            _exp: &Exp,
            _negate: bool,
        ) -> Result<(), SqlGeneratorError> {
            ctx.write_str("OTHER");
            Ok(())
        }

        fn cache_id(&self) -> &str {
            "other"
        }
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = OsFs::new(dir.path());

        assert!(!store.exists("a/b/c.json").unwrap());
        store.put("a/b/c.json", b"{}").unwrap();
        assert!(store.exists("a/b/c.json").unwrap());
        assert_eq!(store.get("a/b/c.json").unwrap(), b"{}");

        // last writer wins
        store.put("a/b/c.json", b"[]").unwrap();
        assert_eq!(store.get("a/b/c.json").unwrap(), b"[]");
    }

    #[test]
    fn test_store_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = OsFs::new(dir.path());
        assert!(matches!(store.get("missing"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_cache_shared_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let plan = QueryPlan::from_yaml_str(PLAN).unwrap();
        let config = DialectConfig::new(Dialect::Postgres, 150000);

        let first = QueryCache::new(OsFs::new(dir.path()), true);
        let compiled = first
            .get_or_compile(&plan, &config, &BasicExpressionRenderer)
            .unwrap();
        assert_eq!(first.stats().misses, 1);

        let second = QueryCache::new(OsFs::new(dir.path()), true);
        let cached = second
            .get_or_compile(&plan, &config, &BasicExpressionRenderer)
            .unwrap();
        assert_eq!(cached, compiled);
        assert_eq!(second.stats().hits, 1);

        let key = QueryCacheKey::new(&plan, &config, &BasicExpressionRenderer).unwrap();
        assert!(OsFs::new(dir.path()).exists(&key.artifact_path()).unwrap());
    }

    #[test]
    fn test_other_dialect_misses() {
        let dir = tempfile::tempdir().unwrap();
        let plan = QueryPlan::from_yaml_str(PLAN).unwrap();
        let cache = QueryCache::new(OsFs::new(dir.path()), true);

        cache
            .get_or_compile(&plan, &DialectConfig::default(), &BasicExpressionRenderer)
            .unwrap();
        let mysql = cache
            .get_or_compile(
                &plan,
                &DialectConfig::new(Dialect::Mysql, 80034),
                &BasicExpressionRenderer,
            )
            .unwrap();
        assert_eq!(mysql.dialect, Dialect::Mysql);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_expression_renderer_is_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let plan = QueryPlan::from_yaml_str(MASKED_PLAN).unwrap();
        let config = DialectConfig::default();
        let cache = QueryCache::new(OsFs::new(dir.path()), true);

        let basic = cache
            .get_or_compile(&plan, &config, &BasicExpressionRenderer)
            .unwrap();
        let other = cache.get_or_compile(&plan, &config, &OtherRenderer).unwrap();

        assert_eq!(
            basic.nodes[0].columns,
            r#"(CASE WHEN (is_owner) THEN "users_0"."email" ELSE NULL END) AS "email""#
        );
        assert_eq!(
            other.nodes[0].columns,
            r#"(CASE WHEN OTHER THEN "users_0"."email" ELSE NULL END) AS "email""#
        );
        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.stats().hits, 0);
    }
}
