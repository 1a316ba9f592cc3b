//! Rendering of whole plans loaded from YAML

#[cfg(test)]
mod plan_rendering_tests {
    use sqlnest::query_plan::{PlanError, QueryPlan, SkipRender};
    use sqlnest::sql_generator::{
        compile_plan, BasicExpressionRenderer, CompiledPlan, DialectConfig, SqlGeneratorError,
    };

    const USERS_WITH_POSTS: &str = r#"
selects:
  - id: 0
    table: viewer
    field_name: viewer
    children: [1]
  - id: 1
    parent_id: 0
    table: users
    field_name: users
    fields:
      - field_name: id
        col: { table: users, name: id }
      - field_name: name
        col: { table: users, name: name }
    bcols:
      - { table: users, name: id }
      - { table: users, name: name }
    children: [2]
  - id: 2
    parent_id: 1
    table: posts
    field_name: posts
    fields:
      - field_name: id
        col: { table: posts, name: id }
"#;

    fn load(yaml: &str) -> QueryPlan {
        QueryPlan::from_yaml_str(yaml).expect("plan should parse")
    }

    fn compile(plan: &QueryPlan) -> Result<CompiledPlan, SqlGeneratorError> {
        compile_plan(plan, &DialectConfig::default(), &BasicExpressionRenderer)
    }

    #[test]
    fn test_users_with_posts() {
        let compiled = compile(&load(USERS_WITH_POSTS)).unwrap();
        let users = compiled.node(1).unwrap();

        assert_eq!(
            users.columns,
            r#""users_1"."id" AS "id", "users_1"."name" AS "name", __sj_2.json AS "posts""#
        );
        assert_eq!(
            users.json_fields,
            "'id', __sr_1.id, 'name', __sr_1.name, 'posts', __sr_1.posts"
        );
        assert_eq!(users.base_columns, r#""users"."id", "users"."name""#);
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn test_user_needed_child_is_nulled_in_both_layers() {
        let mut plan = load(USERS_WITH_POSTS);
        plan.selects[2].skip_render = SkipRender::UserNeeded;

        let compiled = compile(&plan).unwrap();
        let users = compiled.node(1).unwrap();
        assert!(users.columns.ends_with(r#", NULL AS "posts""#));
        assert!(users.json_fields.ends_with(", 'posts', NULL"));
        assert!(compiled.node(2).is_none());
    }

    #[test]
    fn test_remote_children_leave_no_separators() {
        let yaml = r#"
selects:
  - id: 0
    table: users
    field_name: users
    children: [1, 2, 3]
  - { id: 1, parent_id: 0, table: billing, field_name: billing, skip_render: remote }
  - { id: 2, parent_id: 0, table: posts, field_name: posts }
  - { id: 3, parent_id: 0, table: audit, field_name: audit, skip_render: remote }
"#;
        let compiled = compile(&load(yaml)).unwrap();
        let users = compiled.node(0).unwrap();
        assert_eq!(users.columns, r#"__sj_2.json AS "posts""#);
        assert_eq!(users.json_fields, "'posts', __sr_0.posts");
    }

    #[test]
    fn test_cursor_nulling_is_consistent() {
        let yaml = r#"
selects:
  - id: 0
    table: users
    field_name: users
    paging: { cursor: true }
    children: [1]
  - { id: 1, parent_id: 0, table: posts, field_name: posts, skip_render: blocked }
"#;
        let users = compile(&load(yaml)).unwrap().nodes.remove(0);
        assert_eq!(users.columns, r#"NULL AS "posts", NULL AS "users_cursor""#);
        assert_eq!(users.json_fields, "'posts', NULL, 'users_cursor', NULL");
    }

    #[test]
    fn test_polymorphic_subject() {
        let yaml = r#"
selects:
  - id: 0
    table: comments
    field_name: comments
    fields:
      - field_name: body
        col: { table: comments, name: body }
    children: [1]
  - id: 1
    parent_id: 0
    table: subject
    field_name: subject
    rel:
      type: polymorphic
      left: { col: { table: comments, fkey_col: subject_type } }
    children: [2, 3]
  - { id: 2, parent_id: 1, table: posts, field_name: posts }
  - { id: 3, parent_id: 1, table: photos, field_name: photos }
"#;
        let compiled = compile(&load(yaml)).unwrap();
        let comments = compiled.node(0).unwrap();
        assert_eq!(
            comments.columns,
            concat!(
                r#""comments_0"."body" AS "body", "#,
                r#"(CASE WHEN "comments_0"."subject_type" = 'posts' THEN __sj_2.json"#,
                r#" WHEN "comments_0"."subject_type" = 'photos' THEN __sj_3.json END) AS "subject""#
            )
        );
        assert_eq!(comments.json_fields, "'body', __sr_0.body, 'subject', __sr_0.subject");
    }

    #[test]
    fn test_masked_field_uses_expression_renderer() {
        let yaml = r#"
selects:
  - id: 0
    table: users
    field_name: users
    fields:
      - field_name: email
        col: { table: users, name: email }
        field_filter:
          exp:
            cmp: { op: eq, col: { name: id }, val: { var: user_id } }
"#;
        let compiled = compile(&load(yaml)).unwrap();
        assert_eq!(
            compiled.node(0).unwrap().columns,
            r#"(CASE WHEN ("users"."id" = $1) THEN "users_0"."email" ELSE NULL END) AS "email""#
        );
        assert_eq!(compiled.params[0].name, "user_id");
    }

    #[test]
    fn test_function_arguments_positional_first() {
        let yaml = r#"
selects:
  - id: 0
    table: users
    field_name: users
    fields:
      - field_name: score
        type: function
        func:
          name: public.score
          args:
            - { name: weight, type: literal, val: "2" }
            - { type: column, col: { table: users, name: id } }
            - { name: mode, type: variable, val: fast }
            - { type: literal, val: x }
"#;
        let compiled = compile(&load(yaml)).unwrap();
        let users = compiled.node(0).unwrap();
        assert_eq!(
            users.base_columns,
            r#"public.score("users"."id", 'x', weight => '2', mode => 'fast') AS "score""#
        );
        assert_eq!(users.columns, r#""users_0"."score" AS "score""#);
    }

    #[test]
    fn test_dangling_child_fails_with_context() {
        let mut plan = load(USERS_WITH_POSTS);
        plan.selects[1].children.push(7);
        assert_eq!(
            compile(&plan),
            Err(SqlGeneratorError::PlanInvariant(PlanError::DanglingSelectId {
                select_id: 1,
                child_id: 7
            }))
        );
    }

    #[test]
    fn test_unbound_column_fails_with_context() {
        let mut plan = load(USERS_WITH_POSTS);
        plan.selects[1].fields[1].col = None;
        assert_eq!(
            compile(&plan),
            Err(SqlGeneratorError::PlanInvariant(PlanError::UnboundColumn {
                select_id: 1,
                field: "name".to_string()
            }))
        );
    }

    #[test]
    fn test_load_plan_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let plan = load(USERS_WITH_POSTS);
        std::fs::write(&path, serde_json::to_string(&plan).unwrap()).unwrap();

        assert_eq!(QueryPlan::from_file(&path).unwrap(), plan);
        assert!(QueryPlan::from_file(dir.path().join("plan.toml")).is_err());
    }

    #[test]
    fn test_children_without_parent_ids_compile_once() {
        let yaml = r#"
selects:
  - { id: 0, table: users, field_name: users, children: [1] }
  - { id: 1, table: posts, field_name: posts }
"#;
        let compiled = compile(&load(yaml)).unwrap();
        let ids: Vec<i32> = compiled.nodes.iter().map(|n| n.select_id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn test_shared_grandchild_is_rejected() {
        let yaml = r#"
selects:
  - { id: 0, table: users, field_name: users, children: [1, 2] }
  - { id: 1, table: posts, field_name: posts, children: [3] }
  - { id: 2, table: photos, field_name: photos, children: [3] }
  - { id: 3, table: comments, field_name: comments }
"#;
        assert_eq!(
            compile(&load(yaml)),
            Err(SqlGeneratorError::PlanInvariant(PlanError::MultipleParents {
                select_id: 3,
                first_parent: 1,
                second_parent: 2
            }))
        );
    }
}
