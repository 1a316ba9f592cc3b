//! Shared fixtures for renderer tests

use crate::query_plan::{Column, Exp, Field, QueryPlan, Select, TableInfo};

use super::context::RenderContext;
use super::dialect::DialectConfig;
use super::errors::SqlGeneratorError;
use super::expression::ExpressionRenderer;

/// Writes `<pred>` (or `NOT <pred>`) for any expression
pub struct StubExpressionRenderer;

impl ExpressionRenderer for StubExpressionRenderer {
    fn render_expression(
        &self,
        ctx: &mut RenderContext<'_>,
        _table: &TableInfo,
        _exp: &Exp,
        negate: bool,
    ) -> Result<(), SqlGeneratorError> {
        if negate {
            ctx.write_str("NOT ");
        }
        ctx.write_str("<pred>");
        Ok(())
    }

    fn cache_id(&self) -> &str {
        "stub"
    }
}

pub fn col_field(table: &str, name: &str) -> Field {
    Field::column(name, Column::new(table, name))
}

pub fn child(id: i32, parent: i32, table: &str) -> Select {
    let mut sel = Select::new(id, table, table);
    sel.parent_id = Some(parent);
    sel
}

/// viewer(0) -> users(1) -> posts(2), the shape used by most tests
pub fn users_with_posts() -> QueryPlan {
    let mut viewer = Select::new(0, "viewer", "viewer");
    viewer.children.push(1);

    let mut users = child(1, 0, "users");
    users.fields = vec![col_field("users", "id"), col_field("users", "name")];
    users.children.push(2);

    let mut posts = child(2, 1, "posts");
    posts.fields = vec![col_field("posts", "id")];

    QueryPlan::new(vec![viewer, users, posts])
}

/// Run one renderer against select `id` and return what it wrote.
pub fn render_with<F>(plan: &QueryPlan, config: &DialectConfig, id: i32, op: F) -> String
where
    F: FnOnce(&mut RenderContext<'_>, &Select) -> Result<(), SqlGeneratorError>,
{
    try_render_with(plan, config, id, op).unwrap()
}

pub fn try_render_with<F>(
    plan: &QueryPlan,
    config: &DialectConfig,
    id: i32,
    op: F,
) -> Result<String, SqlGeneratorError>
where
    F: FnOnce(&mut RenderContext<'_>, &Select) -> Result<(), SqlGeneratorError>,
{
    let renderer = StubExpressionRenderer;
    let mut ctx = RenderContext::new(plan, config, &renderer);
    let sel = plan.select(id)?;
    op(&mut ctx, sel)?;
    Ok(ctx.take_sql())
}
