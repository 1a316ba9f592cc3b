//! Predicate boundary
//!
//! Field filters carry an [`Exp`] that the column renderers wrap in a
//! `CASE WHEN`. Turning that expression into SQL belongs to the expression
//! renderer, which is pluggable through [`ExpressionRenderer`].

use crate::query_plan::{Column, Exp, ExpValue, TableInfo};

use super::context::RenderContext;
use super::errors::SqlGeneratorError;
use super::params::Param;

/// Renders a boolean SQL expression into the context's sink
pub trait ExpressionRenderer {
    fn render_expression(
        &self,
        ctx: &mut RenderContext<'_>,
        table: &TableInfo,
        exp: &Exp,
        negate: bool,
    ) -> Result<(), SqlGeneratorError>;

    /// Stable name of this renderer. Compiled plans are cached per renderer,
    /// so two renderers writing different SQL must not share an id.
    fn cache_id(&self) -> &str;
}

/// Default renderer covering the [`Exp`] variants of the plan format.
///
/// Variables are bound as `text` parameters; columns without a table are
/// qualified with the table being rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicExpressionRenderer;

impl ExpressionRenderer for BasicExpressionRenderer {
    fn render_expression(
        &self,
        ctx: &mut RenderContext<'_>,
        table: &TableInfo,
        exp: &Exp,
        negate: bool,
    ) -> Result<(), SqlGeneratorError> {
        match exp {
            Exp::Not(inner) => self.render_expression(ctx, table, inner, !negate),
            Exp::Raw(sql) if sql.trim().is_empty() => Err(SqlGeneratorError::Expression(
                "raw expression is empty".to_string(),
            )),
            Exp::Raw(sql) => wrapped(ctx, negate, |ctx| {
                ctx.write_str(sql);
                Ok(())
            }),
            Exp::Cmp { op, col, val } => wrapped(ctx, negate, |ctx| {
                render_column(ctx, table, col);
                ctx.write_str(" ");
                ctx.write_str(op.as_sql());
                ctx.write_str(" ");
                render_value(ctx, val);
                Ok(())
            }),
            Exp::IsNull { col } => wrapped(ctx, negate, |ctx| {
                render_column(ctx, table, col);
                ctx.write_str(" IS NULL");
                Ok(())
            }),
            Exp::And(items) => wrapped(ctx, negate, |ctx| {
                self.render_list(ctx, table, items, " AND ", "true")
            }),
            Exp::Or(items) => wrapped(ctx, negate, |ctx| {
                self.render_list(ctx, table, items, " OR ", "false")
            }),
        }
    }

    fn cache_id(&self) -> &str {
        "basic"
    }
}

impl BasicExpressionRenderer {
    fn render_list(
        &self,
        ctx: &mut RenderContext<'_>,
        table: &TableInfo,
        items: &[Exp],
        joiner: &str,
        empty: &str,
    ) -> Result<(), SqlGeneratorError> {
        if items.is_empty() {
            ctx.write_str(empty);
            return Ok(());
        }
        for (i, item) in items.iter().enumerate() {
            if i != 0 {
                ctx.write_str(joiner);
            }
            self.render_expression(ctx, table, item, false)?;
        }
        Ok(())
    }
}

/// `(<body>)`, or `NOT (<body>)` when negated
fn wrapped<F>(ctx: &mut RenderContext<'_>, negate: bool, body: F) -> Result<(), SqlGeneratorError>
where
    F: FnOnce(&mut RenderContext<'_>) -> Result<(), SqlGeneratorError>,
{
    if negate {
        ctx.write_str("NOT ");
    }
    ctx.write_str("(");
    body(ctx)?;
    ctx.write_str(")");
    Ok(())
}

fn render_column(ctx: &mut RenderContext<'_>, table: &TableInfo, col: &Column) {
    let table_name = if col.table.is_empty() {
        table.name.as_str()
    } else {
        col.table.as_str()
    };
    ctx.col_with_table(table_name, &col.name);
}

fn render_value(ctx: &mut RenderContext<'_>, val: &ExpValue) {
    match val {
        ExpValue::Str(s) => ctx.squoted(s),
        ExpValue::Int(i) => ctx.write_str(&i.to_string()),
        ExpValue::Bool(b) => ctx.write_str(if *b { "true" } else { "false" }),
        ExpValue::Var(name) => ctx.render_param(Param::new(name.as_str(), "text")),
    }
}
