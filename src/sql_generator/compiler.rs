//! Plan driver: renders every contributing select, children first

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::query_plan::{QueryPlan, RelType};
use crate::utils::alias_naming::{json_alias, row_alias, table_alias};

use super::context::RenderContext;
use super::dialect::{Dialect, DialectConfig};
use super::errors::SqlGeneratorError;
use super::expression::ExpressionRenderer;
use super::params::Param;

/// SQL fragments of one select
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledNode {
    pub select_id: i32,
    pub table: String,
    pub field_name: String,
    pub table_alias: String,
    pub row_alias: String,
    pub json_alias: String,
    /// Column list of the inner query over the table
    pub base_columns: String,
    /// Flat row exposed under the row alias
    pub columns: String,
    /// Arguments of the JSON object built from the row
    pub json_fields: String,
}

/// Rendered fragments of a whole plan, in dependency order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledPlan {
    pub dialect: Dialect,
    pub server_version: u32,
    pub nodes: Vec<CompiledNode>,
    /// Parameters in placeholder order
    pub params: Vec<Param>,
}

impl CompiledPlan {
    pub fn node(&self, select_id: i32) -> Option<&CompiledNode> {
        self.nodes.iter().find(|node| node.select_id == select_id)
    }

    /// Human readable report, one block per select.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "-- dialect: {} (server version {})",
            self.dialect, self.server_version
        );
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "\n-- select {} '{}' on {} (base {}, row {}, json {})",
                node.select_id,
                node.field_name,
                node.table,
                node.table_alias,
                node.row_alias,
                node.json_alias
            );
            let _ = writeln!(out, "base:    {}", node.base_columns);
            let _ = writeln!(out, "columns: {}", node.columns);
            let _ = writeln!(out, "json:    {}", node.json_fields);
        }
        if !self.params.is_empty() {
            let _ = writeln!(out, "\n-- params");
            for (i, param) in self.params.iter().enumerate() {
                let _ = writeln!(out, "{}: {} ({})", i + 1, param.name, param.param_type);
            }
        }
        out
    }
}

/// Validate `plan` and render the fragments of every select it compiles to.
///
/// Polymorphic holders are skipped: their parent dispatches to the branches
/// inline. Fails on the first invariant violation without partial output.
pub fn compile_plan(
    plan: &QueryPlan,
    config: &DialectConfig,
    exp_renderer: &dyn ExpressionRenderer,
) -> Result<CompiledPlan, SqlGeneratorError> {
    plan.validate()?;
    let order = plan.render_order()?;

    let mut ctx = RenderContext::new(plan, config, exp_renderer);
    let mut nodes = Vec::with_capacity(order.len());

    for id in order {
        let sel = plan.select(id)?;
        if sel.rel.rel_type == RelType::Polymorphic {
            log::debug!(
                "compile: select {} ('{}') dispatches inline in its parent",
                sel.id,
                sel.field_name
            );
            continue;
        }

        ctx.render_base_columns(sel)?;
        let base_columns = ctx.take_sql();
        ctx.render_columns(sel)?;
        let columns = ctx.take_sql();
        ctx.render_json_fields(sel)?;
        let json_fields = ctx.take_sql();

        nodes.push(CompiledNode {
            select_id: sel.id,
            table: sel.table.clone(),
            field_name: sel.field_name.clone(),
            table_alias: table_alias(&sel.table, sel.id),
            row_alias: row_alias(sel.id),
            json_alias: json_alias(sel.id),
            base_columns,
            columns,
            json_fields,
        });
    }

    log::debug!(
        "compile: rendered {} selects with {} params for {}",
        nodes.len(),
        ctx.params().len(),
        config.dialect
    );

    Ok(CompiledPlan {
        dialect: config.dialect,
        server_version: config.server_version,
        nodes,
        params: ctx.into_params(),
    })
}
