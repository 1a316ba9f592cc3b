use crate::query_plan::{Exp, QueryPlan, TableInfo};
use crate::utils::alias_naming::table_alias;

use super::common::{qualified_column, quote_identifier, quote_literal};
use super::dialect::DialectConfig;
use super::errors::SqlGeneratorError;
use super::expression::ExpressionRenderer;
use super::params::{Param, ParamCollector};

/// State of one render invocation.
///
/// Bundles the output sink, the pinned dialect, the immutable plan and the
/// predicate renderer. Renderers are methods on this type; each one appends
/// to the sink and never mutates the plan.
pub struct RenderContext<'a> {
    plan: &'a QueryPlan,
    dialect: &'a DialectConfig,
    exp_renderer: &'a dyn ExpressionRenderer,
    params: ParamCollector,
    sql: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        plan: &'a QueryPlan,
        dialect: &'a DialectConfig,
        exp_renderer: &'a dyn ExpressionRenderer,
    ) -> Self {
        RenderContext {
            plan,
            dialect,
            exp_renderer,
            params: ParamCollector::new(),
            sql: String::new(),
        }
    }

    pub fn plan(&self) -> &'a QueryPlan {
        self.plan
    }

    pub fn dialect(&self) -> &'a DialectConfig {
        self.dialect
    }

    /// SQL written so far
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Take the SQL written so far, leaving the sink empty.
    pub fn take_sql(&mut self) -> String {
        std::mem::take(&mut self.sql)
    }

    pub fn params(&self) -> &[Param] {
        self.params.params()
    }

    pub fn into_params(self) -> Vec<Param> {
        self.params.into_params()
    }

    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Emit a placeholder for `param` and register it with the binder.
    pub fn render_param(&mut self, param: Param) {
        let placeholder = self.params.placeholder(self.dialect.dialect, param);
        self.sql.push_str(&placeholder);
    }

    pub fn render_exp(
        &mut self,
        table: &TableInfo,
        exp: &Exp,
        negate: bool,
    ) -> Result<(), SqlGeneratorError> {
        let renderer = self.exp_renderer;
        renderer.render_expression(self, table, exp, negate)
    }

    pub(crate) fn quoted(&mut self, identifier: &str) {
        self.sql.push_str(&quote_identifier(identifier));
    }

    pub(crate) fn squoted(&mut self, literal: &str) {
        self.sql.push_str(&quote_literal(literal));
    }

    /// ` AS "<name>"`
    pub(crate) fn alias(&mut self, name: &str) {
        self.sql.push_str(" AS ");
        self.quoted(name);
    }

    /// Column read through a select's base query alias: `"users_1"."id"`
    pub(crate) fn col_with_table_id(&mut self, table: &str, select_id: i32, col: &str) {
        self.sql
            .push_str(&qualified_column(&table_alias(table, select_id), col));
    }

    /// Column read straight off its table: `"users"."id"`
    pub(crate) fn col_with_table(&mut self, table: &str, col: &str) {
        self.sql.push_str(&qualified_column(table, col));
    }

    /// Separator between list entries; `emitted` counts entries written so far.
    pub(crate) fn separator(&mut self, emitted: usize) {
        if emitted != 0 {
            self.sql.push_str(", ");
        }
    }
}
