//! Function call rendering
//!
//! Reserved search pseudo-functions get dialect and version specific SQL;
//! every other function is emitted as `name(positional..., named => value...)`.

use crate::query_plan::{Arg, ArgType, Field, Func, PlanError, Select};

use super::context::RenderContext;
use super::errors::SqlGeneratorError;
use super::function_registry::{
    get_search_function, query_parser, SearchFunction, SearchFunctionKind,
};
use super::params::Param;

impl RenderContext<'_> {
    /// Render the SQL call for a function-typed field.
    pub fn render_function(&mut self, sel: &Select, f: &Field) -> Result<(), SqlGeneratorError> {
        let func = f.func.as_ref().ok_or_else(|| PlanError::UnboundFunction {
            select_id: sel.id,
            field: f.field_name.clone(),
        })?;

        match get_search_function(&func.name) {
            Some(search) => self.render_search_function(sel, f, search),
            None => self.render_other_function(sel, f, func),
        }
    }

    fn render_search_function(
        &mut self,
        sel: &Select,
        f: &Field,
        search: &SearchFunction,
    ) -> Result<(), SqlGeneratorError> {
        if !self.dialect().dialect.supports_full_text() {
            log::debug!(
                "select {}: {} has no full-text support, {} field '{}' rendered as {}",
                sel.id,
                self.dialect().dialect,
                search.name,
                f.field_name,
                search.fallback
            );
            self.write_str(search.fallback);
            return Ok(());
        }

        let arg = sel.get_arg("search").ok_or_else(|| PlanError::MissingSearchArgument {
            select_id: sel.id,
            field: f.field_name.clone(),
        })?;

        self.write_str(search.sql_name);
        self.write_str("(");
        match search.kind {
            SearchFunctionKind::Rank => {
                if sel.ti.full_text.is_empty() {
                    return Err(PlanError::NoFullTextColumns {
                        select_id: sel.id,
                        table: sel.table.clone(),
                    }
                    .into());
                }
                for (i, col) in sel.ti.full_text.iter().enumerate() {
                    if i != 0 {
                        self.write_str(" || ");
                    }
                    self.col_with_table(&sel.table, &col.name);
                }
            }
            SearchFunctionKind::Headline => {
                let col = f.col.as_ref().ok_or_else(|| PlanError::UnboundColumn {
                    select_id: sel.id,
                    field: f.field_name.clone(),
                })?;
                self.col_with_table(&sel.table, &col.name);
            }
        }
        self.write_str(", ");
        self.write_str(query_parser(self.dialect()));
        self.write_str("(");
        self.render_param(Param::new(arg.val.as_str(), "text"));
        self.write_str("))");
        Ok(())
    }

    fn render_other_function(
        &mut self,
        sel: &Select,
        f: &Field,
        func: &Func,
    ) -> Result<(), SqlGeneratorError> {
        self.write_str(&func.name);
        self.write_str("(");

        let mut n = 0;
        for arg in func.args.iter().filter(|a| a.is_positional()) {
            self.separator(n);
            self.render_func_arg_val(sel, f, arg)?;
            n += 1;
        }
        for arg in func.args.iter().filter(|a| !a.is_positional()) {
            self.separator(n);
            self.write_str(&arg.name);
            self.write_str(" => ");
            self.render_func_arg_val(sel, f, arg)?;
            n += 1;
        }

        self.write_str(")");
        Ok(())
    }

    fn render_func_arg_val(
        &mut self,
        sel: &Select,
        f: &Field,
        arg: &Arg,
    ) -> Result<(), SqlGeneratorError> {
        match arg.arg_type {
            ArgType::Column => {
                let col = arg.col.as_ref().ok_or_else(|| PlanError::UnboundArgColumn {
                    select_id: sel.id,
                    field: f.field_name.clone(),
                })?;
                self.col_with_table(&col.table, &col.name);
            }
            ArgType::Literal | ArgType::Variable => self.squoted(&arg.val),
        }
        Ok(())
    }
}
