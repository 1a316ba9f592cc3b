//! Flat column lists of a select
//!
//! `render_base_columns` produces what the inner query reads from the table.
//! `render_columns` produces the outward row: fields, the optional type name,
//! and one entry per child pointing at that child's json alias.

use crate::query_plan::{Field, FieldType, PlanError, RelType, Select, SkipRender};
use crate::utils::alias_naming::{
    cursor_key, json_alias, CURSOR_COLUMN, JSON_COLUMN, TYPENAME_FIELD,
};

use super::context::RenderContext;
use super::errors::SqlGeneratorError;

impl RenderContext<'_> {
    /// Outward column list of `sel`, each entry aliased to its output key.
    pub fn render_columns(&mut self, sel: &Select) -> Result<(), SqlGeneratorError> {
        let mut n = 0;
        for f in &sel.fields {
            self.separator(n);
            match f.field_type {
                FieldType::Function => self.render_func_column(sel, f),
                FieldType::Column => self.render_std_column(sel, f)?,
            }
            self.alias(&f.field_name);
            n += 1;
        }

        if sel.typename {
            self.separator(n);
            self.render_typename(sel);
            n += 1;
        }

        self.render_join_columns(sel, n)
    }

    fn render_std_column(&mut self, sel: &Select, f: &Field) -> Result<(), SqlGeneratorError> {
        let col = f.col.as_ref().ok_or_else(|| PlanError::UnboundColumn {
            select_id: sel.id,
            field: f.field_name.clone(),
        })?;
        self.render_masked(sel, f, |ctx| {
            ctx.col_with_table_id(&sel.table, sel.id, &col.name);
            Ok(())
        })
    }

    /// Function results are computed by the base query under the field name.
    fn render_func_column(&mut self, sel: &Select, f: &Field) {
        self.col_with_table_id(&sel.table, sel.id, &f.field_name);
    }

    /// `('<table>') AS "__typename"`
    pub fn render_typename(&mut self, sel: &Select) {
        self.write_str("(");
        self.squoted(&sel.table);
        self.write_str(")");
        self.alias(TYPENAME_FIELD);
    }

    fn render_join_columns(&mut self, sel: &Select, emitted: usize) -> Result<(), SqlGeneratorError> {
        let plan = self.plan();
        let mut n = emitted;

        for &cid in &sel.children {
            let csel = plan.select(cid)?;

            if csel.skip_render == SkipRender::Remote {
                log::debug!(
                    "select {}: child '{}' (select {}) is resolved remotely, omitted",
                    sel.id,
                    csel.field_name,
                    csel.id
                );
                continue;
            }

            self.separator(n);

            if csel.skip_render != SkipRender::None {
                log::debug!(
                    "select {}: child '{}' (select {}) rendered as NULL ({:?})",
                    sel.id,
                    csel.field_name,
                    csel.id,
                    csel.skip_render
                );
                self.write_str("NULL");
                self.alias(&csel.field_name);

                if sel.paging.cursor {
                    self.write_str(", NULL");
                    self.alias(&cursor_key(&sel.field_name));
                }
            } else {
                match csel.rel.rel_type {
                    RelType::Polymorphic => self.render_union_column(sel, csel)?,
                    RelType::Standard => {
                        self.write_str(&json_alias(csel.id));
                        self.write_str(".");
                        self.write_str(JSON_COLUMN);
                        self.alias(&csel.field_name);
                    }
                }

                // the child's cursor travels next to its json in the parent row
                if csel.paging.cursor {
                    self.write_str(", ");
                    self.write_str(&json_alias(csel.id));
                    self.write_str(".");
                    self.write_str(CURSOR_COLUMN);
                    self.alias(&cursor_key(&csel.field_name));
                }
            }
            n += 1;
        }
        Ok(())
    }

    /// Column list of the inner query that reads `sel`'s table.
    pub fn render_base_columns(&mut self, sel: &Select) -> Result<(), SqlGeneratorError> {
        let mut n = 0;
        for col in &sel.bcols {
            self.separator(n);
            self.col_with_table(&col.table, &col.name);
            n += 1;
        }

        for f in sel.fields.iter().filter(|f| f.field_type == FieldType::Function) {
            self.separator(n);
            self.render_masked(sel, f, |ctx| ctx.render_function(sel, f))?;
            self.alias(&f.field_name);
            n += 1;
        }
        Ok(())
    }

    /// Wrap `render` in `CASE WHEN <filter> ... ELSE NULL END` when the field
    /// has a filter.
    fn render_masked<F>(&mut self, sel: &Select, f: &Field, render: F) -> Result<(), SqlGeneratorError>
    where
        F: FnOnce(&mut Self) -> Result<(), SqlGeneratorError>,
    {
        let Some(exp) = f.field_filter.exp.as_ref() else {
            return render(self);
        };

        self.write_str("(CASE WHEN ");
        self.render_exp(&sel.ti, exp, false)?;
        self.write_str(" THEN ");
        render(self)?;
        self.write_str(" ELSE NULL END)");
        Ok(())
    }
}
