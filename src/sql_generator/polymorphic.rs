//! Polymorphic relationship dispatch
//!
//! A polymorphic child has one branch per possible target table. The parent
//! row's discriminator column picks the branch at runtime:
//!
//! ```sql
//! (CASE WHEN "comments_1"."subject_type" = 'posts' THEN __sj_3.json
//!       WHEN "comments_1"."subject_type" = 'photos' THEN __sj_4.json END) AS "subject"
//! ```
//!
//! There is no ELSE: an unknown discriminator value yields NULL.

use crate::query_plan::{PlanError, Select, SkipRender};
use crate::utils::alias_naming::{json_alias, JSON_COLUMN};

use super::context::RenderContext;
use super::errors::SqlGeneratorError;

impl RenderContext<'_> {
    /// Dispatch expression for the polymorphic child `csel` of `sel`.
    pub fn render_union_column(&mut self, sel: &Select, csel: &Select) -> Result<(), SqlGeneratorError> {
        if csel.children.is_empty() {
            return Err(PlanError::EmptyPolymorphicRelationship {
                select_id: csel.id,
                field: csel.field_name.clone(),
            }
            .into());
        }

        // read off the parent row: the value is known before any branch table is touched
        let discriminator = match csel.rel.left.col.fkey_col.as_deref() {
            Some(col) if !col.is_empty() => col,
            _ => {
                return Err(PlanError::MissingDiscriminator {
                    select_id: csel.id,
                    field: csel.field_name.clone(),
                }
                .into())
            }
        };

        let plan = self.plan();
        self.write_str("(CASE");
        for &cid in &csel.children {
            let usel = plan.select(cid)?;

            self.write_str(" WHEN ");
            self.col_with_table_id(&sel.table, sel.id, discriminator);
            self.write_str(" = ");
            self.squoted(&usel.table);
            self.write_str(" THEN ");

            if usel.skip_render == SkipRender::None {
                self.write_str(&json_alias(usel.id));
                self.write_str(".");
                self.write_str(JSON_COLUMN);
            } else {
                log::debug!(
                    "select {}: branch '{}' (select {}) of '{}' rendered as NULL ({:?})",
                    sel.id,
                    usel.table,
                    usel.id,
                    csel.field_name,
                    usel.skip_render
                );
                self.write_str("NULL");
            }
        }
        self.write_str(" END)");
        self.alias(&csel.field_name);
        Ok(())
    }
}
