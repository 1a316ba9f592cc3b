//! JSON Builder - key/value arguments for the JSON object of a select
//!
//! The JSON object is built from the flat row, not from the tables: every
//! value is read through the row alias `__sr_<id>`. Children contribute the
//! json column the row already holds for them, so nesting costs nothing here.
//!
//! # Example
//!
//! ```sql
//! -- users(1) with fields id, name and a child posts(2):
//! json_build_object('id', __sr_1.id, 'name', __sr_1.name, 'posts', __sr_1.posts)
//! ```
//!
//! Only the argument list is rendered; the caller supplies the wrapping
//! JSON function for its dialect.

use crate::query_plan::{Select, SkipRender};
use crate::utils::alias_naming::{cursor_key, row_alias, TYPENAME_FIELD};

use super::context::RenderContext;
use super::errors::SqlGeneratorError;

impl RenderContext<'_> {
    /// Render `'<key>', __sr_<id>.<key>` pairs for every output key of `sel`.
    pub fn render_json_fields(&mut self, sel: &Select) -> Result<(), SqlGeneratorError> {
        let mut n = 0;
        for f in &sel.fields {
            self.separator(n);
            self.render_json_field(&f.field_name, sel.id);
            n += 1;
        }

        for func in &sel.funcs {
            self.separator(n);
            self.render_json_field(func.output_name(), sel.id);
            n += 1;
        }

        if sel.typename {
            self.separator(n);
            self.render_json_field(TYPENAME_FIELD, sel.id);
            n += 1;
        }

        let plan = self.plan();
        for &cid in &sel.children {
            let csel = plan.select(cid)?;

            if csel.skip_render == SkipRender::Remote {
                continue;
            }

            self.separator(n);

            if csel.skip_render != SkipRender::None {
                self.render_json_null_field(&csel.field_name);

                if sel.paging.cursor {
                    self.write_str(", ");
                    self.render_json_null_field(&cursor_key(&sel.field_name));
                }
            } else {
                self.render_json_field(&csel.field_name, sel.id);

                if csel.paging.cursor {
                    self.write_str(", ");
                    self.render_json_field(&cursor_key(&csel.field_name), sel.id);
                }
            }
            n += 1;
        }
        Ok(())
    }

    fn render_json_field(&mut self, name: &str, select_id: i32) {
        self.squoted(name);
        self.write_str(", ");
        self.write_str(&row_alias(select_id));
        self.write_str(".");
        self.write_str(name);
    }

    fn render_json_null_field(&mut self, name: &str) {
        self.squoted(name);
        self.write_str(", NULL");
    }
}
