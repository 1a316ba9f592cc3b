//! Query plan - the resolved Select tree handed to the SQL generator
//!
//! The plan is an arena: a flat sequence of [`Select`] nodes where
//! `selects[k].id == k`. Parents, children and polymorphic branches refer to
//! each other by numeric id only, so every cross-node lookup is an index
//! into [`QueryPlan::selects`].
//!
//! Plans are produced by the planning stage and are immutable while SQL is
//! rendered. They can be loaded from YAML or JSON, which is what the
//! `sqlnest` binary and the test fixtures do.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

mod errors;
mod validation;

pub use errors::{PlanError, PlanLoadError};

/// Flat arena of select nodes indexed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub selects: Vec<Select>,
    /// Top-level selects. When empty, every select without a parent is a root.
    #[serde(default)]
    pub roots: Vec<i32>,
}

impl QueryPlan {
    pub fn new(selects: Vec<Select>) -> Self {
        QueryPlan {
            selects,
            roots: Vec::new(),
        }
    }

    /// Look up a select by id.
    pub fn select(&self, id: i32) -> Result<&Select, PlanError> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.selects.get(idx))
            .filter(|sel| sel.id == id)
            .ok_or(PlanError::SelectNotFound(id))
    }

    /// Root ids, either explicit or every select no other select lists as a child.
    pub fn root_ids(&self) -> Vec<i32> {
        if !self.roots.is_empty() {
            return self.roots.clone();
        }
        let listed: HashSet<i32> = self
            .selects
            .iter()
            .flat_map(|sel| sel.children.iter().copied())
            .collect();
        self.selects
            .iter()
            .filter(|sel| !listed.contains(&sel.id))
            .map(|sel| sel.id)
            .collect()
    }

    /// Post-order walk over the selects that contribute SQL.
    ///
    /// Children come before their parents, so a parent is always compiled
    /// after every `__sj_<id>` alias it references. Subtrees whose root is
    /// nulled or remote are not visited: the parent never references them.
    pub fn render_order(&self) -> Result<Vec<i32>, PlanError> {
        let mut order = Vec::with_capacity(self.selects.len());
        for root in self.root_ids() {
            self.visit_post_order(root, &mut order)?;
        }
        Ok(order)
    }

    fn visit_post_order(&self, id: i32, order: &mut Vec<i32>) -> Result<(), PlanError> {
        let sel = self.select(id)?;
        if sel.skip_render != SkipRender::None {
            return Ok(());
        }
        for &cid in &sel.children {
            self.visit_post_order(cid, order)?;
        }
        order.push(id);
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, PlanLoadError> {
        let plan: Self = serde_yaml::from_str(content)?;
        Ok(plan.with_table_info_names())
    }

    pub fn from_json_str(content: &str) -> Result<Self, PlanLoadError> {
        let plan: Self = serde_json::from_str(content)?;
        Ok(plan.with_table_info_names())
    }

    /// Plan files may omit `ti.name`; it defaults to the select's table.
    fn with_table_info_names(mut self) -> Self {
        for sel in &mut self.selects {
            if sel.ti.name.is_empty() {
                sel.ti.name = sel.table.clone();
            }
        }
        self
    }

    /// Load a plan file, picking the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PlanLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PlanLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(PlanLoadError::UnsupportedExtension(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// One node of the query plan, bound to one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Select {
    pub id: i32,
    /// Informational; when set it must name the select listing this one as a child
    pub parent_id: Option<i32>,
    pub table: String,
    /// Output key of this select inside its parent's JSON object
    pub field_name: String,
    pub fields: Vec<Field>,
    pub funcs: Vec<FuncField>,
    pub children: Vec<i32>,
    pub rel: Rel,
    /// Inject a literal `__typename` field
    pub typename: bool,
    pub skip_render: SkipRender,
    pub paging: Paging,
    /// Columns the inner row query must fetch, already deduplicated
    pub bcols: Vec<Column>,
    pub ti: TableInfo,
    /// Selector arguments such as `search`
    pub args: Vec<Arg>,
}

impl Select {
    pub fn new(id: i32, table: impl Into<String>, field_name: impl Into<String>) -> Self {
        let table = table.into();
        Select {
            id,
            ti: TableInfo {
                name: table.clone(),
                full_text: Vec::new(),
            },
            table,
            field_name: field_name.into(),
            ..Default::default()
        }
    }

    pub fn get_arg(&self, name: &str) -> Option<&Arg> {
        self.args.iter().find(|arg| arg.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Column,
    Function,
}

/// One output attribute of a select
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub col: Option<Column>,
    pub func: Option<Func>,
    pub field_filter: FieldFilter,
}

impl Field {
    pub fn column(field_name: impl Into<String>, col: Column) -> Self {
        Field {
            field_name: field_name.into(),
            field_type: FieldType::Column,
            col: Some(col),
            ..Default::default()
        }
    }

    pub fn function(field_name: impl Into<String>, func: Func) -> Self {
        Field {
            field_name: field_name.into(),
            field_type: FieldType::Function,
            func: Some(func),
            ..Default::default()
        }
    }

    /// Mask the value to NULL unless `exp` holds.
    pub fn with_filter(mut self, exp: Exp) -> Self {
        self.field_filter.exp = Some(exp);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldFilter {
    pub exp: Option<Exp>,
}

/// Physical column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub table: String,
    pub name: String,
    /// Discriminator column for polymorphic relationships
    pub fkey_col: Option<String>,
}

impl Column {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Column {
            table: table.into(),
            name: name.into(),
            fkey_col: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Func {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Func {
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Func {
            name: name.into(),
            args,
        }
    }
}

/// Entry of `Select::funcs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuncField {
    pub field_name: String,
    pub alias: Option<String>,
    pub func: Func,
}

impl FuncField {
    /// JSON key: the alias when set, the field name otherwise.
    pub fn output_name(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.field_name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    Column,
    #[default]
    Literal,
    Variable,
}

/// Function or selector argument. An empty name means positional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arg {
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    pub val: String,
    pub col: Option<Column>,
}

impl Arg {
    pub fn column(col: Column) -> Self {
        Arg {
            arg_type: ArgType::Column,
            col: Some(col),
            ..Default::default()
        }
    }

    pub fn literal(val: impl Into<String>) -> Self {
        Arg {
            arg_type: ArgType::Literal,
            val: val.into(),
            ..Default::default()
        }
    }

    pub fn variable(val: impl Into<String>) -> Self {
        Arg {
            arg_type: ArgType::Variable,
            val: val.into(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelType {
    #[default]
    Standard,
    Polymorphic,
}

/// Relationship linking a select to its parent row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rel {
    #[serde(rename = "type")]
    pub rel_type: RelType,
    pub left: RelEnd,
}

impl Rel {
    /// Polymorphic relationship discriminated by `fkey_col` on the parent row.
    pub fn polymorphic(table: impl Into<String>, fkey_col: impl Into<String>) -> Self {
        Rel {
            rel_type: RelType::Polymorphic,
            left: RelEnd {
                col: Column {
                    table: table.into(),
                    name: String::new(),
                    fkey_col: Some(fkey_col.into()),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelEnd {
    pub col: Column,
}

/// How a select contributes to the enclosing statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipRender {
    /// Render normally
    #[default]
    None,
    /// Resolved elsewhere; absent from this statement
    Remote,
    /// Needs caller input that was not supplied; rendered as NULL
    UserNeeded,
    /// Denied by authorization; rendered as NULL
    Blocked,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paging {
    pub cursor: bool,
}

/// Table metadata needed while rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableInfo {
    pub name: String,
    /// Full-text indexed columns, concatenated for `search_rank`
    pub full_text: Vec<Column>,
}

/// Boolean expression forwarded to the expression renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exp {
    Cmp { op: CmpOp, col: Column, val: ExpValue },
    IsNull { col: Column },
    And(Vec<Exp>),
    Or(Vec<Exp>),
    Not(Box<Exp>),
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::NotEq => "<>",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Caller-supplied variable, bound as a parameter
    Var(String),
}
