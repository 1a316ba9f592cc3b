//! Structural checks run once before a plan is rendered

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{ArgType, Field, FieldType, Func, PlanError, QueryPlan, RelType, Select};

/// SQL function identifiers, optionally schema-qualified
static FUNCTION_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

impl QueryPlan {
    /// Check every invariant the renderers rely on.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen = HashSet::with_capacity(self.selects.len());
        for (index, sel) in self.selects.iter().enumerate() {
            if !seen.insert(sel.id) {
                return Err(PlanError::DuplicateSelectId(sel.id));
            }
            if usize::try_from(sel.id).ok() != Some(index) {
                return Err(PlanError::MisplacedSelectId { id: sel.id, index });
            }
        }

        // child id -> the one select listing it
        let mut listed_by: HashMap<i32, i32> = HashMap::new();
        for sel in &self.selects {
            for &cid in &sel.children {
                let child = self.select(cid).map_err(|_| PlanError::DanglingSelectId {
                    select_id: sel.id,
                    child_id: cid,
                })?;
                if let Some(&first_parent) = listed_by.get(&cid) {
                    return Err(PlanError::MultipleParents {
                        select_id: cid,
                        first_parent,
                        second_parent: sel.id,
                    });
                }
                if let Some(parent_id) = child.parent_id {
                    if parent_id != sel.id {
                        return Err(PlanError::ParentMismatch {
                            select_id: cid,
                            parent_id,
                            listed_by: sel.id,
                        });
                    }
                }
                listed_by.insert(cid, sel.id);
            }
            validate_fields(sel)?;
            validate_relationship(sel)?;
        }

        self.check_acyclic()?;

        for root in self.root_ids() {
            self.select(root)?;
            if listed_by.contains_key(&root) {
                return Err(PlanError::RootListedAsChild(root));
            }
        }
        Ok(())
    }

    fn check_acyclic(&self) -> Result<(), PlanError> {
        let mut state = vec![VisitState::Unvisited; self.selects.len()];
        for start in 0..self.selects.len() {
            if state[start] != VisitState::Unvisited {
                continue;
            }
            // (node index, next child position)
            let mut stack = vec![(start, 0usize)];
            state[start] = VisitState::InProgress;

            while let Some((node, pos)) = stack.pop() {
                let children = &self.selects[node].children;
                if pos == children.len() {
                    state[node] = VisitState::Done;
                    continue;
                }
                stack.push((node, pos + 1));

                // children were range-checked by validate()
                let child = children[pos] as usize;
                match state[child] {
                    VisitState::InProgress => {
                        return Err(PlanError::ChildCycle(self.selects[child].id));
                    }
                    VisitState::Unvisited => {
                        state[child] = VisitState::InProgress;
                        stack.push((child, 0));
                    }
                    VisitState::Done => {}
                }
            }
        }
        Ok(())
    }
}

fn validate_fields(sel: &Select) -> Result<(), PlanError> {
    for field in &sel.fields {
        match field.field_type {
            FieldType::Column => {
                if field.col.is_none() {
                    return Err(PlanError::UnboundColumn {
                        select_id: sel.id,
                        field: field.field_name.clone(),
                    });
                }
            }
            FieldType::Function => {
                let func = field.func.as_ref().ok_or_else(|| PlanError::UnboundFunction {
                    select_id: sel.id,
                    field: field.field_name.clone(),
                })?;
                validate_func(sel, field, func)?;
            }
        }
    }

    for func_field in &sel.funcs {
        let field = Field {
            field_name: func_field.field_name.clone(),
            ..Default::default()
        };
        validate_func(sel, &field, &func_field.func)?;
    }
    Ok(())
}

fn validate_func(sel: &Select, field: &Field, func: &Func) -> Result<(), PlanError> {
    if !FUNCTION_NAME_PATTERN.is_match(&func.name) {
        return Err(PlanError::InvalidFunctionName {
            select_id: sel.id,
            field: field.field_name.clone(),
            name: func.name.clone(),
        });
    }
    let unbound_arg = func
        .args
        .iter()
        .any(|arg| arg.arg_type == ArgType::Column && arg.col.is_none());
    if unbound_arg {
        return Err(PlanError::UnboundArgColumn {
            select_id: sel.id,
            field: field.field_name.clone(),
        });
    }
    Ok(())
}

fn validate_relationship(sel: &Select) -> Result<(), PlanError> {
    if sel.rel.rel_type != RelType::Polymorphic {
        return Ok(());
    }
    if sel.children.is_empty() {
        return Err(PlanError::EmptyPolymorphicRelationship {
            select_id: sel.id,
            field: sel.field_name.clone(),
        });
    }
    match sel.rel.left.col.fkey_col.as_deref() {
        Some(col) if !col.is_empty() => {}
        _ => {
            return Err(PlanError::MissingDiscriminator {
                select_id: sel.id,
                field: sel.field_name.clone(),
            })
        }
    }
    // the holder has no json alias of its own to carry a cursor
    if sel.paging.cursor {
        return Err(PlanError::PolymorphicCursor {
            select_id: sel.id,
            field: sel.field_name.clone(),
        });
    }
    Ok(())
}
