//! Parameter placeholders handed to the binding layer

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;

/// Named, typed placeholder resolved later by the binder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub param_type: String,
}

impl Param {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

/// Collects params in placeholder order for one statement.
///
/// Postgres placeholders are numbered and a repeated name reuses its number.
/// MySQL placeholders are positional `?`, so every occurrence is recorded.
#[derive(Debug, Default)]
pub struct ParamCollector {
    params: Vec<Param>,
    positions: HashMap<String, usize>,
}

impl ParamCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `param` and return the placeholder text to emit.
    pub fn placeholder(&mut self, dialect: Dialect, param: Param) -> String {
        match dialect {
            Dialect::Postgres => {
                if let Some(pos) = self.positions.get(&param.name) {
                    return format!("${}", pos + 1);
                }
                let pos = self.params.len();
                self.positions.insert(param.name.clone(), pos);
                self.params.push(param);
                format!("${}", pos + 1)
            }
            Dialect::Mysql => {
                self.params.push(param);
                "?".to_string()
            }
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Param> {
        self.params
    }
}
