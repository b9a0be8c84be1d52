//! Pipeline environment variables and the list edits the settings and
//! trigger forms perform on them.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A single `name=value` pair handed to a pipeline. Names are not deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EnvVar {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Append to a possibly-absent list, creating it first.
pub fn append_env_var(list: &mut Option<Vec<EnvVar>>, var: EnvVar) -> usize {
    let vars = list.get_or_insert_with(Vec::new);
    vars.push(var);
    vars.len() - 1
}

/// Remove the entry at `index`, keeping the order of the rest.
pub fn remove_env_var(list: &mut Option<Vec<EnvVar>>, index: usize) -> Result<EnvVar, AppError> {
    match list {
        Some(vars) if index < vars.len() => Ok(vars.remove(index)),
        Some(vars) => Err(AppError::NotFound(format!(
            "Env var index {} out of range ({} entries)",
            index,
            vars.len()
        ))),
        None => Err(AppError::NotFound(format!(
            "Env var index {} out of range (no entries)",
            index
        ))),
    }
}
