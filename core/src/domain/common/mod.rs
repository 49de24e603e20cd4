use sea_orm::DatabaseBackend;
use serde::{Deserialize, Serialize};

use crate::domain::{common::entities::app_errors::CoreError, schema::entities::RelationDef};

pub mod entities;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParamPlanConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl ParamPlanConfig {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::InvalidConfiguration(e.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Separator splitting `in` / `nin` values into a list.
    #[serde(default = "default_list_separator")]
    pub list_separator: char,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            list_separator: default_list_separator(),
        }
    }
}

fn default_list_separator() -> char {
    '|'
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub dialect: SqlDialect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Postgres,
    #[serde(alias = "mysql")]
    MySql,
    Sqlite,
}

impl From<SqlDialect> for DatabaseBackend {
    fn from(dialect: SqlDialect) -> Self {
        match dialect {
            SqlDialect::Postgres => DatabaseBackend::Postgres,
            SqlDialect::MySql => DatabaseBackend::MySql,
            SqlDialect::Sqlite => DatabaseBackend::Sqlite,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub relations: Vec<RelationDef>,
}
