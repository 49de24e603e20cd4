use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{
    common::entities::app_errors::CoreError,
    query::value_objects::{LogicalMethod, SortDirection},
};

/// Result of splitting a dotted path into its relation chain and leaf attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub value: String,
    pub relation_chain: Vec<String>,
    pub leaf_field: String,
}

impl ResolvedPath {
    pub fn has_connections(&self) -> bool {
        !self.relation_chain.is_empty()
    }

    pub fn connection_string(&self) -> Option<String> {
        if self.has_connections() {
            Some(self.relation_chain.join("."))
        } else {
            None
        }
    }
}

/// Operator codes accepted on a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    Null,
    NotNull,
    Has,
}

impl FilterOperator {
    pub fn code(self) -> &'static str {
        match self {
            FilterOperator::Contains => "ct",
            FilterOperator::NotContains => "nct",
            FilterOperator::StartsWith => "sw",
            FilterOperator::EndsWith => "ew",
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Ge => "ge",
            FilterOperator::Lt => "lt",
            FilterOperator::Le => "le",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "nin",
            FilterOperator::Null => "null",
            FilterOperator::NotNull => "nnull",
            FilterOperator::Has => "has",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ct" => Ok(FilterOperator::Contains),
            "nct" => Ok(FilterOperator::NotContains),
            "sw" => Ok(FilterOperator::StartsWith),
            "ew" => Ok(FilterOperator::EndsWith),
            "eq" => Ok(FilterOperator::Eq),
            "ne" => Ok(FilterOperator::Ne),
            "gt" => Ok(FilterOperator::Gt),
            "ge" => Ok(FilterOperator::Ge),
            "lt" => Ok(FilterOperator::Lt),
            "le" => Ok(FilterOperator::Le),
            "in" => Ok(FilterOperator::In),
            "nin" => Ok(FilterOperator::NotIn),
            "null" => Ok(FilterOperator::Null),
            "nnull" => Ok(FilterOperator::NotNull),
            "has" => Ok(FilterOperator::Has),
            other => Err(CoreError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// SQL-level comparison emitted for a value-carrying filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseOperator {
    Like,
    NotLike,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ClauseOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            ClauseOperator::Like => "LIKE",
            ClauseOperator::NotLike => "NOT LIKE",
            ClauseOperator::Eq => "=",
            ClauseOperator::Ne => "!=",
            ClauseOperator::Gt => ">",
            ClauseOperator::Ge => ">=",
            ClauseOperator::Lt => "<",
            ClauseOperator::Le => "<=",
        }
    }
}

impl fmt::Display for ClauseOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A filter after operator mapping and value transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Compare {
        field: String,
        operator: ClauseOperator,
        value: String,
        method: LogicalMethod,
    },
    In {
        field: String,
        values: Vec<String>,
        method: LogicalMethod,
    },
    NotIn {
        field: String,
        values: Vec<String>,
        method: LogicalMethod,
    },
    Null {
        field: String,
        method: LogicalMethod,
    },
    NotNull {
        field: String,
        method: LogicalMethod,
    },
    Has {
        relation: String,
        method: LogicalMethod,
    },
}

pub type IncludeScope<'a, B> = Box<dyn Fn(&mut B) -> Result<(), CoreError> + 'a>;

/// One entry of an eager-load directive.
pub enum Include<'a, B> {
    Relation(String),
    Scoped {
        relation: String,
        scope: IncludeScope<'a, B>,
    },
}

impl<B> Include<'_, B> {
    pub fn relation(&self) -> &str {
        match self {
            Include::Relation(relation) => relation,
            Include::Scoped { relation, .. } => relation,
        }
    }
}

impl<B> fmt::Debug for Include<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Include::Relation(relation) => f.debug_tuple("Relation").field(relation).finish(),
            Include::Scoped { relation, .. } => f
                .debug_struct("Scoped")
                .field("relation", relation)
                .finish_non_exhaustive(),
        }
    }
}

/// Ordering recorded for a relation, applied inside its eager-load query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSort {
    pub field: String,
    pub direction: SortDirection,
}
