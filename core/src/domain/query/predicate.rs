use tracing::warn;

use crate::domain::{
    common::{PlannerConfig, entities::app_errors::CoreError},
    query::{
        entities::{ClauseOperator, FilterOperator, Predicate},
        ports::QueryBuilder,
        value_objects::Filter,
    },
};

/// Maps filter operators to builder clauses.
#[derive(Debug, Clone)]
pub struct PredicateCompiler {
    list_separator: char,
}

impl Default for PredicateCompiler {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

impl PredicateCompiler {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            list_separator: config.list_separator,
        }
    }

    pub fn compile(&self, filter: &Filter) -> Result<Predicate, CoreError> {
        let operator: FilterOperator = filter.operator.parse().inspect_err(|_| {
            warn!(
                field = %filter.field,
                operator = %filter.operator,
                "Rejected filter with unsupported operator"
            );
        })?;

        let field = || filter.field.clone();
        let method = filter.method;
        let compare = |operator: ClauseOperator, value: String| Predicate::Compare {
            field: field(),
            operator,
            value,
            method,
        };

        let predicate = match operator {
            FilterOperator::Contains => compare(ClauseOperator::Like, format!("%{}%", filter.value)),
            FilterOperator::NotContains => {
                compare(ClauseOperator::NotLike, format!("%{}%", filter.value))
            }
            FilterOperator::StartsWith => compare(ClauseOperator::Like, format!("{}%", filter.value)),
            FilterOperator::EndsWith => compare(ClauseOperator::Like, format!("%{}", filter.value)),
            FilterOperator::Eq => compare(ClauseOperator::Eq, filter.value.clone()),
            FilterOperator::Ne => compare(ClauseOperator::Ne, filter.value.clone()),
            FilterOperator::Gt => compare(ClauseOperator::Gt, filter.value.clone()),
            FilterOperator::Ge => compare(ClauseOperator::Ge, filter.value.clone()),
            FilterOperator::Lt => compare(ClauseOperator::Lt, filter.value.clone()),
            FilterOperator::Le => compare(ClauseOperator::Le, filter.value.clone()),
            FilterOperator::In => Predicate::In {
                field: field(),
                values: self.split(&filter.value),
                method,
            },
            FilterOperator::NotIn => Predicate::NotIn {
                field: field(),
                values: self.split(&filter.value),
                method,
            },
            FilterOperator::Null => Predicate::Null {
                field: field(),
                method,
            },
            FilterOperator::NotNull => Predicate::NotNull {
                field: field(),
                method,
            },
            FilterOperator::Has => Predicate::Has {
                relation: field(),
                method,
            },
        };

        Ok(predicate)
    }

    /// Compiles `filter` and adds it to the builder's current scope.
    pub fn apply<B: QueryBuilder>(&self, builder: &mut B, filter: &Filter) -> Result<(), CoreError> {
        match self.compile(filter)? {
            Predicate::Compare {
                field,
                operator,
                value,
                method,
            } => builder.where_compare(&field, operator, &value, method),
            Predicate::In {
                field,
                values,
                method,
            } => builder.where_in(&field, &values, method),
            Predicate::NotIn {
                field,
                values,
                method,
            } => builder.where_not_in(&field, &values, method),
            Predicate::Null { field, method } => builder.where_null(&field, method),
            Predicate::NotNull { field, method } => builder.where_not_null(&field, method),
            Predicate::Has { relation, method } => builder.has(&relation, method),
        }
    }

    fn split(&self, value: &str) -> Vec<String> {
        value
            .split(self.list_separator)
            .map(str::to_string)
            .collect()
    }
}
