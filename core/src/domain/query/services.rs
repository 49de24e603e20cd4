use indexmap::{IndexMap, IndexSet};
use tracing::{debug, instrument};

use crate::domain::{
    common::{PlannerConfig, entities::app_errors::CoreError},
    query::{
        entities::{FilterOperator, Include, RelationSort},
        path_resolver::{PathResolver, qualify},
        ports::{QueryBuilder, QueryPlanService},
        predicate::PredicateCompiler,
        value_objects::{Filter, LogicalMethod, RequestParams},
    },
};

/// Filters grouped by relation chain, in request order.
type RelationFilters = IndexMap<String, Vec<Filter>>;

/// Leaf orderings grouped by relation chain, in request order.
type RelationSorts = IndexMap<String, Vec<RelationSort>>;

#[derive(Debug, Clone, Default)]
pub struct PlanAssembler {
    compiler: PredicateCompiler,
}

impl PlanAssembler {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            compiler: PredicateCompiler::new(config),
        }
    }

    /// Root filters are applied right away; relation filters are stripped to
    /// their leaf attribute and grouped by relation and connective.
    fn partition_filters<B: QueryBuilder>(
        &self,
        builder: &mut B,
        params: &RequestParams,
    ) -> Result<(RelationFilters, RelationFilters), CoreError> {
        let mut and_filters = RelationFilters::new();
        let mut or_filters = RelationFilters::new();

        for filter in &params.filters {
            let resolver = PathResolver::attribute(filter.field.as_str());

            let Some(relation) = resolver.connection_string() else {
                self.compiler.apply(builder, filter)?;
                continue;
            };

            if filter.operator == FilterOperator::Has.code() {
                debug!(relation = %relation, "Applying relation existence filter on root");
                self.compiler.apply(builder, &filter.with_field(relation))?;
                continue;
            }

            let stripped = filter.with_field(resolver.leaf_field());
            let groups = if filter.method.is_or() {
                &mut or_filters
            } else {
                &mut and_filters
            };
            debug!(
                relation = %relation,
                field = %stripped.field,
                method = ?filter.method,
                "Grouping relation filter"
            );
            groups.entry(relation).or_default().push(stripped);
        }

        Ok((and_filters, or_filters))
    }

    fn partition_sorts<B: QueryBuilder>(builder: &mut B, params: &RequestParams) -> RelationSorts {
        let mut relation_sorts = RelationSorts::new();

        for sort in &params.sorts {
            let resolver = PathResolver::attribute(sort.field.as_str());
            match resolver.connection_string() {
                Some(relation) => {
                    relation_sorts.entry(relation).or_default().push(RelationSort {
                        field: resolver.leaf_field().to_string(),
                        direction: sort.direction,
                    });
                }
                None => builder.order_by(&sort.field, sort.direction),
            }
        }

        relation_sorts
    }

    fn resolve_includes(params: &RequestParams) -> IndexSet<String> {
        params
            .connections
            .iter()
            .filter_map(|connection| PathResolver::relation(connection.name.as_str()).connection_string())
            .collect()
    }

    /// Opens one `method` scope on the root holding an existence subquery per
    /// relation, each filter of which sits in its own nested group with the
    /// field qualified by the related storage name.
    fn apply_relation_filters<B: QueryBuilder>(
        &self,
        builder: &mut B,
        method: LogicalMethod,
        groups: &RelationFilters,
    ) -> Result<(), CoreError> {
        let mut prefixed = Vec::with_capacity(groups.len());
        for (relation, filters) in groups {
            let storage_name = builder.related_storage_name(relation)?;
            prefixed.push((relation.as_str(), storage_name, filters));
        }

        builder.where_group(method, &mut |connection_query: &mut B| {
            for (relation, storage_name, filters) in &prefixed {
                connection_query.where_has(relation, method, &mut |related: &mut B| {
                    for filter in filters.iter() {
                        let qualified = filter.with_field(qualify(storage_name, &filter.field));
                        related.where_group(LogicalMethod::And, &mut |inner: &mut B| {
                            self.compiler.apply(inner, &qualified)
                        })?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })
    }

    /// Replaces each sorted relation's plain include with one carrying its
    /// orderings, then issues the eager-load directive.
    fn apply_includes<B: QueryBuilder>(
        builder: &mut B,
        includes: IndexSet<String>,
        relation_sorts: RelationSorts,
    ) -> Result<(), CoreError> {
        let mut directives: Vec<Include<'_, B>> = includes.into_iter().map(Include::Relation).collect();

        for (relation, sorts) in relation_sorts {
            let storage_name = builder.related_storage_name(&relation)?;
            let scoped = Include::Scoped {
                relation: relation.clone(),
                scope: Box::new(move |query: &mut B| {
                    for sort in &sorts {
                        query.order_by(&qualify(&storage_name, &sort.field), sort.direction);
                    }
                    Ok(())
                }),
            };

            match directives
                .iter()
                .position(|include| include.relation() == relation)
            {
                Some(index) => directives[index] = scoped,
                None => directives.push(scoped),
            }
            debug!(relation = %relation, "Merged relation ordering into include");
        }

        if directives.is_empty() {
            return Ok(());
        }

        builder.eager_load(directives)
    }
}

impl QueryPlanService for PlanAssembler {
    #[instrument(
        skip_all,
        fields(
            filters = params.filters.len(),
            sorts = params.sorts.len(),
            connections = params.connections.len(),
        )
    )]
    fn apply_params<B: QueryBuilder>(
        &self,
        mut builder: B,
        params: &RequestParams,
    ) -> Result<B::Page, CoreError> {
        let (and_filters, mut or_filters) = self.partition_filters(&mut builder, params)?;
        let relation_sorts = Self::partition_sorts(&mut builder, params);
        let includes = Self::resolve_includes(params);

        if !and_filters.is_empty() {
            self.apply_relation_filters(&mut builder, LogicalMethod::And, &and_filters)?;
        }

        // a relation already gated by the AND scope is not gated again
        or_filters.retain(|relation, _| !and_filters.contains_key(relation));
        if !or_filters.is_empty() {
            self.apply_relation_filters(&mut builder, LogicalMethod::Or, &or_filters)?;
        }

        Self::apply_includes(&mut builder, includes, relation_sorts)?;

        match params.pagination() {
            Some(pagination) => {
                debug!(
                    page = pagination.page,
                    limit = pagination.limit,
                    "Applying explicit pagination"
                );
                builder.limit(pagination.limit);
                builder.offset(pagination.offset());
                builder.paginate(pagination.limit, pagination.page)
            }
            None => {
                let total = builder.unqualified_row_count()?;
                debug!(total, "No pagination requested, returning a single page");
                builder.paginate(total, 1)
            }
        }
    }
}
