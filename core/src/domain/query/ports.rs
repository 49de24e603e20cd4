use crate::domain::{
    common::entities::app_errors::CoreError,
    query::{
        entities::{ClauseOperator, Include},
        value_objects::{LogicalMethod, RequestParams, SortDirection},
    },
};

/// Callback run against a nested builder scope.
pub type Scope<'a, B> = &'a mut dyn FnMut(&mut B) -> Result<(), CoreError>;

/// Composable query builder the planner drives.
///
/// Nested scopes (grouping, relation existence, eager-load ordering) hand the
/// callback a builder bound to the scope; what the callback adds stays inside
/// it.
pub trait QueryBuilder: Sized {
    type Page;

    /// Physical storage name of the entity at the end of `relation`.
    fn related_storage_name(&self, relation: &str) -> Result<String, CoreError>;

    fn where_compare(
        &mut self,
        field: &str,
        operator: ClauseOperator,
        value: &str,
        method: LogicalMethod,
    ) -> Result<(), CoreError>;

    fn where_group(
        &mut self,
        method: LogicalMethod,
        scope: Scope<'_, Self>,
    ) -> Result<(), CoreError>;

    fn where_in(
        &mut self,
        field: &str,
        values: &[String],
        method: LogicalMethod,
    ) -> Result<(), CoreError>;

    fn where_not_in(
        &mut self,
        field: &str,
        values: &[String],
        method: LogicalMethod,
    ) -> Result<(), CoreError>;

    fn where_null(&mut self, field: &str, method: LogicalMethod) -> Result<(), CoreError>;

    fn where_not_null(&mut self, field: &str, method: LogicalMethod) -> Result<(), CoreError>;

    /// At least one related row matching what `scope` adds must exist.
    fn where_has(
        &mut self,
        relation: &str,
        method: LogicalMethod,
        scope: Scope<'_, Self>,
    ) -> Result<(), CoreError>;

    /// At least one related row must exist.
    fn has(&mut self, relation: &str, method: LogicalMethod) -> Result<(), CoreError>;

    fn order_by(&mut self, field: &str, direction: SortDirection);

    fn eager_load(&mut self, includes: Vec<Include<'_, Self>>) -> Result<(), CoreError>;

    fn limit(&mut self, limit: u64);

    fn offset(&mut self, offset: u64);

    /// Row count of the root query without limit or offset.
    fn unqualified_row_count(&self) -> Result<u64, CoreError>;

    fn paginate(self, limit: u64, page: u64) -> Result<Self::Page, CoreError>;
}

/// Turns decoded request parameters into a paginated query.
pub trait QueryPlanService: Send + Sync {
    fn apply_params<B: QueryBuilder>(
        &self,
        builder: B,
        params: &RequestParams,
    ) -> Result<B::Page, CoreError>;
}
