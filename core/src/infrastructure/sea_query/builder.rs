use std::sync::Arc;

use indexmap::IndexMap;
use sea_orm::{
    Value,
    sea_query::{
        Alias, Asterisk, ColumnRef, Condition, Expr, Func, IntoColumnRef, Order, Query,
        SelectStatement, SimpleExpr,
    },
};
use tracing::debug;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        query::{
            entities::{ClauseOperator, Include},
            path_resolver::PATH_SEPARATOR,
            ports::{QueryBuilder, Scope},
            value_objects::{LogicalMethod, SortDirection},
        },
        schema::{entities::RelationDef, ports::SchemaCatalog, services::resolve_relation_chain},
    },
    infrastructure::sea_query::{
        plan::{EagerLoadPlan, PagePlan},
        row_counter::RowCounter,
    },
};

/// `QueryBuilder` producing sea-query select statements for one table.
///
/// Each scope (grouping, relation existence, eager-load ordering) runs on a
/// fresh builder bound to the scope's table; its clauses are folded into a
/// single condition when the scope closes.
#[derive(Clone)]
pub struct SeaQueryBuilder {
    table: String,
    catalog: Arc<dyn SchemaCatalog>,
    row_counter: Arc<dyn RowCounter>,
    clauses: Vec<(LogicalMethod, Condition)>,
    orders: Vec<(String, SortDirection)>,
    limit: Option<u64>,
    offset: Option<u64>,
    eager_loads: IndexMap<String, EagerLoadPlan>,
}

impl SeaQueryBuilder {
    pub fn new(
        table: impl Into<String>,
        catalog: Arc<dyn SchemaCatalog>,
        row_counter: Arc<dyn RowCounter>,
    ) -> Self {
        Self {
            table: table.into(),
            catalog,
            row_counter,
            clauses: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            eager_loads: IndexMap::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Page select with the limit and offset set directly on the builder.
    pub fn select_statement(&self) -> SelectStatement {
        let mut select = self.base_select();
        if let Some(limit) = self.limit {
            select.limit(limit);
        }
        if let Some(offset) = self.offset {
            select.offset(offset);
        }
        select
    }

    pub fn count_statement(&self) -> SelectStatement {
        let mut count = Query::select();
        count
            .expr(Func::count(Expr::col(Asterisk)))
            .from(Alias::new(&self.table));
        if let Some(condition) = self.condition() {
            count.cond_where(condition);
        }
        count
    }

    fn scoped(&self, table: &str) -> Self {
        Self::new(table, self.catalog.clone(), self.row_counter.clone())
    }

    fn base_select(&self) -> SelectStatement {
        let mut select = Query::select();
        select.column(Asterisk).from(Alias::new(&self.table));
        if let Some(condition) = self.condition() {
            select.cond_where(condition);
        }
        for (field, direction) in &self.orders {
            select.order_by(self.column(field), order(*direction));
        }
        select
    }

    /// Consecutive AND-joined clauses bind tighter than OR, as in SQL. The
    /// connective of the first clause is ignored.
    fn condition(&self) -> Option<Condition> {
        let mut runs: Vec<Condition> = Vec::new();

        for (index, (method, clause)) in self.clauses.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if index > 0 && !method.is_or() => {
                    *run = std::mem::replace(run, Condition::all()).add(clause.clone());
                }
                _ => runs.push(Condition::all().add(clause.clone())),
            }
        }

        match runs.len() {
            0 => None,
            1 => runs.pop(),
            _ => Some(runs.into_iter().fold(Condition::any(), Condition::add)),
        }
    }

    /// `table.column` is taken as is, a bare name belongs to this builder's table.
    fn column(&self, field: &str) -> ColumnRef {
        match field.split_once(PATH_SEPARATOR) {
            Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
            None => (Alias::new(&self.table), Alias::new(field)).into_column_ref(),
        }
    }

    fn push(&mut self, method: LogicalMethod, condition: Condition) {
        self.clauses.push((method, condition));
    }

    fn push_expr(&mut self, method: LogicalMethod, expr: SimpleExpr) {
        self.push(method, Condition::all().add(expr));
    }

    fn hops(&self, relation: &str) -> Result<Vec<RelationDef>, CoreError> {
        let hops = resolve_relation_chain(self.catalog.as_ref(), &self.table, relation)?;
        if hops.is_empty() {
            return Err(CoreError::UnknownRelation {
                owner: self.table.clone(),
                relation: relation.to_string(),
            });
        }
        Ok(hops)
    }
}

/// Binds integer, decimal and boolean literals with their own type so the
/// parameter compares against numeric and boolean columns. Numbers with a
/// leading zero stay text, keeping codes such as `007` intact.
fn typed_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(Some(true)),
        "false" => return Value::Bool(Some(false)),
        _ => {}
    }

    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let typed = match unsigned.split_once('.') {
        Some((whole, fraction)) if is_number(whole) && is_digits(fraction) => {
            raw.parse::<f64>().ok().map(|number| Value::Double(Some(number)))
        }
        None if is_number(unsigned) => raw
            .parse::<i64>()
            .ok()
            .map(|number| Value::BigInt(Some(number))),
        _ => None,
    };

    typed.unwrap_or_else(|| raw.to_string().into())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_number(whole: &str) -> bool {
    is_digits(whole) && (whole == "0" || !whole.starts_with('0'))
}

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// `EXISTS (SELECT 1 FROM target WHERE target.key = owner.key AND ...)`,
/// nested once per hop with `inner` on the last one.
fn exists_chain(hops: &[RelationDef], inner: Option<Condition>) -> Condition {
    let mut condition = inner;

    for hop in hops.iter().rev() {
        let mut on = Condition::all().add(
            Expr::col((Alias::new(&hop.target), Alias::new(&hop.target_column)))
                .equals((Alias::new(&hop.owner), Alias::new(&hop.owner_column))),
        );
        if let Some(nested) = condition.take() {
            on = on.add(nested);
        }

        let subquery = Query::select()
            .expr(Expr::val(1))
            .from(Alias::new(&hop.target))
            .cond_where(on)
            .to_owned();
        condition = Some(Condition::all().add(Expr::exists(subquery)));
    }

    condition.unwrap_or_else(Condition::all)
}

impl QueryBuilder for SeaQueryBuilder {
    type Page = PagePlan;

    fn related_storage_name(&self, relation: &str) -> Result<String, CoreError> {
        let hops = self.hops(relation)?;
        Ok(hops
            .last()
            .map(|hop| hop.target.clone())
            .unwrap_or_default())
    }

    fn where_compare(
        &mut self,
        field: &str,
        operator: ClauseOperator,
        value: &str,
        method: LogicalMethod,
    ) -> Result<(), CoreError> {
        let column = Expr::col(self.column(field));
        let expr = match operator {
            ClauseOperator::Like => column.like(value),
            ClauseOperator::NotLike => column.not_like(value),
            ClauseOperator::Eq => column.eq(typed_value(value)),
            ClauseOperator::Ne => column.ne(typed_value(value)),
            ClauseOperator::Gt => column.gt(typed_value(value)),
            ClauseOperator::Ge => column.gte(typed_value(value)),
            ClauseOperator::Lt => column.lt(typed_value(value)),
            ClauseOperator::Le => column.lte(typed_value(value)),
        };
        self.push_expr(method, expr);
        Ok(())
    }

    fn where_group(
        &mut self,
        method: LogicalMethod,
        scope: Scope<'_, Self>,
    ) -> Result<(), CoreError> {
        let mut group = self.scoped(&self.table);
        scope(&mut group)?;
        if let Some(condition) = group.condition() {
            self.push(method, condition);
        }
        Ok(())
    }

    fn where_in(
        &mut self,
        field: &str,
        values: &[String],
        method: LogicalMethod,
    ) -> Result<(), CoreError> {
        let expr = Expr::col(self.column(field))
            .is_in(values.iter().map(String::as_str).map(typed_value));
        self.push_expr(method, expr);
        Ok(())
    }

    fn where_not_in(
        &mut self,
        field: &str,
        values: &[String],
        method: LogicalMethod,
    ) -> Result<(), CoreError> {
        let expr = Expr::col(self.column(field))
            .is_not_in(values.iter().map(String::as_str).map(typed_value));
        self.push_expr(method, expr);
        Ok(())
    }

    fn where_null(&mut self, field: &str, method: LogicalMethod) -> Result<(), CoreError> {
        let expr = Expr::col(self.column(field)).is_null();
        self.push_expr(method, expr);
        Ok(())
    }

    fn where_not_null(&mut self, field: &str, method: LogicalMethod) -> Result<(), CoreError> {
        let expr = Expr::col(self.column(field)).is_not_null();
        self.push_expr(method, expr);
        Ok(())
    }

    fn where_has(
        &mut self,
        relation: &str,
        method: LogicalMethod,
        scope: Scope<'_, Self>,
    ) -> Result<(), CoreError> {
        let hops = self.hops(relation)?;
        let target = hops
            .last()
            .map(|hop| hop.target.clone())
            .unwrap_or_default();

        let mut related = self.scoped(&target);
        scope(&mut related)?;

        self.push(method, exists_chain(&hops, related.condition()));
        Ok(())
    }

    fn has(&mut self, relation: &str, method: LogicalMethod) -> Result<(), CoreError> {
        self.where_has(relation, method, &mut |_: &mut Self| Ok(()))
    }

    fn order_by(&mut self, field: &str, direction: SortDirection) {
        self.orders.push((field.to_string(), direction));
    }

    fn eager_load(&mut self, includes: Vec<Include<'_, Self>>) -> Result<(), CoreError> {
        for include in includes {
            let relation = include.relation().to_string();
            let hops = self.hops(&relation)?;
            let segments: Vec<&str> = relation.split(PATH_SEPARATOR).collect();

            let mut path = String::new();
            for (segment, hop) in segments.iter().zip(&hops) {
                if !path.is_empty() {
                    path.push(PATH_SEPARATOR);
                }
                path.push_str(segment);

                if !self.eager_loads.contains_key(&path) {
                    let statement = self.scoped(&hop.target).base_select();
                    self.eager_loads
                        .insert(path.clone(), EagerLoadPlan::new(path.clone(), hop, statement));
                }
            }

            if let Include::Scoped { scope, .. } = include {
                let Some(hop) = hops.last() else {
                    continue;
                };
                let mut related = self.scoped(&hop.target);
                scope(&mut related)?;
                debug!(path = %path, table = %hop.target, "Scoped eager load");
                self.eager_loads.insert(
                    path.clone(),
                    EagerLoadPlan::new(path, hop, related.base_select()),
                );
            }
        }
        Ok(())
    }

    fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    fn offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    fn unqualified_row_count(&self) -> Result<u64, CoreError> {
        self.row_counter.count(&self.count_statement())
    }

    /// Page numbers start at 1; a limit of 0 leaves the select unbounded.
    fn paginate(self, limit: u64, page: u64) -> Result<Self::Page, CoreError> {
        let current_page = page.max(1);
        let mut select = self.base_select();
        if limit > 0 {
            select
                .limit(limit)
                .offset((current_page - 1).saturating_mul(limit));
        }

        debug!(
            table = %self.table,
            per_page = limit,
            current_page,
            eager_loads = self.eager_loads.len(),
            "Built page plan"
        );

        let count = self.count_statement();
        Ok(PagePlan {
            select,
            count,
            eager_loads: self.eager_loads.into_values().collect(),
            per_page: limit,
            current_page,
        })
    }
}
