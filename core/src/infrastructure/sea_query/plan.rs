use sea_orm::{
    DatabaseBackend, Statement, Value,
    sea_query::{Alias, Expr, SelectStatement},
};

use crate::domain::schema::entities::RelationDef;

/// Select loading one hop of an eager-load path for a page of parent rows.
#[derive(Debug, Clone)]
pub struct EagerLoadPlan {
    /// Relation path from the root, e.g. `author.profile`.
    pub path: String,
    pub parent_table: String,
    pub parent_column: String,
    pub table: String,
    pub column: String,
    pub statement: SelectStatement,
}

impl EagerLoadPlan {
    pub fn new(path: impl Into<String>, hop: &RelationDef, statement: SelectStatement) -> Self {
        Self {
            path: path.into(),
            parent_table: hop.owner.clone(),
            parent_column: hop.owner_column.clone(),
            table: hop.target.clone(),
            column: hop.target_column.clone(),
            statement,
        }
    }

    /// Restricts the select to rows whose join column matches one of `keys`,
    /// the parent rows' `parent_column` values.
    pub fn for_keys<I, V>(&self, keys: I) -> SelectStatement
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.statement
            .clone()
            .and_where(
                Expr::col((Alias::new(&self.table), Alias::new(&self.column)))
                    .is_in(keys.into_iter().map(Into::<Value>::into)),
            )
            .to_owned()
    }
}

/// Everything needed to fetch one page: the page select, a count over the
/// same conditions and the eager-load selects.
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub select: SelectStatement,
    pub count: SelectStatement,
    pub eager_loads: Vec<EagerLoadPlan>,
    pub per_page: u64,
    pub current_page: u64,
}

impl PagePlan {
    pub fn statements(&self, backend: DatabaseBackend) -> Vec<Statement> {
        let mut statements = Vec::with_capacity(2 + self.eager_loads.len());
        statements.push(backend.build(&self.select));
        statements.push(backend.build(&self.count));
        statements.extend(
            self.eager_loads
                .iter()
                .map(|eager_load| backend.build(&eager_load.statement)),
        );
        statements
    }

    pub fn eager_load(&self, path: &str) -> Option<&EagerLoadPlan> {
        self.eager_loads
            .iter()
            .find(|eager_load| eager_load.path == path)
    }
}
