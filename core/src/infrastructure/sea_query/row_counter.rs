use sea_orm::sea_query::SelectStatement;

use crate::domain::common::entities::app_errors::CoreError;

/// Executes a `COUNT(*)` select and returns the number of rows.
#[cfg_attr(test, mockall::automock)]
pub trait RowCounter: Send + Sync {
    fn count(&self, statement: &SelectStatement) -> Result<u64, CoreError>;
}
