//! Query builder double that records the operation tree it is driven with.

use std::collections::HashMap;

use crate::domain::{
    common::entities::app_errors::CoreError,
    query::{
        entities::{ClauseOperator, Include},
        ports::{QueryBuilder, Scope},
        value_objects::{LogicalMethod, SortDirection},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
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
    Group {
        method: LogicalMethod,
        ops: Vec<Op>,
    },
    WhereHas {
        relation: String,
        method: LogicalMethod,
        ops: Vec<Op>,
    },
    Has {
        relation: String,
        method: LogicalMethod,
    },
    OrderBy {
        field: String,
        direction: SortDirection,
    },
    EagerLoad(Vec<RecordedInclude>),
    Limit(u64),
    Offset(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedInclude {
    Relation(String),
    Scoped { relation: String, ops: Vec<Op> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPage {
    pub ops: Vec<Op>,
    pub limit: u64,
    pub page: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBuilder {
    pub ops: Vec<Op>,
    storage_names: HashMap<String, String>,
    row_count: u64,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_name(mut self, relation: &str, storage_name: &str) -> Self {
        self.storage_names
            .insert(relation.to_string(), storage_name.to_string());
        self
    }

    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    fn child(&self) -> Self {
        Self {
            ops: Vec::new(),
            storage_names: self.storage_names.clone(),
            row_count: self.row_count,
        }
    }
}

impl QueryBuilder for RecordingBuilder {
    type Page = RecordedPage;

    fn related_storage_name(&self, relation: &str) -> Result<String, CoreError> {
        Ok(self
            .storage_names
            .get(relation)
            .cloned()
            .unwrap_or_else(|| relation.rsplit('.').next().unwrap_or(relation).to_string()))
    }

    fn where_compare(
        &mut self,
        field: &str,
        operator: ClauseOperator,
        value: &str,
        method: LogicalMethod,
    ) -> Result<(), CoreError> {
        self.ops.push(Op::Compare {
            field: field.to_string(),
            operator,
            value: value.to_string(),
            method,
        });
        Ok(())
    }

    fn where_group(
        &mut self,
        method: LogicalMethod,
        scope: Scope<'_, Self>,
    ) -> Result<(), CoreError> {
        let mut child = self.child();
        scope(&mut child)?;
        self.ops.push(Op::Group {
            method,
            ops: child.ops,
        });
        Ok(())
    }

    fn where_in(
        &mut self,
        field: &str,
        values: &[String],
        method: LogicalMethod,
    ) -> Result<(), CoreError> {
        self.ops.push(Op::In {
            field: field.to_string(),
            values: values.to_vec(),
            method,
        });
        Ok(())
    }

    fn where_not_in(
        &mut self,
        field: &str,
        values: &[String],
        method: LogicalMethod,
    ) -> Result<(), CoreError> {
        self.ops.push(Op::NotIn {
            field: field.to_string(),
            values: values.to_vec(),
            method,
        });
        Ok(())
    }

    fn where_null(&mut self, field: &str, method: LogicalMethod) -> Result<(), CoreError> {
        self.ops.push(Op::Null {
            field: field.to_string(),
            method,
        });
        Ok(())
    }

    fn where_not_null(&mut self, field: &str, method: LogicalMethod) -> Result<(), CoreError> {
        self.ops.push(Op::NotNull {
            field: field.to_string(),
            method,
        });
        Ok(())
    }

    fn where_has(
        &mut self,
        relation: &str,
        method: LogicalMethod,
        scope: Scope<'_, Self>,
    ) -> Result<(), CoreError> {
        let mut child = self.child();
        scope(&mut child)?;
        self.ops.push(Op::WhereHas {
            relation: relation.to_string(),
            method,
            ops: child.ops,
        });
        Ok(())
    }

    fn has(&mut self, relation: &str, method: LogicalMethod) -> Result<(), CoreError> {
        self.ops.push(Op::Has {
            relation: relation.to_string(),
            method,
        });
        Ok(())
    }

    fn order_by(&mut self, field: &str, direction: SortDirection) {
        self.ops.push(Op::OrderBy {
            field: field.to_string(),
            direction,
        });
    }

    fn eager_load(&mut self, includes: Vec<Include<'_, Self>>) -> Result<(), CoreError> {
        let mut recorded = Vec::with_capacity(includes.len());
        for include in includes {
            match include {
                Include::Relation(relation) => recorded.push(RecordedInclude::Relation(relation)),
                Include::Scoped { relation, scope } => {
                    let mut child = self.child();
                    scope(&mut child)?;
                    recorded.push(RecordedInclude::Scoped {
                        relation,
                        ops: child.ops,
                    });
                }
            }
        }
        self.ops.push(Op::EagerLoad(recorded));
        Ok(())
    }

    fn limit(&mut self, limit: u64) {
        self.ops.push(Op::Limit(limit));
    }

    fn offset(&mut self, offset: u64) {
        self.ops.push(Op::Offset(offset));
    }

    fn unqualified_row_count(&self) -> Result<u64, CoreError> {
        Ok(self.row_count)
    }

    fn paginate(self, limit: u64, page: u64) -> Result<Self::Page, CoreError> {
        Ok(RecordedPage {
            ops: self.ops,
            limit,
            page,
        })
    }
}
