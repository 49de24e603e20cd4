use serde::{Deserialize, Serialize};

/// A named relation from one table to another, joined on a single column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Table the relation is declared on.
    pub owner: String,
    /// Relation name as it appears in request paths, e.g. `orderItems`.
    pub name: String,
    /// Table the relation points to.
    pub target: String,
    pub owner_column: String,
    pub target_column: String,
}

impl RelationDef {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
        owner_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            target: target.into(),
            owner_column: owner_column.into(),
            target_column: target_column.into(),
        }
    }
}

/// Outcome of walking a dotted path through the schema catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathValidation {
    pub connections: Vec<String>,
    pub errors: Vec<String>,
}

impl PathValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn connection_string(&self) -> Option<String> {
        if self.connections.is_empty() {
            None
        } else {
            Some(self.connections.join("."))
        }
    }
}
