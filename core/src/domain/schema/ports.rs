use crate::domain::schema::entities::RelationDef;

/// Relation metadata lookup.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaCatalog: Send + Sync {
    fn relation(&self, owner: &str, name: &str) -> Option<RelationDef>;
}
