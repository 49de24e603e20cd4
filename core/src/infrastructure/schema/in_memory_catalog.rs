use std::collections::HashMap;

use crate::domain::{
    common::SchemaConfig,
    schema::{entities::RelationDef, ports::SchemaCatalog},
};

/// Catalog built from a fixed list of relation definitions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaCatalog {
    relations: HashMap<(String, String), RelationDef>,
}

impl InMemorySchemaCatalog {
    pub fn new(relations: Vec<RelationDef>) -> Self {
        let relations = relations
            .into_iter()
            .map(|relation| ((relation.owner.clone(), relation.name.clone()), relation))
            .collect();
        Self { relations }
    }

    pub fn from_config(config: &SchemaConfig) -> Self {
        Self::new(config.relations.clone())
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl SchemaCatalog for InMemorySchemaCatalog {
    fn relation(&self, owner: &str, name: &str) -> Option<RelationDef> {
        self.relations
            .get(&(owner.to_string(), name.to_string()))
            .cloned()
    }
}
