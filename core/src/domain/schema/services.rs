use tracing::{debug, error};

use crate::domain::{
    common::entities::app_errors::CoreError,
    query::path_resolver::{PATH_SEPARATOR, snake_case_to_camel_case},
    schema::{
        entities::{PathValidation, RelationDef},
        ports::SchemaCatalog,
    },
};

/// Walks `chain` hop by hop from `root`, returning one definition per hop.
/// An empty segment never names a relation.
pub fn resolve_relation_chain<C: SchemaCatalog + ?Sized>(
    catalog: &C,
    root: &str,
    chain: &str,
) -> Result<Vec<RelationDef>, CoreError> {
    let mut owner = root.to_string();
    let mut hops = Vec::new();

    for segment in chain.split(PATH_SEPARATOR) {
        let relation = catalog.relation(&owner, segment).ok_or_else(|| {
            error!(owner = %owner, relation = %segment, "Unknown relation in chain");
            CoreError::UnknownRelation {
                owner: owner.clone(),
                relation: segment.to_string(),
            }
        })?;
        owner = relation.target.clone();
        hops.push(relation);
    }

    Ok(hops)
}

/// Checks every relation segment of `path` against the catalog.
///
/// In attribute mode an unknown last segment is the attribute and ends the
/// walk. Any other unknown segment is reported and no connections are kept.
pub fn validate_relation_path<C: SchemaCatalog + ?Sized>(
    catalog: &C,
    root: &str,
    path: &str,
    is_attribute: bool,
) -> PathValidation {
    let segments: Vec<String> = path
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(snake_case_to_camel_case)
        .collect();

    let mut validation = PathValidation::default();
    let mut owner = root.to_string();

    for (index, segment) in segments.iter().enumerate() {
        match catalog.relation(&owner, segment) {
            Some(relation) => {
                validation.connections.push(segment.clone());
                owner = relation.target;
            }
            None if is_attribute && index + 1 == segments.len() => break,
            None => {
                validation
                    .errors
                    .push(format!("Relation does not exist: {owner}::{segment}"));
            }
        }
    }

    if !validation.is_valid() {
        debug!(path = %path, errors = ?validation.errors, "Relation path failed validation");
        validation.connections.clear();
    }

    validation
}
