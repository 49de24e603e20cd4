use std::cell::OnceCell;

use crate::domain::query::entities::ResolvedPath;

pub const PATH_SEPARATOR: char = '.';

/// Resolves a dotted path once and caches the result.
///
/// In attribute mode the last segment is the leaf attribute and every segment
/// before it is a relation. In relation mode every segment is a relation.
#[derive(Debug, Clone)]
pub struct PathResolver {
    value: String,
    is_attribute: bool,
    resolved: OnceCell<ResolvedPath>,
}

impl PathResolver {
    pub fn new(value: impl Into<String>, is_attribute: bool) -> Self {
        Self {
            value: value.into(),
            is_attribute,
            resolved: OnceCell::new(),
        }
    }

    pub fn attribute(value: impl Into<String>) -> Self {
        Self::new(value, true)
    }

    pub fn relation(value: impl Into<String>) -> Self {
        Self::new(value, false)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn resolved(&self) -> &ResolvedPath {
        self.resolved
            .get_or_init(|| resolve(&self.value, self.is_attribute))
    }

    pub fn has_connections(&self) -> bool {
        self.resolved().has_connections()
    }

    pub fn connection_string(&self) -> Option<String> {
        self.resolved().connection_string()
    }

    pub fn leaf_field(&self) -> &str {
        &self.resolved().leaf_field
    }
}

/// Pure string transformation, no schema lookup.
///
/// Empty segments are kept, so any path containing a separator carries a
/// relation chain. Only the empty path has no segments at all.
pub fn resolve(path: &str, is_attribute: bool) -> ResolvedPath {
    let mut segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split(PATH_SEPARATOR).collect()
    };

    let leaf_field = if is_attribute {
        segments.pop().unwrap_or_default().to_string()
    } else {
        String::new()
    };

    let relation_chain = segments
        .into_iter()
        .map(snake_case_to_camel_case)
        .collect();

    ResolvedPath {
        value: path.to_string(),
        relation_chain,
        leaf_field,
    }
}

/// `order_items` -> `orderItems`, `Author` -> `author`.
pub fn snake_case_to_camel_case(segment: &str) -> String {
    let mut camel = String::with_capacity(segment.len());
    let mut upper_next = true;

    for c in segment.chars() {
        if c == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            camel.extend(c.to_uppercase());
        } else {
            camel.push(c);
        }
        upper_next = false;
    }

    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => camel,
    }
}

/// Prefixes `field` with `storage_name.` unless it already carries that prefix.
pub fn qualify(storage_name: &str, field: &str) -> String {
    let prefix = format!("{storage_name}{PATH_SEPARATOR}");
    if field.starts_with(&prefix) {
        field.to_string()
    } else {
        format!("{prefix}{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_path_with_relations() {
        let resolver = PathResolver::attribute("author.profile.city");
        assert!(resolver.has_connections());
        assert_eq!(
            resolver.connection_string().as_deref(),
            Some("author.profile")
        );
        assert_eq!(resolver.leaf_field(), "city");
    }

    #[test]
    fn test_bare_attribute_is_root_level() {
        let resolver = PathResolver::attribute("title");
        assert!(!resolver.has_connections());
        assert_eq!(resolver.connection_string(), None);
        assert_eq!(resolver.leaf_field(), "title");
    }

    #[test]
    fn test_relation_path_is_normalized() {
        let resolver = PathResolver::relation("order_items");
        assert!(resolver.has_connections());
        assert_eq!(resolver.connection_string().as_deref(), Some("orderItems"));
        assert_eq!(resolver.leaf_field(), "");
    }

    #[test]
    fn test_each_segment_is_normalized_independently() {
        let path = resolve("order_items.shipping_address.postal_code", true);
        assert_eq!(path.relation_chain, vec!["orderItems", "shippingAddress"]);
        // the leaf names a column, so it keeps its storage spelling
        assert_eq!(path.leaf_field, "postal_code");

        let path = resolve("blog_post.top_comments", false);
        assert_eq!(path.connection_string().as_deref(), Some("blogPost.topComments"));
    }

    #[test]
    fn test_empty_segments_still_count_as_relations() {
        let path = resolve(".name", true);
        assert!(path.has_connections());
        assert_eq!(path.relation_chain, vec![""]);
        assert_eq!(path.leaf_field, "name");

        let path = resolve("author..name", true);
        assert_eq!(path.relation_chain, vec!["author", ""]);
        assert_eq!(path.connection_string().as_deref(), Some("author."));

        let path = resolve("", false);
        assert!(!path.has_connections());
        assert_eq!(resolve("", true).leaf_field, "");
    }

    #[test]
    fn test_snake_case_to_camel_case() {
        assert_eq!(snake_case_to_camel_case("order_items"), "orderItems");
        assert_eq!(snake_case_to_camel_case("Author"), "author");
        assert_eq!(snake_case_to_camel_case("createdAt"), "createdAt");
        assert_eq!(snake_case_to_camel_case("user_ID"), "userID");
        assert_eq!(snake_case_to_camel_case("__private_key"), "privateKey");
        assert_eq!(snake_case_to_camel_case(""), "");
    }

    #[test]
    fn test_qualify_is_idempotent() {
        assert_eq!(qualify("profiles", "city"), "profiles.city");
        assert_eq!(qualify("profiles", "profiles.city"), "profiles.city");
        assert_eq!(
            qualify("profiles", &qualify("profiles", "city")),
            "profiles.city"
        );
        // a different table's prefix is not mistaken for ours
        assert_eq!(qualify("profiles", "profile.city"), "profiles.profile.city");
    }

    #[test]
    fn test_resolved_path_serializes() {
        let value = serde_json::to_value(resolve("author.name", true)).unwrap();
        assert_eq!(value["value"], "author.name");
        assert_eq!(value["relation_chain"][0], "author");
        assert_eq!(value["leaf_field"], "name");
    }
}
