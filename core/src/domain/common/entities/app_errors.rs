use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Not allowed operator: {0}")]
    UnsupportedOperator(String),

    #[error("Unknown relation {relation} on {owner}")]
    UnknownRelation { owner: String, relation: String },

    #[error("Row count failed: {0}")]
    RowCount(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl CoreError {
    /// Errors caused by the request itself rather than by the data-access layer.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, CoreError::UnsupportedOperator(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operator_is_bad_request() {
        let err = CoreError::UnsupportedOperator("xyz".to_string());
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "Not allowed operator: xyz");
    }

    #[test]
    fn test_unknown_relation_is_not_bad_request() {
        let err = CoreError::UnknownRelation {
            owner: "posts".to_string(),
            relation: "ghost".to_string(),
        };
        assert!(!err.is_bad_request());
    }
}
