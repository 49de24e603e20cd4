use serde::{Deserialize, Serialize};

/// Whether a predicate is conjoined or disjoined with the predicates before it
/// in the same scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogicalMethod {
    #[default]
    And,
    Or,
}

impl LogicalMethod {
    pub fn is_or(self) -> bool {
        self == LogicalMethod::Or
    }
}

impl From<&str> for LogicalMethod {
    /// Accepts the builder method names used by request decoders
    /// (`where`, `orWhere`, `or_where`, `or`); anything else conjoins.
    fn from(method: &str) -> Self {
        let normalized: String = method
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "orwhere" | "or" => LogicalMethod::Or,
            _ => LogicalMethod::And,
        }
    }
}

impl From<String> for LogicalMethod {
    fn from(method: String) -> Self {
        LogicalMethod::from(method.as_str())
    }
}

impl From<LogicalMethod> for String {
    fn from(method: LogicalMethod) -> Self {
        match method {
            LogicalMethod::And => "where".to_string(),
            LogicalMethod::Or => "orWhere".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<&str> for SortDirection {
    fn from(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl From<String> for SortDirection {
    fn from(direction: String) -> Self {
        SortDirection::from(direction.as_str())
    }
}

impl From<SortDirection> for String {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => "ASC".to_string(),
            SortDirection::Desc => "DESC".to_string(),
        }
    }
}

/// One predicate request. `field` is a dotted path such as `author.name`.
///
/// The operator is kept as the raw code sent by the client so an unknown code
/// is only rejected when the filter is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub method: LogicalMethod,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            method: LogicalMethod::And,
        }
    }

    pub fn with_method(mut self, method: LogicalMethod) -> Self {
        self.method = method;
        self
    }

    /// Same filter targeting another field.
    pub fn with_field(&self, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A relation the caller wants eager-loaded, e.g. `author.profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub name: String,
}

impl Connection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }
}

/// Everything decoded from one incoming request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub sorts: Vec<Sort>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn has_sort(&self) -> bool {
        !self.sorts.is_empty()
    }

    pub fn has_connection(&self) -> bool {
        !self.connections.is_empty()
    }

    /// A zero limit means the caller did not ask for a page.
    pub fn has_pagination(&self) -> bool {
        self.pagination.is_some_and(|p| p.limit > 0)
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination.filter(|p| p.limit > 0)
    }
}
