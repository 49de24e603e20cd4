pub mod common;
pub mod query;
pub mod schema;
