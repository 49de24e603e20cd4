pub mod schema;
pub mod sea_query;
