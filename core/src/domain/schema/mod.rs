pub mod entities;
pub mod ports;
pub mod services;

pub use entities::{PathValidation, RelationDef};
pub use ports::SchemaCatalog;
