pub mod entities;
pub mod path_resolver;
pub mod ports;
pub mod predicate;
pub mod services;
pub mod value_objects;

#[cfg(test)]
pub(crate) mod recording;

pub use ports::{QueryBuilder, QueryPlanService};
pub use services::PlanAssembler;
