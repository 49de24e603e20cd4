pub mod builder;
pub mod plan;
pub mod row_counter;

pub use builder::SeaQueryBuilder;
pub use plan::{EagerLoadPlan, PagePlan};
pub use row_counter::RowCounter;
