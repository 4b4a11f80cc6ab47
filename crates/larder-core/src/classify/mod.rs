pub mod engine;
pub mod outcome;

pub use engine::{classify, is_perishable, partition_products, ProductPartition};
pub use outcome::SalesReport;
