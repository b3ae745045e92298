pub mod movie;
pub mod trending;

pub use movie::MovieSummary;
pub use trending::{NewSearchCount, SearchCountRecord};
