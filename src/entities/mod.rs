pub mod prelude;

pub mod search_counts;
