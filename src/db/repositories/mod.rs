pub mod search_count;
