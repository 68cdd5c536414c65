pub mod entity_table;
pub mod extraction;
pub mod prompt;
pub mod search_result;
