pub mod analytics;
pub mod experiences;
pub mod saved_searches;
pub mod search;
pub mod vocabulary;
