pub mod config;
pub mod search;
pub mod suggest;

pub use search::run_search;
pub use suggest::run_suggest;
