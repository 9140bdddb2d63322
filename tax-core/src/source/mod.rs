pub mod config;
pub mod page_source;

pub use config::SourceConfig;
pub use page_source::{FetchError, PageSource};
