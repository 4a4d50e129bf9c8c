//! API resource implementations for the Tavily client

/// Crawl API resource
pub mod crawl;
/// Extract API resource
pub mod extract;
/// Map API resource
pub mod map;
/// Search API resource
pub mod search;
/// Usage API resource
pub mod usage;

pub use crawl::Crawl;
pub use extract::Extract;
pub use map::Map;
pub use search::Search;
pub use usage::Usage;
