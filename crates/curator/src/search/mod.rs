//! Indicator search: registry catalog plus live provider catalogs.

mod cache;
mod downloaded;
mod hybrid;
mod local;
mod remote;
mod result;

pub use cache::TtlCache;
pub use downloaded::{DownloadIndex, source_pattern};
pub use hybrid::HybridSearch;
pub use local::search_catalog;
pub use remote::{ImfSearch, RemoteSearcher, WorldBankSearch, default_searchers};
pub use result::{LOCAL_KEY, SearchHit, SearchOptions, SearchResultSet};
