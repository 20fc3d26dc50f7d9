//! Graph API plumbing: session, pagination, batching, and OData filters

pub mod batch;
pub mod constants;
pub mod directory;
pub mod page;
pub mod pager;
pub mod query;
pub mod session;

pub use batch::{BatchRequest, BatchResponseItem};
pub use page::Page;
pub use pager::Pager;
pub use query::{Filter, FilterValue};
pub use session::Session;
