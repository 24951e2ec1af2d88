pub mod filter;
pub mod movie;
pub mod query;

pub use filter::{FilterAction, FilterError, FilterField, FilterState};
pub use movie::{Genre, MovieRecord, PageSize};
pub use query::QueryParameters;
