pub mod query;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sql_query;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use query::*;
pub use store::*;

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteItemStore;
