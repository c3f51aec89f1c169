pub mod error;
pub mod links;
pub mod models;
pub mod store;

pub use error::{ErrorCode, ErrorResponse};
pub use links::{resolve, ServiceBases};
pub use models::*;
pub use store::{EntityStore, Identified, MemoryStore, Merge, StoreError};
