//! Shared types for the Comanda engine
//!
//! Common types used by the client engine and any frontend embedding it:
//! order and catalog models, query/pagination types, and the realtime
//! channel protocol.

pub mod message;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Channel protocol re-exports (for convenient access)
pub use message::{ChannelMessage, EventType};

// Query re-exports
pub use query::{OrderFilters, OrderQuery, PaginatedResponse, Pagination, SortDirection};
