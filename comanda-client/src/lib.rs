//! Comanda client engine
//!
//! Order state synchronization and composition engine for a
//! restaurant-operations client. Keeps a paginated, filtered order
//! collection consistent across three concurrent input sources:
//!
//! - paginated fetches from the backend ([`fetch::OrderFetchCoordinator`])
//! - push events over the realtime channel ([`channel::ChannelManager`])
//! - local optimistic edits (cart composition, order patches)
//!
//! All three write the same [`store::OrderStore`] under last-write-wins
//! merge rules; read-side views ([`kanban`]) never mutate it.

pub mod cart;
pub mod channel;
pub mod config;
pub mod error;
pub mod fetch;
pub mod kanban;
pub mod session;
pub mod store;

// Re-exports
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use store::{OrderStore, SharedOrderStore};
