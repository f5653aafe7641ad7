//! Blocking JSON-RPC client for execute_kw-convention business-object
//! services: session authentication, the object transport, and the
//! `RecordSource` implementation the materializer consumes.

pub mod client;
pub mod error;
pub mod session;
pub mod transport;

pub use client::ObjectClient;
pub use error::RpcError;
pub use session::{Profile, Session};
