pub mod client;
pub mod payload;
pub mod transport;

pub use client::{SyncClient, SyncOutcome};
pub use transport::{ReqwestTransport, Transport};
