pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod sync;

pub use config::ClientConfig;
pub use crate::core::{action::Action, state::AppState, store::Store};
pub use error::{BackendErrors, ClientError, ErrorKind};
pub use sync::{SyncClient, SyncOutcome};
