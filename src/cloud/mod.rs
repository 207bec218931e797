//! Cloud save sync
//!
//! One save blob per username lives behind an Apps Script web app. Requests are
//! blocking `ureq` calls made on background threads; the game polls for results
//! once per frame and never waits on the network.

pub mod apps_script;
pub mod sync;

pub use apps_script::AppsScriptTransport;
pub use sync::{CloudEvent, CloudSyncManager};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("no cloud username set")]
    EmptyUsername,

    #[error("cloud request failed: {0}")]
    Network(String),

    #[error("cloud returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("could not read cloud response: {0}")]
    Io(#[from] std::io::Error),
}

/// Where cloud saves are stored.
///
/// Implementations block; `CloudSyncManager` runs them off the game thread.
pub trait CloudTransport: Send + Sync {
    /// Returns the stored save JSON, or None when the user has no cloud save yet
    fn fetch(&self, username: &str) -> Result<Option<String>, CloudError>;

    fn upload(&self, username: &str, json: &str) -> Result<(), CloudError>;
}
