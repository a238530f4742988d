//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::session::Session;

/// The state of the REST server.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The loaded statement and filters, `None` until a statement is uploaded.
    pub session: Arc<Mutex<Option<Session>>>,
}

impl AppState {
    /// Create a new [AppState] without a statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [AppState] with `session` already loaded.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(Some(session))),
        }
    }
}
