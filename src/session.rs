//! Per-client realtime session tracking.
//!
//! Each WebSocket client owns at most one running push loop. Starting a new
//! loop first stops the previous one through its shared running flag; the old
//! loop notices at its next check and winds down without publishing again.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Cooperative cancellation handle for one push loop.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    running: Arc<AtomicBool>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the loop should keep running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Signals the loop to stop at its next check.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Registry mapping client ids to their active push loop handles.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh loop handle for a client, stopping any loop the
    /// client already had.
    pub fn begin(&self, client_id: Uuid) -> SessionHandle {
        let handle = SessionHandle::new();
        let mut sessions = self.sessions.write();
        if let Some(previous) = sessions.insert(client_id, handle.clone()) {
            previous.stop();
        }
        handle
    }

    /// Stops a client's loop, keeping the registration so a later `begin`
    /// replaces it. Returns whether a loop was running.
    pub fn stop(&self, client_id: &Uuid) -> bool {
        let sessions = self.sessions.read();
        match sessions.get(client_id) {
            Some(handle) => {
                let was_running = handle.is_running();
                handle.stop();
                was_running
            }
            None => false,
        }
    }

    /// Stops and forgets a client's loop; used on disconnect.
    pub fn remove(&self, client_id: &Uuid) {
        if let Some(handle) = self.sessions.write().remove(client_id) {
            handle.stop();
        }
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no clients are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
