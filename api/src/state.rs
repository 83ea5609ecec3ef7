//! Application state shared across Axum route handlers and WebSocket handlers.

use sea_orm::DatabaseConnection;
use services::device_binding::DeviceBindingVerifier;
use services::fingerprint::{ArpFingerprintResolver, FingerprintResolver};
use services::session::SessionManager;
use std::sync::Arc;
use util::ws::WebSocketManager;

/// Central application state.
///
/// - The database connection (cheap to clone, pooled internally)
/// - The `WebSocketManager` every live topic goes through
/// - The one `SessionManager`, shared by the presenter socket and the scan route
/// - The fingerprint resolver used to identify attendee devices
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ws: WebSocketManager,
    sessions: Arc<SessionManager>,
    binding: DeviceBindingVerifier,
    fingerprints: Arc<dyn FingerprintResolver>,
}

impl AppState {
    /// `sessions` must publish through the same `ws` manager.
    pub fn new(
        db: DatabaseConnection,
        ws: WebSocketManager,
        sessions: SessionManager,
        fingerprints: Arc<dyn FingerprintResolver>,
    ) -> Self {
        Self {
            binding: DeviceBindingVerifier::new(db.clone()),
            db,
            ws,
            sessions: Arc::new(sessions),
            fingerprints,
        }
    }

    /// Wires everything from `util::config`: random codes, the configured
    /// rotation period and overlap policy, and ARP-based fingerprints.
    pub fn from_config(db: DatabaseConnection) -> Self {
        let ws = WebSocketManager::new();
        let sessions = SessionManager::from_config(db.clone(), ws.clone());
        Self::new(db, ws, sessions, Arc::new(ArpFingerprintResolver::from_config()))
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn binding(&self) -> &DeviceBindingVerifier {
        &self.binding
    }

    pub fn fingerprints(&self) -> &dyn FingerprintResolver {
        self.fingerprints.as_ref()
    }
}
