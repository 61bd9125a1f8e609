use loan_approval::workflows::loan::{SessionError, SessionId, SessionRecord, SessionStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session records keyed by cookie id.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| SessionError::Unavailable("session mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn save(&self, id: SessionId, record: SessionRecord) -> Result<(), SessionError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| SessionError::Unavailable("session mutex poisoned".to_string()))?;
        guard.insert(id, record);
        Ok(())
    }
}
